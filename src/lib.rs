//! xswap Aggregator Library
//!
//! Concurrent price and quote aggregation across swap and bridge liquidity
//! sources, with race and best-output selection, optional quote simulation
//! and approval checks.

// Core domain types
pub use xswap_types::{
	chrono, serde_json, AdapterError, AdapterInfo, AdapterResult, AggregationError,
	AggregationOutcome, AttemptOutcome, ChainId, PriceRequest, PriceResult, QuoteRequest,
	QuoteResult, SelectionMethod, SwapAdapter, VmFamily,
};

// Service layer
pub use xswap_service::{AggregatorConfig, AggregatorService, QuoteSimulator};

// API layer
pub use xswap_api::{create_router, AppState};

// Adapters
pub use xswap_adapters::AdapterRegistry;

// Config
pub use xswap_config::{load_config, Settings};

pub mod models {
	pub use xswap_types::*;
}

pub mod config {
	pub use xswap_config::*;
}

pub mod adapters {
	pub use xswap_adapters::*;
}

pub mod api {
	pub use xswap_api::*;
}

pub mod service {
	pub use xswap_service::*;
}

use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, Dispatch};
use xswap_config::{
	log_aggregation_settings, log_service_info, log_service_shutdown, log_startup_complete,
	LogFormat,
};

// Re-export external dependencies for custom adapters
pub use async_trait;

/// Builder pattern for configuring the aggregator
#[derive(Default)]
pub struct AggregatorBuilder {
	settings: Option<Settings>,
	adapter_registry: Option<AdapterRegistry>,
	adapters: Vec<Arc<dyn SwapAdapter>>,
	simulators: Vec<(VmFamily, Arc<dyn QuoteSimulator>)>,
	log_dispatch: Option<Dispatch>,
}

impl AggregatorBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	/// Set custom settings instead of loading them from the config file
	pub fn with_settings(mut self, settings: Settings) -> Self {
		self.settings = Some(settings);
		self
	}

	pub fn settings(&self) -> Option<&Settings> {
		self.settings.as_ref()
	}

	/// Use `registry` instead of the built-in adapters
	pub fn with_registry(mut self, registry: AdapterRegistry) -> Self {
		self.adapter_registry = Some(registry);
		self
	}

	/// Register a custom adapter after the built-in ones
	pub fn with_adapter(mut self, adapter: Arc<dyn SwapAdapter>) -> Self {
		self.adapters.push(adapter);
		self
	}

	/// Replace the built-in simulation for every chain of `vm`
	pub fn with_simulator(mut self, vm: VmFamily, simulator: Arc<dyn QuoteSimulator>) -> Self {
		self.simulators.push((vm, simulator));
		self
	}

	/// Send aggregation logs to `dispatch` instead of the global subscriber
	pub fn with_log_dispatch(mut self, dispatch: Dispatch) -> Self {
		self.log_dispatch = Some(dispatch);
		self
	}

	/// Build the aggregation service
	pub fn build(self) -> Result<AggregatorService, Box<dyn std::error::Error>> {
		let settings = self.settings.unwrap_or_default();
		settings.validate()?;

		let mut registry = match self.adapter_registry {
			Some(registry) => registry,
			None => AdapterRegistry::from_environment(&settings.adapter_environment()?)?,
		};
		for adapter in self.adapters {
			registry.register(adapter)?;
		}

		let config = AggregatorConfig::try_from(&settings)?;
		let mut service = AggregatorService::new(Arc::new(registry), config);
		for (vm, simulator) in self.simulators {
			service = service.with_custom_simulator(vm, simulator);
		}
		if let Some(dispatch) = self.log_dispatch {
			service = service.with_log_dispatch(dispatch);
		}

		info!(
			"Aggregator initialized with {} adapter(s): {}",
			service.registry().len(),
			service.registry().protocols().join(", ")
		);

		Ok(service)
	}

	/// Build the service and return the router with its state
	pub fn start(self) -> Result<(axum::Router, AppState), Box<dyn std::error::Error>> {
		let state = AppState::new(Arc::new(self.build()?));
		let router = create_router().with_state(state.clone());
		Ok((router, state))
	}

	fn init_tracing_from_settings(settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
		let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
			.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&settings.logging.level));
		let structured = settings.logging.structured;

		let installed = match settings.logging.format {
			LogFormat::Json => tracing_subscriber::fmt()
				.json()
				.with_env_filter(env_filter)
				.with_target(structured)
				.with_thread_ids(structured)
				.try_init(),
			LogFormat::Pretty => tracing_subscriber::fmt()
				.pretty()
				.with_env_filter(env_filter)
				.with_target(structured)
				.with_thread_ids(structured)
				.try_init(),
			LogFormat::Compact => tracing_subscriber::fmt()
				.compact()
				.with_env_filter(env_filter)
				.with_target(structured)
				.with_thread_ids(structured)
				.try_init(),
		};
		installed.map_err(|e| e as Box<dyn std::error::Error>)?;

		info!(
			"Logging configuration applied: level={}, format={:?}, structured={}",
			settings.logging.level, settings.logging.format, settings.logging.structured
		);
		Ok(())
	}

	/// Start the complete server
	///
	/// Loads `.env` and the config file (unless settings were provided),
	/// installs the global tracing subscriber, then serves until Ctrl-C.
	pub async fn start_server(mut self) -> Result<(), Box<dyn std::error::Error>> {
		dotenvy::dotenv().ok();

		let settings = match self.settings.take() {
			Some(settings) => settings,
			None => load_config()?,
		};

		Self::init_tracing_from_settings(&settings)?;
		log_service_info(env!("CARGO_PKG_VERSION"));
		log_aggregation_settings(&settings);

		let bind_addr = settings.bind_address();
		let addr: SocketAddr = bind_addr
			.parse()
			.map_err(|e| format!("Invalid bind address '{}': {}", bind_addr, e))?;

		let (app, state) = self.with_settings(settings).start()?;

		let listener = tokio::net::TcpListener::bind(addr).await?;
		log_startup_complete(&bind_addr, state.aggregator_service.registry().len());
		info!("API endpoints available:");
		info!("  GET  /health");
		info!("  GET  /api/v1/protocols");
		info!("  POST /api/v1/price");
		info!("  POST /api/v1/quote");

		axum::serve(listener, app)
			.with_graceful_shutdown(shutdown_signal())
			.await?;

		log_service_shutdown();
		Ok(())
	}
}

async fn shutdown_signal() {
	if let Err(e) = tokio::signal::ctrl_c().await {
		tracing::error!("Failed to listen for shutdown signal: {}", e);
		std::future::pending::<()>().await;
	}
}
