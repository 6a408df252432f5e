//! xswap Adapters
//!
//! Built-in liquidity source adapters and the registry that decides, once at
//! startup, which of them are usable with the current configuration.

pub mod http;
pub mod jupiter;
pub mod lifi;
pub mod zerox;

pub use jupiter::JupiterAdapter;
pub use lifi::LifiAdapter;
pub use zerox::ZeroxAdapter;
pub use xswap_types::{AdapterError, AdapterResult, SwapAdapter};

use std::sync::Arc;
use tracing::{debug, info};
use xswap_types::{AdapterEnvironment, AdapterFactoryError, AdapterFactoryResult};

/// Built-in adapter: configuration predicate plus factory
pub struct AdapterEntry {
	pub protocol: &'static str,
	/// Whether the environment carries everything the adapter needs
	pub is_correct_config: fn(&AdapterEnvironment) -> bool,
	pub build: fn(&AdapterEnvironment) -> AdapterResult<Arc<dyn SwapAdapter>>,
}

/// Adapters shipped with the aggregator, in registry order
pub static BUILT_IN_ADAPTERS: &[AdapterEntry] = &[
	AdapterEntry {
		protocol: lifi::PROTOCOL,
		is_correct_config: LifiAdapter::is_correct_config,
		build: build_lifi,
	},
	AdapterEntry {
		protocol: zerox::PROTOCOL,
		is_correct_config: ZeroxAdapter::is_correct_config,
		build: build_zerox,
	},
	AdapterEntry {
		protocol: jupiter::PROTOCOL,
		is_correct_config: JupiterAdapter::is_correct_config,
		build: build_jupiter,
	},
];

fn build_lifi(env: &AdapterEnvironment) -> AdapterResult<Arc<dyn SwapAdapter>> {
	Ok(Arc::new(LifiAdapter::from_environment(env)?))
}

fn build_zerox(env: &AdapterEnvironment) -> AdapterResult<Arc<dyn SwapAdapter>> {
	Ok(Arc::new(ZeroxAdapter::from_environment(env)?))
}

fn build_jupiter(env: &AdapterEnvironment) -> AdapterResult<Arc<dyn SwapAdapter>> {
	Ok(Arc::new(JupiterAdapter::from_environment(env)?))
}

/// Ordered, read-only-after-startup set of adapters
#[derive(Debug, Default, Clone)]
pub struct AdapterRegistry {
	adapters: Vec<Arc<dyn SwapAdapter>>,
}

impl AdapterRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Build every built-in adapter the environment enables and fully configures
	pub fn from_environment(env: &AdapterEnvironment) -> AdapterFactoryResult<Self> {
		Self::from_entries(BUILT_IN_ADAPTERS, env)
	}

	pub fn from_entries(
		entries: &[AdapterEntry],
		env: &AdapterEnvironment,
	) -> AdapterFactoryResult<Self> {
		let mut registry = Self::new();

		for entry in entries {
			if !env.is_enabled(entry.protocol) {
				info!("Adapter '{}' disabled by configuration", entry.protocol);
				continue;
			}

			if !(entry.is_correct_config)(env) {
				info!(
					"Adapter '{}' skipped: required configuration missing",
					entry.protocol
				);
				continue;
			}

			let adapter =
				(entry.build)(env).map_err(|e| AdapterFactoryError::CreationFailed {
					protocol: entry.protocol.to_string(),
					reason: e.to_string(),
				})?;
			registry.register(adapter)?;
		}

		Ok(registry)
	}

	/// Register an adapter, rejecting invalid identities and duplicate protocols
	pub fn register(&mut self, adapter: Arc<dyn SwapAdapter>) -> AdapterFactoryResult<()> {
		adapter.info().validate()?;

		if self.get(adapter.protocol()).is_some() {
			return Err(AdapterFactoryError::AlreadyRegistered {
				protocol: adapter.protocol().to_string(),
			});
		}

		debug!(
			"Registered adapter '{}' on {} chains",
			adapter.protocol(),
			adapter.info().chains.len()
		);
		self.adapters.push(adapter);
		Ok(())
	}

	pub fn get(&self, protocol: &str) -> Option<&Arc<dyn SwapAdapter>> {
		self.adapters.iter().find(|a| a.protocol() == protocol)
	}

	pub fn all(&self) -> &[Arc<dyn SwapAdapter>] {
		&self.adapters
	}

	pub fn protocols(&self) -> Vec<&str> {
		self.adapters.iter().map(|a| a.protocol()).collect()
	}

	pub fn len(&self) -> usize {
		self.adapters.len()
	}

	pub fn is_empty(&self) -> bool {
		self.adapters.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use async_trait::async_trait;
	use xswap_types::{
		AdapterInfo, ChainId, PriceRequest, PriceResult, ProtocolConfig, QuoteRequest,
		QuoteResult, SecretString,
	};

	#[derive(Debug)]
	struct StaticAdapter {
		info: AdapterInfo,
	}

	impl StaticAdapter {
		fn new(protocol: &str) -> Self {
			Self {
				info: AdapterInfo::new(protocol, protocol)
					.single_chain()
					.with_chains([ChainId::ETHEREUM]),
			}
		}
	}

	#[async_trait]
	impl SwapAdapter for StaticAdapter {
		fn info(&self) -> &AdapterInfo {
			&self.info
		}

		async fn fetch_price(&self, _request: &PriceRequest) -> AdapterResult<PriceResult> {
			Err(AdapterError::NoRoute {
				reason: "static".to_string(),
			})
		}

		async fn fetch_quote(&self, _request: &QuoteRequest) -> AdapterResult<QuoteResult> {
			Err(AdapterError::NoRoute {
				reason: "static".to_string(),
			})
		}
	}

	#[test]
	fn test_default_environment_skips_keyed_adapters() {
		let registry = AdapterRegistry::from_environment(&AdapterEnvironment::default()).unwrap();
		assert_eq!(registry.protocols(), vec!["lifi", "jupiter"]);
	}

	#[test]
	fn test_api_key_enables_zerox_in_order() {
		let mut env = AdapterEnvironment::default();
		env.protocols.insert(
			"zerox".to_string(),
			ProtocolConfig {
				api_key: Some(SecretString::from("key")),
				..Default::default()
			},
		);
		let registry = AdapterRegistry::from_environment(&env).unwrap();
		assert_eq!(registry.protocols(), vec!["lifi", "zerox", "jupiter"]);
	}

	#[test]
	fn test_disabled_and_filtered_out_adapters_are_skipped() {
		let mut env = AdapterEnvironment::default();
		env.protocols.insert(
			"lifi".to_string(),
			ProtocolConfig {
				enabled: false,
				..Default::default()
			},
		);
		env.protocols.insert(
			"jupiter".to_string(),
			ProtocolConfig {
				chains: Some(vec![ChainId::ETHEREUM]),
				..Default::default()
			},
		);
		let registry = AdapterRegistry::from_environment(&env).unwrap();
		assert!(registry.is_empty());
	}

	#[test]
	fn test_duplicate_registration_rejected() {
		let mut registry = AdapterRegistry::new();
		registry.register(Arc::new(StaticAdapter::new("dex"))).unwrap();
		let err = registry
			.register(Arc::new(StaticAdapter::new("dex")))
			.unwrap_err();
		assert!(matches!(err, AdapterFactoryError::AlreadyRegistered { .. }));
		assert_eq!(registry.len(), 1);
		assert!(registry.get("dex").is_some());
	}

	#[test]
	fn test_factory_failure_is_reported() {
		let entries = [AdapterEntry {
			protocol: "broken",
			is_correct_config: |_| true,
			build: |_| {
				Err(AdapterError::ConfigError {
					reason: "nope".to_string(),
				})
			},
		}];
		let err = AdapterRegistry::from_entries(&entries, &AdapterEnvironment::default())
			.unwrap_err();
		assert!(matches!(err, AdapterFactoryError::CreationFailed { .. }));
	}
}
