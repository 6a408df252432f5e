//! Aggregation entry points
//!
//! Flow per call: validate the request, pick compatible adapters, dispatch
//! one attempt per adapter, select a winner, then (quotes only) attach the
//! approval requirement of the winner.

use futures::FutureExt;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tracing::instrument::WithSubscriber;
use tracing::{info, Dispatch};
use xswap_adapters::AdapterRegistry;
use xswap_types::{
	AdapterInfo, AggregationOutcome, AggregationResult, PriceRequest, PriceResult, QuoteRequest,
	QuoteResult, SelectionMethod, SwapIntent, VmFamily,
};

use crate::approval::ApprovalChecker;
use crate::compatibility::CompatibilityFilter;
use crate::config::AggregatorConfig;
use crate::dispatcher::{Dispatcher, Finisher};
use crate::selector;
use crate::simulation::{QuoteSimulator, SimulationService};

#[derive(Debug)]
pub struct AggregatorService {
	registry: Arc<AdapterRegistry>,
	config: AggregatorConfig,
	filter: CompatibilityFilter,
	dispatcher: Dispatcher,
	simulation: Arc<SimulationService>,
	approvals: ApprovalChecker,
	log_dispatch: Option<Dispatch>,
}

impl AggregatorService {
	pub fn new(registry: Arc<AdapterRegistry>, config: AggregatorConfig) -> Self {
		Self {
			filter: CompatibilityFilter::new(
				config.include_protocols.clone(),
				config.exclude_protocols.clone(),
			),
			dispatcher: Dispatcher::new(config.timeout_ms, config.max_concurrency),
			simulation: Arc::new(SimulationService::from_config(&config)),
			approvals: ApprovalChecker::new(&config.rpc_endpoints, config.timeout_ms),
			registry,
			config,
			log_dispatch: None,
		}
	}

	/// Simulate every quote on chains of `vm` with `simulator`
	pub fn with_custom_simulator(mut self, vm: VmFamily, simulator: Arc<dyn QuoteSimulator>) -> Self {
		Arc::make_mut(&mut self.simulation).set_custom(vm, simulator);
		self
	}

	/// Route every log of this service, spawned attempts included, to `dispatch`
	pub fn with_log_dispatch(mut self, dispatch: Dispatch) -> Self {
		self.log_dispatch = Some(dispatch);
		self
	}

	pub fn registry(&self) -> &AdapterRegistry {
		&self.registry
	}

	pub fn config(&self) -> &AggregatorConfig {
		&self.config
	}

	pub fn adapters(&self) -> Vec<AdapterInfo> {
		self.registry
			.all()
			.iter()
			.map(|adapter| adapter.info().clone())
			.collect()
	}

	/// Price aggregation with the configured selection method
	pub async fn fetch_price(
		&self,
		request: &PriceRequest,
	) -> AggregationResult<AggregationOutcome<PriceResult>> {
		self.fetch_price_with(request, self.config.method).await
	}

	pub async fn fetch_price_with(
		&self,
		request: &PriceRequest,
		method: SelectionMethod,
	) -> AggregationResult<AggregationOutcome<PriceResult>> {
		self.logged(self.aggregate_price(request, method)).await
	}

	/// Quote aggregation with the configured selection method
	pub async fn fetch_quote(
		&self,
		request: &QuoteRequest,
	) -> AggregationResult<AggregationOutcome<QuoteResult>> {
		self.fetch_quote_with(request, self.config.method).await
	}

	pub async fn fetch_quote_with(
		&self,
		request: &QuoteRequest,
		method: SelectionMethod,
	) -> AggregationResult<AggregationOutcome<QuoteResult>> {
		self.logged(self.aggregate_quote(request, method)).await
	}

	async fn logged<F: Future>(&self, future: F) -> F::Output {
		match &self.log_dispatch {
			Some(dispatch) => future.with_subscriber(dispatch.clone()).await,
			None => future.await,
		}
	}

	async fn aggregate_price(
		&self,
		request: &PriceRequest,
		method: SelectionMethod,
	) -> AggregationResult<AggregationOutcome<PriceResult>> {
		request.validate()?;
		let adapters = self
			.filter
			.select(&self.registry, request.chain_in, request.chain_out)?;

		info!(
			"Fetching prices {} -> {} from {} adapters ({})",
			request.chain_in,
			request.chain_out,
			adapters.len(),
			method
		);

		let started = Instant::now();
		let shared = Arc::new(request.clone());
		let attempts = self.dispatcher.dispatch(
			adapters,
			move |adapter| {
				let request = shared.clone();
				async move { adapter.fetch_price(&request).await }
			},
			None,
		);

		Ok(selector::select(method, attempts, false, started).await)
	}

	async fn aggregate_quote(
		&self,
		request: &QuoteRequest,
		method: SelectionMethod,
	) -> AggregationResult<AggregationOutcome<QuoteResult>> {
		request.validate()?;
		let adapters = self
			.filter
			.select(&self.registry, request.chain_in, request.chain_out)?;

		let simulate = self.config.simulate_quotes;
		if simulate {
			self.simulation.ensure_available(request.chain_in)?;
		}

		info!(
			"Fetching quotes {} -> {} from {} adapters ({}, simulation {})",
			request.chain_in,
			request.chain_out,
			adapters.len(),
			method,
			if simulate { "on" } else { "off" }
		);

		let started = Instant::now();
		let shared = Arc::new(request.clone());
		let finish = simulate.then(|| self.simulation_finisher(shared.clone()));
		let attempts = self.dispatcher.dispatch(
			adapters,
			move |adapter| {
				let request = shared.clone();
				async move { adapter.fetch_quote(&request).await }
			},
			finish,
		);

		let mut outcome = selector::select(method, attempts, simulate, started).await;

		if self.config.check_approvals {
			if let Some(winner) = outcome.result.as_mut() {
				let approval = self.approvals.check(request, winner).await;
				winner.approval = approval;
			}
		}

		Ok(outcome)
	}

	fn simulation_finisher(&self, request: Arc<QuoteRequest>) -> Finisher<QuoteResult> {
		let simulation = self.simulation.clone();
		Arc::new(move |quote: QuoteResult| {
			let simulation = simulation.clone();
			let request = request.clone();
			async move { simulation.simulate(&request, quote).await }.boxed()
		})
	}
}
