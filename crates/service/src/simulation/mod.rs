//! Pre-execution simulation of quotes
//!
//! Built-in simulators are created per chain from the configured endpoints:
//! EVM chains need an RPC endpoint, Solana needs a bundle simulation endpoint.
//! A custom simulator registered for a VM family replaces the built-ins of
//! every chain in that family. Every simulation runs under the attempt
//! timeout; one that does not finish in time is reported as failed.

pub mod evm;
pub mod solana;
pub mod storage_slots;

use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;
use xswap_types::{
	AggregationError, AggregationResult, ChainId, QuoteRequest, QuoteResult, SimulationReport,
	VmFamily, DEFAULT_REQUEST_TIMEOUT_MS,
};

use crate::config::AggregatorConfig;
use crate::rpc::JsonRpcClient;
use evm::EvmSimulator;
use solana::SolanaSimulator;
use storage_slots::TokenLayouts;

/// Dry run of a quote before execution
///
/// Failures are reported through a failed [`SimulationReport`], never as an
/// error, so a simulation can not turn a quote into a failed attempt.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuoteSimulator: Send + Sync {
	async fn simulate(&self, request: &QuoteRequest, quote: &QuoteResult) -> SimulationReport;
}

#[derive(Clone)]
pub struct SimulationService {
	custom: HashMap<VmFamily, Arc<dyn QuoteSimulator>>,
	built_in: HashMap<ChainId, Arc<dyn QuoteSimulator>>,
	timeout: Duration,
}

impl Default for SimulationService {
	fn default() -> Self {
		Self {
			custom: HashMap::new(),
			built_in: HashMap::new(),
			timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
		}
	}
}

impl fmt::Debug for SimulationService {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("SimulationService")
			.field("custom", &self.custom.keys().collect::<Vec<_>>())
			.field("built_in", &self.built_in.keys().collect::<Vec<_>>())
			.field("timeout", &self.timeout)
			.finish()
	}
}

impl SimulationService {
	pub fn from_config(config: &AggregatorConfig) -> Self {
		let layouts = TokenLayouts::new(&config.token_layouts);
		let mut built_in: HashMap<ChainId, Arc<dyn QuoteSimulator>> = HashMap::new();

		for (chain, url) in &config.rpc_endpoints {
			if chain.is_evm() {
				let rpc = JsonRpcClient::new(url.clone(), config.timeout_ms);
				built_in.insert(*chain, Arc::new(EvmSimulator::new(*chain, rpc, layouts.clone())));
			}
		}

		for (chain, bundle_url) in &config.bundle_simulation_endpoints {
			if chain.vm_family() != VmFamily::Solana {
				continue;
			}
			let rpc_url = config.rpc_endpoints.get(chain).unwrap_or(bundle_url);
			built_in.insert(
				*chain,
				Arc::new(SolanaSimulator::new(
					JsonRpcClient::new(rpc_url.clone(), config.timeout_ms),
					JsonRpcClient::new(bundle_url.clone(), config.timeout_ms),
				)),
			);
		}

		Self {
			custom: HashMap::new(),
			built_in,
			timeout: Duration::from_millis(config.timeout_ms),
		}
	}

	/// Upper bound on a single simulation
	pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
		self.timeout = Duration::from_millis(timeout_ms);
		self
	}

	/// Replace the built-in simulation of every chain in `vm`
	pub fn with_custom(mut self, vm: VmFamily, simulator: Arc<dyn QuoteSimulator>) -> Self {
		self.set_custom(vm, simulator);
		self
	}

	pub fn set_custom(&mut self, vm: VmFamily, simulator: Arc<dyn QuoteSimulator>) {
		self.custom.insert(vm, simulator);
	}

	fn simulator_for(&self, chain: ChainId) -> Option<&Arc<dyn QuoteSimulator>> {
		self.custom
			.get(&chain.vm_family())
			.or_else(|| self.built_in.get(&chain))
	}

	/// Fail fast when quotes on `chain` could not be simulated
	pub fn ensure_available(&self, chain: ChainId) -> AggregationResult<()> {
		match self.simulator_for(chain) {
			Some(_) => Ok(()),
			None => Err(AggregationError::MissingSimulationEndpoint {
				chain_id: chain,
				vm: chain.vm_family(),
			}),
		}
	}

	/// Simulate `quote` on the input chain and attach the report
	pub async fn simulate(&self, request: &QuoteRequest, mut quote: QuoteResult) -> QuoteResult {
		match self.simulator_for(request.chain_in) {
			Some(simulator) => {
				let report =
					match tokio::time::timeout(self.timeout, simulator.simulate(request, &quote)).await {
						Ok(report) => report,
						Err(_) => SimulationReport::failed(format!(
							"Simulation timed out after {}ms",
							self.timeout.as_millis()
						)),
					};
				if report.is_failed() {
					warn!(
						"Simulation of {} quote failed: {}",
						quote.protocol,
						report.error.as_deref().unwrap_or("unknown reason")
					);
				}
				quote.apply_simulation(report);
			},
			None => warn!("No simulator for chain {}, quote left unsimulated", request.chain_in),
		}
		quote
	}
}
