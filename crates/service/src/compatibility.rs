//! Compatibility filter
//!
//! Picks, in registry order, the adapters able to serve a chain pair and
//! applies the include/exclude protocol lists.

use std::sync::Arc;
use tracing::debug;
use xswap_adapters::AdapterRegistry;
use xswap_types::{AggregationError, AggregationResult, ChainId, SwapAdapter};

#[derive(Debug, Clone, Default)]
pub struct CompatibilityFilter {
	include: Vec<String>,
	exclude: Vec<String>,
}

impl CompatibilityFilter {
	pub fn new(include: Vec<String>, exclude: Vec<String>) -> Self {
		Self { include, exclude }
	}

	/// Whether the protocol lists allow querying `protocol`
	pub fn is_allowed(&self, protocol: &str) -> bool {
		if self.exclude.iter().any(|p| p == protocol) {
			return false;
		}
		self.include.is_empty() || self.include.iter().any(|p| p == protocol)
	}

	/// Adapters that can serve `chain_in -> chain_out`
	///
	/// Fails with [`AggregationError::NoCompatibleSource`] when none qualify.
	pub fn select(
		&self,
		registry: &AdapterRegistry,
		chain_in: ChainId,
		chain_out: ChainId,
	) -> AggregationResult<Vec<Arc<dyn SwapAdapter>>> {
		let selected: Vec<Arc<dyn SwapAdapter>> = registry
			.all()
			.iter()
			.filter(|adapter| adapter.info().supports_route(chain_in, chain_out))
			.filter(|adapter| self.is_allowed(adapter.protocol()))
			.cloned()
			.collect();

		debug!(
			"{} of {} adapters compatible with {} -> {}",
			selected.len(),
			registry.len(),
			chain_in,
			chain_out
		);

		if selected.is_empty() {
			return Err(AggregationError::NoCompatibleSource { chain_in, chain_out });
		}

		Ok(selected)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use async_trait::async_trait;
	use xswap_types::{
		AdapterError, AdapterInfo, AdapterResult, PriceRequest, PriceResult, QuoteRequest,
		QuoteResult,
	};

	#[derive(Debug)]
	struct InfoOnly(AdapterInfo);

	#[async_trait]
	impl SwapAdapter for InfoOnly {
		fn info(&self) -> &AdapterInfo {
			&self.0
		}

		async fn fetch_price(&self, _request: &PriceRequest) -> AdapterResult<PriceResult> {
			Err(AdapterError::invalid_response("unused"))
		}

		async fn fetch_quote(&self, _request: &QuoteRequest) -> AdapterResult<QuoteResult> {
			Err(AdapterError::invalid_response("unused"))
		}
	}

	fn registry() -> AdapterRegistry {
		let mut registry = AdapterRegistry::new();
		let adapters = [
			AdapterInfo::new("dex-a", "Dex A")
				.single_chain()
				.with_chains([ChainId::ETHEREUM, ChainId::BASE]),
			AdapterInfo::new("bridge", "Bridge")
				.multi_chain()
				.with_chains([ChainId::ETHEREUM, ChainId::ARBITRUM]),
			AdapterInfo::new("dex-b", "Dex B")
				.single_chain()
				.with_chains([ChainId::ETHEREUM]),
			AdapterInfo::new("both", "Both")
				.single_chain()
				.multi_chain()
				.with_chains([ChainId::ETHEREUM, ChainId::ARBITRUM, ChainId::BASE]),
		];
		for info in adapters {
			registry.register(Arc::new(InfoOnly(info))).unwrap();
		}
		registry
	}

	fn protocols(adapters: &[Arc<dyn SwapAdapter>]) -> Vec<&str> {
		adapters.iter().map(|a| a.protocol()).collect()
	}

	#[test]
	fn test_same_chain_selects_single_chain_adapters_in_registry_order() {
		let selected = CompatibilityFilter::default()
			.select(&registry(), ChainId::ETHEREUM, ChainId::ETHEREUM)
			.unwrap();
		assert_eq!(protocols(&selected), vec!["dex-a", "dex-b", "both"]);
	}

	#[test]
	fn test_cross_chain_requires_both_chains() {
		let filter = CompatibilityFilter::default();
		let selected = filter
			.select(&registry(), ChainId::ETHEREUM, ChainId::ARBITRUM)
			.unwrap();
		assert_eq!(protocols(&selected), vec!["bridge", "both"]);

		let selected = filter
			.select(&registry(), ChainId::BASE, ChainId::ARBITRUM)
			.unwrap();
		assert_eq!(protocols(&selected), vec!["both"]);
	}

	#[test]
	fn test_exclude_wins_over_include() {
		let filter = CompatibilityFilter::new(
			vec!["dex-a".to_string(), "dex-b".to_string()],
			vec!["dex-b".to_string()],
		);
		let selected = filter
			.select(&registry(), ChainId::ETHEREUM, ChainId::ETHEREUM)
			.unwrap();
		assert_eq!(protocols(&selected), vec!["dex-a"]);
	}

	#[test]
	fn test_no_compatible_source() {
		let err = CompatibilityFilter::default()
			.select(&registry(), ChainId::SOLANA, ChainId::SOLANA)
			.unwrap_err();
		assert_eq!(
			err,
			AggregationError::NoCompatibleSource {
				chain_in: ChainId::SOLANA,
				chain_out: ChainId::SOLANA,
			}
		);

		let filter = CompatibilityFilter::new(Vec::new(), vec!["bridge".to_string(), "both".to_string()]);
		assert!(filter
			.select(&registry(), ChainId::ETHEREUM, ChainId::ARBITRUM)
			.is_err());
	}
}
