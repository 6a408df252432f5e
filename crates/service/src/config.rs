//! Runtime configuration of the aggregation core

use std::collections::HashMap;
use xswap_config::{ConfigValidationError, Settings, TokenLayoutSettings};
use xswap_types::{ChainId, SelectionMethod};

/// Everything the aggregator consults per call, resolved once at startup
#[derive(Debug, Clone)]
pub struct AggregatorConfig {
	pub method: SelectionMethod,
	pub timeout_ms: u64,
	pub max_concurrency: Option<usize>,
	pub check_approvals: bool,
	pub simulate_quotes: bool,
	pub include_protocols: Vec<String>,
	pub exclude_protocols: Vec<String>,
	pub rpc_endpoints: HashMap<ChainId, String>,
	pub bundle_simulation_endpoints: HashMap<ChainId, String>,
	pub token_layouts: Vec<TokenLayoutSettings>,
}

impl Default for AggregatorConfig {
	fn default() -> Self {
		Self {
			method: SelectionMethod::Best,
			timeout_ms: xswap_config::settings::DEFAULT_TIMEOUT_MS,
			max_concurrency: None,
			check_approvals: false,
			simulate_quotes: false,
			include_protocols: Vec::new(),
			exclude_protocols: Vec::new(),
			rpc_endpoints: HashMap::new(),
			bundle_simulation_endpoints: HashMap::new(),
			token_layouts: Vec::new(),
		}
	}
}

impl AggregatorConfig {
	pub fn with_method(mut self, method: SelectionMethod) -> Self {
		self.method = method;
		self
	}

	pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
		self.timeout_ms = timeout_ms;
		self
	}

	pub fn with_rpc_endpoint(mut self, chain: ChainId, url: impl Into<String>) -> Self {
		self.rpc_endpoints.insert(chain, url.into());
		self
	}
}

impl TryFrom<&Settings> for AggregatorConfig {
	type Error = ConfigValidationError;

	fn try_from(settings: &Settings) -> Result<Self, Self::Error> {
		let aggregation = &settings.aggregation;
		Ok(Self {
			method: aggregation.method,
			timeout_ms: aggregation.timeout_ms,
			max_concurrency: aggregation.max_concurrency,
			check_approvals: aggregation.check_approvals,
			simulate_quotes: aggregation.simulate_quotes,
			include_protocols: aggregation.include_protocols.clone(),
			exclude_protocols: aggregation.exclude_protocols.clone(),
			rpc_endpoints: settings.rpc_endpoints()?,
			bundle_simulation_endpoints: settings.bundle_simulation_endpoints()?,
			token_layouts: settings.token_layouts.clone(),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_from_settings() {
		let mut settings = Settings::default();
		settings.aggregation.method = SelectionMethod::Race;
		settings.aggregation.simulate_quotes = true;
		settings
			.rpc
			.insert("42161".to_string(), "http://arb.local".to_string());

		let config = AggregatorConfig::try_from(&settings).unwrap();
		assert_eq!(config.method, SelectionMethod::Race);
		assert!(config.simulate_quotes);
		assert_eq!(
			config.rpc_endpoints.get(&ChainId::ARBITRUM).map(String::as_str),
			Some("http://arb.local")
		);
	}

	#[test]
	fn test_defaults_match_settings_defaults() {
		let from_settings = AggregatorConfig::try_from(&Settings::default()).unwrap();
		let default = AggregatorConfig::default();
		assert_eq!(from_settings.timeout_ms, default.timeout_ms);
		assert_eq!(from_settings.method, default.method);
	}
}
