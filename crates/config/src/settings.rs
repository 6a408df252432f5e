//! Configuration settings structures

use crate::configurable_value::ConfigurableValue;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use tracing::warn;
use xswap_types::{AdapterEnvironment, ChainId, ProtocolConfig, SelectionMethod};

/// Default per-attempt timeout in milliseconds
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Main application settings
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Settings {
	pub server: ServerSettings,
	pub logging: LoggingSettings,
	pub aggregation: AggregationSettings,
	/// Chain id → JSON-RPC endpoint
	pub rpc: HashMap<String, String>,
	/// Chain id → bundle simulation endpoint, required to simulate Solana quotes.
	/// Blockhashes come from the chain's `rpc` entry, or this endpoint without one.
	pub bundle_simulation: HashMap<String, String>,
	/// Storage layouts for tokens that deviate from the default
	pub token_layouts: Vec<TokenLayoutSettings>,
	/// Protocol name → adapter settings
	pub protocols: HashMap<String, ProtocolSettings>,
}

/// Server configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ServerSettings {
	pub host: String,
	pub port: u16,
}

impl Default for ServerSettings {
	fn default() -> Self {
		Self {
			host: "0.0.0.0".to_string(),
			port: 3000,
		}
	}
}

/// Logging configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingSettings {
	pub level: String,
	pub format: LogFormat,
	pub structured: bool,
}

impl Default for LoggingSettings {
	fn default() -> Self {
		Self {
			level: "info".to_string(),
			format: LogFormat::Pretty,
			structured: false,
		}
	}
}

/// Log format options
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
	Json,
	Pretty,
	Compact,
}

/// Aggregation behaviour
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct AggregationSettings {
	/// Default winner selection strategy
	pub method: SelectionMethod,
	/// Per-attempt timeout
	pub timeout_ms: u64,
	/// Upper bound on adapter calls in flight per aggregation
	pub max_concurrency: Option<usize>,
	pub check_approvals: bool,
	pub simulate_quotes: bool,
	/// When non-empty, only these protocols are queried
	pub include_protocols: Vec<String>,
	/// Protocols never queried, even when included
	pub exclude_protocols: Vec<String>,
}

impl Default for AggregationSettings {
	fn default() -> Self {
		Self {
			method: SelectionMethod::Best,
			timeout_ms: DEFAULT_TIMEOUT_MS,
			max_concurrency: None,
			check_approvals: false,
			simulate_quotes: false,
			include_protocols: Vec::new(),
			exclude_protocols: Vec::new(),
		}
	}
}

/// How a token contract lays out its balance and allowance mappings
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageLayout {
	#[default]
	Solidity,
	Vyper,
}

/// Storage layout override for a single token
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TokenLayoutSettings {
	pub chain_id: ChainId,
	pub token: String,
	#[serde(default)]
	pub layout: StorageLayout,
	#[serde(default)]
	pub balance_slot: u64,
	#[serde(default = "default_allowance_slot")]
	pub allowance_slot: u64,
}

fn default_allowance_slot() -> u64 {
	1
}

/// Per-protocol adapter configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProtocolSettings {
	#[serde(default = "default_enabled")]
	pub enabled: bool,
	pub base_url: Option<String>,
	/// API key, usually `{ type = "env", value = "VAR_NAME" }`
	pub api_key: Option<ConfigurableValue>,
	/// Restrict the adapter to these chains
	pub chains: Option<Vec<ChainId>>,
}

fn default_enabled() -> bool {
	true
}

/// Semantic errors the deserializer cannot catch
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigValidationError {
	#[error("Invalid chain id '{key}' in [{section}]")]
	InvalidChainId { section: String, key: String },

	#[error("Invalid value for {field}: {reason}")]
	InvalidValue { field: String, reason: String },
}

impl Settings {
	/// Get server bind address
	pub fn bind_address(&self) -> String {
		format!("{}:{}", self.server.host, self.server.port)
	}

	/// Check values that deserialize fine but make no sense
	pub fn validate(&self) -> Result<(), ConfigValidationError> {
		if self.aggregation.timeout_ms == 0 {
			return Err(ConfigValidationError::InvalidValue {
				field: "aggregation.timeout_ms".to_string(),
				reason: "must be greater than zero".to_string(),
			});
		}

		if self.aggregation.max_concurrency == Some(0) {
			return Err(ConfigValidationError::InvalidValue {
				field: "aggregation.max_concurrency".to_string(),
				reason: "must be greater than zero when set".to_string(),
			});
		}

		self.rpc_endpoints()?;
		self.bundle_simulation_endpoints()?;
		Ok(())
	}

	/// JSON-RPC endpoints keyed by chain
	pub fn rpc_endpoints(&self) -> Result<HashMap<ChainId, String>, ConfigValidationError> {
		parse_chain_map("rpc", &self.rpc)
	}

	/// Bundle simulation endpoints keyed by chain
	pub fn bundle_simulation_endpoints(
		&self,
	) -> Result<HashMap<ChainId, String>, ConfigValidationError> {
		parse_chain_map("bundle_simulation", &self.bundle_simulation)
	}

	/// Build the environment adapter factories are evaluated against
	///
	/// API keys whose environment variable is unset are dropped with a warning,
	/// so adapters that require them are skipped instead of failing startup.
	pub fn adapter_environment(&self) -> Result<AdapterEnvironment, ConfigValidationError> {
		let protocols = self
			.protocols
			.iter()
			.map(|(name, settings)| {
				let api_key = settings.api_key.as_ref().and_then(|value| {
					match value.resolve_for_secret() {
						Ok(secret) => Some(secret),
						Err(e) => {
							warn!("Ignoring API key for protocol '{}': {}", name, e);
							None
						},
					}
				});

				(
					name.clone(),
					ProtocolConfig {
						enabled: settings.enabled,
						base_url: settings.base_url.clone(),
						api_key,
						chains: settings.chains.clone(),
					},
				)
			})
			.collect();

		Ok(AdapterEnvironment {
			protocols,
			rpc_endpoints: self.rpc_endpoints()?,
			request_timeout_ms: self.aggregation.timeout_ms,
		})
	}
}

fn parse_chain_map(
	section: &str,
	raw: &HashMap<String, String>,
) -> Result<HashMap<ChainId, String>, ConfigValidationError> {
	raw.iter()
		.map(|(key, url)| {
			key.parse::<ChainId>()
				.map(|chain| (chain, url.trim_end_matches('/').to_string()))
				.map_err(|_| ConfigValidationError::InvalidChainId {
					section: section.to_string(),
					key: key.clone(),
				})
		})
		.collect()
}
