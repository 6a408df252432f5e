//! Adapter identity, registration-time configuration and the adapter contract

use std::collections::{BTreeSet, HashMap};

pub mod errors;
pub mod traits;

pub use errors::{AdapterError, AdapterFactoryError, AdapterValidationError};
pub use traits::SwapAdapter;

use crate::models::{ChainId, SecretString};

/// Result types for adapter operations
pub type AdapterResult<T> = Result<T, AdapterError>;
pub type AdapterValidationResult<T> = Result<T, AdapterValidationError>;
pub type AdapterFactoryResult<T> = Result<T, AdapterFactoryError>;

/// Default timeout for adapter HTTP clients
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;

/// Identity and capabilities of a liquidity source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterInfo {
	/// Unique protocol name used for registration, filtering and reporting
	pub protocol: String,

	/// Human-readable name
	pub name: String,

	/// Serves swaps where input and output chains are the same
	pub single_chain: bool,

	/// Serves swaps across two different chains
	pub multi_chain: bool,

	/// Chains the source can operate on
	pub chains: BTreeSet<ChainId>,

	/// Base URL of the remote API, if any
	pub base_url: Option<String>,
}

impl AdapterInfo {
	pub fn new(protocol: impl Into<String>, name: impl Into<String>) -> Self {
		Self {
			protocol: protocol.into(),
			name: name.into(),
			single_chain: false,
			multi_chain: false,
			chains: BTreeSet::new(),
			base_url: None,
		}
	}

	pub fn single_chain(mut self) -> Self {
		self.single_chain = true;
		self
	}

	pub fn multi_chain(mut self) -> Self {
		self.multi_chain = true;
		self
	}

	pub fn with_chains(mut self, chains: impl IntoIterator<Item = ChainId>) -> Self {
		self.chains.extend(chains);
		self
	}

	pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
		self.base_url = Some(base_url.into());
		self
	}

	pub fn supports_chain(&self, chain: ChainId) -> bool {
		self.chains.contains(&chain)
	}

	/// Whether this source can serve a swap from `chain_in` to `chain_out`
	pub fn supports_route(&self, chain_in: ChainId, chain_out: ChainId) -> bool {
		if chain_in == chain_out {
			self.single_chain && self.supports_chain(chain_in)
		} else {
			self.multi_chain && self.supports_chain(chain_in) && self.supports_chain(chain_out)
		}
	}

	/// Validate identity fields before registration
	pub fn validate(&self) -> AdapterValidationResult<()> {
		if self.protocol.is_empty() {
			return Err(AdapterValidationError::MissingRequiredField {
				field: "protocol".to_string(),
			});
		}

		if !self
			.protocol
			.chars()
			.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
		{
			return Err(AdapterValidationError::InvalidProtocolName {
				protocol: self.protocol.clone(),
			});
		}

		if self.name.is_empty() || self.name.len() > 100 {
			return Err(AdapterValidationError::InvalidAdapterName {
				name: self.name.clone(),
			});
		}

		if !self.single_chain && !self.multi_chain {
			return Err(AdapterValidationError::InvalidConfiguration {
				reason: format!(
					"adapter '{}' declares neither single-chain nor multi-chain support",
					self.protocol
				),
			});
		}

		if self.chains.is_empty() {
			return Err(AdapterValidationError::InvalidConfiguration {
				reason: format!("adapter '{}' supports no chains", self.protocol),
			});
		}

		Ok(())
	}
}

/// Per-protocol settings handed to adapter factories
#[derive(Debug, Clone)]
pub struct ProtocolConfig {
	pub enabled: bool,
	pub base_url: Option<String>,
	pub api_key: Option<SecretString>,
	/// Restricts the adapter to a subset of its native chains
	pub chains: Option<Vec<ChainId>>,
}

impl Default for ProtocolConfig {
	fn default() -> Self {
		Self {
			enabled: true,
			base_url: None,
			api_key: None,
			chains: None,
		}
	}
}

/// Everything an adapter factory may consult when deciding whether and how to build
#[derive(Debug, Clone)]
pub struct AdapterEnvironment {
	pub protocols: HashMap<String, ProtocolConfig>,
	pub rpc_endpoints: HashMap<ChainId, String>,
	pub request_timeout_ms: u64,
}

impl Default for AdapterEnvironment {
	fn default() -> Self {
		Self {
			protocols: HashMap::new(),
			rpc_endpoints: HashMap::new(),
			request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
		}
	}
}

impl AdapterEnvironment {
	pub fn protocol(&self, protocol: &str) -> Option<&ProtocolConfig> {
		self.protocols.get(protocol)
	}

	/// Protocols are enabled unless explicitly turned off
	pub fn is_enabled(&self, protocol: &str) -> bool {
		self.protocol(protocol).map(|p| p.enabled).unwrap_or(true)
	}

	/// Non-empty API key for the protocol, if configured
	pub fn api_key(&self, protocol: &str) -> Option<&SecretString> {
		self.protocol(protocol)
			.and_then(|p| p.api_key.as_ref())
			.filter(|key| !key.is_empty())
	}

	/// Configured base URL or the adapter's default, without trailing slash
	pub fn base_url(&self, protocol: &str, default: &str) -> String {
		self.protocol(protocol)
			.and_then(|p| p.base_url.clone())
			.unwrap_or_else(|| default.to_string())
			.trim_end_matches('/')
			.to_string()
	}

	/// Narrow an adapter's native chain list by the configured subset
	pub fn chains_for(&self, protocol: &str, native: &[ChainId]) -> Vec<ChainId> {
		match self.protocol(protocol).and_then(|p| p.chains.as_ref()) {
			Some(subset) => native
				.iter()
				.copied()
				.filter(|chain| subset.contains(chain))
				.collect(),
			None => native.to_vec(),
		}
	}

	pub fn rpc_endpoint(&self, chain: ChainId) -> Option<&str> {
		self.rpc_endpoints.get(&chain).map(String::as_str)
	}
}
