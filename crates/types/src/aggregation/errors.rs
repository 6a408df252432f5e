//! Fatal aggregation errors

use thiserror::Error;

use crate::models::{ChainId, VmFamily};
use crate::swaps::RequestValidationError;

/// Errors that abort an aggregation call before any adapter is dispatched
///
/// Adapter failures, timeouts and simulation failures are never reported
/// through this type; they are recorded on the returned outcome instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AggregationError {
	#[error("Invalid request: {0}")]
	InvalidRequest(#[from] RequestValidationError),

	#[error("No compatible source for chain {chain_in} -> {chain_out}")]
	NoCompatibleSource { chain_in: ChainId, chain_out: ChainId },

	#[error("Quote simulation requires an RPC endpoint for {vm} chain {chain_id}")]
	MissingSimulationEndpoint { chain_id: ChainId, vm: VmFamily },
}

impl AggregationError {
	/// Stable machine-readable code used by the HTTP layer
	pub fn code(&self) -> &'static str {
		match self {
			AggregationError::InvalidRequest(_) => "INVALID_REQUEST",
			AggregationError::NoCompatibleSource { .. } => "NO_COMPATIBLE_SOURCE",
			AggregationError::MissingSimulationEndpoint { .. } => "MISSING_SIMULATION_ENDPOINT",
		}
	}
}

pub type AggregationResult<T> = Result<T, AggregationError>;
