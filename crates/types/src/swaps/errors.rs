//! Validation errors for swap requests

use thiserror::Error;

/// Reasons a price or quote request is rejected before dispatch
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestValidationError {
	#[error("Missing required field: {field}")]
	MissingRequiredField { field: String },

	#[error("amountIn must be greater than zero")]
	ZeroAmount,

	#[error("Slippage of {slippage_bps} bps exceeds the maximum of {max_bps} bps")]
	SlippageTooHigh { slippage_bps: u32, max_bps: u32 },

	#[error("tokenIn and tokenOut are identical on chain {chain_id}")]
	IdenticalTokens { chain_id: u64 },
}

pub type RequestValidationResult<T> = Result<T, RequestValidationError>;
