//! Price and quote request models

use serde::{Deserialize, Serialize};

use super::errors::{RequestValidationError, RequestValidationResult};
use crate::models::{Amount, ChainId};

/// Default slippage tolerance in basis points (0.5%)
pub const DEFAULT_SLIPPAGE_BPS: u32 = 50;

/// Upper bound for slippage tolerance in basis points (100%)
pub const MAX_SLIPPAGE_BPS: u32 = 10_000;

fn default_slippage_bps() -> u32 {
	DEFAULT_SLIPPAGE_BPS
}

/// Request for a read-only swap estimate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRequest {
	pub chain_in: ChainId,
	pub chain_out: ChainId,
	pub token_in: String,
	pub token_out: String,
	pub amount_in: Amount,
	/// Slippage tolerance in basis points
	#[serde(default = "default_slippage_bps")]
	pub slippage_bps: u32,
	pub sender: String,
}

/// Request for an executable quote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
	pub chain_in: ChainId,
	pub chain_out: ChainId,
	pub token_in: String,
	pub token_out: String,
	pub amount_in: Amount,
	#[serde(default = "default_slippage_bps")]
	pub slippage_bps: u32,
	pub sender: String,
	/// Recipient of the output tokens, defaults to the sender
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub receiver: Option<String>,
}

/// Common view over price and quote requests used by routing and validation
pub trait SwapIntent {
	fn chain_in(&self) -> ChainId;
	fn chain_out(&self) -> ChainId;
	fn token_in(&self) -> &str;
	fn token_out(&self) -> &str;
	fn amount_in(&self) -> Amount;
	fn slippage_bps(&self) -> u32;
	fn sender(&self) -> &str;

	fn is_single_chain(&self) -> bool {
		self.chain_in() == self.chain_out()
	}

	/// Validate the fields every request shares
	fn validate(&self) -> RequestValidationResult<()> {
		for (field, value) in [
			("tokenIn", self.token_in()),
			("tokenOut", self.token_out()),
			("sender", self.sender()),
		] {
			if value.trim().is_empty() {
				return Err(RequestValidationError::MissingRequiredField {
					field: field.to_string(),
				});
			}
		}

		if self.amount_in().is_zero() {
			return Err(RequestValidationError::ZeroAmount);
		}

		if self.slippage_bps() > MAX_SLIPPAGE_BPS {
			return Err(RequestValidationError::SlippageTooHigh {
				slippage_bps: self.slippage_bps(),
				max_bps: MAX_SLIPPAGE_BPS,
			});
		}

		if self.is_single_chain() && self.token_in().eq_ignore_ascii_case(self.token_out()) {
			return Err(RequestValidationError::IdenticalTokens {
				chain_id: self.chain_in().as_u64(),
			});
		}

		Ok(())
	}
}

impl SwapIntent for PriceRequest {
	fn chain_in(&self) -> ChainId {
		self.chain_in
	}
	fn chain_out(&self) -> ChainId {
		self.chain_out
	}
	fn token_in(&self) -> &str {
		&self.token_in
	}
	fn token_out(&self) -> &str {
		&self.token_out
	}
	fn amount_in(&self) -> Amount {
		self.amount_in
	}
	fn slippage_bps(&self) -> u32 {
		self.slippage_bps
	}
	fn sender(&self) -> &str {
		&self.sender
	}
}

impl SwapIntent for QuoteRequest {
	fn chain_in(&self) -> ChainId {
		self.chain_in
	}
	fn chain_out(&self) -> ChainId {
		self.chain_out
	}
	fn token_in(&self) -> &str {
		&self.token_in
	}
	fn token_out(&self) -> &str {
		&self.token_out
	}
	fn amount_in(&self) -> Amount {
		self.amount_in
	}
	fn slippage_bps(&self) -> u32 {
		self.slippage_bps
	}
	fn sender(&self) -> &str {
		&self.sender
	}
}

impl QuoteRequest {
	/// Address receiving the output tokens
	pub fn receiver(&self) -> &str {
		self.receiver.as_deref().unwrap_or(&self.sender)
	}

	/// Slippage as a fraction, the unit some bridge APIs expect
	pub fn slippage_fraction(&self) -> f64 {
		self.slippage_bps as f64 / MAX_SLIPPAGE_BPS as f64
	}
}

impl PriceRequest {
	pub fn slippage_fraction(&self) -> f64 {
		self.slippage_bps as f64 / MAX_SLIPPAGE_BPS as f64
	}
}

impl From<&QuoteRequest> for PriceRequest {
	fn from(request: &QuoteRequest) -> Self {
		Self {
			chain_in: request.chain_in,
			chain_out: request.chain_out,
			token_in: request.token_in.clone(),
			token_out: request.token_out.clone(),
			amount_in: request.amount_in,
			slippage_bps: request.slippage_bps,
			sender: request.sender.clone(),
		}
	}
}
