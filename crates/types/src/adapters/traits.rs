//! Core adapter trait implemented by every liquidity source

use async_trait::async_trait;
use std::fmt::Debug;

use super::{AdapterInfo, AdapterResult};
use crate::swaps::{PriceRequest, PriceResult, QuoteRequest, QuoteResult};

/// Uniform capability surface of a liquidity source
///
/// Implementations are stateless between calls: each call takes an immutable
/// request and returns a fresh response, so one instance is shared by every
/// in-flight aggregation.
#[async_trait]
pub trait SwapAdapter: Send + Sync + Debug {
	/// Identity and capabilities
	fn info(&self) -> &AdapterInfo;

	fn protocol(&self) -> &str {
		&self.info().protocol
	}

	/// Read-only estimate of the swap output
	async fn fetch_price(&self, request: &PriceRequest) -> AdapterResult<PriceResult>;

	/// Estimate plus the transaction payload needed to execute it
	async fn fetch_quote(&self, request: &QuoteRequest) -> AdapterResult<QuoteResult>;
}
