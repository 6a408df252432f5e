//! Swap request and response models shared by adapters and the aggregation core

pub mod errors;
pub mod request;
pub mod response;

pub use errors::{RequestValidationError, RequestValidationResult};
pub use request::{PriceRequest, QuoteRequest, SwapIntent, DEFAULT_SLIPPAGE_BPS, MAX_SLIPPAGE_BPS};
pub use response::{
	ApprovalRequirement, ExecutionPayload, PriceResult, QuoteResult, SimulationReport,
	SimulationStatus, SwapOutput,
};
