//! Cross-chain swap aggregator types
//!
//! Shared models and traits for the swap aggregator: request and response
//! shapes, the adapter contract, and aggregation outcomes.

pub mod adapters;
pub mod aggregation;
pub mod models;
pub mod swaps;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

// Re-export chrono and serde_json for convenience
pub use chrono;
pub use serde_json;

pub use adapters::{
	AdapterEnvironment, AdapterError, AdapterFactoryError, AdapterFactoryResult, AdapterInfo,
	AdapterResult, AdapterValidationError, AdapterValidationResult, ProtocolConfig, SwapAdapter,
	DEFAULT_REQUEST_TIMEOUT_MS,
};

pub use aggregation::{
	AggregationError, AggregationOutcome, AggregationResult, AttemptError, AttemptErrorKind,
	AttemptOutcome, SelectionMethod,
};

pub use models::{is_native_evm_token, Amount, AmountError, ChainId, SecretString, VmFamily};

pub use swaps::{
	ApprovalRequirement, ExecutionPayload, PriceRequest, PriceResult, QuoteRequest, QuoteResult,
	RequestValidationError, RequestValidationResult, SimulationReport, SimulationStatus,
	SwapIntent, SwapOutput, DEFAULT_SLIPPAGE_BPS, MAX_SLIPPAGE_BPS,
};
