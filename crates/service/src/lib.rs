//! xswap Service
//!
//! Aggregation core: compatibility filtering, concurrent dispatch, winner
//! selection, quote simulation and approval checks.

pub mod aggregator;
pub mod approval;
pub mod compatibility;
pub mod config;
pub mod dispatcher;
pub mod rpc;
pub mod selector;
pub mod simulation;

#[cfg(test)]
mod test_support;

pub use aggregator::AggregatorService;
pub use approval::ApprovalChecker;
pub use compatibility::CompatibilityFilter;
pub use config::AggregatorConfig;
pub use dispatcher::{AttemptStream, Dispatcher, Finisher};
pub use rpc::{JsonRpcClient, RpcError};
pub use simulation::{QuoteSimulator, SimulationService};
