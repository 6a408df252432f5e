//! Aggregation outcomes and the fatal error class

pub mod errors;
pub mod outcome;

pub use errors::{AggregationError, AggregationResult};
pub use outcome::{
	AggregationOutcome, AttemptError, AttemptErrorKind, AttemptOutcome, SelectionMethod,
};
