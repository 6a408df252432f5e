//! Per-attempt and per-call aggregation outcomes

use futures::channel::oneshot;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

use crate::swaps::SwapOutput;

/// Winner selection strategy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMethod {
	/// First outcome meeting the validity threshold wins
	Race,
	/// Highest output among all settled outcomes wins
	#[default]
	Best,
}

impl fmt::Display for SelectionMethod {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			SelectionMethod::Race => write!(f, "race"),
			SelectionMethod::Best => write!(f, "best"),
		}
	}
}

/// Why a single attempt produced no result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttemptErrorKind {
	/// The adapter returned an error
	Adapter,
	/// The adapter did not answer within the timeout
	Timeout,
	/// The adapter task panicked
	Panicked,
}

/// Error recorded for a failed attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptError {
	pub kind: AttemptErrorKind,
	pub message: String,
}

impl AttemptError {
	pub fn adapter(message: impl Into<String>) -> Self {
		Self {
			kind: AttemptErrorKind::Adapter,
			message: message.into(),
		}
	}

	pub fn timeout(timeout_ms: u64) -> Self {
		Self {
			kind: AttemptErrorKind::Timeout,
			message: format!("Timeout occurred after {}ms", timeout_ms),
		}
	}

	pub fn panicked(message: impl Into<String>) -> Self {
		Self {
			kind: AttemptErrorKind::Panicked,
			message: message.into(),
		}
	}
}

impl fmt::Display for AttemptError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{:?}: {}", self.kind, self.message)
	}
}

/// Result of exactly one dispatched adapter call
#[derive(Debug, Clone, PartialEq)]
pub struct AttemptOutcome<T> {
	pub protocol: String,
	pub result: Result<T, AttemptError>,
	pub duration_ms: u64,
}

impl<T> AttemptOutcome<T> {
	pub fn success(protocol: impl Into<String>, value: T, duration_ms: u64) -> Self {
		Self {
			protocol: protocol.into(),
			result: Ok(value),
			duration_ms,
		}
	}

	pub fn failure(protocol: impl Into<String>, error: AttemptError, duration_ms: u64) -> Self {
		Self {
			protocol: protocol.into(),
			result: Err(error),
			duration_ms,
		}
	}

	pub fn value(&self) -> Option<&T> {
		self.result.as_ref().ok()
	}

	pub fn error(&self) -> Option<&AttemptError> {
		self.result.as_ref().err()
	}

	pub fn is_success(&self) -> bool {
		self.result.is_ok()
	}

	pub fn is_timeout(&self) -> bool {
		matches!(&self.result, Err(e) if e.kind == AttemptErrorKind::Timeout)
	}
}

impl<T: SwapOutput> AttemptOutcome<T> {
	/// Race threshold: no error, positive output, and no failed simulation when one was required
	pub fn qualifies_for_race(&self, simulation_required: bool) -> bool {
		match &self.result {
			Ok(value) => {
				!value.output_amount().is_zero() && !(simulation_required && value.simulation_failed())
			},
			Err(_) => false,
		}
	}
}

impl<T: Serialize> Serialize for AttemptOutcome<T> {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		let mut state = serializer.serialize_struct("AttemptOutcome", 3)?;
		state.serialize_field("protocol", &self.protocol)?;
		match &self.result {
			Ok(value) => state.serialize_field("result", value)?,
			Err(error) => state.serialize_field("error", error)?,
		}
		state.serialize_field("durationMs", &self.duration_ms)?;
		state.end()
	}
}

/// Outcome of one aggregation call
///
/// In race mode the call returns as soon as a winner is found; `all_results`
/// then holds the attempts settled so far and the rest keep running in the
/// background. [`AggregationOutcome::settled_results`] waits for them.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregationOutcome<T> {
	pub result: Option<T>,
	pub all_results: Vec<AttemptOutcome<T>>,
	pub method: SelectionMethod,
	pub total_duration_ms: u64,
	pub complete: bool,
	#[serde(skip)]
	remaining: Option<oneshot::Receiver<Vec<AttemptOutcome<T>>>>,
}

impl<T> AggregationOutcome<T> {
	/// Outcome whose attempts have all settled
	pub fn settled(
		result: Option<T>,
		all_results: Vec<AttemptOutcome<T>>,
		method: SelectionMethod,
		total_duration_ms: u64,
	) -> Self {
		Self {
			result,
			all_results,
			method,
			total_duration_ms,
			complete: true,
			remaining: None,
		}
	}

	/// Outcome returned before every attempt settled
	///
	/// `remaining` resolves with the full outcome list, including the ones
	/// already present in `all_results`.
	pub fn partial(
		result: Option<T>,
		all_results: Vec<AttemptOutcome<T>>,
		method: SelectionMethod,
		total_duration_ms: u64,
		remaining: oneshot::Receiver<Vec<AttemptOutcome<T>>>,
	) -> Self {
		Self {
			result,
			all_results,
			method,
			total_duration_ms,
			complete: false,
			remaining: Some(remaining),
		}
	}

	pub fn has_winner(&self) -> bool {
		self.result.is_some()
	}

	pub fn success_count(&self) -> usize {
		self.all_results.iter().filter(|o| o.is_success()).count()
	}

	pub fn error_count(&self) -> usize {
		self.all_results.len() - self.success_count()
	}

	/// Wait until every dispatched attempt settled and return the full list
	pub async fn settled_results(mut self) -> Vec<AttemptOutcome<T>> {
		match self.remaining.take() {
			Some(remaining) => remaining.await.unwrap_or(self.all_results),
			None => self.all_results,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::swaps::SimulationReport;
	use crate::test_utils::{evm_quote, price_result};

	#[test]
	fn test_race_threshold() {
		let positive = AttemptOutcome::success("a", price_result("a", "100"), 5);
		let zero = AttemptOutcome::success("b", price_result("b", "0"), 5);
		let failed: AttemptOutcome<crate::PriceResult> =
			AttemptOutcome::failure("c", AttemptError::adapter("boom"), 5);

		assert!(positive.qualifies_for_race(false));
		assert!(!zero.qualifies_for_race(false));
		assert!(!failed.qualifies_for_race(false));
	}

	#[test]
	fn test_race_threshold_with_simulation() {
		let mut quote = evm_quote("a", "100");
		quote.apply_simulation(SimulationReport::failed("reverted"));
		let outcome = AttemptOutcome::success("a", quote, 5);

		assert!(!outcome.qualifies_for_race(true));
		assert!(outcome.qualifies_for_race(false));
	}

	#[test]
	fn test_attempt_outcome_serialization() {
		let ok = AttemptOutcome::success("a", price_result("a", "100"), 12);
		let json = serde_json::to_value(&ok).unwrap();
		assert_eq!(json["protocol"], "a");
		assert_eq!(json["result"]["amountOut"], "100");
		assert_eq!(json["durationMs"], 12);
		assert!(json.get("error").is_none());

		let err: AttemptOutcome<crate::PriceResult> =
			AttemptOutcome::failure("b", AttemptError::timeout(30000), 30001);
		let json = serde_json::to_value(&err).unwrap();
		assert_eq!(json["error"]["kind"], "timeout");
		assert!(json.get("result").is_none());
	}

	#[tokio::test]
	async fn test_settled_results_waits_for_remaining() {
		let (tx, rx) = oneshot::channel();
		let first = AttemptOutcome::success("a", price_result("a", "1"), 1);
		let outcome = AggregationOutcome::partial(
			Some(price_result("a", "1")),
			vec![first.clone()],
			SelectionMethod::Race,
			1,
			rx,
		);
		assert!(!outcome.complete);

		let second = AttemptOutcome::failure("b", AttemptError::adapter("x"), 3);
		tx.send(vec![first, second]).unwrap();

		let all = outcome.settled_results().await;
		assert_eq!(all.len(), 2);
	}

	#[tokio::test]
	async fn test_settled_results_falls_back_when_sender_dropped() {
		let (tx, rx) = oneshot::channel::<Vec<AttemptOutcome<crate::PriceResult>>>();
		let outcome = AggregationOutcome::partial(
			None,
			vec![AttemptOutcome::success("a", price_result("a", "1"), 1)],
			SelectionMethod::Race,
			1,
			rx,
		);
		drop(tx);
		assert_eq!(outcome.settled_results().await.len(), 1);
	}
}
