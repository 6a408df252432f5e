//! Winner selection
//!
//! Race returns at the first qualifying outcome and keeps draining the rest
//! in the background. Best waits for every attempt and picks the largest
//! output.

use futures::channel::oneshot;
use futures::StreamExt;
use std::time::Instant;
use tracing::instrument::WithSubscriber;
use tracing::{debug, info, warn};
use xswap_types::{AggregationOutcome, AttemptOutcome, SelectionMethod, SwapOutput};

use crate::dispatcher::AttemptStream;

/// Run the chosen strategy over a stream of settling attempts
pub async fn select<T>(
	method: SelectionMethod,
	attempts: AttemptStream<T>,
	simulation_required: bool,
	started: Instant,
) -> AggregationOutcome<T>
where
	T: SwapOutput + Clone + Send + 'static,
{
	match method {
		SelectionMethod::Race => race(attempts, simulation_required, started).await,
		SelectionMethod::Best => best(attempts, started).await,
	}
}

/// First settled outcome with no error, a positive output and no failed
/// simulation (when simulation was requested) wins
pub async fn race<T>(
	mut attempts: AttemptStream<T>,
	simulation_required: bool,
	started: Instant,
) -> AggregationOutcome<T>
where
	T: SwapOutput + Clone + Send + 'static,
{
	let mut settled: Vec<AttemptOutcome<T>> = Vec::new();

	while let Some(outcome) = attempts.next().await {
		let qualifies = outcome.qualifies_for_race(simulation_required);
		let winner = if qualifies { outcome.value().cloned() } else { None };
		settled.push(outcome);

		let Some(winner) = winner else {
			continue;
		};

		let elapsed = started.elapsed().as_millis() as u64;
		info!(
			"Race won by {} with {} after {}ms",
			winner.protocol(),
			winner.output_amount(),
			elapsed
		);

		if attempts.is_empty() {
			return AggregationOutcome::settled(Some(winner), settled, SelectionMethod::Race, elapsed);
		}

		let (sender, receiver) = oneshot::channel();
		let mut all_results = settled.clone();
		tokio::spawn(
			async move {
				while let Some(outcome) = attempts.next().await {
					all_results.push(outcome);
				}
				debug!("Race drained {} attempts", all_results.len());
				let _ = sender.send(all_results);
			}
			.with_current_subscriber(),
		);

		return AggregationOutcome::partial(
			Some(winner),
			settled,
			SelectionMethod::Race,
			elapsed,
			receiver,
		);
	}

	let elapsed = started.elapsed().as_millis() as u64;
	info!("Race finished without a qualifying result after {}ms", elapsed);
	AggregationOutcome::settled(None, settled, SelectionMethod::Race, elapsed)
}

/// Wait for every attempt, then pick the largest output
pub async fn best<T>(mut attempts: AttemptStream<T>, started: Instant) -> AggregationOutcome<T>
where
	T: SwapOutput + Clone + Send + 'static,
{
	let mut settled = Vec::with_capacity(attempts.len());
	while let Some(outcome) = attempts.next().await {
		settled.push(outcome);
	}

	let elapsed = started.elapsed().as_millis() as u64;
	let winner = pick_best(&settled).and_then(|index| settled[index].value().cloned());

	match &winner {
		Some(winner) if winner.output_amount().is_zero() => warn!(
			"Best result from {} has zero output; no source quoted a positive amount",
			winner.protocol()
		),
		Some(winner) => info!(
			"Best result from {} with {} out of {} attempts",
			winner.protocol(),
			winner.output_amount(),
			settled.len()
		),
		None => info!("No successful attempt among {}", settled.len()),
	}

	AggregationOutcome::settled(winner, settled, SelectionMethod::Best, elapsed)
}

/// Index of the best successful outcome
///
/// Highest output wins; on equal output a result whose simulation did not
/// fail beats one whose simulation failed; remaining ties keep the earliest.
pub fn pick_best<T: SwapOutput>(outcomes: &[AttemptOutcome<T>]) -> Option<usize> {
	let mut best: Option<(usize, &T)> = None;

	for (index, outcome) in outcomes.iter().enumerate() {
		let Some(candidate) = outcome.value() else {
			continue;
		};

		let better = match best {
			None => true,
			Some((_, current)) => {
				let (candidate_amount, current_amount) =
					(candidate.output_amount(), current.output_amount());
				candidate_amount > current_amount
					|| (candidate_amount == current_amount
						&& current.simulation_failed()
						&& !candidate.simulation_failed())
			},
		};

		if better {
			best = Some((index, candidate));
		}
	}

	best.map(|(index, _)| index)
}
