//! Concurrent dispatch of one call per adapter
//!
//! Every call runs in its own tokio task under its own timeout, so an error,
//! panic or stall in one adapter never cancels or delays its siblings. Each
//! task resolves to exactly one [`AttemptOutcome`].

use futures::future::BoxFuture;
use futures::stream::FuturesUnordered;
use futures::FutureExt;
use std::future::Future;
use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio::task::JoinError;
use tracing::instrument::WithSubscriber;
use tracing::{debug, warn};
use xswap_types::{AdapterResult, AttemptError, AttemptOutcome, SwapAdapter};

/// Post-processing applied to a successful adapter result, outside the timeout
pub type Finisher<T> = Arc<dyn Fn(T) -> BoxFuture<'static, T> + Send + Sync>;

/// Settling attempts, yielded in completion order
pub type AttemptStream<T> = FuturesUnordered<BoxFuture<'static, AttemptOutcome<T>>>;

#[derive(Debug, Clone)]
pub struct Dispatcher {
	timeout: Duration,
	permits: Option<Arc<Semaphore>>,
}

impl Dispatcher {
	/// `max_concurrency` bounds the adapter calls in flight per dispatch
	pub fn new(timeout_ms: u64, max_concurrency: Option<usize>) -> Self {
		Self {
			timeout: Duration::from_millis(timeout_ms),
			permits: max_concurrency.map(|n| Arc::new(Semaphore::new(n.max(1)))),
		}
	}

	pub fn timeout_ms(&self) -> u64 {
		self.timeout.as_millis() as u64
	}

	/// Start one task per adapter
	///
	/// `call` must return a `'static` future, so callers move their own copy of
	/// the request into it. The attempt timer covers that future only, not the
	/// wait for a concurrency permit nor the `finish` step.
	pub fn dispatch<T, F, Fut>(
		&self,
		adapters: Vec<Arc<dyn SwapAdapter>>,
		call: F,
		finish: Option<Finisher<T>>,
	) -> AttemptStream<T>
	where
		T: Send + 'static,
		F: Fn(Arc<dyn SwapAdapter>) -> Fut,
		Fut: Future<Output = AdapterResult<T>> + Send + 'static,
	{
		let attempts = FuturesUnordered::new();

		for adapter in adapters {
			let protocol = adapter.protocol().to_string();
			let call_future = call(adapter);
			let timeout = self.timeout;
			let permits = self.permits.clone();
			let finish = finish.clone();
			let task_protocol = protocol.clone();
			let started = Arc::new(OnceLock::new());
			let task_started = started.clone();

			let handle = tokio::spawn(
				async move {
					// A closed semaphore only means "no limit"
					let permit = match permits {
						Some(permits) => permits.acquire_owned().await.ok(),
						None => None,
					};

					let started = *task_started.get_or_init(Instant::now);
					let result = tokio::time::timeout(timeout, call_future).await;
					let duration_ms = started.elapsed().as_millis() as u64;
					drop(permit);

					match result {
						Ok(Ok(value)) => {
							debug!("Adapter {} answered in {}ms", task_protocol, duration_ms);
							let value = match finish {
								Some(finish) => finish(value).await,
								None => value,
							};
							AttemptOutcome::success(task_protocol, value, duration_ms)
						},
						Ok(Err(e)) => {
							warn!("Adapter {} failed after {}ms: {}", task_protocol, duration_ms, e);
							AttemptOutcome::failure(
								task_protocol,
								AttemptError::adapter(e.to_string()),
								duration_ms,
							)
						},
						Err(_) => {
							warn!(
								"Adapter {} timed out after {}ms",
								task_protocol,
								timeout.as_millis()
							);
							AttemptOutcome::failure(
								task_protocol,
								AttemptError::timeout(timeout.as_millis() as u64),
								duration_ms,
							)
						},
					}
				}
				.with_current_subscriber(),
			);

			// Fallback clock for tasks aborted before their call started
			let dispatched = Instant::now();
			attempts.push(
				async move {
					match handle.await {
						Ok(outcome) => outcome,
						Err(join_error) => {
							let message = panic_message(join_error);
							warn!("Adapter {} task aborted: {}", protocol, message);
							AttemptOutcome::failure(
								protocol,
								AttemptError::panicked(message),
								started
									.get()
									.unwrap_or(&dispatched)
									.elapsed()
									.as_millis() as u64,
							)
						},
					}
				}
				.boxed(),
			);
		}

		attempts
	}
}

fn panic_message(error: JoinError) -> String {
	if !error.is_panic() {
		return "adapter task was cancelled".to_string();
	}

	let payload = error.into_panic();
	if let Some(message) = payload.downcast_ref::<&str>() {
		format!("adapter panicked: {}", message)
	} else if let Some(message) = payload.downcast_ref::<String>() {
		format!("adapter panicked: {}", message)
	} else {
		"adapter panicked".to_string()
	}
}
