//! Debounced query scheduling with stale-result suppression.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering as AtomicOrdering};
use std::time::Duration;

use parking_lot::RwLock;
use tokio::sync::mpsc;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

use crate::error::SourceError;
use crate::source::CandidateSource;

/// Default quiet window between the last input change and the search pass.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(200);

/// Scheduler tuning knobs.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
	/// Quiet window restarted on every input change.
	pub debounce: Duration,
	/// Result cap forwarded to the matcher.
	pub limit: usize,
}

impl Default for SchedulerConfig {
	fn default() -> Self {
		Self {
			debounce: SEARCH_DEBOUNCE,
			limit: sift_matcher::DEFAULT_LIMIT,
		}
	}
}

/// Update published to picker subscribers.
#[derive(Debug, Clone)]
pub enum SearchEvent {
	/// Ranked results for the query dispatched as `generation`.
	Results {
		generation: u64,
		query: String,
		items: Arc<[String]>,
	},
	/// The candidate source failed; an empty `Results` follows.
	SourceFailed { generation: u64, message: Arc<str> },
}

/// Debounces input changes and runs at most one fetch+rank pass per quiet
/// window.
///
/// Every pass is tagged with the generation current at dispatch; a pass
/// whose generation has been superseded by the time it completes publishes
/// nothing, so the latest-dispatched input always wins. Must be used from
/// within a Tokio runtime.
pub struct SearchScheduler {
	source: Arc<dyn CandidateSource>,
	config: SchedulerConfig,
	generation: u64,
	latest: Arc<AtomicU64>,
	in_flight: Arc<AtomicUsize>,
	pending: Option<CancellationToken>,
	subscribers: Arc<RwLock<Vec<mpsc::UnboundedSender<SearchEvent>>>>,
}

impl SearchScheduler {
	pub fn new(source: Arc<dyn CandidateSource>) -> Self {
		Self::with_config(source, SchedulerConfig::default())
	}

	pub fn with_config(source: Arc<dyn CandidateSource>, config: SchedulerConfig) -> Self {
		Self {
			source,
			config,
			generation: 0,
			latest: Arc::new(AtomicU64::new(0)),
			in_flight: Arc::new(AtomicUsize::new(0)),
			pending: None,
			subscribers: Arc::new(RwLock::new(Vec::new())),
		}
	}

	/// Registers a subscriber; every publish fans out to all live receivers.
	pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<SearchEvent> {
		let (tx, rx) = mpsc::unbounded_channel();
		self.subscribers.write().push(tx);
		rx
	}

	/// True while at least one fetch+rank pass is in flight.
	pub fn is_busy(&self) -> bool {
		self.in_flight.load(AtomicOrdering::Acquire) > 0
	}

	/// Restarts the debounce window with the latest input value.
	///
	/// Cancels any pending (not yet fired) pass; a pass already past its
	/// debounce runs to completion but its publish is suppressed once a
	/// newer generation has been dispatched.
	pub fn on_input_change(&mut self, value: &str) {
		self.generation = self.generation.wrapping_add(1);
		let generation = self.generation;
		self.latest.store(generation, AtomicOrdering::Release);

		if let Some(pending) = self.pending.take() {
			pending.cancel();
		}

		let cancel = CancellationToken::new();
		self.pending = Some(cancel.clone());

		let value = value.to_string();
		let source = Arc::clone(&self.source);
		let config = self.config.clone();
		let latest = Arc::clone(&self.latest);
		let in_flight = Arc::clone(&self.in_flight);
		let subscribers = Arc::clone(&self.subscribers);

		tokio::spawn(async move {
			if config.debounce > Duration::ZERO {
				tokio::select! {
					_ = cancel.cancelled() => return,
					_ = sleep(config.debounce) => {}
				}
			} else if cancel.is_cancelled() {
				return;
			}

			in_flight.fetch_add(1, AtomicOrdering::AcqRel);
			let outcome = run_search_pass(source.as_ref(), &value, &config).await;
			in_flight.fetch_sub(1, AtomicOrdering::AcqRel);

			if latest.load(AtomicOrdering::Acquire) != generation {
				tracing::trace!(generation, "discarding superseded search pass");
				return;
			}

			match outcome {
				Ok(items) => {
					tracing::trace!(generation, results = items.len(), "search pass complete");
					publish(&subscribers, &SearchEvent::Results {
						generation,
						query: value,
						items: items.into(),
					});
				}
				Err(err) => {
					tracing::warn!(generation, error = %err, "candidate fetch failed");
					publish(&subscribers, &SearchEvent::SourceFailed {
						generation,
						message: err.to_string().into(),
					});
					publish(&subscribers, &SearchEvent::Results {
						generation,
						query: value,
						items: Arc::from(Vec::<String>::new()),
					});
				}
			}
		});
	}

	/// Cancels any pending pass and detaches all subscribers.
	///
	/// An in-flight pass is not awaited; bumping the latest generation
	/// guarantees it publishes nothing.
	pub fn dispose(&mut self) {
		if let Some(pending) = self.pending.take() {
			pending.cancel();
		}
		self.generation = self.generation.wrapping_add(1);
		self.latest.store(self.generation, AtomicOrdering::Release);
		self.subscribers.write().clear();
	}
}

impl Drop for SearchScheduler {
	fn drop(&mut self) {
		if let Some(pending) = self.pending.take() {
			pending.cancel();
		}
	}
}

async fn run_search_pass(source: &dyn CandidateSource, query: &str, config: &SchedulerConfig) -> Result<Vec<String>, SourceError> {
	// Empty (or separator-only) queries publish an empty result without
	// touching the source.
	let needle = sift_matcher::normalize(query);
	if needle.is_empty() {
		return Ok(Vec::new());
	}

	let candidates = source.candidates(&needle).await?;
	Ok(sift_matcher::rank(query, &candidates, &sift_matcher::Config { limit: config.limit }))
}

fn publish(subscribers: &RwLock<Vec<mpsc::UnboundedSender<SearchEvent>>>, event: &SearchEvent) {
	// Sends happen on cloned senders, outside the list lock.
	let senders: Vec<_> = subscribers.read().iter().cloned().collect();
	let mut any_closed = false;
	for tx in &senders {
		any_closed |= tx.send(event.clone()).is_err();
	}
	if any_closed {
		subscribers.write().retain(|tx| !tx.is_closed());
	}
}

#[cfg(test)]
mod tests;
