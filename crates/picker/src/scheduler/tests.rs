use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use std::time::Duration;

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use tokio::time::timeout;

use super::{SchedulerConfig, SearchEvent, SearchScheduler};
use crate::error::SourceError;
use crate::source::CandidateSource;

const RECV_TIMEOUT: Duration = Duration::from_secs(2);

fn fast_config() -> SchedulerConfig {
	SchedulerConfig {
		debounce: Duration::from_millis(20),
		..SchedulerConfig::default()
	}
}

struct StaticSource {
	items: Vec<String>,
	fetches: AtomicUsize,
}

impl StaticSource {
	fn new(items: &[&str]) -> Arc<Self> {
		Arc::new(Self {
			items: items.iter().map(|item| item.to_string()).collect(),
			fetches: AtomicUsize::new(0),
		})
	}

	fn fetches(&self) -> usize {
		self.fetches.load(AtomicOrdering::SeqCst)
	}
}

#[async_trait]
impl CandidateSource for StaticSource {
	async fn candidates(&self, _query: &str) -> Result<Vec<String>, SourceError> {
		self.fetches.fetch_add(1, AtomicOrdering::SeqCst);
		Ok(self.items.clone())
	}
}

/// Source whose fetch takes long enough to overlap a newer dispatch.
struct SlowSource {
	items: Vec<String>,
	delay: Duration,
}

#[async_trait]
impl CandidateSource for SlowSource {
	async fn candidates(&self, _query: &str) -> Result<Vec<String>, SourceError> {
		tokio::time::sleep(self.delay).await;
		Ok(self.items.clone())
	}
}

struct FailingSource;

#[async_trait]
impl CandidateSource for FailingSource {
	async fn candidates(&self, _query: &str) -> Result<Vec<String>, SourceError> {
		Err(SourceError::Unavailable("no workspace defined".to_string()))
	}
}

async fn recv(events: &mut tokio::sync::mpsc::UnboundedReceiver<SearchEvent>) -> SearchEvent {
	timeout(RECV_TIMEOUT, events.recv()).await.expect("timely event").expect("channel open")
}

fn results(event: SearchEvent) -> (String, Vec<String>) {
	match event {
		SearchEvent::Results { query, items, .. } => (query, items.to_vec()),
		other => panic!("expected results, got {other:?}"),
	}
}

#[tokio::test]
async fn debounce_collapses_rapid_input_to_the_last_value() {
	let source = StaticSource::new(&["alpha", "beta", "albatross"]);
	let mut scheduler = SearchScheduler::with_config(source.clone(), fast_config());
	let mut events = scheduler.subscribe();

	scheduler.on_input_change("a");
	scheduler.on_input_change("al");
	scheduler.on_input_change("alb");

	let (query, items) = results(recv(&mut events).await);
	assert_eq!(query, "alb");
	assert_eq!(items, vec!["albatross".to_string()]);

	// Exactly one pass ran, and nothing else is forthcoming.
	assert_eq!(source.fetches(), 1);
	assert!(timeout(Duration::from_millis(100), events.recv()).await.is_err());
}

#[tokio::test]
async fn empty_query_publishes_empty_without_fetching() {
	let source = StaticSource::new(&["alpha"]);
	let mut scheduler = SearchScheduler::with_config(source.clone(), fast_config());
	let mut events = scheduler.subscribe();

	scheduler.on_input_change("");

	let (query, items) = results(recv(&mut events).await);
	assert_eq!(query, "");
	assert_eq!(items, Vec::<String>::new());
	assert_eq!(source.fetches(), 0);
}

#[tokio::test]
async fn source_failure_publishes_notice_then_empty_results() {
	let mut scheduler = SearchScheduler::with_config(Arc::new(FailingSource), fast_config());
	let mut events = scheduler.subscribe();

	scheduler.on_input_change("x");

	let notice = recv(&mut events).await;
	match notice {
		SearchEvent::SourceFailed { message, .. } => {
			assert!(message.contains("no workspace defined"), "unexpected message: {message}");
		}
		other => panic!("expected failure notice, got {other:?}"),
	}

	let (_, items) = results(recv(&mut events).await);
	assert_eq!(items, Vec::<String>::new());

	// The scheduler stays usable after a failure.
	scheduler.on_input_change("y");
	let again = recv(&mut events).await;
	assert!(matches!(again, SearchEvent::SourceFailed { .. }));
}

#[tokio::test]
async fn superseded_pass_publishes_nothing() {
	let slow = Arc::new(SlowSource {
		items: vec!["stale-result".to_string()],
		delay: Duration::from_millis(80),
	});
	let mut scheduler = SearchScheduler::with_config(
		slow,
		SchedulerConfig {
			debounce: Duration::from_millis(1),
			..SchedulerConfig::default()
		},
	);
	let mut events = scheduler.subscribe();

	scheduler.on_input_change("stale");
	// Let the first pass get past its debounce and into the fetch.
	tokio::time::sleep(Duration::from_millis(20)).await;
	scheduler.on_input_change("stale-re");

	let (query, items) = results(recv(&mut events).await);
	assert_eq!(query, "stale-re");
	assert_eq!(items, vec!["stale-result".to_string()]);

	// The older pass completed but was suppressed.
	assert!(timeout(Duration::from_millis(150), events.recv()).await.is_err());
}

#[tokio::test]
async fn busy_flag_tracks_the_in_flight_pass() {
	let slow = Arc::new(SlowSource {
		items: vec!["one".to_string()],
		delay: Duration::from_millis(150),
	});
	let mut scheduler = SearchScheduler::with_config(
		slow,
		SchedulerConfig {
			debounce: Duration::from_millis(1),
			..SchedulerConfig::default()
		},
	);
	let mut events = scheduler.subscribe();

	assert!(!scheduler.is_busy());
	scheduler.on_input_change("one");

	tokio::time::sleep(Duration::from_millis(50)).await;
	assert!(scheduler.is_busy());

	let _ = recv(&mut events).await;
	assert!(!scheduler.is_busy());
}

#[tokio::test]
async fn dispose_cancels_the_pending_pass() {
	let source = StaticSource::new(&["alpha"]);
	let mut scheduler = SearchScheduler::with_config(source.clone(), fast_config());
	let mut events = scheduler.subscribe();

	scheduler.on_input_change("a");
	scheduler.dispose();

	// Subscribers are detached and the debounced pass never fires.
	assert!(timeout(RECV_TIMEOUT, events.recv()).await.expect("channel closes").is_none());
	tokio::time::sleep(Duration::from_millis(60)).await;
	assert_eq!(source.fetches(), 0);
}

#[tokio::test]
async fn publishes_fan_out_to_every_subscriber() {
	let source = StaticSource::new(&["alpha", "beta"]);
	let mut scheduler = SearchScheduler::with_config(source, fast_config());
	let mut first = scheduler.subscribe();
	let mut second = scheduler.subscribe();

	scheduler.on_input_change("alp");

	let (_, from_first) = results(recv(&mut first).await);
	let (_, from_second) = results(recv(&mut second).await);
	assert_eq!(from_first, vec!["alpha".to_string()]);
	assert_eq!(from_first, from_second);
}

#[tokio::test]
async fn results_are_ranked_and_capped() {
	let candidates: Vec<String> = (0..50).map(|i| format!("entry-{i:02}")).collect();
	let candidate_refs: Vec<&str> = candidates.iter().map(|c| c.as_str()).collect();
	let source = StaticSource::new(&candidate_refs);
	let mut scheduler = SearchScheduler::with_config(source, fast_config());
	let mut events = scheduler.subscribe();

	scheduler.on_input_change("entry");

	let (_, items) = results(recv(&mut events).await);
	assert_eq!(items.len(), sift_matcher::DEFAULT_LIMIT);
	assert_eq!(items[0], "entry-00");
}
