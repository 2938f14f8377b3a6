//! Incremental fuzzy picker core.
//!
//! Debounces rapid input changes, runs at most one fetch+rank pass per quiet
//! window against a [`CandidateSource`], and publishes ranked results to
//! subscribers with stale passes suppressed. Also carries the line-editing
//! helpers used to derive a query from an input line and splice an accepted
//! candidate back over its trailing token.

mod error;
mod line;
mod scheduler;
mod source;

pub use error::{AcceptError, SourceError};
pub use line::{LineSurface, TokenSpan, accept, replace_char_range, trailing_token};
pub use scheduler::{SEARCH_DEBOUNCE, SchedulerConfig, SearchEvent, SearchScheduler};
pub use source::{CANDIDATE_FILE, CandidateSource, FileCandidateSource, parse_candidates};
