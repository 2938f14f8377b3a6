//! Fuzzy candidate ranking for incremental pickers.
//!
//! Given a query fragment and a flat list of candidate strings, produces a
//! ranked, deduplicated, size-bounded subset. Contiguous substring matches
//! rank above subsequence-only matches, suffix-anchored matches above
//! mid-string ones, shorter candidates above longer. Pure functions, no I/O.

mod query;
mod score;

pub use query::normalize;
pub use score::{MatchKind, classify};

use rustc_hash::FxHashSet;

/// Default cap on the number of ranked results.
pub const DEFAULT_LIMIT: usize = 30;

/// Ranking configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
	/// Maximum number of entries [`rank`] returns.
	pub limit: usize,
}

impl Default for Config {
	fn default() -> Self {
		Self { limit: DEFAULT_LIMIT }
	}
}

/// A single candidate that matched the query.
///
/// The `Ord` impl is the ranking order: better matches compare smaller, and
/// `index` is the final tiebreak so equal-quality candidates keep their
/// original relative order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Match {
	/// How the candidate satisfied the query.
	pub kind: MatchKind,
	/// Candidate length in chars.
	pub len: usize,
	/// Position of the candidate in the input sequence.
	pub index: u32,
}

/// Matches `query` against every haystack and returns the hits, best first.
///
/// The query is normalized before matching: `::` sequences are stripped and
/// the result is lowercased. A query that normalizes to empty matches
/// nothing. Haystacks are compared case-insensitively.
pub fn match_list<S: AsRef<str>>(query: &str, haystacks: &[S]) -> Vec<Match> {
	let needle = query::normalize(query);
	if needle.is_empty() {
		return Vec::new();
	}

	let mut matches = Vec::new();
	for (index, haystack) in haystacks.iter().enumerate() {
		let haystack = haystack.as_ref();
		if let Some(kind) = score::classify(&needle, haystack) {
			matches.push(Match {
				kind,
				len: haystack.chars().count(),
				index: index as u32,
			});
		}
	}

	matches.sort_unstable();
	matches
}

/// Ranks haystacks against `query`, collapsing exact-string duplicates to
/// their first occurrence and truncating to `config.limit` entries.
///
/// Returned strings keep their original casing.
pub fn rank<S: AsRef<str>>(query: &str, haystacks: &[S], config: &Config) -> Vec<String> {
	let matches = match_list(query, haystacks);

	let mut seen = FxHashSet::default();
	let mut out = Vec::with_capacity(matches.len().min(config.limit));
	for m in matches {
		if out.len() >= config.limit {
			break;
		}
		let text = haystacks[m.index as usize].as_ref();
		if seen.insert(text) {
			out.push(text.to_string());
		}
	}
	out
}
