//! Error types for the picker core.

use thiserror::Error;

/// Errors that can occur when fetching candidates.
#[derive(Debug, Error)]
pub enum SourceError {
	/// The source is missing or misconfigured: no workspace, or the
	/// candidate file does not exist in it.
	#[error("candidate source unavailable: {0}")]
	Unavailable(String),

	/// The underlying fetch mechanism failed.
	#[error("candidate fetch failed: {0}")]
	Fetch(#[from] std::io::Error),
}

/// Errors that can occur when accepting a selection into a line surface.
#[derive(Debug, Error)]
pub enum AcceptError {
	/// No editable line is active to receive the accepted candidate.
	#[error("no active line to complete into")]
	NoActiveTarget,
}
