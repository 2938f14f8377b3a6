//! Candidate supply for the picker.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::SourceError;

/// Conventional workspace-relative candidate file name.
pub const CANDIDATE_FILE: &str = ".ac_candidates.txt";

/// Supplies the flat candidate list a search pass ranks against.
///
/// The scheduler passes the normalized query so a source backed by an
/// already-filtering mechanism can narrow what it returns; sources serving
/// the full list (like [`FileCandidateSource`]) are free to ignore it.
#[async_trait]
pub trait CandidateSource: Send + Sync {
	/// Fetches the current candidates, one per line of the backing resource.
	async fn candidates(&self, query: &str) -> Result<Vec<String>, SourceError>;
}

/// Candidate source backed by a newline-delimited file in a workspace root.
#[derive(Debug, Clone)]
pub struct FileCandidateSource {
	path: PathBuf,
}

impl FileCandidateSource {
	/// Uses the conventional [`CANDIDATE_FILE`] under `root`.
	pub fn in_workspace(root: impl AsRef<Path>) -> Self {
		Self {
			path: root.as_ref().join(CANDIDATE_FILE),
		}
	}

	/// Uses an explicit candidate file path.
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	/// Path of the backing candidate file.
	pub fn path(&self) -> &Path {
		&self.path
	}
}

#[async_trait]
impl CandidateSource for FileCandidateSource {
	async fn candidates(&self, _query: &str) -> Result<Vec<String>, SourceError> {
		let path = self.path.clone();
		let contents = tokio::task::spawn_blocking(move || match std::fs::read_to_string(&path) {
			Ok(contents) => Ok(contents),
			Err(err) if err.kind() == io::ErrorKind::NotFound => {
				Err(SourceError::Unavailable(format!("{} does not exist in the workspace root", path.display())))
			}
			Err(err) => Err(SourceError::Fetch(err)),
		})
		.await
		.map_err(|err| SourceError::Unavailable(format!("candidate read task failed: {err}")))??;

		Ok(parse_candidates(&contents))
	}
}

/// Splits candidate file contents into trimmed, non-empty lines.
pub fn parse_candidates(contents: &str) -> Vec<String> {
	contents.lines().map(str::trim).filter(|line| !line.is_empty()).map(str::to_string).collect()
}
