//! Query normalization.

/// Normalizes a raw picker query for matching.
///
/// Occurrences of the literal separator `::` are stripped so qualified
/// identifiers match their flattened spelling, then the query is lowercased.
pub fn normalize(raw: &str) -> String {
	raw.replace("::", "").to_lowercase()
}
