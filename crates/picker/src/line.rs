//! Trailing-token extraction and accepted-candidate splicing.

use crate::error::AcceptError;

/// Char-indexed span of the token a completion replaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenSpan<'a> {
	/// Char offset of the token start in the line.
	pub start: usize,
	/// Char offset one past the token end.
	pub end: usize,
	/// The token text.
	pub text: &'a str,
}

/// Line-editing surface the picker completes into.
pub trait LineSurface {
	/// Current input line, or `None` when no editable line is active.
	fn current_line(&self) -> Option<String>;
	/// Replaces the char range `[start, end)` of the current line.
	fn replace_span(&mut self, start: usize, end: usize, replacement: &str);
}

fn is_separator(ch: char) -> bool {
	ch.is_whitespace() || matches!(ch, ',' | '=' | ';')
}

/// Returns the final separator-delimited token of `line`, if any.
///
/// Tokens are delimited by runs of whitespace, `,`, `=`, and `;`. A line
/// that is empty or ends in separators only has no trailing token.
pub fn trailing_token(line: &str) -> Option<TokenSpan<'_>> {
	let mut last = None;
	let mut start: Option<(usize, usize)> = None;
	let mut char_idx = 0;

	for (byte_idx, ch) in line.char_indices() {
		if is_separator(ch) {
			if let Some((byte_start, char_start)) = start.take() {
				last = Some(TokenSpan {
					start: char_start,
					end: char_idx,
					text: &line[byte_start..byte_idx],
				});
			}
		} else if start.is_none() {
			start = Some((byte_idx, char_idx));
		}
		char_idx += 1;
	}

	if let Some((byte_start, char_start)) = start {
		last = Some(TokenSpan {
			start: char_start,
			end: char_idx,
			text: &line[byte_start..],
		});
	}

	last
}

/// Char-index-safe replacement for a range within an input string.
pub fn replace_char_range(input: &str, start: usize, end: usize, replacement: &str) -> String {
	let chars: Vec<char> = input.chars().collect();
	let start = start.min(chars.len());
	let end = end.min(chars.len()).max(start);

	let mut out = String::with_capacity(input.len() + replacement.len());
	out.extend(&chars[..start]);
	out.push_str(replacement);
	out.extend(&chars[end..]);
	out
}

/// Splices `candidate` over the trailing token of the active line.
///
/// Replaces the span of the trailing token itself, so a line in which the
/// token text also appears earlier is left intact everywhere else. A line
/// with no trailing token gets the candidate appended.
pub fn accept(surface: &mut dyn LineSurface, candidate: &str) -> Result<(), AcceptError> {
	let line = surface.current_line().ok_or(AcceptError::NoActiveTarget)?;

	match trailing_token(&line) {
		Some(span) => surface.replace_span(span.start, span.end, candidate),
		None => {
			let end = line.chars().count();
			surface.replace_span(end, end, candidate);
		}
	}

	Ok(())
}
