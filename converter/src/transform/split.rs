//! Free-text handling column split.
//!
//! Handling notes are written as `<what was done> <delimiter> <who did it>`,
//! where the delimiter is `-`, `by` or `ok` in any case. The rightmost
//! delimiter followed by at most [`MAX_EXECUTOR_CHARS`] characters wins.
//! Delimiters inside ordinary words ("book", "maybe") also match.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{Cell, SplitResult};

/// Zero-based source column holding the handling note.
pub const SPLIT_COLUMN: usize = 8;

/// Longest text accepted after the delimiter.
pub const MAX_EXECUTOR_CHARS: usize = 20;

// None of the alternatives can overlap each other, so `find_iter` sees every occurrence.
static DELIMITER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)-|by|ok").expect("delimiter pattern is valid"));

/// Split a handling note into (processing-record fragment, executor).
///
/// # Example
/// ```ignore
/// let split = split_note(&Cell::text("Fix printer by Alice"));
/// assert_eq!(split.record.as_deref(), Some("Fix printer"));
/// assert_eq!(split.executor.as_deref(), Some("Alice"));
/// ```
pub fn split_note(value: &Cell) -> SplitResult {
    if value.is_missing() {
        return SplitResult::default();
    }
    split_text(&value.display_text())
}

/// Split already-extracted text. See [`split_note`].
pub fn split_text(text: &str) -> SplitResult {
    let text = text.trim();
    match rightmost_delimiter(text) {
        Some((start, end)) => {
            let executor = text[end..].trim();
            SplitResult::new(
                Some(text[..start].trim()),
                (!executor.is_empty()).then_some(executor),
            )
        }
        None => SplitResult::new(Some(text), None),
    }
}

/// Byte span of the last usable delimiter.
///
/// Usable means at least one character precedes it and the text after it,
/// leading whitespace skipped, is at most [`MAX_EXECUTOR_CHARS`] long.
fn rightmost_delimiter(text: &str) -> Option<(usize, usize)> {
    DELIMITER
        .find_iter(text)
        .filter(|m| m.start() > 0)
        .filter(|m| text[m.end()..].trim_start().chars().count() <= MAX_EXECUTOR_CHARS)
        .last()
        .map(|m| (m.start(), m.end()))
}
