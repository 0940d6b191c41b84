//! Executor defaulting and processing-record merge.

use crate::models::Cell;

/// Zero-based source column holding the problem description.
pub const NOTE_COLUMN: usize = 7;

/// Executor written when a note names nobody ("unassigned").
pub const DEFAULT_EXECUTOR: &str = "未指派";

const FULL_STOP: &str = "。";
const DOUBLE_FULL_STOP: &str = "。。";

/// Executor cell with the default filled in.
pub fn executor_or_default(executor: &Cell) -> Cell {
    if executor.is_missing() {
        Cell::text(DEFAULT_EXECUTOR)
    } else {
        executor.clone()
    }
}

/// Merge the description and the processing-record fragment.
///
/// Produces `<note>。\n\n<fragment>。` and then collapses doubled full stops
/// once. Both sides may be missing; the result is never empty.
pub fn merge_narrative(note: &Cell, fragment: &Cell) -> String {
    let merged = format!(
        "{}{}\n\n{}{}",
        note.text_or_empty(),
        FULL_STOP,
        fragment.text_or_empty(),
        FULL_STOP
    );
    collapse_double_stop(&merged)
}

/// Replace each non-overlapping "。。" with "。" in a single left-to-right pass.
///
/// Not repeated to a fixpoint: "。。。" becomes "。。".
pub fn collapse_double_stop(text: &str) -> String {
    text.replace(DOUBLE_FULL_STOP, FULL_STOP)
}
