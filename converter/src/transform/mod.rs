//! Transformation module.
//!
//! - Split: handling note to processing-record fragment and executor
//! - Narrative: executor default and processing-record merge
//! - Columns: positional pruning and output selection
//! - Pipeline: the ordered conversion stages

pub mod columns;
pub mod narrative;
pub mod pipeline;
pub mod split;

pub use columns::{prune_columns, select_output, DROPPED_COLUMNS};
pub use narrative::{collapse_double_stop, executor_or_default, merge_narrative, DEFAULT_EXECUTOR};
pub use pipeline::*;
pub use split::{split_note, split_text, MAX_EXECUTOR_CHARS};
