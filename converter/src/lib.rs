//! # Repair Export - maintenance-report workbook conversion
//!
//! Turns the maintenance-report spreadsheet exported by the repair desk into
//! a five-column workbook: date reported, location, issue category, a merged
//! processing record, and the executor.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ Report xlsx │────▶│   Parser    │────▶│  Transform  │────▶│ Export xlsx │
//! │ (header r3) │     │ (calamine)  │     │ (5 stages)  │     │ (5 columns) │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use repair_export::convert;
//!
//! if convert("report.xlsx", "export.xlsx") {
//!     println!("done");
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`models`] - Cells, tables and output columns
//! - [`parser`] - Workbook reading
//! - [`transform`] - Split, merge, prune, select and the pipeline
//! - [`writer`] - Workbook writing
//! - [`logs`] - Progress log feed

// Core modules
pub mod error;
pub mod models;

// Reading and writing
pub mod parser;
pub mod writer;

// Transformation
pub mod transform;

// Logging
pub mod logs;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{ExportError, PipelineError, PipelineResult, SheetError};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{Cell, OutputColumn, SplitResult, Table};

// =============================================================================
// Re-exports - Workbooks
// =============================================================================

pub use parser::{read_table, table_from_range, HEADER_ROW};
pub use writer::{render_workbook, write_table, OUTPUT_SHEET};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use transform::{
    collapse_double_stop, convert, merge_narrative, split_note, split_text, transform_table,
    try_convert, ConvertSummary, DEFAULT_EXECUTOR,
};
