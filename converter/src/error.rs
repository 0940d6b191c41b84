//! Error types for the report conversion pipeline.
//!
//! - [`SheetError`] - reading the source workbook (stage 1)
//! - [`ExportError`] - writing the output workbook (stage 7)
//! - [`PipelineError`] - top-level conversion errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use std::path::PathBuf;

use thiserror::Error;

// =============================================================================
// Workbook Reading Errors
// =============================================================================

/// Errors while loading the source workbook.
#[derive(Debug, Error)]
pub enum SheetError {
    /// The file could not be opened as an xlsx workbook.
    #[error("Cannot open workbook '{path}': {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: calamine::XlsxError,
    },

    /// The workbook contains no worksheet.
    #[error("Workbook has no worksheets")]
    NoWorksheet,

    /// The first worksheet could not be decoded.
    #[error("Cannot read sheet '{sheet}': {source}")]
    Range {
        sheet: String,
        #[source]
        source: calamine::XlsxError,
    },

    /// The sheet ends before the header row.
    #[error("Header row 3 not found: sheet has only {rows} row(s)")]
    MissingHeaderRow { rows: usize },
}

// =============================================================================
// Workbook Writing Errors
// =============================================================================

/// Errors while writing the output workbook.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The workbook could not be rendered.
    #[error("Cannot build workbook: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// Writing the temporary file failed.
    #[error("Cannot write '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Moving the finished file into place failed.
    #[error("Cannot save '{path}': {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: tempfile::PersistError,
    },
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level conversion errors.
///
/// This is the error type returned by [`crate::transform::pipeline::try_convert`].
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Input workbook error.
    #[error("Input error: {0}")]
    Sheet(#[from] SheetError),

    /// Output workbook error.
    #[error("Output error: {0}")]
    Export(#[from] ExportError),

    /// Output columns absent after pruning.
    #[error("Missing column(s) {missing:?}; available columns: {available:?}")]
    MissingColumns {
        missing: Vec<String>,
        available: Vec<String>,
    },
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for workbook reading.
pub type SheetResult<T> = Result<T, SheetError>;

/// Result type for workbook writing.
pub type ExportResult<T> = Result<T, ExportError>;

/// Result type for the conversion pipeline.
pub type PipelineResult<T> = Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        let sheet_err = SheetError::MissingHeaderRow { rows: 2 };
        let pipeline_err: PipelineError = sheet_err.into();
        let msg = pipeline_err.to_string();
        assert!(msg.starts_with("Input error"));
        assert!(msg.contains("only 2 row"));

        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let export_err = ExportError::Io { path: PathBuf::from("/out/report.xlsx"), source: io };
        let pipeline_err: PipelineError = export_err.into();
        let msg = pipeline_err.to_string();
        assert!(msg.contains("report.xlsx"));
        assert!(msg.contains("denied"));
    }

    #[test]
    fn test_missing_columns_format() {
        let err = PipelineError::MissingColumns {
            missing: vec!["叫修日期".into()],
            available: vec!["地點".into(), "處理記錄".into()],
        };
        let msg = err.to_string();
        assert!(msg.contains("叫修日期"));
        assert!(msg.contains("地點"));
    }
}
