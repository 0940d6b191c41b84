//! End-to-end conversion of a maintenance-report workbook.
//!
//! Stages run strictly in order and any failure aborts the rest:
//!
//! 1. Load the sheet (header on row 3)
//! 2. Split the handling note (column 8) into record fragment and executor
//! 3. Default missing executors
//! 4. Merge the description (column 7) and fragment into the processing record
//! 5. Drop source columns 0, 2, 3, 5, 7
//! 6. Select the five output columns by name
//! 7. Save the workbook
//!
//! # Example
//!
//! ```rust,ignore
//! use repair_export::try_convert;
//!
//! let summary = try_convert("report.xlsx", "export.xlsx")?;
//! println!("Exported {} rows", summary.row_count);
//! ```

use std::path::{Path, PathBuf};

use serde::Serialize;

use super::columns::{prune_columns, select_output};
use super::narrative::{executor_or_default, merge_narrative, NOTE_COLUMN};
use super::split::{split_note, SPLIT_COLUMN};
use crate::error::PipelineResult;
use crate::logs::{log_error, log_info, log_info_indent, log_success, log_warning};
use crate::models::{Cell, OutputColumn, SplitResult, Table};
use crate::parser::read_table;
use crate::writer::write_table;

/// Outcome of a successful conversion
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertSummary {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Data rows read, which is also the number of rows written
    pub row_count: usize,
    pub columns: Vec<String>,
}

/// Convert `input` into `output`, reporting the outcome through the log feed.
///
/// Returns `true` on success. On failure the cause is logged as
/// `處理失敗：<cause>` and nothing is written to `output`.
pub fn convert<P: AsRef<Path>, Q: AsRef<Path>>(input: P, output: Q) -> bool {
    match try_convert(input, output) {
        Ok(summary) => {
            log_success(format!(
                "Saved {} rows to {}",
                summary.row_count,
                summary.output.display()
            ));
            true
        }
        Err(e) => {
            log_error(format!("處理失敗：{}", e));
            false
        }
    }
}

/// Convert `input` into `output`.
///
/// The output file is only touched once every in-memory stage succeeded.
pub fn try_convert<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
) -> PipelineResult<ConvertSummary> {
    let input = input.as_ref();
    let output = output.as_ref();

    log_info(format!("📖 Reading {}...", input.display()));
    let table = read_table(input)?;
    log_success(format!("Read {} rows, {} columns", table.row_count(), table.width()));
    for (i, col) in table.headers.iter().enumerate() {
        log_info_indent(format!("[{:2}] {}", i, col), 1);
    }

    let exported = transform_table(table)?;

    log_info(format!("💾 Writing {}...", output.display()));
    write_table(&exported, output)?;

    Ok(ConvertSummary {
        input: input.to_path_buf(),
        output: output.to_path_buf(),
        row_count: exported.row_count(),
        columns: exported.headers,
    })
}

/// Run stages 2 to 6 on a loaded sheet.
pub fn transform_table(mut table: Table) -> PipelineResult<Table> {
    let source_width = table.width();
    if source_width <= SPLIT_COLUMN {
        log_warning(format!(
            "Sheet has {} columns, expected at least {}",
            source_width,
            SPLIT_COLUMN + 1
        ));
    }

    let notes = split_notes(&mut table);
    log_success(format!("Split {} handling notes", notes));

    let defaulted = default_executors(&mut table);
    if defaulted > 0 {
        log_info(format!("{} rows have no executor", defaulted));
    }

    merge_records(&mut table, source_width);

    let dropped = prune_columns(&mut table, source_width);
    log_info(format!("Dropped columns: {}", dropped.join(", ")));

    let exported = select_output(&table)?;
    log_success(format!("Selected columns: {}", exported.headers.join(", ")));
    Ok(exported)
}

/// Stage 2. Returns how many rows had a note.
fn split_notes(table: &mut Table) -> usize {
    let splits: Vec<SplitResult> = table.column_at(SPLIT_COLUMN).iter().map(split_note).collect();
    let with_note = splits.iter().filter(|s| s.record.is_some()).count();

    let (records, executors): (Vec<Cell>, Vec<Cell>) = splits
        .into_iter()
        .map(|s| (Cell::from(s.record), Cell::from(s.executor)))
        .unzip();
    table.set_column(OutputColumn::ProcessingRecord.header(), records);
    table.set_column(OutputColumn::Executor.header(), executors);
    with_note
}

/// Stage 3. Returns how many executors were defaulted.
fn default_executors(table: &mut Table) -> usize {
    let mut defaulted = 0;
    table.map_column(OutputColumn::Executor.header(), |cell| {
        if cell.is_missing() {
            defaulted += 1;
        }
        executor_or_default(cell)
    });
    defaulted
}

/// Stage 4. The description column is read from the source layout only.
fn merge_records(table: &mut Table, source_width: usize) {
    let descriptions = if NOTE_COLUMN < source_width {
        table.column_at(NOTE_COLUMN)
    } else {
        vec![Cell::Empty; table.row_count()]
    };

    let header = OutputColumn::ProcessingRecord.header();
    let fragments = table
        .column(header)
        .unwrap_or_else(|| vec![Cell::Empty; table.row_count()]);

    let merged = descriptions
        .iter()
        .zip(&fragments)
        .map(|(description, fragment)| Cell::Text(merge_narrative(description, fragment)))
        .collect();
    table.set_column(header, merged);
}
