//! Domain models for the report conversion pipeline.
//!
//! - [`Cell`] - A single spreadsheet value
//! - [`Table`] - Headers plus positional rows, the unit every stage works on
//! - [`SplitResult`] - The two fields derived from the free-text column
//! - [`OutputColumn`] - The five exported columns, in output order

use chrono::{Duration, NaiveDate};
use serde::Serialize;

// =============================================================================
// Cell
// =============================================================================

/// Display format used when a date cell is rendered as text.
const DATETIME_TEXT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A spreadsheet cell value.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
#[serde(untagged)]
pub enum Cell {
    /// Blank cell (or a cell holding an Excel error).
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    /// Excel serial date-time (days since 1899-12-30).
    DateTime(f64),
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    /// Blank cells and empty strings count as missing.
    pub fn is_missing(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Render the value as text.
    ///
    /// Whole numbers drop their fractional part, booleans print as
    /// `True`/`False` and dates as `YYYY-MM-DD HH:MM:SS`.
    pub fn display_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.clone(),
            Cell::Number(n) => format_number(*n),
            Cell::Bool(true) => "True".to_string(),
            Cell::Bool(false) => "False".to_string(),
            Cell::DateTime(serial) => match serial_to_datetime(*serial) {
                Some(dt) => dt.format(DATETIME_TEXT_FORMAT).to_string(),
                None => format_number(*serial),
            },
        }
    }

    /// Text of the cell, or an empty string when missing.
    pub fn text_or_empty(&self) -> String {
        if self.is_missing() {
            String::new()
        } else {
            self.display_text()
        }
    }
}

impl From<Option<String>> for Cell {
    fn from(value: Option<String>) -> Self {
        value.map(Cell::Text).unwrap_or(Cell::Empty)
    }
}

fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// Serial of 9999-12-31 23:59:59.999, the last date Excel can show.
const MAX_EXCEL_SERIAL: f64 = 2_958_466.0;

fn serial_to_datetime(serial: f64) -> Option<chrono::NaiveDateTime> {
    if !(0.0..MAX_EXCEL_SERIAL).contains(&serial) {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let millis = (serial * 86_400_000.0).round() as i64;
    epoch.checked_add_signed(Duration::try_milliseconds(millis)?)
}

// =============================================================================
// Table
// =============================================================================

/// An in-memory sheet: one header per column, rows addressed by position.
///
/// Every row has exactly `headers.len()` cells.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Build a table, padding or truncating rows to the header width.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, Cell::Empty);
                row
            })
            .collect();
        Self { headers, rows }
    }

    pub fn width(&self) -> usize {
        self.headers.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Cell at a position; out of range reads as [`Cell::Empty`].
    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        static EMPTY: Cell = Cell::Empty;
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY)
    }

    /// All values of one positional column, empty when out of range.
    pub fn column_at(&self, col: usize) -> Vec<Cell> {
        (0..self.row_count())
            .map(|row| self.cell(row, col).clone())
            .collect()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Values of the column named `name`.
    pub fn column(&self, name: &str) -> Option<Vec<Cell>> {
        self.position(name).map(|col| self.column_at(col))
    }

    /// Replace the column called `name` in place, or append it on the right.
    ///
    /// `values` must hold one cell per row.
    pub fn set_column(&mut self, name: &str, values: Vec<Cell>) {
        debug_assert_eq!(values.len(), self.rows.len());
        match self.position(name) {
            Some(col) => {
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row[col] = value;
                }
            }
            None => {
                self.headers.push(name.to_string());
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row.push(value);
                }
            }
        }
    }

    /// Rewrite every cell of the column called `name`.
    ///
    /// Returns `false` when no such column exists.
    pub fn map_column(&mut self, name: &str, mut f: impl FnMut(&Cell) -> Cell) -> bool {
        let Some(col) = self.position(name) else {
            return false;
        };
        for row in &mut self.rows {
            row[col] = f(&row[col]);
        }
        true
    }

    /// Remove a positional column, returning its header.
    ///
    /// Returns `None` and leaves the table untouched when `col` is out of range.
    pub fn drop_column(&mut self, col: usize) -> Option<String> {
        if col >= self.width() {
            return None;
        }
        for row in &mut self.rows {
            row.remove(col);
        }
        Some(self.headers.remove(col))
    }

    /// Project onto the named columns in the given order.
    ///
    /// On failure returns every name that is not present.
    pub fn select(&self, names: &[&str]) -> Result<Table, Vec<String>> {
        let mut positions = Vec::with_capacity(names.len());
        let mut missing = Vec::new();
        for name in names {
            match self.position(name) {
                Some(col) => positions.push(col),
                None => missing.push(name.to_string()),
            }
        }
        if !missing.is_empty() {
            return Err(missing);
        }

        let headers = names.iter().map(|n| n.to_string()).collect();
        let rows = self
            .rows
            .iter()
            .map(|row| positions.iter().map(|&col| row[col].clone()).collect())
            .collect();
        Ok(Table { headers, rows })
    }
}

// =============================================================================
// Split Result
// =============================================================================

/// Outcome of splitting the free-text handling column.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitResult {
    /// Processing-record fragment (text before the delimiter).
    pub record: Option<String>,
    /// Person who handled the report (text after the delimiter).
    pub executor: Option<String>,
}

impl SplitResult {
    pub fn new(record: Option<&str>, executor: Option<&str>) -> Self {
        Self {
            record: record.map(str::to_string),
            executor: executor.map(str::to_string),
        }
    }
}

// =============================================================================
// Output Columns
// =============================================================================

/// Columns of the exported sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputColumn {
    DateReported,
    Location,
    IssueCategory,
    ProcessingRecord,
    Executor,
}

impl OutputColumn {
    /// Export order.
    pub const ALL: [OutputColumn; 5] = [
        OutputColumn::DateReported,
        OutputColumn::Location,
        OutputColumn::IssueCategory,
        OutputColumn::ProcessingRecord,
        OutputColumn::Executor,
    ];

    /// Header text as printed in both workbooks.
    pub fn header(self) -> &'static str {
        match self {
            OutputColumn::DateReported => "叫修日期",
            OutputColumn::Location => "地點",
            OutputColumn::IssueCategory => "問題類別",
            OutputColumn::ProcessingRecord => "處理記錄",
            OutputColumn::Executor => "執行者",
        }
    }

    /// Header texts in export order.
    pub fn headers() -> Vec<&'static str> {
        Self::ALL.iter().map(|c| c.header()).collect()
    }
}

impl std::fmt::Display for OutputColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.header())
    }
}
