//! Workbook reader for maintenance reports.
//!
//! The first two rows of a report are a title block; the third row holds the
//! column headers. Columns are addressed by absolute sheet position (A = 0),
//! so blank leading rows or columns never shift indices.

use std::collections::HashMap;
use std::path::Path;

use calamine::{open_workbook, Data, Range, Reader, Xlsx};

use crate::error::{SheetError, SheetResult};
use crate::models::{Cell, Table};

/// Zero-based row holding the column headers.
pub const HEADER_ROW: usize = 2;

/// Read the first worksheet of an xlsx file into a [`Table`].
///
/// # Example
/// ```ignore
/// let table = read_table("report.xlsx")?;
/// println!("{} columns, {} rows", table.width(), table.row_count());
/// ```
pub fn read_table<P: AsRef<Path>>(path: P) -> SheetResult<Table> {
    let path = path.as_ref();
    let mut workbook: Xlsx<_> = open_workbook(path).map_err(|source| SheetError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(SheetError::NoWorksheet)?;

    let range = workbook
        .worksheet_range(&sheet)
        .map_err(|source| SheetError::Range { sheet, source })?;

    table_from_range(&range)
}

/// Build a [`Table`] from a worksheet range.
///
/// Row [`HEADER_ROW`] becomes the headers and every row below it a data row,
/// up to the last used row. The width runs from column A to the last used
/// column.
pub fn table_from_range(range: &Range<Data>) -> SheetResult<Table> {
    let (Some(start), Some(end)) = (range.start(), range.end()) else {
        return Err(SheetError::MissingHeaderRow { rows: 0 });
    };

    let last_row = end.0 as usize;
    if last_row < HEADER_ROW {
        return Err(SheetError::MissingHeaderRow { rows: last_row + 1 });
    }
    let width = end.1 as usize + 1;

    let mut grid = vec![vec![Cell::Empty; width]; last_row + 1 - HEADER_ROW];
    for (row, col, data) in range.used_cells() {
        let abs_row = row + start.0 as usize;
        let abs_col = col + start.1 as usize;
        if abs_row < HEADER_ROW {
            continue;
        }
        grid[abs_row - HEADER_ROW][abs_col] = cell_from_data(data);
    }

    let mut rows = grid.into_iter();
    let header_cells = rows.next().unwrap_or_default();
    let headers = normalize_headers(&header_cells);

    Ok(Table::new(headers, rows.collect()))
}

/// Convert a calamine cell to a [`Cell`].
fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::String(s) if s.is_empty() => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => Cell::DateTime(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
    }
}

/// Derive unique column names from the header row.
///
/// Blank headers become `Unnamed: <index>`; repeats are suffixed `.1`, `.2`, ...
fn normalize_headers(cells: &[Cell]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    cells
        .iter()
        .enumerate()
        .map(|(i, cell)| {
            let base = if cell.is_missing() {
                format!("Unnamed: {}", i)
            } else {
                cell.display_text()
            };
            let count = seen.entry(base.clone()).or_insert(0);
            let name = if *count == 0 {
                base
            } else {
                format!("{}.{}", base, count)
            };
            *count += 1;
            name
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet(cells: &[((u32, u32), Data)]) -> Range<Data> {
        let end = cells.iter().fold((0, 0), |acc, ((r, c), _)| (acc.0.max(*r), acc.1.max(*c)));
        let start = cells
            .iter()
            .fold(end, |acc, ((r, c), _)| (acc.0.min(*r), acc.1.min(*c)));
        let mut range = Range::new(start, end);
        for (pos, value) in cells {
            range.set_value(*pos, value.clone());
        }
        range
    }

    fn s(v: &str) -> Data {
        Data::String(v.to_string())
    }

    #[test]
    fn test_header_on_third_row() {
        let range = sheet(&[
            ((0, 0), s("總處報修資料")),
            ((2, 0), s("編號")),
            ((2, 1), s("叫修日期")),
            ((3, 0), Data::Float(1.0)),
            ((3, 1), s("2024/01/02")),
            ((4, 1), s("2024/01/03")),
        ]);
        let table = table_from_range(&range).unwrap();

        assert_eq!(table.headers, vec!["編號", "叫修日期"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.cell(0, 0), &Cell::Number(1.0));
        assert_eq!(table.cell(1, 0), &Cell::Empty);
        assert_eq!(table.cell(1, 1), &Cell::text("2024/01/03"));
    }

    #[test]
    fn test_positions_are_absolute() {
        // Nothing in column A or rows 1-2: indices must still count from A1.
        let range = sheet(&[((2, 1), s("地點")), ((3, 2), s("x"))]);
        let table = table_from_range(&range).unwrap();

        assert_eq!(table.headers, vec!["Unnamed: 0", "地點", "Unnamed: 2"]);
        assert_eq!(table.cell(0, 2), &Cell::text("x"));
    }

    #[test]
    fn test_duplicate_headers_are_suffixed() {
        let range = sheet(&[((2, 0), s("備註")), ((2, 1), s("備註")), ((2, 2), s("備註"))]);
        let table = table_from_range(&range).unwrap();
        assert_eq!(table.headers, vec!["備註", "備註.1", "備註.2"]);
        assert_eq!(table.row_count(), 0);
    }

    #[test]
    fn test_short_sheet_has_no_header() {
        let range = sheet(&[((0, 0), s("title")), ((1, 0), s("spacer"))]);
        let err = table_from_range(&range).unwrap_err();
        assert!(matches!(err, SheetError::MissingHeaderRow { rows: 2 }));

        let empty: Range<Data> = Range::empty();
        assert!(table_from_range(&empty).is_err());
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = read_table("/nonexistent/report.xlsx").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("/nonexistent/report.xlsx"));
    }
}
