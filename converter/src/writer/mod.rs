//! Workbook writer for the exported table.
//!
//! The workbook is rendered in memory and moved into place only once it is
//! complete, so a failed export never leaves a partial file behind.

use std::io::Write;
use std::path::Path;

use rust_xlsxwriter::{
    DocProperties, ExcelDateTime, Format, FormatAlign, FormatBorder, Workbook, Worksheet,
};
use tempfile::NamedTempFile;

use crate::error::{ExportError, ExportResult};
use crate::logs::log_warning;
use crate::models::{Cell, Table};

/// Name of the single output worksheet.
pub const OUTPUT_SHEET: &str = "Sheet1";

const DATETIME_NUM_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

/// Longest text a single xlsx cell can hold.
pub const MAX_CELL_CHARS: usize = 32_767;

/// Render `table` as xlsx bytes: one header row, then one row per record.
///
/// Document properties carry a fixed creation date so identical tables
/// produce identical bytes.
pub fn render_workbook(table: &Table) -> ExportResult<Vec<u8>> {
    let mut workbook = Workbook::new();
    let created = ExcelDateTime::from_ymd(2000, 1, 1)?;
    workbook.set_properties(&DocProperties::new().set_creation_datetime(&created));

    let header_format = Format::new()
        .set_bold()
        .set_border(FormatBorder::Thin)
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::Top);
    let datetime_format = Format::new().set_num_format(DATETIME_NUM_FORMAT);

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(OUTPUT_SHEET)?;

    for (col, name) in table.headers.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, name, &header_format)?;
    }

    for (row_idx, row) in table.rows.iter().enumerate() {
        let row_num = (row_idx + 1) as u32;
        for (col, cell) in row.iter().enumerate() {
            write_cell(worksheet, row_num, col as u16, cell, &datetime_format)?;
        }
    }

    Ok(workbook.save_to_buffer()?)
}

fn write_cell(
    ws: &mut Worksheet,
    row: u32,
    col: u16,
    cell: &Cell,
    datetime_format: &Format,
) -> ExportResult<()> {
    match cell {
        Cell::Empty => {}
        Cell::Text(s) => {
            ws.write_string(row, col, fit_cell_text(s, row, col))?;
        }
        Cell::Number(n) => {
            ws.write_number(row, col, *n)?;
        }
        Cell::Bool(b) => {
            ws.write_boolean(row, col, *b)?;
        }
        Cell::DateTime(serial) => {
            ws.write_number_with_format(row, col, *serial, datetime_format)?;
        }
    }
    Ok(())
}

/// Cut text to [`MAX_CELL_CHARS`] characters, logging when anything is dropped.
fn fit_cell_text(text: &str, row: u32, col: u16) -> &str {
    match text.char_indices().nth(MAX_CELL_CHARS) {
        Some((cut, _)) => {
            log_warning(format!(
                "Row {} column {}: text of {} characters truncated to {}",
                row + 1,
                col + 1,
                text.chars().count(),
                MAX_CELL_CHARS
            ));
            &text[..cut]
        }
        None => text,
    }
}

/// Write `table` to `path`, replacing any existing file.
///
/// The bytes go to a temporary file in the destination directory which is
/// then renamed over `path`.
pub fn write_table<P: AsRef<Path>>(table: &Table, path: P) -> ExportResult<()> {
    let path = path.as_ref();
    let bytes = render_workbook(table)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let io_err = |source: std::io::Error| ExportError::Io { path: path.to_path_buf(), source };

    let mut tmp = NamedTempFile::new_in(dir).map_err(io_err)?;
    tmp.write_all(&bytes).map_err(io_err)?;
    tmp.flush().map_err(io_err)?;
    tmp.persist(path).map_err(|source| ExportError::Persist {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{open_workbook, Data, Reader, Xlsx};

    fn sample() -> Table {
        Table::new(
            vec!["叫修日期".into(), "處理記錄".into()],
            vec![
                vec![Cell::DateTime(45356.5), Cell::text("重開機。\n\n正常。")],
                vec![Cell::Empty, Cell::Number(42.0)],
            ],
        )
    }

    #[test]
    fn test_round_trip_through_calamine() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xlsx");
        write_table(&sample(), &path).unwrap();

        let mut wb: Xlsx<_> = open_workbook(&path).unwrap();
        assert_eq!(wb.sheet_names(), vec![OUTPUT_SHEET.to_string()]);
        let range = wb.worksheet_range(OUTPUT_SHEET).unwrap();
        let rows: Vec<_> = range.rows().collect();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0][0], Data::String("叫修日期".into()));
        assert_eq!(rows[1][1], Data::String("重開機。\n\n正常。".into()));
        assert!(matches!(rows[1][0], Data::DateTime(_)));
        assert_eq!(rows[2][0], Data::Empty);
        assert_eq!(rows[2][1], Data::Float(42.0));
    }

    #[test]
    fn test_overlong_text_truncated() {
        let long = "維".repeat(MAX_CELL_CHARS + 100);
        let table = Table::new(
            vec!["處理記錄".into(), "執行者".into()],
            vec![vec![Cell::Text(long), Cell::text("Lee")]],
        );
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xlsx");
        write_table(&table, &path).unwrap();

        let mut wb: Xlsx<_> = open_workbook(&path).unwrap();
        let range = wb.worksheet_range(OUTPUT_SHEET).unwrap();
        match range.get_value((1, 0)) {
            Some(Data::String(s)) => assert_eq!(s.chars().count(), MAX_CELL_CHARS),
            other => panic!("expected text, got {:?}", other),
        }
        assert_eq!(range.get_value((1, 1)), Some(&Data::String("Lee".into())));
    }

    #[test]
    fn test_fit_cell_text_keeps_short_text() {
        assert_eq!(fit_cell_text("更換碳粉匣", 1, 0), "更換碳粉匣");
        let exact = "a".repeat(MAX_CELL_CHARS);
        assert_eq!(fit_cell_text(&exact, 1, 0).len(), MAX_CELL_CHARS);
    }

    #[test]
    fn test_render_is_deterministic() {
        let first = render_workbook(&sample()).unwrap();
        let second = render_workbook(&sample()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_unwritable_destination() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.xlsx");

        let err = write_table(&sample(), &path).unwrap_err();
        assert!(matches!(err, ExportError::Io { .. }));
        assert!(err.to_string().contains("out.xlsx"));
        assert!(!path.exists());
    }

    #[test]
    fn test_existing_file_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xlsx");
        std::fs::write(&path, b"stale").unwrap();

        write_table(&sample(), &path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"PK"));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
