//! Column pruning and output selection.
//!
//! Pruning is positional and tolerant; selection is by header name and
//! strict. A sheet narrower than expected therefore survives pruning and
//! fails at selection.

use crate::error::{PipelineError, PipelineResult};
use crate::models::{OutputColumn, Table};

/// Source positions removed before export.
pub const DROPPED_COLUMNS: [usize; 5] = [0, 2, 3, 5, 7];

/// Remove the [`DROPPED_COLUMNS`], highest index first.
///
/// Positions refer to the source sheet: indices at or past `source_width`
/// are skipped, even when derived columns were appended there. Returns the
/// removed headers.
pub fn prune_columns(table: &mut Table, source_width: usize) -> Vec<String> {
    let mut indices = DROPPED_COLUMNS;
    indices.sort_unstable_by(|a, b| b.cmp(a));
    indices
        .iter()
        .filter(|&&col| col < source_width)
        .filter_map(|&col| table.drop_column(col))
        .collect()
}

/// Project the table onto the five [`OutputColumn`]s, in export order.
pub fn select_output(table: &Table) -> PipelineResult<Table> {
    table
        .select(&OutputColumn::headers())
        .map_err(|missing| PipelineError::MissingColumns {
            missing,
            available: table.headers.clone(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Cell;

    fn table(width: usize) -> Table {
        let headers = (0..width).map(|i| format!("c{}", i)).collect();
        let row = (0..width).map(|i| Cell::Number(i as f64)).collect();
        Table::new(headers, vec![row])
    }

    #[test]
    fn test_prune_full_width() {
        let mut t = table(10);
        let dropped = prune_columns(&mut t, 10);
        assert_eq!(dropped, vec!["c7", "c5", "c3", "c2", "c0"]);
        assert_eq!(t.headers, vec!["c1", "c4", "c6", "c8", "c9"]);
        assert_eq!(t.cell(0, 2), &Cell::Number(6.0));
    }

    #[test]
    fn test_prune_narrow_table_skips_out_of_range() {
        let mut t = table(6);
        let dropped = prune_columns(&mut t, 6);
        assert_eq!(dropped, vec!["c5", "c3", "c2", "c0"]);
        assert_eq!(t.headers, vec!["c1", "c4"]);
    }

    #[test]
    fn test_prune_ignores_appended_columns() {
        let mut t = table(6);
        t.set_column("處理記錄", vec![Cell::Empty]);
        t.set_column("執行者", vec![Cell::Empty]);
        assert_eq!(t.width(), 8);

        prune_columns(&mut t, 6);
        assert_eq!(t.headers, vec!["c1", "c4", "處理記錄", "執行者"]);
    }

    #[test]
    fn test_select_output_missing_columns() {
        let t = table(3);
        match select_output(&t) {
            Err(PipelineError::MissingColumns { missing, available }) => {
                assert_eq!(missing.len(), 5);
                assert_eq!(available, vec!["c0", "c1", "c2"]);
            }
            other => panic!("expected MissingColumns, got {:?}", other),
        }
    }

    #[test]
    fn test_select_output_order() {
        let headers = ["執行者", "地點", "x", "處理記錄", "叫修日期", "問題類別"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let row = ["E", "L", "X", "P", "D", "I"].iter().map(|s| Cell::text(*s)).collect();
        let t = Table::new(headers, vec![row]);

        let out = select_output(&t).unwrap();
        assert_eq!(out.headers, OutputColumn::headers());
        assert_eq!(
            out.rows[0],
            ["D", "L", "I", "P", "E"].iter().map(|s| Cell::text(*s)).collect::<Vec<_>>()
        );
    }
}
