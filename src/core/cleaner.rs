use crate::domain::model::{Cell, ColumnData, Table};
use std::collections::HashSet;

pub const NUMERIC_FILL: f64 = 0.0;
pub const TEXT_FILL: &str = "unknown";

/// What a cleaning pass changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleaningReport {
    pub duplicate_rows_removed: usize,
    pub empty_rows_removed: usize,
    pub numeric_cells_filled: usize,
    pub text_cells_filled: usize,
}

impl CleaningReport {
    pub fn is_noop(&self) -> bool {
        *self == Self::default()
    }
}

/// Runs the cleaning rules in order:
/// drop duplicate rows, drop all-null rows, fill numeric nulls with `0`,
/// fill textual nulls with `"unknown"`, then drop duplicates once more if
/// anything was filled.
///
/// Filling can make two rows equal (`(2, null)` and `(2, "unknown")`); the
/// last step collapses them so a second pass is a no-op. pandas stops after
/// the fill and keeps both rows.
pub fn clean(table: &mut Table) -> CleaningReport {
    let mut duplicate_rows_removed = drop_duplicate_rows(table);
    let empty_rows_removed = drop_empty_rows(table);
    let (numeric_cells_filled, text_cells_filled) = fill_missing(table);

    if numeric_cells_filled + text_cells_filled > 0 {
        duplicate_rows_removed += drop_duplicate_rows(table);
    }

    CleaningReport {
        duplicate_rows_removed,
        empty_rows_removed,
        numeric_cells_filled,
        text_cells_filled,
    }
}

/// Keeps the first occurrence of each distinct row.
pub fn drop_duplicate_rows(table: &mut Table) -> usize {
    let before = table.num_rows();
    let keep: Vec<bool> = {
        let mut seen: HashSet<Vec<Cell<'_>>> = HashSet::with_capacity(before);
        (0..before).map(|row| seen.insert(table.row(row))).collect()
    };
    table.retain_rows(&keep);
    before - table.num_rows()
}

pub fn drop_empty_rows(table: &mut Table) -> usize {
    let before = table.num_rows();
    let keep: Vec<bool> = (0..before)
        .map(|row| {
            table
                .columns()
                .iter()
                .any(|column| !column.data.is_null(row))
        })
        .collect();
    table.retain_rows(&keep);
    before - table.num_rows()
}

/// Returns `(numeric_filled, text_filled)`.
pub fn fill_missing(table: &mut Table) -> (usize, usize) {
    let mut numeric_filled = 0;
    let mut text_filled = 0;

    for column in table.columns_mut() {
        match &mut column.data {
            ColumnData::Numeric(values) => {
                for value in values.iter_mut().filter(|v| v.is_none()) {
                    *value = Some(NUMERIC_FILL);
                    numeric_filled += 1;
                }
            }
            ColumnData::Textual(values) => {
                for value in values.iter_mut().filter(|v| v.is_none()) {
                    *value = Some(TEXT_FILL.to_string());
                    text_filled += 1;
                }
            }
        }
    }

    (numeric_filled, text_filled)
}
