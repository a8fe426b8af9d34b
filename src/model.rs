//! Positional table model shared by every classifier.
//!
//! A table is an ordered list of rows and a row is an ordered list of raw cell
//! texts. Cell `i` of every row belongs to logical column `i`; the width of a
//! table is the length of its first row.

use serde::{Deserialize, Serialize};

use crate::error::{ContinuityError, Result};

pub type Row = Vec<String>;
pub type Table = Vec<Row>;

/// A value computed once for each side of a comparison.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paired<T> {
    pub table1: T,
    pub table2: T,
}

impl<T> Paired<T> {
    pub fn new(table1: T, table2: T) -> Self {
        Self { table1, table2 }
    }

    pub fn map<U, F>(&self, mut f: F) -> Paired<U>
    where
        F: FnMut(&T) -> U,
    {
        Paired {
            table1: f(&self.table1),
            table2: f(&self.table2),
        }
    }
}

pub fn table_width(table: &[Row]) -> usize {
    table.first().map_or(0, Vec::len)
}

/// Rejects tables whose rows do not all share the first row's width.
pub fn ensure_rectangular(table: &[Row], which: &'static str) -> Result<()> {
    let expected = table_width(table);
    for (row, cells) in table.iter().enumerate() {
        if cells.len() != expected {
            return Err(ContinuityError::InvalidShape {
                which,
                row,
                expected,
                found: cells.len(),
            });
        }
    }
    Ok(())
}

pub fn ensure_non_empty(table: &[Row], which: &'static str) -> Result<()> {
    if table.is_empty() {
        Err(ContinuityError::EmptyTable { which })
    } else {
        Ok(())
    }
}

/// Cells of column `index`, top to bottom. Rows narrower than `index` yield
/// an empty cell.
pub fn column(table: &[Row], index: usize) -> Vec<&str> {
    table
        .iter()
        .map(|row| row.get(index).map_or("", String::as_str))
        .collect()
}

/// Builds an owned table from string literals.
pub fn table_from<R, C>(rows: R) -> Table
where
    R: IntoIterator<Item = C>,
    C: IntoIterator,
    C::Item: Into<String>,
{
    rows.into_iter()
        .map(|row| row.into_iter().map(Into::into).collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_pads_missing_cells_with_empty_text() {
        let table = table_from([vec!["a", "b"], vec!["c"]]);
        assert_eq!(column(&table, 1), vec!["b", ""]);
        assert_eq!(column(&table, 5), vec!["", ""]);
    }

    #[test]
    fn ensure_rectangular_reports_first_ragged_row() {
        let table = table_from([vec!["1", "2"], vec!["3", "4"], vec!["5"]]);
        let err = ensure_rectangular(&table, "table1").unwrap_err();
        assert_eq!(
            err,
            ContinuityError::InvalidShape {
                which: "table1",
                row: 2,
                expected: 2,
                found: 1,
            }
        );
    }

    #[test]
    fn empty_table_is_rectangular_with_zero_width() {
        let table: Table = Vec::new();
        assert!(ensure_rectangular(&table, "table1").is_ok());
        assert_eq!(table_width(&table), 0);
        assert!(ensure_non_empty(&table, "table1").is_err());
    }
}
