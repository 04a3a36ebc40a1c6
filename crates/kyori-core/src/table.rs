//! Tabular model: cell values, the read-only table interface consumed by the
//! engine, an in-memory implementation, and the augmented output table.
//!
//! The engine never mutates its input; it reads rows through [`TabularStore`]
//! and returns a fresh [`AugmentedTable`] whose original columns are carried
//! over unchanged.

use serde::{Deserialize, Serialize};

/// A single table cell.
///
/// `Null` is the explicit absent value — unresolved results are never encoded
/// as empty strings, zeros, or NaN.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    Null,
    Int(i64),
    Float(f64),
    Text(String),
}

impl CellValue {
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

impl std::fmt::Display for CellValue {
    /// Plain decimal rendering; `Null` renders as the empty string.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Int(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

/// Read-only row/column access to an input table.
///
/// Row and column order is the iteration contract: the engine walks rows in
/// index order and copies original columns positionally.
pub trait TabularStore {
    /// Column headers in table order.
    fn columns(&self) -> &[String];

    /// Number of data rows.
    fn row_count(&self) -> usize;

    /// The cell at (`row`, `col`). Out-of-range access is a caller bug.
    fn cell(&self, row: usize, col: usize) -> &CellValue;

    /// Index of the named column, if present.
    fn column_index(&self, name: &str) -> Option<usize> {
        self.columns().iter().position(|c| c == name)
    }
}

/// A simple owned table; the reference [`TabularStore`] implementation.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryTable {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl MemoryTable {
    /// Builds a table, padding short rows with `Null` so every row has one
    /// cell per column.
    #[must_use]
    pub fn new(columns: Vec<String>, mut rows: Vec<Vec<CellValue>>) -> Self {
        let width = columns.len();
        for row in &mut rows {
            row.resize(width, CellValue::Null);
        }
        Self { columns, rows }
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }
}

impl TabularStore for MemoryTable {
    fn columns(&self) -> &[String] {
        &self.columns
    }

    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn cell(&self, row: usize, col: usize) -> &CellValue {
        &self.rows[row][col]
    }
}

/// The pipeline output: the input table plus appended result columns.
///
/// Original columns come first and are byte-identical to the input; appended
/// columns follow in destination order. Duplicate appended names are allowed
/// and kept in order (two destinations with the same label produce two
/// same-named columns).
#[derive(Debug, Clone, PartialEq)]
pub struct AugmentedTable {
    columns: Vec<String>,
    original_width: usize,
    rows: Vec<Vec<CellValue>>,
}

impl AugmentedTable {
    /// Assembles the output from the input table and the appended columns.
    ///
    /// `appended` is column-major: one `(name, cells)` pair per new column,
    /// each with exactly `table.row_count()` cells.
    ///
    /// # Panics
    ///
    /// Panics if an appended column's length differs from the row count;
    /// the engine constructs these together so a mismatch is a logic error.
    #[must_use]
    pub fn assemble(table: &dyn TabularStore, appended: Vec<(String, Vec<CellValue>)>) -> Self {
        let row_count = table.row_count();
        let original_width = table.columns().len();

        let mut columns: Vec<String> = table.columns().to_vec();
        let mut rows: Vec<Vec<CellValue>> = (0..row_count)
            .map(|r| {
                (0..original_width)
                    .map(|c| table.cell(r, c).clone())
                    .collect()
            })
            .collect();

        for (name, cells) in appended {
            assert_eq!(cells.len(), row_count, "appended column {name:?} length");
            columns.push(name);
            for (row, cell) in rows.iter_mut().zip(cells) {
                row.push(cell);
            }
        }

        Self {
            columns,
            original_width,
            rows,
        }
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Width of the original table; columns at or past this index were
    /// appended by the pipeline.
    #[must_use]
    pub fn original_width(&self) -> usize {
        self.original_width
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        &self.rows[row][col]
    }

    /// The appended cells of `row`, in destination-column order.
    #[must_use]
    pub fn appended_cells(&self, row: usize) -> &[CellValue] {
        &self.rows[row][self.original_width..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> MemoryTable {
        MemoryTable::new(
            vec!["name".into(), "postal".into()],
            vec![
                vec![CellValue::Text("a".into()), CellValue::Text("606-8507".into())],
                vec![CellValue::Text("b".into())],
            ],
        )
    }

    #[test]
    fn short_rows_are_padded_with_null() {
        let t = sample_table();
        assert_eq!(*t.cell(1, 1), CellValue::Null);
    }

    #[test]
    fn column_index_finds_named_column() {
        let t = sample_table();
        assert_eq!(t.column_index("postal"), Some(1));
        assert_eq!(t.column_index("missing"), None);
    }

    #[test]
    fn assemble_preserves_originals_and_appends_in_order() {
        let t = sample_table();
        let out = AugmentedTable::assemble(
            &t,
            vec![
                ("d1".into(), vec![CellValue::Float(1.0), CellValue::Null]),
                ("d2".into(), vec![CellValue::Null, CellValue::Float(2.0)]),
            ],
        );
        assert_eq!(out.columns(), &["name", "postal", "d1", "d2"]);
        assert_eq!(out.original_width(), 2);
        assert_eq!(*out.cell(0, 0), CellValue::Text("a".into()));
        assert_eq!(*out.cell(0, 2), CellValue::Float(1.0));
        assert_eq!(out.appended_cells(1), &[CellValue::Null, CellValue::Float(2.0)]);
    }

    #[test]
    fn null_cell_renders_as_empty_string() {
        assert_eq!(CellValue::Null.to_string(), "");
        assert_eq!(CellValue::Float(12.35).to_string(), "12.35");
    }
}
