//! Rectangular string grid backing both editable tables.
//!
//! A `Grid` is an ordered list of column names plus an ordered list of rows.
//! Row order is meaningful (display order and step execution order) and only
//! changes through explicit `insert_row` / `remove_row`.
//!
//! Invariants (hold after every public call):
//! * every row has exactly `columns.len()` cells;
//! * a cell is always a `String`; the empty string means "no value";
//! * a grid may have a schema (columns) and zero rows, but never rows without
//!   a schema.
//!
//! Shape checks happen before any mutation so a rejected call leaves the grid
//! untouched.

mod error;
pub mod schema;

pub use error::{EditError, EditResult};
pub use schema::{TableKind, column_label};

use tracing::trace;

/// One row of cells, length-matched to the owning grid's columns.
pub type Row = Vec<String>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grid {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Grid {
    /// Grid with neither schema nor rows (fresh table).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Grid with a schema and no rows.
    pub fn with_columns(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Build a grid from an already rectangular import.
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> EditResult<Self> {
        if columns.is_empty() && !rows.is_empty() {
            return Err(EditError::InvalidState(format!(
                "{} rows supplied without columns",
                rows.len()
            )));
        }
        if let Some((idx, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, r)| r.len() != columns.len())
        {
            return Err(EditError::InvalidState(format!(
                "row {idx} has {} cells, expected {}",
                row.len(),
                columns.len()
            )));
        }
        Ok(Self { columns, rows })
    }

    /// Build a grid from rows of uneven length (as read from a spreadsheet
    /// without a header). Short rows are padded with `""`; columns get
    /// positional names `"0"`, `"1"`, .... Rows that are all empty give a
    /// grid with neither schema nor rows.
    pub fn from_ragged(rows: Vec<Vec<String>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        if width == 0 {
            return Self::empty();
        }
        let columns = (0..width).map(|i| i.to_string()).collect();
        let rows = rows
            .into_iter()
            .map(|mut r| {
                r.resize(width, String::new());
                r
            })
            .collect();
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&[String]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// True when there are no rows (a schema may still exist).
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_schema(&self) -> bool {
        !self.columns.is_empty()
    }

    pub fn cell(&self, row: usize, col: usize) -> EditResult<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .ok_or(EditError::cell(row, col))
    }

    /// Overwrite one cell, returning the previous value.
    pub fn set_cell(&mut self, row: usize, col: usize, value: String) -> EditResult<String> {
        let cell = self
            .rows
            .get_mut(row)
            .and_then(|r| r.get_mut(col))
            .ok_or(EditError::cell(row, col))?;
        Ok(std::mem::replace(cell, value))
    }

    /// A row of `""` matching the current schema.
    pub fn blank_row(&self) -> Row {
        vec![String::new(); self.columns.len()]
    }

    /// Splice `row` in at `position` (`0..=row_count`), shifting later rows down.
    pub fn insert_row(&mut self, position: usize, row: Row) -> EditResult<()> {
        if position > self.rows.len() {
            return Err(EditError::row(position));
        }
        if row.len() != self.columns.len() {
            return Err(EditError::InvalidState(format!(
                "inserted row has {} cells, expected {}",
                row.len(),
                self.columns.len()
            )));
        }
        self.rows.insert(position, row);
        trace!(target: "grid", position, rows = self.rows.len(), "row_inserted");
        Ok(())
    }

    /// Remove and return the row at `position`, shifting later rows up.
    pub fn remove_row(&mut self, position: usize) -> EditResult<Row> {
        if position >= self.rows.len() {
            return Err(EditError::row(position));
        }
        let row = self.rows.remove(position);
        trace!(target: "grid", position, rows = self.rows.len(), "row_removed");
        Ok(row)
    }

    /// Install a schema on a grid that has never had one. Refuses to replace an
    /// existing schema so column layout stays fixed after first populate.
    pub fn materialize_schema(&mut self, columns: Vec<String>) -> EditResult<()> {
        if self.has_schema() || !self.rows.is_empty() {
            return Err(EditError::InvalidState(
                "schema already established".to_string(),
            ));
        }
        trace!(target: "grid", columns = columns.len(), "schema_materialized");
        self.columns = columns;
        Ok(())
    }

    /// Drop the schema of a grid that has no rows left, returning it to the
    /// never-populated state. Only undo of a materializing insert does this.
    pub fn clear_schema(&mut self) -> EditResult<Vec<String>> {
        if !self.rows.is_empty() {
            return Err(EditError::InvalidState(format!(
                "cannot drop schema with {} rows present",
                self.rows.len()
            )));
        }
        trace!(target: "grid", columns = self.columns.len(), "schema_cleared");
        Ok(std::mem::take(&mut self.columns))
    }

    /// Export as a rectangular grid of plain strings.
    pub fn to_rows(&self) -> Vec<Vec<String>> {
        self.rows.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn row(cells: &[&str]) -> Row {
        cells.iter().map(|c| c.to_string()).collect()
    }

    fn sample() -> Grid {
        Grid::new(
            row(&["a", "b", "c"]),
            vec![row(&["1", "2", "3"]), row(&["4", "5", "6"])],
        )
        .unwrap()
    }

    #[test]
    fn new_rejects_ragged_rows() {
        let err = Grid::new(row(&["a", "b"]), vec![row(&["1"])]).unwrap_err();
        assert!(matches!(err, EditError::InvalidState(_)));
        let err = Grid::new(Vec::new(), vec![row(&["1"])]).unwrap_err();
        assert!(matches!(err, EditError::InvalidState(_)));
    }

    #[test]
    fn from_ragged_pads_and_names_positionally() {
        let g = Grid::from_ragged(vec![row(&["x"]), row(&["y", "z", "w"])]);
        assert_eq!(g.columns(), &row(&["0", "1", "2"])[..]);
        assert_eq!(g.row(0).unwrap(), &row(&["x", "", ""])[..]);
        assert_eq!(g.row_count(), 2);
    }

    #[test]
    fn from_ragged_empty_has_no_schema() {
        let g = Grid::from_ragged(Vec::new());
        assert!(!g.has_schema());
        assert!(g.is_empty());
    }

    #[test]
    fn from_ragged_all_empty_rows_has_no_rows() {
        let g = Grid::from_ragged(vec![Vec::new(), Vec::new()]);
        assert!(!g.has_schema());
        assert_eq!(g, Grid::empty());
    }

    #[test]
    fn cell_bounds() {
        let g = sample();
        assert_eq!(g.cell(1, 2).unwrap(), "6");
        assert_eq!(g.cell(2, 0), Err(EditError::cell(2, 0)));
        assert_eq!(g.cell(0, 3), Err(EditError::cell(0, 3)));
    }

    #[test]
    fn set_cell_returns_previous() {
        let mut g = sample();
        let prev = g.set_cell(0, 1, "B".into()).unwrap();
        assert_eq!(prev, "2");
        assert_eq!(g.cell(0, 1).unwrap(), "B");
        assert!(g.set_cell(5, 0, "x".into()).is_err());
    }

    #[test]
    fn insert_and_remove_shift_rows() {
        let mut g = sample();
        g.insert_row(1, row(&["m", "n", "o"])).unwrap();
        assert_eq!(g.cell(1, 0).unwrap(), "m");
        assert_eq!(g.cell(2, 0).unwrap(), "4");
        g.insert_row(3, row(&["z", "z", "z"])).unwrap();
        assert_eq!(g.row_count(), 4);
        let removed = g.remove_row(1).unwrap();
        assert_eq!(removed, row(&["m", "n", "o"]));
        assert_eq!(g.cell(1, 0).unwrap(), "4");
    }

    #[test]
    fn insert_rejects_bad_position_and_width() {
        let mut g = sample();
        let before = g.clone();
        assert_eq!(g.insert_row(3, g.blank_row()), Err(EditError::row(3)));
        assert!(g.insert_row(0, row(&["short"])).is_err());
        assert!(g.remove_row(2).is_err());
        assert_eq!(g, before);
    }

    #[test]
    fn schema_materializes_once() {
        let mut g = Grid::empty();
        g.materialize_schema(row(&["a", "b"])).unwrap();
        assert!(g.has_schema());
        assert!(g.materialize_schema(row(&["c"])).is_err());
        assert_eq!(g.blank_row(), row(&["", ""]));
    }

    #[test]
    fn schema_cleared_only_when_rowless() {
        let mut g = Grid::with_columns(row(&["a", "b"]));
        g.insert_row(0, row(&["1", "2"])).unwrap();
        assert!(g.clear_schema().is_err());
        g.remove_row(0).unwrap();
        assert_eq!(g.clear_schema().unwrap(), row(&["a", "b"]));
        assert_eq!(g, Grid::empty());
    }
}
