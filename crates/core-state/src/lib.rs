//! Per-table edit history.
//!
//! Every mutation of a table is described by one `UndoEntry` holding enough
//! data to replay it forward or revert it exactly:
//!
//! * `Edit`   - one cell, with both the previous and the new string;
//! * `Insert` - a row spliced in, with a snapshot of its cells and, for the
//!   first insert into a never-populated table, the schema it installed;
//! * `Delete` - a row removed, with a snapshot of its cells.
//!
//! Structural entries also carry the identifier rewrites produced by the
//! renumbering pass that followed them. Reverting restores those cells first
//! and then undoes the structural change, so the table returns cell-for-cell
//! to its prior state even if its identifiers were not canonical before.
//! Re-applying only performs the structural change; the caller re-runs
//! renumbering and stores the fresh rewrites via `with_rewrites`.
//!
//! Both directions validate indices before touching the grid. A rejected
//! entry leaves the grid unchanged.

use core_grid::schema::ID_COL;
use core_grid::{EditError, EditResult, Grid, Row};
use core_ident::IdRewrite;

pub mod undo;
pub use undo::UndoEngine;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UndoEntry {
    Edit {
        row: usize,
        col: usize,
        old: String,
        new: String,
    },
    Insert {
        row: usize,
        snapshot: Row,
        rewrites: Vec<IdRewrite>,
        /// Columns materialized by this insert, if it was the first one.
        schema: Option<Vec<String>>,
    },
    Delete {
        row: usize,
        snapshot: Row,
        rewrites: Vec<IdRewrite>,
    },
}

impl UndoEntry {
    pub fn label(&self) -> &'static str {
        match self {
            UndoEntry::Edit { .. } => "edit",
            UndoEntry::Insert { .. } => "insert",
            UndoEntry::Delete { .. } => "delete",
        }
    }

    /// Row the entry is anchored at.
    pub fn row(&self) -> usize {
        match self {
            UndoEntry::Edit { row, .. }
            | UndoEntry::Insert { row, .. }
            | UndoEntry::Delete { row, .. } => *row,
        }
    }

    pub fn is_structural(&self) -> bool {
        !matches!(self, UndoEntry::Edit { .. })
    }

    pub fn rewrites(&self) -> &[IdRewrite] {
        match self {
            UndoEntry::Edit { .. } => &[],
            UndoEntry::Insert { rewrites, .. } | UndoEntry::Delete { rewrites, .. } => rewrites,
        }
    }

    /// Same entry with its identifier rewrites replaced (after a replay).
    pub fn with_rewrites(&self, fresh: Vec<IdRewrite>) -> Self {
        match self {
            UndoEntry::Edit { .. } => self.clone(),
            UndoEntry::Insert {
                row,
                snapshot,
                schema,
                ..
            } => UndoEntry::Insert {
                row: *row,
                snapshot: snapshot.clone(),
                rewrites: fresh,
                schema: schema.clone(),
            },
            UndoEntry::Delete { row, snapshot, .. } => UndoEntry::Delete {
                row: *row,
                snapshot: snapshot.clone(),
                rewrites: fresh,
            },
        }
    }

    /// Perform the recorded mutation (without renumbering).
    pub fn apply(&self, grid: &mut Grid) -> EditResult<()> {
        match self {
            UndoEntry::Edit { row, col, new, .. } => {
                grid.set_cell(*row, *col, new.clone())?;
            }
            UndoEntry::Insert {
                row,
                snapshot,
                schema,
                ..
            } => {
                if let Some(columns) = schema
                    && !grid.has_schema()
                {
                    grid.materialize_schema(columns.clone())?;
                }
                grid.insert_row(*row, snapshot.clone())?;
            }
            UndoEntry::Delete { row, .. } => {
                grid.remove_row(*row)?;
            }
        }
        Ok(())
    }

    /// Undo the recorded mutation, restoring identifier cells first.
    pub fn revert(&self, grid: &mut Grid) -> EditResult<()> {
        match self {
            UndoEntry::Edit { row, col, old, .. } => {
                grid.set_cell(*row, *col, old.clone())?;
            }
            UndoEntry::Insert {
                row,
                rewrites,
                schema,
                ..
            } => {
                if *row >= grid.row_count() {
                    return Err(EditError::row(*row));
                }
                restore_identifiers(grid, rewrites)?;
                grid.remove_row(*row)?;
                if schema.is_some() && grid.is_empty() {
                    grid.clear_schema()?;
                }
            }
            UndoEntry::Delete { row, snapshot, rewrites } => {
                if *row > grid.row_count() || snapshot.len() != grid.column_count() {
                    return Err(EditError::row(*row));
                }
                restore_identifiers(grid, rewrites)?;
                grid.insert_row(*row, snapshot.clone())?;
            }
        }
        Ok(())
    }
}

fn restore_identifiers(grid: &mut Grid, rewrites: &[IdRewrite]) -> EditResult<()> {
    if let Some(bad) = rewrites
        .iter()
        .find(|rw| grid.cell(rw.row, ID_COL).is_err())
    {
        return Err(EditError::cell(bad.row, ID_COL));
    }
    for rw in rewrites.iter().rev() {
        grid.set_cell(rw.row, ID_COL, rw.old.clone())?;
    }
    Ok(())
}
