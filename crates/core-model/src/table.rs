use core_catalog::{NoopCatalog, SharedCatalog, SuggestionSource, shared};
use core_events::{ObserverSet, TableEvent, TableObserver};
use core_grid::schema::{ID_COL, TEST_CASE_TAG, TYPE_COL};
use core_grid::{EditError, EditResult, Grid, Row, TableKind};
use core_ident::{IdRewrite, RenumberPolicy};
use core_state::{UndoEngine, UndoEntry};
use tracing::{debug, trace};

use crate::ModelOptions;

/// Editable table with undo/redo and identifier maintenance.
///
/// One type serves both peer tables; `kind` selects the new-row default, the
/// schema materialized on first insert, and whether structural changes
/// renumber `TC` identifiers.
pub struct TableModel {
    kind: TableKind,
    grid: Grid,
    history: UndoEngine,
    policy: RenumberPolicy,
    options: ModelOptions,
    catalog: SharedCatalog,
    observers: ObserverSet,
}

impl std::fmt::Debug for TableModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableModel")
            .field("kind", &self.kind)
            .field("rows", &self.grid.row_count())
            .field("columns", &self.grid.column_count())
            .field("undo_depth", &self.history.undo_depth())
            .field("redo_depth", &self.history.redo_depth())
            .finish()
    }
}

impl TableModel {
    /// Empty table (no schema, no rows).
    pub fn new(kind: TableKind, options: ModelOptions, catalog: SharedCatalog) -> Self {
        Self {
            kind,
            grid: Grid::empty(),
            history: UndoEngine::new(),
            policy: options.policy(),
            options,
            catalog,
            observers: ObserverSet::new(),
        }
    }

    /// Empty table with default options and no catalog.
    pub fn standalone(kind: TableKind) -> Self {
        Self::new(kind, ModelOptions::default(), shared(NoopCatalog))
    }

    /// Table seeded from an import; same semantics as `load_data` minus the
    /// reset notification (nobody can be subscribed yet).
    pub fn with_data(
        kind: TableKind,
        grid: Grid,
        options: ModelOptions,
        catalog: SharedCatalog,
    ) -> Self {
        let mut model = Self::new(kind, options, catalog);
        model.replace_grid(grid);
        model
    }

    pub fn kind(&self) -> TableKind {
        self.kind
    }
    pub fn grid(&self) -> &Grid {
        &self.grid
    }
    pub fn options(&self) -> &ModelOptions {
        &self.options
    }
    pub fn row_count(&self) -> usize {
        self.grid.row_count()
    }
    pub fn column_count(&self) -> usize {
        self.grid.column_count()
    }
    pub fn columns(&self) -> &[String] {
        self.grid.columns()
    }
    pub fn undo_depth(&self) -> usize {
        self.history.undo_depth()
    }
    pub fn redo_depth(&self) -> usize {
        self.history.redo_depth()
    }
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }
    pub fn catalog(&self) -> &SharedCatalog {
        &self.catalog
    }

    pub fn subscribe(&mut self, observer: Box<dyn TableObserver>) {
        self.observers.subscribe(observer);
    }

    pub fn cell_value(&self, row: usize, col: usize) -> EditResult<&str> {
        self.grid.cell(row, col)
    }

    /// Overwrite one cell. Never renumbers, even when the type or identifier
    /// column is edited.
    pub fn set_cell(&mut self, row: usize, col: usize, value: impl Into<String>) -> EditResult<()> {
        let value = value.into();
        let old = match self.grid.set_cell(row, col, value.clone()) {
            Ok(old) => old,
            Err(err) => {
                debug!(target: "model", kind = self.kind.as_str(), row, col, "set_cell_rejected");
                return Err(err);
            }
        };
        self.history.record(UndoEntry::Edit {
            row,
            col,
            old,
            new: value,
        });
        self.observers.notify(&[TableEvent::cell(row, col)]);
        Ok(())
    }

    /// Insert a default row at `position` (`0..=row_count`).
    ///
    /// A table that has never had a schema first materializes the kind's
    /// default columns and always inserts at 0, whatever `position` says.
    pub fn insert_row(&mut self, position: usize) -> EditResult<()> {
        let materialize = !self.grid.has_schema() && self.grid.is_empty();
        let position = if materialize { 0 } else { position };
        if position > self.grid.row_count() {
            debug!(target: "model", kind = self.kind.as_str(), position, rows = self.grid.row_count(), "insert_rejected");
            return Err(EditError::row(position));
        }
        let schema = if materialize {
            let columns = self.kind.default_columns(self.options.extended_columns);
            self.grid.materialize_schema(columns.clone())?;
            Some(columns)
        } else {
            None
        };
        let row = self.default_row();
        self.grid.insert_row(position, row.clone())?;
        let rewrites = self.renumber();
        let mut events = vec![TableEvent::inserted(position)];
        events.extend(rewrite_events(&rewrites));
        self.history.record(UndoEntry::Insert {
            row: position,
            snapshot: row,
            rewrites,
            schema,
        });
        trace!(target: "model", kind = self.kind.as_str(), position, materialize, rows = self.grid.row_count(), "row_inserted");
        self.observers.notify(&events);
        Ok(())
    }

    /// Remove the row at `position` (`0..row_count`). The schema survives even
    /// when the last row goes.
    pub fn delete_row(&mut self, position: usize) -> EditResult<()> {
        let snapshot = match self.grid.remove_row(position) {
            Ok(row) => row,
            Err(err) => {
                debug!(target: "model", kind = self.kind.as_str(), position, rows = self.grid.row_count(), "delete_rejected");
                return Err(err);
            }
        };
        let rewrites = self.renumber();
        let mut events = vec![TableEvent::removed(position)];
        events.extend(rewrite_events(&rewrites));
        self.history.record(UndoEntry::Delete {
            row: position,
            snapshot,
            rewrites,
        });
        trace!(target: "model", kind = self.kind.as_str(), position, rows = self.grid.row_count(), "row_deleted");
        self.observers.notify(&events);
        Ok(())
    }

    /// Revert the newest recorded mutation. `Err(EditError::NoOp)` when there
    /// is nothing to undo.
    pub fn undo(&mut self) -> EditResult<()> {
        let grid = &mut self.grid;
        let mut events = Vec::new();
        self.history.undo(|entry| {
            entry.revert(grid)?;
            events = revert_events(entry);
            Ok(entry.clone())
        })?;
        trace!(target: "model", kind = self.kind.as_str(), undo_depth = self.history.undo_depth(), "undo");
        self.observers.notify(&events);
        Ok(())
    }

    /// Re-apply the newest undone mutation, renumbering after structural
    /// entries exactly as the original call did. `Err(EditError::NoOp)` when
    /// there is nothing to redo.
    pub fn redo(&mut self) -> EditResult<()> {
        let grid = &mut self.grid;
        let policy = &self.policy;
        let renumbers = self.kind.renumbers();
        let mut events = Vec::new();
        self.history.redo(|entry| {
            entry.apply(grid)?;
            let rewrites = if renumbers && entry.is_structural() {
                policy.apply(grid)
            } else {
                Vec::new()
            };
            events = apply_events(entry, &rewrites);
            Ok(entry.with_rewrites(rewrites))
        })?;
        trace!(target: "model", kind = self.kind.as_str(), redo_depth = self.history.redo_depth(), "redo");
        self.observers.notify(&events);
        Ok(())
    }

    /// Replace rows and columns wholesale and forget all history.
    ///
    /// Identifiers are trusted as loaded unless `renumber_on_load` is set.
    /// An objects table pushes its names into the shared catalog.
    pub fn load_data(&mut self, grid: Grid) {
        self.replace_grid(grid);
        self.observers.notify(&[TableEvent::Reset]);
    }

    /// Current contents as a rectangular grid of strings.
    pub fn export(&self) -> Vec<Vec<String>> {
        self.grid.to_rows()
    }

    /// Which catalog list serves `(row, col)`: only the command and object
    /// columns of `TC` rows in a scenario table are eligible.
    pub fn suggestion_source(&self, row: usize, col: usize) -> Option<SuggestionSource> {
        if self.kind != TableKind::Scenario {
            return None;
        }
        let source = if col == self.options.command_column {
            SuggestionSource::Commands
        } else if col == self.options.object_column {
            SuggestionSource::Objects
        } else {
            return None;
        };
        self.grid.cell(row, col).ok()?;
        (self.grid.cell(row, TYPE_COL).ok()? == TEST_CASE_TAG).then_some(source)
    }

    /// Whether the UI should offer (and highlight) completion for a cell.
    pub fn is_autocomplete_cell(&self, row: usize, col: usize) -> bool {
        self.suggestion_source(row, col).is_some()
    }

    /// Candidates for `(row, col)` filtered by `filter`, exactly as the catalog
    /// returns them. Ineligible cells yield nothing.
    pub fn suggestions(&self, row: usize, col: usize, filter: &str) -> Vec<String> {
        match self.suggestion_source(row, col) {
            Some(source) => self.catalog.borrow().search(source, filter),
            None => Vec::new(),
        }
    }

    /// Push this table's object names into the catalog (objects tables only).
    pub fn refresh_catalog(&self) {
        if self.kind == TableKind::Objects {
            self.catalog.borrow_mut().update_known_names(&self.grid);
        }
    }

    fn replace_grid(&mut self, grid: Grid) {
        self.grid = grid;
        self.history.clear();
        let rewritten = if self.options.renumber_on_load {
            self.renumber().len()
        } else {
            0
        };
        self.refresh_catalog();
        debug!(target: "model", kind = self.kind.as_str(), rows = self.grid.row_count(), columns = self.grid.column_count(), rewritten, "data_loaded");
    }

    fn default_row(&self) -> Row {
        let mut row = self.grid.blank_row();
        if row.len() > 2 {
            let (col, value) = self.kind.row_default();
            row[col] = value.to_string();
        }
        row
    }

    fn renumber(&mut self) -> Vec<IdRewrite> {
        if self.kind.renumbers() {
            self.policy.apply(&mut self.grid)
        } else {
            Vec::new()
        }
    }
}

fn rewrite_events(rewrites: &[IdRewrite]) -> impl Iterator<Item = TableEvent> + '_ {
    rewrites.iter().map(|rw| TableEvent::cell(rw.row, ID_COL))
}

/// Events for a forward application; rewrite rows are already final indices.
fn apply_events(entry: &UndoEntry, rewrites: &[IdRewrite]) -> Vec<TableEvent> {
    let mut events = match entry {
        UndoEntry::Edit { row, col, .. } => vec![TableEvent::cell(*row, *col)],
        UndoEntry::Insert { row, .. } => vec![TableEvent::inserted(*row)],
        UndoEntry::Delete { row, .. } => vec![TableEvent::removed(*row)],
    };
    events.extend(rewrite_events(rewrites));
    events
}

/// Events for a revert. Restored identifier rows were recorded against the
/// post-operation layout, so shift them to where they sit after the revert.
fn revert_events(entry: &UndoEntry) -> Vec<TableEvent> {
    match entry {
        UndoEntry::Edit { row, col, .. } => vec![TableEvent::cell(*row, *col)],
        UndoEntry::Insert { row, rewrites, .. } => {
            let mut events = vec![TableEvent::removed(*row)];
            events.extend(rewrites.iter().filter(|rw| rw.row != *row).map(|rw| {
                let at = if rw.row > *row { rw.row - 1 } else { rw.row };
                TableEvent::cell(at, ID_COL)
            }));
            events
        }
        UndoEntry::Delete { row, rewrites, .. } => {
            let mut events = vec![TableEvent::inserted(*row)];
            events.extend(rewrites.iter().map(|rw| {
                let at = if rw.row >= *row { rw.row + 1 } else { rw.row };
                TableEvent::cell(at, ID_COL)
            }));
            events
        }
    }
}
