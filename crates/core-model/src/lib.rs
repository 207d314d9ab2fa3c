//! Editable table models for test-scenario workbooks.
//!
//! A session edits two peer tables:
//!
//! * the **scenario** table, ordered test steps whose `TC` rows carry
//!   identifiers `TC-<ABBR>_AUT<N>` that are renumbered after every structural
//!   change;
//! * the **objects** table, UI element locators whose names feed the shared
//!   completion catalog.
//!
//! Both are a [`TableModel`]; the kind only changes the default new row, the
//! schema materialized on first insert, and whether identifiers are renumbered.
//! A [`Workbook`] owns the pair and the catalog they share.
//!
//! Invariants (hold after every public call):
//! * every row has exactly `column_count()` cells;
//! * after an insert or delete on a scenario table, its `TC` rows are numbered
//!   `1..=k` top to bottom under one abbreviation;
//! * undoing a mutation restores the table cell-for-cell; redo re-applies it;
//! * a failed call leaves table, history and observers untouched.

mod options;
pub mod preset;
mod table;
mod workbook;

pub use core_catalog::{NameCatalog, SharedCatalog, StaticCatalog, SuggestionSource, shared};
pub use core_events::{EventLog, TableEvent, TableObserver};
pub use core_grid::{EditError, EditResult, Grid, TableKind};
pub use options::ModelOptions;
pub use table::TableModel;
pub use workbook::Workbook;
