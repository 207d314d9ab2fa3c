//! Change notifications emitted by table models.
//!
//! Models are driven synchronously from the UI thread, so notification is a
//! plain observer list: each successful mutating call collects its events and
//! hands them to every registered observer, in registration order, right
//! before it returns. Failed calls emit nothing.
//!
//! Ordering within one call: structural events (`RowsInserted` /
//! `RowsRemoved`) come first, followed by one `CellChanged` per identifier
//! cell the renumbering pass rewrote.

use std::cell::RefCell;
use std::fmt;
use std::ops::RangeInclusive;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableEvent {
    /// A single cell's value changed.
    CellChanged { row: usize, col: usize },
    /// Rows were spliced in; the range names their new indices.
    RowsInserted(RangeInclusive<usize>),
    /// Rows were removed; the range names their former indices.
    RowsRemoved(RangeInclusive<usize>),
    /// Rows and columns were replaced wholesale (`load_data`).
    Reset,
}

impl TableEvent {
    pub fn cell(row: usize, col: usize) -> Self {
        Self::CellChanged { row, col }
    }
    pub fn inserted(row: usize) -> Self {
        Self::RowsInserted(row..=row)
    }
    pub fn removed(row: usize) -> Self {
        Self::RowsRemoved(row..=row)
    }
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::RowsInserted(_) | Self::RowsRemoved(_) | Self::Reset
        )
    }
}

impl fmt::Display for TableEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableEvent::CellChanged { row, col } => write!(f, "cell({row},{col})"),
            TableEvent::RowsInserted(r) => write!(f, "inserted({}..={})", r.start(), r.end()),
            TableEvent::RowsRemoved(r) => write!(f, "removed({}..={})", r.start(), r.end()),
            TableEvent::Reset => f.write_str("reset"),
        }
    }
}

/// Receiver of table notifications. The per-kind hooks default to no-ops so
/// implementors override only what they render.
pub trait TableObserver {
    fn on_cell_changed(&self, _row: usize, _col: usize) {}
    fn on_rows_inserted(&self, _rows: RangeInclusive<usize>) {}
    fn on_rows_removed(&self, _rows: RangeInclusive<usize>) {}
    fn on_reset(&self) {}

    /// Routes an event to the matching hook.
    fn on_event(&self, event: &TableEvent) {
        match event {
            TableEvent::CellChanged { row, col } => self.on_cell_changed(*row, *col),
            TableEvent::RowsInserted(r) => self.on_rows_inserted(r.clone()),
            TableEvent::RowsRemoved(r) => self.on_rows_removed(r.clone()),
            TableEvent::Reset => self.on_reset(),
        }
    }
}

/// Observer that ignores everything.
pub struct NoopObserver;

impl TableObserver for NoopObserver {}

/// Observer recording every event; clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Rc<RefCell<Vec<TableEvent>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn events(&self) -> Vec<TableEvent> {
        self.events.borrow().clone()
    }
    /// Return and forget everything recorded so far.
    pub fn drain(&self) -> Vec<TableEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }
    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }
    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }
}

impl TableObserver for EventLog {
    fn on_event(&self, event: &TableEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}

/// Registered observers of one model.
#[derive(Default)]
pub struct ObserverSet {
    observers: Vec<Box<dyn TableObserver>>,
}

impl ObserverSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, observer: Box<dyn TableObserver>) {
        self.observers.push(observer);
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Deliver a batch to every observer (batch order preserved per observer).
    pub fn notify(&self, events: &[TableEvent]) {
        if events.is_empty() {
            return;
        }
        tracing::trace!(target: "events", count = events.len(), observers = self.observers.len(), "notify");
        for observer in &self.observers {
            for event in events {
                observer.on_event(event);
            }
        }
    }
}

impl fmt::Debug for ObserverSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverSet")
            .field("observers", &self.observers.len())
            .finish()
    }
}
