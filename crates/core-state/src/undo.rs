use core_grid::{EditError, EditResult};
use tracing::trace;

use crate::UndoEntry;

/// Two unbounded stacks of entries, most recent last.
///
/// Transitions:
/// * `record` (any fresh mutation): push onto undo, drop the whole redo stack.
/// * `undo`: pop undo, revert it, push onto redo.
/// * `redo`: pop redo, re-apply it, push onto undo. Redo history survives.
/// * `clear` (wholesale reload): both stacks emptied.
///
/// A failed revert/replay closure puts the popped entry back where it came
/// from, so history and table never disagree.
#[derive(Debug, Default, Clone)]
pub struct UndoEngine {
    undo_stack: Vec<UndoEntry>,
    redo_stack: Vec<UndoEntry>,
}

impl UndoEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }
    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }
    pub fn peek_undo(&self) -> Option<&UndoEntry> {
        self.undo_stack.last()
    }

    pub fn record(&mut self, entry: UndoEntry) {
        trace!(target: "state.undo", op = entry.label(), undo_depth = self.undo_stack.len() + 1, "record");
        self.undo_stack.push(entry);
        if !self.redo_stack.is_empty() {
            self.redo_stack.clear();
            trace!(target: "state.undo", "redo_stack_cleared_on_new_edit");
        }
    }

    /// Pop the newest entry and hand it to `revert`, which undoes it against
    /// the table and returns the entry to keep for redo.
    pub fn undo<F>(&mut self, revert: F) -> EditResult<()>
    where
        F: FnOnce(&UndoEntry) -> EditResult<UndoEntry>,
    {
        let Some(entry) = self.undo_stack.pop() else {
            return Err(EditError::NoOp);
        };
        trace!(target: "state.undo", op = entry.label(), undo_depth = self.undo_stack.len(), redo_depth = self.redo_stack.len(), "undo_pop");
        match revert(&entry) {
            Ok(for_redo) => {
                self.redo_stack.push(for_redo);
                trace!(target: "state.undo", redo_depth = self.redo_stack.len(), "redo_push_from_undo");
                Ok(())
            }
            Err(err) => {
                self.undo_stack.push(entry);
                Err(err)
            }
        }
    }

    /// Pop the newest undone entry and hand it to `replay`, which re-applies it
    /// and returns the entry to keep for undo.
    pub fn redo<F>(&mut self, replay: F) -> EditResult<()>
    where
        F: FnOnce(&UndoEntry) -> EditResult<UndoEntry>,
    {
        let Some(entry) = self.redo_stack.pop() else {
            return Err(EditError::NoOp);
        };
        trace!(target: "state.undo", op = entry.label(), redo_depth = self.redo_stack.len(), undo_depth = self.undo_stack.len(), "redo_pop");
        match replay(&entry) {
            Ok(for_undo) => {
                self.undo_stack.push(for_undo);
                trace!(target: "state.undo", undo_depth = self.undo_stack.len(), "undo_push_from_redo");
                Ok(())
            }
            Err(err) => {
                self.redo_stack.push(entry);
                Err(err)
            }
        }
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        trace!(target: "state.undo", "history_cleared");
    }
}
