//! Failure taxonomy shared by every table operation.
//!
//! All variants are local and recoverable: an operation that reports one of
//! these has not touched the table. `NoOp` is informational (undo/redo with an
//! empty history) and callers usually treat it as "nothing happened" rather
//! than surfacing it to the user.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    /// Row or column index outside the current bounds. `col` is `None` for
    /// row-level operations (insert/delete).
    #[error("index out of range (row {row}, column {col:?})")]
    OutOfRange { row: usize, col: Option<usize> },
    /// Row/column shape disagreement. Unreachable through the public model
    /// API; surfaces only from malformed imports.
    #[error("inconsistent table shape: {0}")]
    InvalidState(String),
    /// Undo/redo requested with an empty history.
    #[error("nothing to do")]
    NoOp,
}

impl EditError {
    pub fn row(row: usize) -> Self {
        Self::OutOfRange { row, col: None }
    }

    pub fn cell(row: usize, col: usize) -> Self {
        Self::OutOfRange {
            row,
            col: Some(col),
        }
    }

    pub fn is_noop(&self) -> bool {
        matches!(self, Self::NoOp)
    }
}

pub type EditResult<T> = Result<T, EditError>;
