//! Edit scripts replayed against a workbook by `tsedit apply`.
//!
//! One command per line; blank lines and `#` comments are skipped. A leading
//! `scenario:` or `objects:` picks the table (scenario when omitted).
//!
//! ```text
//! insert 3
//! set 3 4 Open the reports page
//! objects: insert 1
//! undo
//! ```

use anyhow::{Context, Result};
use core_grid::TableKind;
use core_model::{EditError, Workbook};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Insert(usize),
    Delete(usize),
    Set { row: usize, col: usize, value: String },
    Undo,
    Redo,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub line: usize,
    pub table: TableKind,
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScriptError {
    #[error("line {line}: unknown command `{word}`")]
    UnknownCommand { line: usize, word: String },
    #[error("line {line}: `{command}` expects {expected}")]
    MissingArgument {
        line: usize,
        command: &'static str,
        expected: &'static str,
    },
    #[error("line {line}: `{text}` is not a row or column index")]
    BadIndex { line: usize, text: String },
    #[error("line {line}: unexpected trailing input `{rest}`")]
    Trailing { line: usize, rest: String },
}

/// Split off the first whitespace-delimited token.
fn next_token(input: &str) -> Option<(&str, &str)> {
    let input = input.trim_start();
    if input.is_empty() {
        return None;
    }
    Some(match input.find(char::is_whitespace) {
        Some(at) => (&input[..at], &input[at..]),
        None => (input, ""),
    })
}

fn index<'a>(
    line: usize,
    command: &'static str,
    expected: &'static str,
    input: &'a str,
) -> Result<(usize, &'a str), ScriptError> {
    let (text, rest) = next_token(input).ok_or(ScriptError::MissingArgument {
        line,
        command,
        expected,
    })?;
    let value = text.parse::<usize>().map_err(|_| ScriptError::BadIndex {
        line,
        text: text.to_string(),
    })?;
    Ok((value, rest))
}

fn finish(line: usize, rest: &str) -> Result<(), ScriptError> {
    let rest = rest.trim();
    if rest.is_empty() {
        Ok(())
    } else {
        Err(ScriptError::Trailing {
            line,
            rest: rest.to_string(),
        })
    }
}

fn parse_line(line: usize, text: &str) -> Result<Option<Step>, ScriptError> {
    let text = text.trim();
    if text.is_empty() || text.starts_with('#') {
        return Ok(None);
    }
    let (table, body) = if let Some(rest) = text.strip_prefix("scenario:") {
        (TableKind::Scenario, rest)
    } else if let Some(rest) = text.strip_prefix("objects:") {
        (TableKind::Objects, rest)
    } else {
        (TableKind::Scenario, text)
    };
    let Some((word, rest)) = next_token(body) else {
        return Err(ScriptError::UnknownCommand {
            line,
            word: String::new(),
        });
    };
    let command = match word.to_ascii_lowercase().as_str() {
        "insert" => {
            let (row, rest) = index(line, "insert", "a row index", rest)?;
            finish(line, rest)?;
            Command::Insert(row)
        }
        "delete" => {
            let (row, rest) = index(line, "delete", "a row index", rest)?;
            finish(line, rest)?;
            Command::Delete(row)
        }
        "set" => {
            let (row, rest) = index(line, "set", "a row, a column and a value", rest)?;
            let (col, rest) = index(line, "set", "a row, a column and a value", rest)?;
            Command::Set {
                row,
                col,
                value: rest.trim().to_string(),
            }
        }
        "undo" => {
            finish(line, rest)?;
            Command::Undo
        }
        "redo" => {
            finish(line, rest)?;
            Command::Redo
        }
        _ => {
            return Err(ScriptError::UnknownCommand {
                line,
                word: word.to_string(),
            });
        }
    };
    Ok(Some(Step {
        line,
        table,
        command,
    }))
}

/// Parse a whole script; the first bad line aborts with its 1-based number.
pub fn parse(text: &str) -> Result<Vec<Step>, ScriptError> {
    let mut steps = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        if let Some(step) = parse_line(idx + 1, raw)? {
            steps.push(step);
        }
    }
    Ok(steps)
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub applied: usize,
    /// Undo/redo steps that found nothing to do.
    pub noops: usize,
}

/// Replay `steps` in order. Empty-history undo/redo is counted and skipped;
/// any other failure stops the run at that line.
pub fn run(workbook: &mut Workbook, steps: &[Step]) -> Result<RunSummary> {
    let mut summary = RunSummary::default();
    for step in steps {
        let model = workbook.model_mut(step.table);
        let outcome = match &step.command {
            Command::Insert(row) => model.insert_row(*row),
            Command::Delete(row) => model.delete_row(*row),
            Command::Set { row, col, value } => model.set_cell(*row, *col, value.as_str()),
            Command::Undo => model.undo(),
            Command::Redo => model.redo(),
        };
        match outcome {
            Ok(()) => summary.applied += 1,
            Err(EditError::NoOp) => {
                warn!(target: "runtime", line = step.line, table = step.table.as_str(), "nothing_to_do");
                summary.noops += 1;
            }
            Err(err) => {
                return Err(err).with_context(|| {
                    format!("line {} ({} table)", step.line, step.table.as_str())
                });
            }
        }
    }
    workbook.objects().refresh_catalog();
    info!(target: "runtime", applied = summary.applied, noops = summary.noops, "script_applied");
    Ok(summary)
}
