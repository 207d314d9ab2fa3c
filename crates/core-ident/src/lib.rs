//! Test-case identifier renumbering.
//!
//! Scenario tables tag executable steps with `TC` in the type column and give
//! each one an identifier of the form `TC-<ABBR>_AUT<N>`. After any structural
//! change the identifiers are re-derived from scratch:
//!
//! 1. collect every `TC` row top to bottom;
//! 2. take the module abbreviation from the first row whose identifier parses
//!    (falling back to the policy default, `UM`);
//! 3. number the collected rows `1..=k` in row order, ignoring whatever numbers
//!    they carried before;
//! 4. rewrite only the cells whose value actually changes.
//!
//! The result depends only on the row types and the first parseable
//! abbreviation, never on prior numbering, so running it twice is a no-op and
//! no sequence of inserts/deletes can leave gaps or duplicates.
//!
//! Rows with any other type tag (`UCB`, `UCF`, `END`, header rows) are never
//! read or written.

use core_grid::Grid;
use core_grid::schema::{ID_COL, TEST_CASE_TAG, TYPE_COL};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;
use tracing::{debug, trace};

/// Abbreviation used when no `TC` row carries a parseable identifier.
pub const DEFAULT_ABBREVIATION: &str = "UM";

static ID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^TC-([A-Z]+)_AUT(\d+)$").expect("identifier pattern compiles")
});

/// A parsed `TC-<ABBR>_AUT<N>` identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier {
    pub abbreviation: String,
    pub number: u64,
}

impl Identifier {
    pub fn new(abbreviation: impl Into<String>, number: u64) -> Self {
        Self {
            abbreviation: abbreviation.into(),
            number,
        }
    }

    /// Parse an identifier cell. Numbers too large for `u64` saturate; only the
    /// abbreviation matters to renumbering.
    pub fn parse(text: &str) -> Option<Self> {
        let caps = ID_PATTERN.captures(text)?;
        let abbreviation = caps.get(1)?.as_str().to_string();
        let number = caps.get(2)?.as_str().parse().unwrap_or(u64::MAX);
        Some(Self {
            abbreviation,
            number,
        })
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TC-{}_AUT{}", self.abbreviation, self.number)
    }
}

/// A `TC` row found during the scan, with its identifier if it parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCaseRow {
    pub row: usize,
    pub parsed: Option<Identifier>,
}

/// One identifier cell rewrite produced by a renumbering pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdRewrite {
    pub row: usize,
    pub old: String,
    pub new: String,
}

/// Collect `TC` rows in row order. Grids too narrow to hold an identifier
/// column yield nothing.
pub fn scan(grid: &Grid) -> Vec<TestCaseRow> {
    if grid.column_count() <= ID_COL {
        return Vec::new();
    }
    grid.rows()
        .iter()
        .enumerate()
        .filter(|(_, r)| r[TYPE_COL] == TEST_CASE_TAG)
        .map(|(row, r)| TestCaseRow {
            row,
            parsed: Identifier::parse(&r[ID_COL]),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenumberPolicy {
    default_abbreviation: String,
}

impl Default for RenumberPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_ABBREVIATION)
    }
}

impl RenumberPolicy {
    pub fn new(default_abbreviation: impl Into<String>) -> Self {
        Self {
            default_abbreviation: default_abbreviation.into(),
        }
    }

    pub fn default_abbreviation(&self) -> &str {
        &self.default_abbreviation
    }

    /// Abbreviation of the first parseable `TC` identifier, else the default.
    pub fn module_abbreviation(&self, rows: &[TestCaseRow]) -> String {
        rows.iter()
            .find_map(|r| r.parsed.as_ref())
            .map(|id| id.abbreviation.clone())
            .unwrap_or_else(|| self.default_abbreviation.clone())
    }

    /// Compute the rewrites a renumbering pass would make, without mutating.
    pub fn plan(&self, grid: &Grid) -> Vec<IdRewrite> {
        let tc_rows = scan(grid);
        if tc_rows.is_empty() {
            return Vec::new();
        }
        let abbreviation = self.module_abbreviation(&tc_rows);
        tc_rows
            .iter()
            .zip(1u64..)
            .filter_map(|(tc, number)| {
                let new = Identifier::new(abbreviation.as_str(), number).to_string();
                let old = &grid.rows()[tc.row][ID_COL];
                (*old != new).then(|| IdRewrite {
                    row: tc.row,
                    old: old.clone(),
                    new,
                })
            })
            .collect()
    }

    /// Renumber in place, returning the cells that changed (in row order).
    pub fn apply(&self, grid: &mut Grid) -> Vec<IdRewrite> {
        let rewrites = self.plan(grid);
        for rw in &rewrites {
            // Rows come from `scan` over this same grid, so the write cannot miss.
            if grid.set_cell(rw.row, ID_COL, rw.new.clone()).is_err() {
                debug!(target: "ident", row = rw.row, "rewrite_target_missing");
            }
        }
        trace!(target: "ident", rewritten = rewrites.len(), "renumbered");
        rewrites
    }
}
