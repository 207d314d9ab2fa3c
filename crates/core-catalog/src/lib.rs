//! Name lookup service behind cell autocompletion.
//!
//! Table models never decide *which* values are valid for a cell; they only
//! decide whether a cell is eligible and then ask a `NameCatalog`. One catalog
//! instance is shared by the scenario and objects models of a session: the
//! objects model feeds it known object names, the scenario model queries it.
//!
//! `StaticCatalog` is the in-process implementation used by the CLI and tests:
//! a fixed command list plus the object names last pushed into it, matched by
//! case-insensitive containment. Smarter ranking (acronyms, fuzzy matching)
//! belongs to richer catalog implementations plugged in through the trait.

use core_grid::Grid;
use core_grid::schema::OBJECTS_COLUMNS;
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;
use tracing::{debug, info};

/// Column of an objects grid holding the user-facing object name.
pub const OBJECT_NAME_COL: usize = 1;

/// Command prefixes accepted into a catalog (framework and extended commands).
pub const COMMAND_PREFIXES: [&str; 2] = ["FWC_", "EC_"];

/// Commands available when no command list is configured.
pub const DEFAULT_COMMANDS: [&str; 12] = [
    "FWC_ClickButton",
    "FWC_SetTextBox",
    "FWC_SetDropdown",
    "FWC_VerifyText",
    "FWC_VerifyButtonExist",
    "FWC_VerifyTextBoxExist",
    "EC_Login",
    "EC_SetTextBox",
    "EC_VerifyCellData",
    "EC_TakeScreenShot",
    "FWC_OpenURL",
    "FWC_WaitForSecond",
];

/// Which list a suggestion query targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SuggestionSource {
    /// Framework command names (scenario command column).
    Commands,
    /// Object names from the objects table (scenario data column).
    Objects,
}

/// Lookup service consumed by table models.
pub trait NameCatalog {
    /// Stable identifier for logs.
    fn name(&self) -> &'static str;
    /// Candidates matching `text`. An empty filter returns the whole list.
    /// Ordering is the catalog's contract; callers do not re-sort.
    fn search(&self, source: SuggestionSource, text: &str) -> Vec<String>;
    /// Replace the known object names with those found in `objects`.
    fn update_known_names(&mut self, objects: &Grid);
}

/// Catalog handle shared between the peer models of one session.
pub type SharedCatalog = Rc<RefCell<dyn NameCatalog>>;

pub fn shared<C: NameCatalog + 'static>(catalog: C) -> SharedCatalog {
    Rc::new(RefCell::new(catalog))
}

/// Catalog that knows nothing; models built without a catalog use it.
#[derive(Debug, Default)]
pub struct NoopCatalog;

impl NameCatalog for NoopCatalog {
    fn name(&self) -> &'static str {
        "noop-catalog"
    }
    fn search(&self, _source: SuggestionSource, _text: &str) -> Vec<String> {
        Vec::new()
    }
    fn update_known_names(&mut self, _objects: &Grid) {}
}

/// Object names in column 1 of an objects grid: trimmed, non-empty, not a
/// header label and not a `---` separator. Sorted and deduplicated.
pub fn object_names(objects: &Grid) -> BTreeSet<String> {
    objects
        .rows()
        .iter()
        .filter_map(|r| r.get(OBJECT_NAME_COL))
        .map(|cell| cell.trim())
        .filter(|name| {
            !name.is_empty()
                && *name != OBJECTS_COLUMNS[0]
                && *name != OBJECTS_COLUMNS[OBJECT_NAME_COL]
                && !name.starts_with("---")
        })
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone)]
pub struct StaticCatalog {
    commands: Vec<String>,
    objects: BTreeSet<String>,
}

impl Default for StaticCatalog {
    fn default() -> Self {
        Self::with_commands(DEFAULT_COMMANDS)
    }
}

impl StaticCatalog {
    /// Catalog over `commands`, keeping declaration order. Entries are trimmed;
    /// blanks, duplicates and names without a known command prefix are dropped.
    pub fn with_commands<I, S>(commands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = BTreeSet::new();
        let mut kept = Vec::new();
        for raw in commands {
            let cmd = raw.as_ref().trim();
            if !COMMAND_PREFIXES.iter().any(|p| cmd.starts_with(p)) {
                debug!(target: "catalog", command = cmd, "command_skipped");
                continue;
            }
            if seen.insert(cmd.to_string()) {
                kept.push(cmd.to_string());
            }
        }
        info!(target: "catalog", commands = kept.len(), "commands_loaded");
        Self {
            commands: kept,
            objects: BTreeSet::new(),
        }
    }

    pub fn commands(&self) -> &[String] {
        &self.commands
    }

    pub fn objects(&self) -> impl Iterator<Item = &str> {
        self.objects.iter().map(String::as_str)
    }
}

impl NameCatalog for StaticCatalog {
    fn name(&self) -> &'static str {
        "static-catalog"
    }

    fn search(&self, source: SuggestionSource, text: &str) -> Vec<String> {
        let needle = text.to_lowercase();
        let matches = |candidate: &&String| candidate.to_lowercase().contains(&needle);
        match source {
            SuggestionSource::Commands => self.commands.iter().filter(matches).cloned().collect(),
            SuggestionSource::Objects => self.objects.iter().filter(matches).cloned().collect(),
        }
    }

    fn update_known_names(&mut self, objects: &Grid) {
        self.objects = object_names(objects);
        info!(target: "catalog", objects = self.objects.len(), "object_names_updated");
    }
}
