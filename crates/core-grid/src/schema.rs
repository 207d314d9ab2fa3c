//! Column roles and default schemas for the two table kinds.

use serde::{Deserialize, Serialize};

/// Column 0 of every row: the row type tag (`TC`, `UCB`, `UCF`, `END`, ...).
pub const TYPE_COL: usize = 0;
/// Column 1 of scenario rows: the structured test-case identifier.
pub const ID_COL: usize = 1;
/// Column 2 of object rows: the locator strategy (`XPATH`, `ID`, ...).
pub const LOCATOR_COL: usize = 2;
/// Scenario column holding the framework command name.
pub const COMMAND_COL: usize = 6;
/// Scenario column holding the first command argument (usually an object name).
pub const DATA1_COL: usize = 7;

/// Row type tag of executable test-case rows.
pub const TEST_CASE_TAG: &str = "TC";
/// Locator default for freshly inserted object rows.
pub const DEFAULT_LOCATOR: &str = "XPATH";

pub const SCENARIO_COLUMNS: [&str; 10] = [
    "Type",
    "ID",
    "Skip",
    "Description",
    "Steps Performed",
    "Expected Results",
    "Command",
    "Data1",
    "Data2",
    "Data3",
];

/// Trailing columns of the 12-column scenario layout.
pub const SCENARIO_EXTRA_COLUMNS: [&str; 2] = ["Data4", "Data5"];

pub const OBJECTS_COLUMNS: [&str; 4] = [
    "Type",
    "User friendly name of Object",
    "By-Type",
    "Webdriver friendly name of Object",
];

/// Which of the two peer tables a grid belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableKind {
    /// Ordered test steps; `TC` rows carry renumbered identifiers.
    Scenario,
    /// UI element locators.
    Objects,
}

impl TableKind {
    /// Column names materialized when the first row lands in a table that has
    /// never had a schema.
    pub fn default_columns(self, extended: bool) -> Vec<String> {
        match self {
            TableKind::Scenario => {
                let mut cols: Vec<String> =
                    SCENARIO_COLUMNS.iter().map(|c| c.to_string()).collect();
                if extended {
                    cols.extend(SCENARIO_EXTRA_COLUMNS.iter().map(|c| c.to_string()));
                }
                cols
            }
            TableKind::Objects => OBJECTS_COLUMNS.iter().map(|c| c.to_string()).collect(),
        }
    }

    /// Pre-filled cell for a new row: `(column, value)`.
    pub fn row_default(self) -> (usize, &'static str) {
        match self {
            TableKind::Scenario => (TYPE_COL, TEST_CASE_TAG),
            TableKind::Objects => (LOCATOR_COL, DEFAULT_LOCATOR),
        }
    }

    /// Whether structural changes re-derive the identifier column.
    pub fn renumbers(self) -> bool {
        matches!(self, TableKind::Scenario)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TableKind::Scenario => "scenario",
            TableKind::Objects => "objects",
        }
    }
}

/// Spreadsheet-style header label: `A`..`Z`, then `Col27`, `Col28`, ...
pub fn column_label(index: usize) -> String {
    if index < 26 {
        char::from(b'A' + index as u8).to_string()
    } else {
        format!("Col{}", index + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_schema_widths() {
        assert_eq!(TableKind::Scenario.default_columns(false).len(), 10);
        let wide = TableKind::Scenario.default_columns(true);
        assert_eq!(wide.len(), 12);
        assert_eq!(wide[10], "Data4");
        assert_eq!(wide[COMMAND_COL], "Command");
        assert_eq!(wide[DATA1_COL], "Data1");
    }

    #[test]
    fn objects_schema_ignores_extension() {
        let cols = TableKind::Objects.default_columns(true);
        assert_eq!(cols.len(), 4);
        assert_eq!(cols[LOCATOR_COL], "By-Type");
    }

    #[test]
    fn labels_switch_after_z() {
        assert_eq!(column_label(0), "A");
        assert_eq!(column_label(25), "Z");
        assert_eq!(column_label(26), "Col27");
    }

    #[test]
    fn kind_serializes_lowercase() {
        assert_eq!(TableKind::Objects.as_str(), "objects");
        assert!(TableKind::Scenario.renumbers());
        assert!(!TableKind::Objects.renumbers());
    }
}
