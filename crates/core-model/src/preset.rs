//! Starter content and file naming for a new test module.
//!
//! A module is a pair of workbooks: the scenario suite under `testSuites/` and
//! its object repository under `objectRepositories/`, tied together by the
//! module name embedded in both file names.

use core_grid::schema::{SCENARIO_COLUMNS, SCENARIO_EXTRA_COLUMNS};
use core_grid::{Grid, Row};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

pub const TEST_SUITES_DIR: &str = "testSuites";
pub const OBJECT_REPOSITORIES_DIR: &str = "objectRepositories";

static SCENARIO_FILE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Automation_Module_([^./\\]+)\.(?:xlsx|json)$").expect("valid scenario file regex")
});

pub fn scenario_file_name(module: &str) -> String {
    format!("Automation_Module_{module}.xlsx")
}

pub fn objects_file_name(module: &str) -> String {
    format!("ObjRep_Module_{module}_Test.xlsx")
}

/// Module name embedded in a scenario workbook path, if it follows the
/// `Automation_Module_<name>.xlsx` convention (or its `.json` export).
pub fn module_name_from_path(path: &Path) -> Option<String> {
    let file = path.file_name()?.to_str()?;
    SCENARIO_FILE_RE
        .captures(file)
        .map(|caps| caps[1].to_string())
}

/// Two-letter identifier abbreviation: ASCII letters only, uppercased.
/// `None` when `raw` holds no letters at all.
pub fn normalize_abbreviation(raw: &str) -> Option<String> {
    let abbr: String = raw
        .chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_uppercase())
        .take(2)
        .collect();
    (!abbr.is_empty()).then_some(abbr)
}

/// Where the two workbooks of a module live under a project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModulePaths {
    pub scenario: PathBuf,
    pub objects: PathBuf,
}

impl ModulePaths {
    pub fn new(root: &Path, module: &str) -> Self {
        Self {
            scenario: root.join(TEST_SUITES_DIR).join(scenario_file_name(module)),
            objects: root
                .join(OBJECT_REPOSITORIES_DIR)
                .join(objects_file_name(module)),
        }
    }

    /// Paths for the module a scenario workbook belongs to. The objects file
    /// is looked up in the sibling `objectRepositories/` directory, with the
    /// scenario file's extension.
    pub fn for_scenario(scenario: &Path) -> Option<Self> {
        let module = module_name_from_path(scenario)?;
        let suites = scenario.parent()?;
        let root = suites.parent().unwrap_or(Path::new(""));
        let mut objects = root
            .join(OBJECT_REPOSITORIES_DIR)
            .join(objects_file_name(&module));
        if let Some(ext) = scenario.extension() {
            objects.set_extension(ext);
        }
        Some(Self {
            scenario: scenario.to_path_buf(),
            objects,
        })
    }

    /// Same locations with both extensions replaced.
    pub fn with_extension(&self, ext: &str) -> Self {
        Self {
            scenario: self.scenario.with_extension(ext),
            objects: self.objects.with_extension(ext),
        }
    }
}

fn row<const N: usize>(cells: [&str; N], width: usize) -> Row {
    let mut row: Row = cells.iter().map(|c| c.to_string()).collect();
    row.resize(width, String::new());
    row
}

/// Scenario workbook for a fresh module: header, use-case begin marker, five
/// test-case steps, use-case finish marker and `END`. Twelve positional
/// columns, the header row spelling out the extended layout.
pub fn scenario_preset(module: &str, abbreviation: &str) -> Grid {
    let width = SCENARIO_COLUMNS.len() + SCENARIO_EXTRA_COLUMNS.len();
    let header: Row = SCENARIO_COLUMNS
        .iter()
        .chain(SCENARIO_EXTRA_COLUMNS.iter())
        .map(|c| c.to_string())
        .collect();
    let id = |n: u32| format!("TC-{abbreviation}_AUT{n}");
    let scripts = format!("{module} Test Scripts");
    let results = format!("{module} Test Results");
    let rows = vec![
        header,
        row(["UCB", module, "", &scripts], width),
        row(
            [
                "TC",
                &id(1),
                "",
                "Test Scripts",
                "Launch Application And Login",
                "A successful login should happen.",
                "StartAppWithLogin",
            ],
            width,
        ),
        row(["TC", &id(2), "", "", "Scenario Started", "", "StartScenario"], width),
        row(["TC", &id(3)], width),
        row(["TC", &id(4), "", "", "Scenario Ended", "", "EndScenario"], width),
        row(
            ["TC", &id(5), "", "Test Scripts", "Close Application", "", "StopApp"],
            width,
        ),
        row(["UCF", module, "", &results], width),
        row(["END"], width),
    ];
    Grid::from_ragged(rows)
}

/// Object repository for a fresh module: header, one example locator, `END`.
pub fn objects_preset() -> Grid {
    Grid::from_ragged(vec![
        row(
            [
                "Type",
                "User friendly name of Object",
                "By-Type",
                "Webdriver friendly name of Object",
            ],
            4,
        ),
        row(["Link", "lnkAdmin", "XPATH", "//*[@id=\"page-admin\"]"], 4),
        row(["END"], 4),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_grid::schema::ID_COL;
    use pretty_assertions::assert_eq;

    #[test]
    fn abbreviation_normalized() {
        assert_eq!(normalize_abbreviation("qs"), Some("QS".to_string()));
        assert_eq!(normalize_abbreviation("quick"), Some("QU".to_string()));
        assert_eq!(normalize_abbreviation("a-1b"), Some("AB".to_string()));
        assert_eq!(normalize_abbreviation("x"), Some("X".to_string()));
        assert_eq!(normalize_abbreviation(" 12 "), None);
    }

    #[test]
    fn file_names_round_trip_module() {
        let paths = ModulePaths::new(Path::new("proj"), "QuickSanity");
        assert_eq!(
            paths.scenario,
            Path::new("proj/testSuites/Automation_Module_QuickSanity.xlsx")
        );
        assert_eq!(
            paths.objects,
            Path::new("proj/objectRepositories/ObjRep_Module_QuickSanity_Test.xlsx")
        );
        assert_eq!(
            module_name_from_path(&paths.scenario),
            Some("QuickSanity".to_string())
        );
        assert_eq!(ModulePaths::for_scenario(&paths.scenario), Some(paths.clone()));

        let json = paths.with_extension("json");
        assert_eq!(
            json.objects,
            Path::new("proj/objectRepositories/ObjRep_Module_QuickSanity_Test.json")
        );
        assert_eq!(module_name_from_path(&json.scenario), Some("QuickSanity".to_string()));
        assert_eq!(ModulePaths::for_scenario(&json.scenario), Some(json));
    }

    #[test]
    fn unrelated_file_has_no_module() {
        assert_eq!(module_name_from_path(Path::new("suite.xlsx")), None);
        assert_eq!(module_name_from_path(Path::new("Automation_Module_.xlsx")), None);
        assert!(ModulePaths::for_scenario(Path::new("notes.txt")).is_none());
    }

    #[test]
    fn scenario_preset_shape() {
        let g = scenario_preset("QuickSanity", "QS");
        assert_eq!(g.column_count(), 12);
        assert_eq!(g.row_count(), 9);
        assert_eq!(g.columns()[0], "0");
        assert_eq!(g.cell(0, 10).unwrap(), "Data4");
        assert_eq!(g.cell(1, 0).unwrap(), "UCB");
        let ids: Vec<_> = (2..7).map(|r| g.cell(r, ID_COL).unwrap()).collect();
        assert_eq!(
            ids,
            vec!["TC-QS_AUT1", "TC-QS_AUT2", "TC-QS_AUT3", "TC-QS_AUT4", "TC-QS_AUT5"]
        );
        assert_eq!(g.cell(8, 0).unwrap(), "END");
    }

    #[test]
    fn objects_preset_shape() {
        let g = objects_preset();
        assert_eq!(g.column_count(), 4);
        assert_eq!(g.cell(1, 1).unwrap(), "lnkAdmin");
        assert_eq!(g.cell(1, 2).unwrap(), "XPATH");
    }
}
