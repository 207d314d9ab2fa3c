use core_config::ConfigFile;
use core_grid::schema::{COMMAND_COL, DATA1_COL};
use core_ident::{DEFAULT_ABBREVIATION, RenumberPolicy};

/// Per-session knobs shared by both table models.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelOptions {
    pub default_abbreviation: String,
    /// Renumber scenario identifiers on `load_data` (off: loads are trusted).
    pub renumber_on_load: bool,
    /// Use the 12-column scenario layout when materializing a schema.
    pub extended_columns: bool,
    pub command_column: usize,
    pub object_column: usize,
}

impl Default for ModelOptions {
    fn default() -> Self {
        Self {
            default_abbreviation: DEFAULT_ABBREVIATION.to_string(),
            renumber_on_load: false,
            extended_columns: false,
            command_column: COMMAND_COL,
            object_column: DATA1_COL,
        }
    }
}

impl ModelOptions {
    pub fn policy(&self) -> RenumberPolicy {
        RenumberPolicy::new(self.default_abbreviation.as_str())
    }
}

impl From<&ConfigFile> for ModelOptions {
    fn from(file: &ConfigFile) -> Self {
        Self {
            default_abbreviation: file.identifier.default_abbreviation.clone(),
            renumber_on_load: file.identifier.renumber_on_load,
            extended_columns: file.scenario.extended_columns,
            command_column: file.autocomplete.command_column,
            object_column: file.autocomplete.object_column,
        }
    }
}
