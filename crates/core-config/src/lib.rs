//! Configuration loading and parsing.
//!
//! Parses `tsedit.toml` (or an override path supplied by the binary). Every
//! section and key is optional; unknown keys are ignored so the file can grow
//! without breaking older builds. A missing file yields defaults silently; a
//! malformed file yields defaults with a `config` warning.
//!
//! ```toml
//! [identifier]
//! default_abbreviation = "UM"
//! renumber_on_load = false
//!
//! [scenario]
//! extended_columns = false
//!
//! [autocomplete]
//! command_column = 6
//! object_column = 7
//!
//! [catalog]
//! commands = ["FWC_ClickButton", "EC_Login"]
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::{fs, io, path::PathBuf};
use tracing::{info, warn};

pub const CONFIG_FILE_NAME: &str = "tsedit.toml";

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct IdentifierConfig {
    #[serde(default = "IdentifierConfig::default_abbreviation")]
    pub default_abbreviation: String,
    /// Renumber scenario identifiers when a grid is loaded wholesale.
    #[serde(default)]
    pub renumber_on_load: bool,
}

impl Default for IdentifierConfig {
    fn default() -> Self {
        Self {
            default_abbreviation: Self::default_abbreviation(),
            renumber_on_load: false,
        }
    }
}

impl IdentifierConfig {
    fn default_abbreviation() -> String {
        "UM".to_string()
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct ScenarioConfig {
    /// Materialize the 12-column layout (`Data4`, `Data5`) instead of 10.
    #[serde(default)]
    pub extended_columns: bool,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct AutocompleteConfig {
    #[serde(default = "AutocompleteConfig::default_command_column")]
    pub command_column: usize,
    #[serde(default = "AutocompleteConfig::default_object_column")]
    pub object_column: usize,
}

impl Default for AutocompleteConfig {
    fn default() -> Self {
        Self {
            command_column: Self::default_command_column(),
            object_column: Self::default_object_column(),
        }
    }
}

impl AutocompleteConfig {
    const fn default_command_column() -> usize {
        6
    }
    const fn default_object_column() -> usize {
        7
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    /// Command names offered for the command column. `None` keeps the
    /// built-in list.
    #[serde(default)]
    pub commands: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    #[serde(default)]
    pub identifier: IdentifierConfig,
    #[serde(default)]
    pub scenario: ScenarioConfig,
    #[serde(default)]
    pub autocomplete: AutocompleteConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub raw: Option<String>, // original file string (optional)
    pub source: Option<PathBuf>,
    pub file: ConfigFile, // parsed (or default) data
}

/// Best-effort config path following platform conventions (XDG / AppData Roaming).
pub fn discover() -> PathBuf {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("tsedit").join(CONFIG_FILE_NAME);
    }
    PathBuf::from(CONFIG_FILE_NAME)
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Config::default()),
        Err(e) => {
            return Err(e).with_context(|| format!("reading config {}", path.display()));
        }
    };
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => {
            info!(target: "config", path = %path.display(), "config_loaded");
            Ok(Config {
                raw: Some(content),
                source: Some(path),
                file,
            })
        }
        Err(e) => {
            warn!(target: "config", path = %path.display(), error = %e, "config_parse_failed_using_defaults");
            Ok(Config::default())
        }
    }
}

impl Config {
    /// Commands configured for the catalog, if any.
    pub fn commands(&self) -> Option<&[String]> {
        self.file.catalog.commands.as_deref()
    }
}
