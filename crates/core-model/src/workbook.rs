use core_catalog::{SharedCatalog, StaticCatalog, shared};
use core_config::Config;
use core_grid::{Grid, TableKind};
use tracing::info;

use crate::preset::{normalize_abbreviation, objects_preset, scenario_preset};
use crate::{ModelOptions, TableModel};

/// The two peer tables of one editing session plus the catalog they share.
///
/// Each table keeps its own history; an undo in one never touches the other.
/// The only coupling is the catalog: the objects table feeds it names, the
/// scenario table reads them for completion.
pub struct Workbook {
    scenario: TableModel,
    objects: TableModel,
    catalog: SharedCatalog,
    module: Option<String>,
}

impl std::fmt::Debug for Workbook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workbook")
            .field("module", &self.module)
            .field("scenario", &self.scenario)
            .field("objects", &self.objects)
            .field("catalog", &self.catalog.borrow().name())
            .finish()
    }
}

impl Workbook {
    /// Two empty tables sharing `catalog`.
    pub fn new(options: ModelOptions, catalog: SharedCatalog) -> Self {
        Self {
            scenario: TableModel::new(TableKind::Scenario, options.clone(), catalog.clone()),
            objects: TableModel::new(TableKind::Objects, options, catalog.clone()),
            catalog,
            module: None,
        }
    }

    /// Empty workbook wired from a loaded config: options from its sections,
    /// a `StaticCatalog` over the configured (or built-in) commands.
    pub fn from_config(config: &Config) -> Self {
        let catalog = match config.commands() {
            Some(commands) => StaticCatalog::with_commands(commands),
            None => StaticCatalog::default(),
        };
        Self::new(ModelOptions::from(&config.file), shared(catalog))
    }

    pub fn scenario(&self) -> &TableModel {
        &self.scenario
    }
    pub fn objects(&self) -> &TableModel {
        &self.objects
    }
    pub fn scenario_mut(&mut self) -> &mut TableModel {
        &mut self.scenario
    }
    pub fn objects_mut(&mut self) -> &mut TableModel {
        &mut self.objects
    }
    pub fn catalog(&self) -> &SharedCatalog {
        &self.catalog
    }
    pub fn module(&self) -> Option<&str> {
        self.module.as_deref()
    }

    pub fn model(&self, kind: TableKind) -> &TableModel {
        match kind {
            TableKind::Scenario => &self.scenario,
            TableKind::Objects => &self.objects,
        }
    }

    pub fn model_mut(&mut self, kind: TableKind) -> &mut TableModel {
        match kind {
            TableKind::Scenario => &mut self.scenario,
            TableKind::Objects => &mut self.objects,
        }
    }

    /// Replace both tables. Objects load first so the catalog already knows
    /// their names when the scenario table arrives.
    pub fn load(&mut self, scenario: Grid, objects: Grid) {
        self.objects.load_data(objects);
        self.scenario.load_data(scenario);
    }

    /// Start a module from the starter presets. The abbreviation is reduced to
    /// two uppercase letters; without usable letters it is taken from the
    /// module name, then from the configured default.
    pub fn new_module(&mut self, name: &str, abbreviation: Option<&str>) {
        let name = name.trim();
        let abbr = abbreviation
            .and_then(normalize_abbreviation)
            .or_else(|| normalize_abbreviation(name))
            .unwrap_or_else(|| self.scenario.options().default_abbreviation.clone());
        info!(target: "model", module = name, abbreviation = %abbr, "module_created");
        self.load(scenario_preset(name, &abbr), objects_preset());
        self.module = Some(name.to_string());
    }

    pub fn set_module(&mut self, module: Option<String>) {
        self.module = module;
    }
}
