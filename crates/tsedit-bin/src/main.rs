//! tsedit entrypoint.
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use core_config::{Config, load_from};
use core_grid::{Grid, TableKind, column_label};
use core_model::preset::{ModulePaths, module_name_from_path};
use core_model::{TableModel, Workbook};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Once;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;

mod document;
mod script;

use document::GridDocument;

const LOG_FILE_NAME: &str = "tsedit.log";

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "tsedit", version, about = "Test scenario table editor")]
struct Args {
    /// Optional configuration file path (overrides discovery of `tsedit.toml`).
    #[arg(long = "config", global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Write starter scenario and objects documents for a new module.
    New {
        module: String,
        /// Two-letter identifier abbreviation (defaults to the module name).
        #[arg(long)]
        abbr: Option<String>,
        /// Project root holding `testSuites/` and `objectRepositories/`.
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },
    /// Replay an edit script against a module's documents.
    Apply {
        #[arg(long)]
        scenario: PathBuf,
        /// Objects document; derived from the scenario file name when omitted.
        #[arg(long)]
        objects: Option<PathBuf>,
        #[arg(long)]
        script: PathBuf,
        /// Write results here instead of overwriting the inputs.
        #[arg(long = "out-dir")]
        out_dir: Option<PathBuf>,
    },
    /// List completion candidates for one scenario cell.
    Suggest {
        #[arg(long)]
        scenario: PathBuf,
        #[arg(long)]
        objects: Option<PathBuf>,
        #[arg(long)]
        row: usize,
        #[arg(long)]
        col: usize,
        #[arg(default_value = "")]
        filter: String,
    },
    /// Print a grid document as a table.
    Show { file: PathBuf },
}

struct AppStartup {
    log_guard: Option<WorkerGuard>,
}

impl AppStartup {
    fn new() -> Self {
        Self { log_guard: None }
    }

    fn configure_logging(&mut self) -> Result<()> {
        let log_dir = Path::new(".");
        let log_path = log_dir.join(LOG_FILE_NAME);
        let stale = remove_stale_log(&log_path);

        let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE_NAME);
        let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
        match tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_ansi(false)
            .with_writer(nb_writer)
            .try_init()
        {
            Ok(_) => {
                self.log_guard = Some(guard);
                if let Some(err) = stale {
                    warn!(target: "io", file = %log_path.display(), %err, "stale_log_not_removed");
                }
            }
            Err(_err) => {
                // Global tracing subscriber already installed; drop guard so writer shuts down.
            }
        }

        Ok(())
    }

    fn install_panic_hook() {
        static HOOK: Once = Once::new();
        HOOK.call_once(|| {
            let default_panic = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |info| {
                tracing::error!(target: "runtime.panic", ?info, "panic");
                default_panic(info);
            }));
        });
    }
}

/// Delete the previous run's log. The error is returned so it can be logged
/// once the subscriber is up.
fn remove_stale_log(path: &Path) -> Option<std::io::Error> {
    if !path.exists() {
        return None;
    }
    std::fs::remove_file(path).err()
}

/// Objects document for a scenario: explicit path, else the module's
/// conventional sibling. `None` when neither is available.
fn objects_path(scenario: &Path, explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    let derived = ModulePaths::for_scenario(scenario)?.objects;
    if derived.exists() {
        Some(derived)
    } else {
        warn!(target: "io", file = %derived.display(), "objects_document_missing");
        None
    }
}

/// Workbook loaded from a scenario document and its objects document.
fn open_workbook(
    config: &Config,
    scenario: &Path,
    objects: Option<&Path>,
) -> Result<(Workbook, Option<PathBuf>)> {
    let scenario_grid = GridDocument::read_kind(scenario, TableKind::Scenario)?;
    let objects = objects_path(scenario, objects);
    let objects_grid = match &objects {
        Some(path) => GridDocument::read_kind(path, TableKind::Objects)?,
        None => Grid::empty(),
    };
    let mut workbook = Workbook::from_config(config);
    workbook.load(scenario_grid, objects_grid);
    workbook.set_module(module_name_from_path(scenario));
    Ok((workbook, objects))
}

fn output_path(input: &Path, out_dir: Option<&Path>) -> PathBuf {
    match (out_dir, input.file_name()) {
        (Some(dir), Some(name)) => dir.join(name),
        _ => input.to_path_buf(),
    }
}

fn render_table(model: &TableModel, out: &mut impl Write) -> Result<()> {
    writeln!(
        out,
        "{} table: {} rows x {} columns",
        model.kind().as_str(),
        model.row_count(),
        model.column_count()
    )?;
    if model.column_count() == 0 {
        return Ok(());
    }
    let header: Vec<String> = model
        .columns()
        .iter()
        .enumerate()
        .map(|(i, name)| format!("{}:{name}", column_label(i)))
        .collect();
    writeln!(out, "#\t{}", header.join("\t"))?;
    for (idx, row) in model.grid().rows().iter().enumerate() {
        writeln!(out, "{idx}\t{}", row.join("\t"))?;
    }
    Ok(())
}

fn execute(args: Args, config: &Config, out: &mut impl Write) -> Result<()> {
    match args.command {
        Cmd::New { module, abbr, dir } => {
            let module = module.trim();
            if module.is_empty() {
                anyhow::bail!("module name must not be empty");
            }
            let mut workbook = Workbook::from_config(config);
            workbook.new_module(module, abbr.as_deref());
            let paths = ModulePaths::new(&dir, module).with_extension("json");
            GridDocument::from_model(workbook.scenario()).write(&paths.scenario)?;
            GridDocument::from_model(workbook.objects()).write(&paths.objects)?;
            info!(target: "runtime", module, "module_written");
            writeln!(out, "{}", paths.scenario.display())?;
            writeln!(out, "{}", paths.objects.display())?;
        }
        Cmd::Apply {
            scenario,
            objects,
            script,
            out_dir,
        } => {
            let text = std::fs::read_to_string(&script)
                .with_context(|| format!("reading script {}", script.display()))?;
            let steps = script::parse(&text)?;
            let (mut workbook, objects) = open_workbook(config, &scenario, objects.as_deref())?;
            let summary = script::run(&mut workbook, &steps)?;

            let target = output_path(&scenario, out_dir.as_deref());
            GridDocument::from_model(workbook.scenario()).write(&target)?;
            writeln!(out, "{}", target.display())?;
            if let Some(objects) = objects {
                let target = output_path(&objects, out_dir.as_deref());
                GridDocument::from_model(workbook.objects()).write(&target)?;
                writeln!(out, "{}", target.display())?;
            }
            writeln!(
                out,
                "applied {} steps ({} with nothing to do)",
                summary.applied, summary.noops
            )?;
        }
        Cmd::Suggest {
            scenario,
            objects,
            row,
            col,
            filter,
        } => {
            let (workbook, _) = open_workbook(config, &scenario, objects.as_deref())?;
            let model = workbook.scenario();
            if !model.is_autocomplete_cell(row, col) {
                info!(target: "runtime", row, col, "cell_not_eligible_for_completion");
            }
            for candidate in model.suggestions(row, col, &filter) {
                writeln!(out, "{candidate}")?;
            }
        }
        Cmd::Show { file } => {
            let doc = GridDocument::read(&file)?;
            let kind = doc.kind;
            let model = TableModel::with_data(
                kind,
                doc.into_grid()?,
                core_model::ModelOptions::from(&config.file),
                core_model::shared(core_model::StaticCatalog::default()),
            );
            render_table(&model, out)?;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let mut startup = AppStartup::new();
    startup.configure_logging()?;
    AppStartup::install_panic_hook();

    let args = Args::parse();
    info!(target: "runtime", command = ?args.command, "startup");
    let config = load_from(args.config.clone())?;
    if let Some(source) = &config.source {
        info!(target: "runtime", config = %source.display(), "config_in_effect");
    }
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    execute(args, &config, &mut out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn exec(argv: &[&str]) -> Result<String> {
        let args = Args::try_parse_from(std::iter::once("tsedit").chain(argv.iter().copied()))?;
        let mut out = Vec::new();
        execute(args, &Config::default(), &mut out)?;
        Ok(String::from_utf8(out)?)
    }

    fn new_module(root: &Path) -> ModulePaths {
        let root_str = root.to_str().unwrap();
        exec(&["new", "Reports", "--abbr", "rp", "--dir", root_str]).unwrap();
        ModulePaths::new(root, "Reports").with_extension("json")
    }

    #[test]
    fn stale_log_removal_reports_failure() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join(LOG_FILE_NAME);
        assert!(remove_stale_log(&log).is_none());
        std::fs::write(&log, "old").unwrap();
        assert!(remove_stale_log(&log).is_none());
        assert!(!log.exists());
        // A directory in the log's place cannot be removed as a file.
        std::fs::create_dir(&log).unwrap();
        assert!(remove_stale_log(&log).is_some());
    }

    #[test]
    fn new_writes_both_documents() {
        let dir = tempfile::tempdir().unwrap();
        let paths = new_module(dir.path());
        let scenario = GridDocument::read(&paths.scenario).unwrap();
        assert_eq!(scenario.kind, TableKind::Scenario);
        assert_eq!(scenario.rows.len(), 9);
        assert_eq!(scenario.rows[2][1], "TC-RP_AUT1");
        let objects = GridDocument::read(&paths.objects).unwrap();
        assert_eq!(objects.kind, TableKind::Objects);
        assert_eq!(objects.rows[1][1], "lnkAdmin");
    }

    #[test]
    fn new_rejects_blank_module() {
        let dir = tempfile::tempdir().unwrap();
        assert!(exec(&["new", "  ", "--dir", dir.path().to_str().unwrap()]).is_err());
    }

    #[test]
    fn apply_replays_script_into_out_dir() {
        let dir = tempfile::tempdir().unwrap();
        let paths = new_module(dir.path());
        let script = dir.path().join("edit.txt");
        std::fs::write(
            &script,
            "# add a step before the first test case\ninsert 2\nset 2 4 Open reports\nobjects: insert 2\nobjects: set 2 1 btnExport\nredo\n",
        )
        .unwrap();
        let out_dir = dir.path().join("out");
        let printed = exec(&[
            "apply",
            "--scenario",
            paths.scenario.to_str().unwrap(),
            "--script",
            script.to_str().unwrap(),
            "--out-dir",
            out_dir.to_str().unwrap(),
        ])
        .unwrap();
        assert!(printed.contains("applied 4 steps (1 with nothing to do)"));

        let scenario = GridDocument::read(&out_dir.join(paths.scenario.file_name().unwrap())).unwrap();
        assert_eq!(scenario.rows.len(), 10);
        assert_eq!(scenario.rows[2][1], "TC-RP_AUT1");
        assert_eq!(scenario.rows[2][4], "Open reports");
        assert_eq!(scenario.rows[7][1], "TC-RP_AUT6");
        let objects = GridDocument::read(&out_dir.join(paths.objects.file_name().unwrap())).unwrap();
        assert_eq!(objects.rows[2], vec!["", "btnExport", "XPATH", ""]);
        // Inputs untouched.
        assert_eq!(GridDocument::read(&paths.scenario).unwrap().rows.len(), 9);
    }

    #[test]
    fn apply_reports_failing_line() {
        let dir = tempfile::tempdir().unwrap();
        let paths = new_module(dir.path());
        let script = dir.path().join("bad.txt");
        std::fs::write(&script, "insert 0\ndelete 99\n").unwrap();
        let err = exec(&[
            "apply",
            "--scenario",
            paths.scenario.to_str().unwrap(),
            "--script",
            script.to_str().unwrap(),
        ])
        .unwrap_err();
        assert!(format!("{err:#}").contains("line 2"));
        // Nothing written on failure.
        assert_eq!(GridDocument::read(&paths.scenario).unwrap().rows.len(), 9);
    }

    #[test]
    fn suggest_lists_commands_and_objects() {
        let dir = tempfile::tempdir().unwrap();
        let paths = new_module(dir.path());
        let scenario = paths.scenario.to_str().unwrap();
        let commands = exec(&["suggest", "--scenario", scenario, "--row", "2", "--col", "6", "verify"]).unwrap();
        assert_eq!(
            commands.lines().collect::<Vec<_>>(),
            vec![
                "FWC_VerifyText",
                "FWC_VerifyButtonExist",
                "FWC_VerifyTextBoxExist",
                "EC_VerifyCellData"
            ]
        );
        let objects = exec(&["suggest", "--scenario", scenario, "--row", "2", "--col", "7"]).unwrap();
        assert_eq!(objects, "lnkAdmin\n");
        let none = exec(&["suggest", "--scenario", scenario, "--row", "1", "--col", "6"]).unwrap();
        assert_eq!(none, "");
    }

    #[test]
    fn show_renders_labels_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let paths = new_module(dir.path());
        let shown = exec(&["show", paths.objects.to_str().unwrap()]).unwrap();
        let lines: Vec<_> = shown.lines().collect();
        assert_eq!(lines[0], "objects table: 3 rows x 4 columns");
        assert_eq!(lines[1], "#\tA:0\tB:1\tC:2\tD:3");
        assert!(lines[3].starts_with("1\tLink\tlnkAdmin\tXPATH"));
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn scenario_flag_checks_document_kind() {
        let dir = tempfile::tempdir().unwrap();
        let paths = new_module(dir.path());
        let err = exec(&[
            "suggest",
            "--scenario",
            paths.objects.to_str().unwrap(),
            "--row",
            "0",
            "--col",
            "0",
        ])
        .unwrap_err();
        assert!(err.to_string().contains("expected scenario"));
    }
}
