//! param-editor — the command-line entry point for the parameter form.
//!
//! # Usage
//!
//! ```text
//! param-editor                 # open the form (same as `tui`)
//! param-editor tui --no-persist
//! param-editor show
//! param-editor export
//! param-editor set 2 mini
//! param-editor add Color
//! param-editor rename 3 Colour
//! ```

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Mutex;

use anyhow::{anyhow, bail, Context};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use param_editor_core::config::Settings;
use param_editor_core::persist::FileStorage;
use param_editor_core::ParamEditor;
use param_editor_tui::app::App;
use param_editor_tui::theme::Theme;
use param_editor_tui::tui::{self, Tui};


#[derive(Debug, Parser)]
#[command(name = "param-editor", version, about = "Edit named text parameters")]
struct Cli {
    /// Config directory (default: $PARAM_EDITOR_CONFIG_DIR or ~/.config/param-editor)
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Cmd>,
}


#[derive(Debug, Clone, PartialEq, Subcommand)]
enum Cmd {
    /// Open the interactive form
    Tui {
        /// Keep changes in memory only
        #[arg(long)]
        no_persist: bool,
    },
    /// Print every parameter with its value
    Show,
    /// Print the exported model as JSON
    Export,
    /// Set the value of a parameter
    Set { id: u32, value: String },
    /// Add a parameter (blank name gets a generated label)
    Add { name: Option<String> },
    /// Rename a parameter
    Rename { id: u32, name: String },
}


fn main() {
    let cli = Cli::parse();
    let config_dir = resolve_config_dir(cli.config_dir);
    let cmd = cli.command.unwrap_or(Cmd::Tui { no_persist: false });

    if let Err(e) = run(&config_dir, cmd) {
        eprintln!("param-editor: {:#}", e);
        process::exit(1);
    }
}


fn run(config_dir: &Path, cmd: Cmd) -> anyhow::Result<()> {
    let settings = Settings::load(config_dir)?;

    if let Cmd::Tui { no_persist } = cmd {
        init_logging(&settings, config_dir, true)?;
        let (editor, written) =
            open_editor(&settings, config_dir, settings.persist && !no_persist)?;
        let mut app = App::new(editor, settings.double_click_ms);
        if let Err(e) = written {
            app.report_error(&e, tui::now_ms());
        }
        let mut tui = Tui::new(app, Theme::by_name(&settings.theme))
            .context("failed to start terminal")?;
        tui.run()?;
        return Ok(());
    }

    init_logging(&settings, config_dir, false)?;
    let (mut editor, written) = open_editor(&settings, config_dir, true)?;
    if let Err(e) = written {
        warn!(error = %e, "continuing with unsaved state");
    }
    let output = execute(&mut editor, cmd)?;
    if !output.is_empty() {
        println!("{}", output);
    }
    Ok(())
}


fn resolve_config_dir(flag: Option<PathBuf>) -> PathBuf {
    if let Some(dir) = flag {
        return dir;
    }
    if let Ok(dir) = std::env::var("PARAM_EDITOR_CONFIG_DIR") {
        return PathBuf::from(dir);
    }
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
    PathBuf::from(home).join(".config").join("param-editor")
}


/// Install the tracing subscriber. The form owns the screen, so it logs to
/// a file; one-shot commands log warnings and errors to stderr.
fn init_logging(settings: &Settings, config_dir: &Path, to_file: bool) -> anyhow::Result<()> {
    let default_level = if to_file { settings.log_level.as_str() } else { "warn" };
    let filter = EnvFilter::try_from_env("PARAM_EDITOR_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let result = if to_file {
        let path = settings.log_path(config_dir);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("cannot open log file {}", path.display()))?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .try_init()
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
    };
    result.map_err(|e| anyhow!(e))
}


/// Build the editor. The second element is the result of the initial write
/// to storage, which does not stop the editor from opening.
fn open_editor(
    settings: &Settings,
    config_dir: &Path,
    persist: bool,
) -> anyhow::Result<(ParamEditor, param_editor_core::Result<()>)> {
    let seed = settings
        .load_seed(config_dir)
        .context("cannot load default parameters")?;
    if !persist {
        info!("running without persistence");
        return Ok((ParamEditor::from_seed(seed), Ok(())));
    }
    let path = settings.storage_path(config_dir);
    let storage = FileStorage::open(&path);
    Ok(ParamEditor::with_storage(seed.params, seed.model, Box::new(storage)))
}


/// Run a one-shot command and return what it prints.
fn execute(editor: &mut ParamEditor, cmd: Cmd) -> anyhow::Result<String> {
    match cmd {
        Cmd::Tui { .. } => bail!("the form cannot run as a one-shot command"),
        Cmd::Show => Ok(editor
            .params()
            .iter()
            .map(|p| format!("{:>3}  {:<24}  {}", p.id, p.name, editor.value(p.id)))
            .collect::<Vec<_>>()
            .join("\n")),
        Cmd::Export => Ok(serde_json::to_string_pretty(&editor.model())?),
        Cmd::Set { id, value } => {
            if !editor.change_value(id, value)? {
                bail!("no parameter with id {}", id);
            }
            Ok(String::new())
        }
        Cmd::Add { name } => {
            editor.set_new_param_name(name.unwrap_or_default());
            let param = editor.add_param()?;
            Ok(format!("added {}  {}", param.id, param.name))
        }
        Cmd::Rename { id, name } => {
            editor.rename_param(id, name)?;
            Ok(String::new())
        }
    }
}
