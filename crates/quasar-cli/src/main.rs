use anyhow::{bail, Context as _, Result};
use clap::{Parser, Subcommand};
use quasar_game::interface::{property_names, KINDS};
use quasar_game::plugin::load_manifest;
use quasar_game::{create_plugin_loader, PluginManager, Session, ShipList};
use quasar_interpreter::{NullHost, WorldConfig};
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod report;

use report::ListingResources;

/// Quasar - script engine toolkit
#[derive(Parser)]
#[command(name = "quasar")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Inspect the script interface, plugins and ship lists of the Quasar engine")]
#[command(author = "Quasar Team")]
struct Cli {
    /// Interpreter settings (JSON)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log debug events
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the properties of an entity kind, or all kinds
    Properties {
        /// Entity kind, such as HULL or PLUGIN
        kind: Option<String>,
    },
    /// Show a plugin manifest
    Plugin {
        /// Manifest file (.c2p)
        manifest: PathBuf,
        /// Show the generated loader
        #[arg(long)]
        disassemble: bool,
    },
    /// Scan a plugin directory and show the load order
    Plugins {
        /// Directory containing .c2p manifests
        dir: PathBuf,
        /// Run the loaders without a script compiler and show their output
        #[arg(long)]
        run: bool,
    },
    /// Summarize a ship list definition file
    ShipList {
        /// Ship list file (JSON)
        file: PathBuf,
    },
    /// Print the effective interpreter settings
    Config,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<WorldConfig> {
    let Some(path) = path else {
        return Ok(WorldConfig::default());
    };
    let text = fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))?;
    let config = serde_json::from_str(&text).with_context(|| format!("invalid settings in {}", path.display()))?;
    debug!(path = %path.display(), "settings loaded");
    Ok(config)
}

fn properties_command(kind: Option<&str>) -> Result<()> {
    match kind {
        None => {
            for kind in KINDS {
                println!("{}", kind);
            }
        }
        Some(kind) => match property_names(kind) {
            Some(names) => print!("{}", report::property_list(&names)),
            None => bail!("unknown entity kind \"{}\"; one of {}", kind, KINDS.join(", ")),
        },
    }
    Ok(())
}

fn plugin_command(manifest: &Path, disassemble: bool) -> Result<()> {
    let plugin = load_manifest(manifest).with_context(|| format!("cannot load {}", manifest.display()))?;
    print!("{}", report::plugin_summary(&plugin));
    if disassemble {
        let manager = Rc::new(RefCell::new(PluginManager::new()));
        let loader = create_plugin_loader(&plugin, &manager)?;
        println!();
        print!("{}", loader.disassemble());
    }
    Ok(())
}

fn plugins_command(dir: &Path, run: bool, config: WorldConfig) -> Result<()> {
    let resources = Rc::new(RefCell::new(ListingResources::default()));
    let mut session = Session::new(config, Box::new(NullHost), resources.clone());
    let count = session
        .plugins()
        .borrow_mut()
        .scan_directory(dir)
        .with_context(|| format!("cannot scan {}", dir.display()))?;
    if count == 0 {
        println!("No plugins in {}", dir.display());
        return Ok(());
    }

    for plugin in session.plugins().borrow().enum_plugins_ordered() {
        println!("{:<12} {}", plugin.id(), plugin.name);
    }

    if run {
        session.load_plugins()?;
        println!();
        for line in session.world().console() {
            println!("{}", line);
        }
        for line in &resources.borrow().loaded {
            println!("{}", line);
        }
    }
    Ok(())
}

fn ship_list_command(file: &Path) -> Result<()> {
    let list = ShipList::load(file).with_context(|| format!("cannot load {}", file.display()))?;
    print!("{}", report::ship_list_summary(&list));
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Properties { kind } => properties_command(kind.as_deref()),
        Commands::Plugin { manifest, disassemble } => plugin_command(&manifest, disassemble),
        Commands::Plugins { dir, run } => plugins_command(&dir, run, config),
        Commands::ShipList { file } => ship_list_command(&file),
        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults_when_absent() {
        assert_eq!(load_config(None).unwrap(), WorldConfig::default());
    }

    #[test]
    fn test_config_file_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quasar.json");
        fs::write(&path, r#"{ "max_call_depth": 20, "charset": "latin1" }"#).unwrap();
        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.max_call_depth, 20);
        assert_eq!(config.charset, quasar_interpreter::Charset::Latin1);
        assert_eq!(config.max_stack_depth, WorldConfig::default().max_stack_depth);
    }

    #[test]
    fn test_bad_config_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ max_call_depth").unwrap();
        let err = load_config(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("invalid settings"));
    }

    #[test]
    fn test_unknown_kind() {
        assert!(properties_command(Some("PLANET")).is_err());
        assert!(properties_command(Some("hull")).is_ok());
    }

    #[test]
    fn test_cli_parses() {
        let cli = Cli::try_parse_from(["quasar", "-v", "plugin", "x.c2p", "--disassemble"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Plugin { disassemble: true, .. }));
    }
}
