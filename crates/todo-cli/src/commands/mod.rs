//! CLI commands module
//!
//! This module contains all CLI command implementations.

pub mod batch;
pub mod config;
pub mod export;
pub mod formats;
pub mod init;
pub mod task;

use anyhow::{Context, Result};
use chrono::FixedOffset;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

use todo_core::clock::SystemClock;
use todo_core::config::Config;
use todo_core::export::Exporter;
use todo_core::task::TaskManager;
use todo_storage::FileSystemTaskStore;

/// Default location of the configuration file
pub const DEFAULT_CONFIG_PATH: &str = ".todo-export/config.toml";

/// todo-export - personal task list with multi-format export
#[derive(Debug, Parser)]
#[command(name = "todo-export")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "TODO_EXPORT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Task data directory (overrides the configuration)
    #[arg(long, global = true, env = "TODO_EXPORT_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a configuration file
    Init(init::InitArgs),

    /// Manage tasks
    #[command(subcommand)]
    Task(task::TaskCommand),

    /// Export tasks to one format
    Export(export::ExportArgs),

    /// Export tasks to every format at once
    Batch(batch::BatchArgs),

    /// List supported export formats
    Formats,

    /// Manage configuration
    #[command(subcommand)]
    Config(config::ConfigCommand),
}

/// Loaded configuration plus resolved paths, shared by all commands
pub struct AppContext {
    pub config: Config,
    pub config_path: PathBuf,
    data_dir_override: Option<PathBuf>,
}

impl AppContext {
    /// Load the configuration named on the command line, or the default one
    pub fn load(config_path: Option<&Path>, data_dir: Option<&Path>) -> Result<Self> {
        let config_path = config_path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
        let config = Config::load(&config_path)
            .with_context(|| format!("Failed to load config {}", config_path.display()))?;

        debug!("Loaded config from {:?}", config_path);

        Ok(Self {
            config,
            config_path,
            data_dir_override: data_dir.map(Path::to_path_buf),
        })
    }

    /// Directory holding the task file
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir_override
            .clone()
            .or_else(|| self.config.storage.data_dir.clone())
            .unwrap_or_else(FileSystemTaskStore::default_dir)
    }

    /// Task manager for the configured owner
    pub fn task_manager(&self) -> Result<TaskManager> {
        let data_dir = self.data_dir();
        let store = FileSystemTaskStore::new(&data_dir)
            .with_context(|| format!("Failed to open task store in {}", data_dir.display()))?;
        Ok(TaskManager::new(store, self.config.storage.user_id.clone()))
    }

    /// Exporter on the wall clock, formatting at the configured offset
    pub fn exporter(&self) -> Result<Exporter> {
        let formatter = self.config.export.formatter()?;
        Ok(Exporter::new(Arc::new(SystemClock), Arc::new(formatter)))
    }

    /// Offset for reading and displaying local times
    pub fn offset(&self) -> Result<FixedOffset> {
        Ok(self.config.export.utc_offset()?)
    }
}

/// Run the CLI application
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    setup_logging(cli.verbose);

    // Handle color output
    if cli.no_color {
        colored::control::set_override(false);
    }

    let ctx = AppContext::load(cli.config.as_deref(), cli.data_dir.as_deref())?;

    // Dispatch to command handler
    match cli.command {
        Commands::Init(args) => init::execute(args, &ctx),
        Commands::Task(cmd) => task::execute(cmd, &ctx),
        Commands::Export(args) => export::execute(args, &ctx),
        Commands::Batch(args) => batch::execute(args, &ctx),
        Commands::Formats => formats::execute(),
        Commands::Config(cmd) => config::execute(cmd, &ctx),
    }
}

fn setup_logging(verbosity: u8) {
    use tracing_subscriber::EnvFilter;

    let filter = match verbosity {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parse() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_help_text() {
        let cmd = Cli::command();
        assert!(cmd.get_about().is_some());
    }

    #[test]
    fn test_data_dir_override_wins() {
        let temp = tempfile::TempDir::new().unwrap();
        let ctx = AppContext::load(
            Some(&temp.path().join("missing.toml")),
            Some(&temp.path().join("data")),
        )
        .unwrap();
        assert_eq!(ctx.data_dir(), temp.path().join("data"));
    }
}
