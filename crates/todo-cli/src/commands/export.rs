//! Export command
//!
//! Export the task list to a single format.

use anyhow::{bail, Context, Result};
use clap::{Args, ValueEnum};
use std::io::IsTerminal;
use std::path::PathBuf;

use super::AppContext;
use todo_core::export::{DeliverySink, DirectorySink, ExportFormat, StdoutSink};

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    /// JSON document with export metadata
    Json,
    /// Comma-separated values
    Csv,
    /// iCalendar VTODO entries
    #[value(alias = "ics")]
    Ical,
    /// Markdown checklist
    #[value(alias = "md")]
    Markdown,
}

impl From<FormatArg> for ExportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Json => ExportFormat::Json,
            FormatArg::Csv => ExportFormat::Csv,
            FormatArg::Ical => ExportFormat::Ical,
            FormatArg::Markdown => ExportFormat::Markdown,
        }
    }
}

/// Arguments for the export command
#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Export format (configured default if not specified)
    #[arg(long, short, value_enum)]
    pub format: Option<FormatArg>,

    /// Leave completed tasks out
    #[arg(long)]
    pub exclude_completed: bool,

    /// Leave due dates out
    #[arg(long)]
    pub no_due_dates: bool,

    /// Base filename, without extension
    #[arg(long, short)]
    pub name: Option<String>,

    /// Output directory (configured directory if not specified)
    #[arg(long, short, conflicts_with = "stdout")]
    pub output: Option<PathBuf>,

    /// Write the export to stdout instead of a file
    #[arg(long)]
    pub stdout: bool,

    /// Overwrite an existing file without asking
    #[arg(long)]
    pub force: bool,
}

/// Execute the export command
pub fn execute(args: ExportArgs, ctx: &AppContext) -> Result<()> {
    use colored::Colorize;

    let format = match args.format {
        Some(arg) => ExportFormat::from(arg),
        None => ctx
            .config
            .export
            .default_format()
            .context("Invalid default_format in configuration")?,
    };

    let mut options = ctx.config.export.options(format);
    if args.exclude_completed {
        options = options.include_completed(false);
    }
    if args.no_due_dates {
        options = options.include_due_dates(false);
    }
    if let Some(name) = &args.name {
        options = options.filename(name.clone());
    }

    let tasks = ctx.task_manager()?.list()?;
    let exporter = ctx.exporter()?;
    let artifact = exporter.export(&tasks, &options)?;

    if args.stdout {
        StdoutSink.deliver(&artifact)?;
        return Ok(());
    }

    let dir = args
        .output
        .clone()
        .unwrap_or_else(|| ctx.config.export.output_dir.clone());
    let sink = DirectorySink::new(&dir);
    let path = sink.path_for(&artifact.filename);

    if path.exists() && !args.force {
        if !std::io::stdin().is_terminal() {
            bail!("{} already exists. Use --force to overwrite", path.display());
        }

        use dialoguer::Confirm;

        let confirmed = Confirm::new()
            .with_prompt(format!("{} exists. Overwrite?", path.display()))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("Export cancelled.");
            return Ok(());
        }
    }

    sink.overwrite(true).deliver(&artifact)?;

    eprintln!(
        "{} Exported {} tasks as {} to {}",
        "✓".green(),
        artifact.task_count.to_string().yellow(),
        format.display_name(),
        path.display().to_string().cyan()
    );

    Ok(())
}
