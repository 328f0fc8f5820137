//! Batch command
//!
//! Export the task list to every format in one go.

use anyhow::{bail, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

use super::AppContext;
use todo_core::export::{BatchOutcome, DirectorySink};
use todo_core::task::Task;

/// Arguments for the batch command
#[derive(Debug, Args)]
pub struct BatchArgs {
    /// Filename prefix (configured prefix if not specified)
    #[arg(long, short)]
    pub prefix: Option<String>,

    /// Output directory (configured directory if not specified)
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Overwrite existing files
    #[arg(long)]
    pub force: bool,

    /// Leave completed tasks out
    #[arg(long)]
    pub exclude_completed: bool,

    /// Leave due dates out
    #[arg(long)]
    pub no_due_dates: bool,
}

/// Execute the batch command
pub fn execute(args: BatchArgs, ctx: &AppContext) -> Result<()> {
    use colored::Colorize;

    let mut batch = ctx.config.export.batch_options();
    if let Some(prefix) = args.prefix {
        batch.prefix = prefix;
    }
    if args.exclude_completed {
        batch.include_completed = false;
    }
    if args.no_due_dates {
        batch.include_due_dates = false;
    }

    let dir = args
        .output
        .unwrap_or_else(|| ctx.config.export.output_dir.clone());
    let sink = DirectorySink::new(&dir).overwrite(args.force);

    let tasks = ctx.task_manager()?.list()?;
    let exporter = ctx.exporter()?;

    let counts = TaskCounts::of(&tasks);
    eprintln!(
        "Backing up {} tasks ({} completed, {} pending, {} with due date)",
        counts.total.to_string().yellow(),
        counts.completed,
        counts.pending,
        counts.with_due_date
    );
    if !batch.include_completed {
        eprintln!("  completed tasks are left out");
    }
    eprintln!(
        "Exporting to {} formats in {}...",
        batch.formats.len(),
        dir.display().to_string().cyan()
    );

    let pb = ProgressBar::new(batch.formats.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );

    let report = exporter.export_batch(&tasks, &batch, &sink, |outcome: &BatchOutcome| {
        pb.set_message(outcome.format.display_name());
        pb.inc(1);
        match &outcome.result {
            Ok(()) => pb.println(format!("{} {}", "✓".green(), outcome.filename)),
            Err(e) => pb.println(format!("{} {}: {}", "✗".red(), outcome.filename, e)),
        }
    });

    pb.finish_and_clear();

    let succeeded = report.succeeded().count();
    let failed = report.failed().count();

    if report.all_succeeded() {
        eprintln!("{} Exported {} files", "✓".green(), succeeded);
        return Ok(());
    }

    eprintln!(
        "{} {} succeeded, {} failed",
        "⚠".yellow(),
        succeeded,
        failed.to_string().red()
    );
    if !args.force {
        eprintln!("Use --force to overwrite existing files.");
    }
    bail!("{} of {} formats failed", failed, report.outcomes.len())
}

/// Task breakdown shown before a backup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TaskCounts {
    total: usize,
    completed: usize,
    pending: usize,
    with_due_date: usize,
}

impl TaskCounts {
    fn of(tasks: &[Task]) -> Self {
        let completed = tasks.iter().filter(|t| t.completed).count();
        Self {
            total: tasks.len(),
            completed,
            pending: tasks.len() - completed,
            with_due_date: tasks.iter().filter(|t| t.due_date.is_some()).count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_task_counts() {
        let at = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let tasks = vec![
            Task::new(1, "a", at).with_completed(true),
            Task::new(2, "b", at).with_due_date(at),
            Task::new(3, "c", at).with_completed(true).with_due_date(at),
            Task::new(4, "d", at),
        ];

        assert_eq!(
            TaskCounts::of(&tasks),
            TaskCounts {
                total: 4,
                completed: 2,
                pending: 2,
                with_due_date: 2,
            }
        );
        assert_eq!(TaskCounts::of(&[]).total, 0);
    }
}
