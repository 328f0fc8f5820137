//! Export orchestration: dispatch, filename/MIME derivation, delivery

use super::csv::CsvRenderer;
use super::ical::IcalRenderer;
use super::json::JsonRenderer;
use super::markdown::MarkdownRenderer;
use super::options::{plain_base_name, ExportFormat, ExportOptions};
use super::render::{filter_tasks, RenderContext, Renderer};
use super::sink::DeliverySink;
use crate::clock::{Clock, DateFormatter, LocaleFormatter, SystemClock};
use crate::error::{Result, TodoError};
use crate::task::Task;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Base name used when no custom filename is given
pub const DEFAULT_BASE_NAME: &str = "todo-export";

/// Prefix of batch backup filenames
pub const DEFAULT_BATCH_PREFIX: &str = "todo-complete-backup";

/// A rendered export, ready for a delivery sink
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub format: ExportFormat,
    pub payload: String,
    pub filename: String,
    pub mime_type: String,
    /// Tasks that survived filtering
    pub task_count: usize,
}

/// Renders task collections and hands them to sinks
pub struct Exporter {
    clock: Arc<dyn Clock>,
    formatter: Arc<dyn DateFormatter>,
}

impl Exporter {
    /// Create an exporter with explicit clock and formatter
    pub fn new(clock: Arc<dyn Clock>, formatter: Arc<dyn DateFormatter>) -> Self {
        Self { clock, formatter }
    }

    /// Wall clock and zh-CN formatting
    pub fn system() -> Self {
        Self::new(Arc::new(SystemClock), Arc::new(LocaleFormatter::zh_cn()))
    }

    /// Render one export
    pub fn export(&self, tasks: &[Task], options: &ExportOptions) -> Result<ExportArtifact> {
        let now = self.clock.now();
        self.export_at(tasks, options, now)
    }

    /// Render one export and deliver it
    pub fn deliver(
        &self,
        tasks: &[Task],
        options: &ExportOptions,
        sink: &dyn DeliverySink,
    ) -> Result<ExportArtifact> {
        let artifact = self.export(tasks, options)?;
        sink.deliver(&artifact)?;
        info!("Delivered {} ({})", artifact.filename, artifact.format);
        Ok(artifact)
    }

    /// Render and deliver every requested format
    ///
    /// Formats run one after another; a failure is recorded in the report and
    /// the remaining formats are still attempted. `on_outcome` is called after
    /// each format.
    pub fn export_batch(
        &self,
        tasks: &[Task],
        batch: &BatchOptions,
        sink: &dyn DeliverySink,
        mut on_outcome: impl FnMut(&BatchOutcome),
    ) -> BatchReport {
        let now = self.clock.now();
        let base = batch.base_name(now);
        let mut outcomes = Vec::with_capacity(batch.formats.len());

        for &format in &batch.formats {
            let options = ExportOptions::new(format)
                .include_completed(batch.include_completed)
                .include_due_dates(batch.include_due_dates)
                .filename(base.clone());

            let outcome = match self.deliver(tasks, &options, sink) {
                Ok(artifact) => BatchOutcome {
                    format,
                    filename: artifact.filename,
                    result: Ok(()),
                },
                Err(err) => {
                    warn!("Batch export of {} failed: {}", format, err);
                    BatchOutcome {
                        format,
                        filename: export_filename(format, Some(&base), now),
                        result: Err(err),
                    }
                }
            };

            on_outcome(&outcome);
            outcomes.push(outcome);
        }

        BatchReport { outcomes }
    }

    fn export_at(
        &self,
        tasks: &[Task],
        options: &ExportOptions,
        now: DateTime<Utc>,
    ) -> Result<ExportArtifact> {
        let ctx = RenderContext::new(now, options, self.formatter.as_ref());
        let payload = render(options.format, tasks, &ctx)?;

        debug!(
            "Rendered {} tasks as {} ({} bytes)",
            tasks.len(),
            options.format,
            payload.len()
        );

        Ok(ExportArtifact {
            format: options.format,
            payload,
            filename: export_filename(options.format, options.custom_filename(), now),
            mime_type: options.format.mime_type().to_string(),
            task_count: filter_tasks(tasks, options.include_completed).len(),
        })
    }
}

impl Default for Exporter {
    fn default() -> Self {
        Self::system()
    }
}

/// Dispatch to the renderer of `format`
pub fn render(format: ExportFormat, tasks: &[Task], ctx: &RenderContext<'_>) -> Result<String> {
    match format {
        ExportFormat::Json => JsonRenderer.render(tasks, ctx),
        ExportFormat::Csv => CsvRenderer.render(tasks, ctx),
        ExportFormat::Ical => IcalRenderer.render(tasks, ctx),
        ExportFormat::Markdown => MarkdownRenderer.render(tasks, ctx),
    }
}

/// `<base>.<ext>`, with `todo-export-<YYYY-MM-DD>` when no plain custom base is given
pub fn export_filename(format: ExportFormat, custom: Option<&str>, now: DateTime<Utc>) -> String {
    let base = match custom.and_then(plain_base_name) {
        Some(name) => name.to_string(),
        None => {
            if let Some(name) = custom.filter(|name| !name.trim().is_empty()) {
                warn!("Ignoring export name {:?}: not a plain file name", name);
            }
            format!("{}-{}", DEFAULT_BASE_NAME, now.format("%Y-%m-%d"))
        }
    };
    format!("{}.{}", base, format.extension())
}

/// Options for exporting several formats at once
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Filename prefix; the export date is appended
    pub prefix: String,
    pub include_completed: bool,
    pub include_due_dates: bool,
    /// Formats to export, in order
    pub formats: Vec<ExportFormat>,
}

impl BatchOptions {
    /// Base filename shared by every format in the batch
    pub fn base_name(&self, now: DateTime<Utc>) -> String {
        format!("{}-{}", self.prefix, now.format("%Y-%m-%d"))
    }
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_BATCH_PREFIX.to_string(),
            include_completed: true,
            include_due_dates: true,
            formats: ExportFormat::ALL.to_vec(),
        }
    }
}

/// Result of one format within a batch
#[derive(Debug)]
pub struct BatchOutcome {
    pub format: ExportFormat,
    pub filename: String,
    pub result: std::result::Result<(), TodoError>,
}

impl BatchOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Per-format results of a batch export
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<BatchOutcome>,
}

impl BatchReport {
    /// Outcomes that were delivered
    pub fn succeeded(&self) -> impl Iterator<Item = &BatchOutcome> {
        self.outcomes.iter().filter(|o| o.is_ok())
    }

    /// Outcomes that failed
    pub fn failed(&self) -> impl Iterator<Item = &BatchOutcome> {
        self.outcomes.iter().filter(|o| !o.is_ok())
    }

    /// Whether every format was delivered
    pub fn all_succeeded(&self) -> bool {
        self.outcomes.iter().all(BatchOutcome::is_ok)
    }
}
