//! Multi-format task export
//!
//! This module renders task collections into interchange formats and hands
//! the result to a delivery sink.
//!
//! # Overview
//!
//! Export functionality supports:
//! - JSON (pretty-printed snapshot, usable as a backup)
//! - CSV (spreadsheet rows)
//! - iCalendar (one VTODO per task, CRLF line endings)
//! - Markdown (checklist grouped by completion)
//!
//! Every renderer drops completed tasks first when they are excluded. The
//! [`Exporter`] reads the clock once per call, dispatches on
//! [`ExportFormat`], and derives the filename and MIME type.
//!
//! # Example
//!
//! ```ignore
//! use todo_core::export::{DirectorySink, ExportFormat, ExportOptions, Exporter};
//!
//! let exporter = Exporter::system();
//! let options = ExportOptions::new(ExportFormat::Ical).include_completed(false);
//! let artifact = exporter.deliver(&tasks, &options, &DirectorySink::new("."))?;
//! println!("wrote {}", artifact.filename);
//! ```

mod csv;
mod exporter;
mod ical;
mod json;
mod markdown;
mod options;
mod render;
mod sink;

pub use csv::CsvRenderer;
pub use exporter::{
    export_filename, render, BatchOptions, BatchOutcome, BatchReport, ExportArtifact, Exporter,
    DEFAULT_BASE_NAME, DEFAULT_BATCH_PREFIX,
};
pub use ical::IcalRenderer;
pub use json::{ExportData, ExportTodo, JsonRenderer};
pub use markdown::MarkdownRenderer;
pub use options::{ExportFormat, ExportOptions};
pub use render::{RenderContext, Renderer};
pub use sink::{DeliverySink, DirectorySink, StdoutSink};
