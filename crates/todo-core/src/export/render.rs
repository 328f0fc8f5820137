//! Renderer trait and the context shared by all renderers

use super::options::ExportOptions;
use crate::clock::DateFormatter;
use crate::error::Result;
use crate::task::Task;
use chrono::{DateTime, Utc};

/// Everything a renderer may depend on besides the tasks
pub struct RenderContext<'a> {
    /// Export time, read once per export call
    pub now: DateTime<Utc>,
    /// Options of this export call
    pub options: &'a ExportOptions,
    /// Locale formatting for human-readable dates
    pub formatter: &'a dyn DateFormatter,
}

impl<'a> RenderContext<'a> {
    pub fn new(
        now: DateTime<Utc>,
        options: &'a ExportOptions,
        formatter: &'a dyn DateFormatter,
    ) -> Self {
        Self {
            now,
            options,
            formatter,
        }
    }

    /// Locale-formatted timestamp
    pub fn local(&self, ts: &DateTime<Utc>) -> String {
        self.formatter.format(ts)
    }

    /// The task's due date, if it has one and due dates are exported
    pub fn due_of<'t>(&self, task: &'t Task) -> Option<&'t DateTime<Utc>> {
        if self.options.include_due_dates {
            task.due_date.as_ref()
        } else {
            None
        }
    }
}

/// A pure function from tasks to one textual payload
pub trait Renderer {
    /// Render the tasks, dropping completed ones first unless they are included
    fn render(&self, tasks: &[Task], ctx: &RenderContext<'_>) -> Result<String>;
}

/// Drop completed tasks unless they are included, preserving order
pub(crate) fn filter_tasks(tasks: &[Task], include_completed: bool) -> Vec<&Task> {
    tasks
        .iter()
        .filter(|task| include_completed || !task.completed)
        .collect()
}
