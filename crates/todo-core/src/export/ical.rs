//! iCalendar renderer (RFC 5545 VTODO)

use super::render::{filter_tasks, RenderContext, Renderer};
use crate::error::Result;
use crate::task::Task;
use chrono::{DateTime, Utc};

const PRODID: &str = "-//Todo App//Todo Export//CN";
const UID_DOMAIN: &str = "todoapp.local";
const PRIORITY: u8 = 5;
const CRLF: &str = "\r\n";

/// Calendar document with one VTODO per task, lines joined with CRLF
#[derive(Debug, Clone, Copy, Default)]
pub struct IcalRenderer;

impl Renderer for IcalRenderer {
    fn render(&self, tasks: &[Task], ctx: &RenderContext<'_>) -> Result<String> {
        let stamp = basic_format(&ctx.now);

        let mut lines: Vec<String> = vec![
            "BEGIN:VCALENDAR".to_string(),
            "VERSION:2.0".to_string(),
            format!("PRODID:{}", PRODID),
            "CALSCALE:GREGORIAN".to_string(),
            "METHOD:PUBLISH".to_string(),
        ];

        for task in filter_tasks(tasks, ctx.options.include_completed) {
            push_todo(&mut lines, task, &stamp, ctx);
        }

        lines.push("END:VCALENDAR".to_string());
        Ok(lines.join(CRLF))
    }
}

fn push_todo(lines: &mut Vec<String>, task: &Task, stamp: &str, ctx: &RenderContext<'_>) {
    let created = basic_format(&task.created_at);

    lines.push("BEGIN:VTODO".to_string());
    lines.push(format!("UID:{}", uid(task)));
    lines.push(format!("DTSTAMP:{}", stamp));
    lines.push(format!("CREATED:{}", created));
    lines.push(format!("SUMMARY:{}", task.title.replace('\n', "\\n")));
    lines.push(format!(
        "STATUS:{}",
        if task.completed { "COMPLETED" } else { "NEEDS-ACTION" }
    ));
    lines.push(format!("PRIORITY:{}", PRIORITY));

    if let Some(due) = ctx.due_of(task) {
        lines.push(format!("DUE:{}", basic_format(due)));
    }

    // No completion time in the model, so COMPLETED reuses the creation time
    if task.completed {
        lines.push(format!("COMPLETED:{}", created));
        lines.push("PERCENT-COMPLETE:100".to_string());
    } else {
        lines.push("PERCENT-COMPLETE:0".to_string());
    }

    lines.push("END:VTODO".to_string());
}

/// Stable identity of a task across re-exports
pub fn uid(task: &Task) -> String {
    format!("todo-{}@{}", task.id, UID_DOMAIN)
}

/// `YYYYMMDDTHHMMSSZ`
pub fn basic_format(ts: &DateTime<Utc>) -> String {
    ts.format("%Y%m%dT%H%M%SZ").to_string()
}
