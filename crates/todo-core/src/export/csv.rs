//! CSV renderer

use super::render::{filter_tasks, RenderContext, Renderer};
use crate::error::Result;
use crate::task::Task;

const HEADER: [&str; 3] = ["标题", "状态", "创建时间"];
const DUE_HEADER: &str = "截止时间";
const STATUS_DONE: &str = "已完成";
const STATUS_PENDING: &str = "未完成";
const NO_DUE_DATE: &str = "无";

/// Comma-separated rows joined with `\n`
///
/// Only double quotes are escaped (by doubling). Embedded newlines in a title
/// are written as-is.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvRenderer;

impl Renderer for CsvRenderer {
    fn render(&self, tasks: &[Task], ctx: &RenderContext<'_>) -> Result<String> {
        let include_due = ctx.options.include_due_dates;

        let mut header: Vec<&str> = HEADER.to_vec();
        if include_due {
            header.push(DUE_HEADER);
        }

        let mut rows = vec![header.join(",")];
        for task in filter_tasks(tasks, ctx.options.include_completed) {
            let mut row = vec![
                quote(&task.title),
                status(task).to_string(),
                quote(&ctx.local(&task.created_at)),
            ];

            if include_due {
                row.push(match &task.due_date {
                    Some(due) => quote(&ctx.local(due)),
                    None => NO_DUE_DATE.to_string(),
                });
            }

            rows.push(row.join(","));
        }

        Ok(rows.join("\n"))
    }
}

fn status(task: &Task) -> &'static str {
    if task.completed {
        STATUS_DONE
    } else {
        STATUS_PENDING
    }
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::render::fixtures;
    use crate::export::{ExportFormat, ExportOptions};
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn render(tasks: &[Task], options: &ExportOptions) -> String {
        let formatter = fixtures::formatter();
        let ctx = RenderContext::new(fixtures::export_time(), options, &formatter);
        CsvRenderer.render(tasks, &ctx).unwrap()
    }

    /// Count columns, honouring quoted fields
    fn columns(row: &str) -> usize {
        let mut count = 1;
        let mut in_quotes = false;
        for c in row.chars() {
            match c {
                '"' => in_quotes = !in_quotes,
                ',' if !in_quotes => count += 1,
                _ => {}
            }
        }
        count
    }

    #[test]
    fn test_scenario_exact_output() {
        let csv = render(&fixtures::scenario(), &ExportOptions::new(ExportFormat::Csv));
        let expected = "标题,状态,创建时间,截止时间\n\
                        \"Buy milk\",未完成,\"2025/1/1 00:00:00\",\"2025/1/10 18:00:00\"\n\
                        \"Pay rent\",已完成,\"2025/1/2 00:00:00\",无";
        assert_eq!(csv, expected);
        assert_eq!(csv.lines().count(), 3);
    }

    #[test]
    fn test_without_due_dates() {
        let options = ExportOptions::new(ExportFormat::Csv).include_due_dates(false);
        let csv = render(&fixtures::scenario(), &options);
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("标题,状态,创建时间"));
        assert_eq!(lines.next(), Some("\"Buy milk\",未完成,\"2025/1/1 00:00:00\""));
        assert!(!csv.contains(NO_DUE_DATE));
    }

    #[test]
    fn test_column_count_consistent() {
        let at = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let mut tasks = fixtures::mixed();
        tasks.push(Task::new(9, "with, comma", at));

        for include_due in [true, false] {
            let options = ExportOptions::new(ExportFormat::Csv).include_due_dates(include_due);
            let csv = render(&tasks, &options);
            let expected = if include_due { 4 } else { 3 };
            for line in csv.lines() {
                assert_eq!(columns(line), expected, "row {:?}", line);
            }
        }
    }

    #[test]
    fn test_quotes_doubled() {
        let at = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let tasks = vec![Task::new(1, r#"Read "Dune""#, at)];
        let csv = render(&tasks, &ExportOptions::new(ExportFormat::Csv));
        assert!(csv.contains(r#""Read ""Dune""""#));
    }

    #[test]
    fn test_excluding_completed() {
        let options = ExportOptions::new(ExportFormat::Csv).include_completed(false);
        let csv = render(&fixtures::mixed(), &options);
        assert_eq!(csv.lines().count(), 4);
        assert!(!csv.contains(STATUS_DONE));
    }

    #[test]
    fn test_empty_is_header_only() {
        let csv = render(&[], &ExportOptions::new(ExportFormat::Csv));
        assert_eq!(csv, "标题,状态,创建时间,截止时间");
    }
}
