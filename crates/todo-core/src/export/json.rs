//! JSON renderer

use super::render::{filter_tasks, RenderContext, Renderer};
use crate::error::Result;
use crate::task::{Task, TaskId};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Pretty-printed JSON snapshot, doubling as a human-auditable backup
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, tasks: &[Task], ctx: &RenderContext<'_>) -> Result<String> {
        let data = ExportData::build(tasks, ctx);
        Ok(serde_json::to_string_pretty(&data)?)
    }
}

/// Top-level JSON document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportData {
    /// Export time, RFC 3339 with milliseconds
    pub export_date: String,
    /// Number of exported tasks
    pub total_todos: usize,
    /// Exported tasks, in input order
    pub todos: Vec<ExportTodo>,
}

impl ExportData {
    /// Build the document from the tasks that survive filtering
    pub fn build(tasks: &[Task], ctx: &RenderContext<'_>) -> Self {
        let todos: Vec<ExportTodo> = filter_tasks(tasks, ctx.options.include_completed)
            .into_iter()
            .map(|task| ExportTodo::from_task(task, ctx))
            .collect();

        Self {
            export_date: ctx.now.to_rfc3339_opts(SecondsFormat::Millis, true),
            total_todos: todos.len(),
            todos,
        }
    }
}

/// One exported task
///
/// `due_date` is absent from the output, not `null`, when due dates are
/// excluded or the task has none.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportTodo {
    pub id: TaskId,
    pub title: String,
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl ExportTodo {
    fn from_task(task: &Task, ctx: &RenderContext<'_>) -> Self {
        Self {
            id: task.id,
            title: task.title.clone(),
            completed: task.completed,
            due_date: ctx.due_of(task).copied(),
            created_at: task.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::render::fixtures;
    use crate::export::{ExportFormat, ExportOptions};
    use pretty_assertions::assert_eq;

    fn render(tasks: &[Task], options: &ExportOptions) -> String {
        let formatter = fixtures::formatter();
        let ctx = RenderContext::new(fixtures::export_time(), options, &formatter);
        JsonRenderer.render(tasks, &ctx).unwrap()
    }

    #[test]
    fn test_scenario_exact_output() {
        let json = render(&fixtures::scenario(), &ExportOptions::new(ExportFormat::Json));
        let expected = r#"{
  "exportDate": "2025-01-05T08:30:00.000Z",
  "totalTodos": 2,
  "todos": [
    {
      "id": 1,
      "title": "Buy milk",
      "completed": false,
      "dueDate": "2025-01-10T18:00:00Z",
      "createdAt": "2025-01-01T00:00:00Z"
    },
    {
      "id": 2,
      "title": "Pay rent",
      "completed": true,
      "createdAt": "2025-01-02T00:00:00Z"
    }
  ]
}"#;
        assert_eq!(json, expected);
    }

    #[test]
    fn test_no_due_keys_when_excluded() {
        let options = ExportOptions::new(ExportFormat::Json).include_due_dates(false);
        let json = render(&fixtures::mixed(), &options);
        assert!(!json.contains("dueDate"));
        assert!(!json.contains("null"));
    }

    #[test]
    fn test_due_key_only_for_tasks_with_due_date() {
        let json = render(&fixtures::mixed(), &ExportOptions::new(ExportFormat::Json));
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        for todo in value["todos"].as_array().unwrap() {
            let has_due = todo.as_object().unwrap().contains_key("dueDate");
            let id = todo["id"].as_i64().unwrap();
            assert_eq!(has_due, id == 3 || id == 4, "task {}", id);
        }
    }

    #[test]
    fn test_excluding_completed_updates_total() {
        let options = ExportOptions::new(ExportFormat::Json).include_completed(false);
        let data: ExportData = serde_json::from_str(&render(&fixtures::mixed(), &options)).unwrap();
        assert_eq!(data.total_todos, 3);
        assert!(data.todos.iter().all(|t| !t.completed));
    }

    #[test]
    fn test_empty_collection() {
        let data: ExportData =
            serde_json::from_str(&render(&[], &ExportOptions::new(ExportFormat::Json))).unwrap();
        assert_eq!(data.total_todos, 0);
        assert!(data.todos.is_empty());
    }
}
