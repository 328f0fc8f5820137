//! Markdown renderer

use super::render::{filter_tasks, RenderContext, Renderer};
use crate::error::Result;
use crate::task::Task;

/// Checklist document: pending tasks first, then completed ones
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownRenderer;

impl MarkdownRenderer {
    /// Render the title and summary lines
    fn render_header(&self, total: usize, ctx: &RenderContext<'_>) -> String {
        let mut header = String::new();
        header.push_str("# 待办事项导出\n\n");
        header.push_str(&format!("导出时间：{}\n", ctx.local(&ctx.now)));
        header.push_str(&format!("总计：{} 项任务\n\n", total));
        header
    }

    /// Render one checklist line
    fn render_item(&self, task: &Task, ctx: &RenderContext<'_>) -> String {
        let mark = if task.completed { "x" } else { " " };
        let mut line = format!("- [{}] {}", mark, task.title);
        if let Some(due) = ctx.due_of(task) {
            line.push_str(&format!(" ⏰ {}", ctx.local(due)));
        }
        line.push('\n');
        line
    }
}

impl Renderer for MarkdownRenderer {
    fn render(&self, tasks: &[Task], ctx: &RenderContext<'_>) -> Result<String> {
        let filtered = filter_tasks(tasks, ctx.options.include_completed);
        let (completed, pending): (Vec<&Task>, Vec<&Task>) =
            filtered.iter().copied().partition(|task| task.completed);

        let mut output = self.render_header(filtered.len(), ctx);

        if !pending.is_empty() {
            output.push_str(&format!("## 未完成任务 ({})\n\n", pending.len()));
            for task in &pending {
                output.push_str(&self.render_item(task, ctx));
            }
            output.push('\n');
        }

        // Always empty when completed tasks were filtered out
        if !completed.is_empty() && ctx.options.include_completed {
            output.push_str(&format!("## 已完成任务 ({})\n\n", completed.len()));
            for task in &completed {
                output.push_str(&self.render_item(task, ctx));
            }
        }

        Ok(output)
    }
}
