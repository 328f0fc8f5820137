//! Task command
//!
//! Add, list, edit and remove tasks.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use clap::Subcommand;

use super::AppContext;
use todo_core::task::{NewTask, Task, TaskId, TaskManager, TaskPatch};

/// Task subcommands
#[derive(Debug, Subcommand)]
pub enum TaskCommand {
    /// Add a task
    Add {
        /// Task title
        title: String,

        /// Rich-text description
        #[arg(long)]
        content: Option<String>,

        /// Due date (RFC 3339, "YYYY-MM-DD HH:MM" or "YYYY-MM-DD")
        #[arg(long)]
        due: Option<String>,
    },

    /// List tasks, newest first
    List {
        /// Every task (the default)
        #[arg(long, conflicts_with_all = ["pending", "done"])]
        all: bool,

        /// Only tasks not yet done
        #[arg(long, conflicts_with = "done")]
        pending: bool,

        /// Only completed tasks
        #[arg(long)]
        done: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show task details
    Show {
        /// Task ID
        id: TaskId,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Edit a task
    Edit {
        /// Task ID
        id: TaskId,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New description (empty clears it)
        #[arg(long)]
        content: Option<String>,

        /// New due date
        #[arg(long, conflicts_with = "clear_due")]
        due: Option<String>,

        /// Remove the due date
        #[arg(long)]
        clear_due: bool,
    },

    /// Mark a task as done
    Done {
        /// Task ID
        id: TaskId,
    },

    /// Mark a task as not done
    Undo {
        /// Task ID
        id: TaskId,
    },

    /// Delete a task
    Remove {
        /// Task ID
        id: TaskId,

        /// Skip confirmation
        #[arg(long, short)]
        yes: bool,
    },
}

/// Execute the task command
pub fn execute(cmd: TaskCommand, ctx: &AppContext) -> Result<()> {
    let manager = ctx.task_manager()?;
    let offset = ctx.offset()?;

    match cmd {
        TaskCommand::Add { title, content, due } => add_task(&manager, title, content, due, offset),
        TaskCommand::List { pending, done, json, .. } => list_tasks(&manager, pending, done, json, offset),
        TaskCommand::Show { id, json } => show_task(&manager, id, json, offset),
        TaskCommand::Edit {
            id,
            title,
            content,
            due,
            clear_due,
        } => {
            let due_date = match (due, clear_due) {
                (_, true) => Some(None),
                (Some(input), false) => Some(Some(parse_due(&input, offset)?)),
                (None, false) => None,
            };
            let patch = TaskPatch {
                title,
                content: content.map(Some),
                due_date,
                completed: None,
            };
            edit_task(&manager, id, patch)
        }
        TaskCommand::Done { id } => set_done(&manager, id, true),
        TaskCommand::Undo { id } => set_done(&manager, id, false),
        TaskCommand::Remove { id, yes } => remove_task(&manager, id, yes),
    }
}

fn add_task(
    manager: &TaskManager,
    title: String,
    content: Option<String>,
    due: Option<String>,
    offset: FixedOffset,
) -> Result<()> {
    use colored::Colorize;

    let mut draft = NewTask::new(title);
    draft.content = content;
    if let Some(input) = due {
        draft.due_date = Some(parse_due(&input, offset)?);
    }

    let task = manager.create(draft).context("Failed to add task")?;
    println!("{} Added task #{}: {}", "✓".green(), task.id, task.title);
    Ok(())
}

fn list_tasks(
    manager: &TaskManager,
    pending_only: bool,
    done_only: bool,
    as_json: bool,
    offset: FixedOffset,
) -> Result<()> {
    use colored::Colorize;

    let tasks: Vec<Task> = manager
        .list()?
        .into_iter()
        .filter(|t| !(pending_only && t.completed) && !(done_only && !t.completed))
        .collect();

    if as_json {
        println!("{}", serde_json::to_string_pretty(&tasks)?);
        return Ok(());
    }

    if tasks.is_empty() {
        println!("No tasks found.");
        return Ok(());
    }

    let now = Utc::now();
    for task in &tasks {
        let mark = if task.completed {
            "[x]".green().to_string()
        } else {
            "[ ]".to_string()
        };
        let title = if task.completed {
            task.title.dimmed().to_string()
        } else {
            task.title.clone()
        };

        let due = due_label(task, now, offset)
            .map(|label| format!("  {}", label))
            .unwrap_or_default();

        println!("{} {:>4}  {}{}", mark, format!("#{}", task.id).cyan(), title, due);
    }

    let done = tasks.iter().filter(|t| t.completed).count();
    println!();
    println!("{} of {} done", done, tasks.len());
    Ok(())
}

fn show_task(manager: &TaskManager, id: TaskId, as_json: bool, offset: FixedOffset) -> Result<()> {
    use colored::Colorize;

    let task = manager.get(id)?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&task)?);
        return Ok(());
    }

    println!("{} {}", format!("#{}", task.id).cyan(), task.title.bold());
    println!("  Status:  {}", if task.completed { "done" } else { "pending" });
    println!("  Created: {}", local(&task.created_at, offset));
    println!("  Updated: {}", local(&task.updated_at, offset));
    if let Some(due) = &task.due_date {
        let label = due_label(&task, Utc::now(), offset).unwrap_or_default();
        println!("  Due:     {} ({})", local(due, offset), label);
    }
    if task.has_content() {
        println!();
        println!("{}", task.content.as_deref().unwrap_or_default());
    }
    Ok(())
}

fn edit_task(manager: &TaskManager, id: TaskId, patch: TaskPatch) -> Result<()> {
    use colored::Colorize;

    if patch.is_empty() {
        bail!("Nothing to change. Pass --title, --content, --due or --clear-due");
    }

    let task = manager
        .update(id, patch)
        .with_context(|| format!("Failed to edit task #{}", id))?;
    println!("{} Updated task #{}: {}", "✓".green(), task.id, task.title);
    Ok(())
}

fn set_done(manager: &TaskManager, id: TaskId, completed: bool) -> Result<()> {
    use colored::Colorize;

    let task = manager.set_completed(id, completed)?;
    let state = if completed { "done" } else { "pending" };
    println!("{} Task #{} is {}: {}", "✓".green(), task.id, state, task.title);
    Ok(())
}

fn remove_task(manager: &TaskManager, id: TaskId, yes: bool) -> Result<()> {
    use colored::Colorize;

    let task = manager.get(id)?;

    if !yes {
        use dialoguer::Confirm;

        println!("Task #{}: {}", id, task.title.green());

        let confirmed = Confirm::new()
            .with_prompt("Delete this task?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("Deletion cancelled.");
            return Ok(());
        }
    }

    manager.delete(id)?;
    println!("{} Task #{} deleted.", "✓".green(), id);
    Ok(())
}

/// Deadline label, the plain date for completed tasks
fn due_label(task: &Task, now: DateTime<Utc>, offset: FixedOffset) -> Option<String> {
    use colored::Colorize;

    let due = task.due_date.as_ref()?;
    if task.completed {
        return Some(local(due, offset).dimmed().to_string());
    }

    let status = task.due_status(now, offset)?;
    let label = status.to_string();
    Some(if status.is_overdue() {
        label.red().to_string()
    } else if status.is_imminent() {
        label.yellow().to_string()
    } else {
        label.blue().to_string()
    })
}

fn local(ts: &DateTime<Utc>, offset: FixedOffset) -> String {
    ts.with_timezone(&offset).format("%Y-%m-%d %H:%M").to_string()
}

/// Parse a due date given on the command line
///
/// Inputs without an offset are read at `offset`; a bare date means midnight.
pub fn parse_due(input: &str, offset: FixedOffset) -> Result<DateTime<Utc>> {
    let input = input.trim();

    if let Ok(ts) = DateTime::parse_from_rfc3339(input) {
        return Ok(ts.with_timezone(&Utc));
    }

    let naive = NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M"))
        .or_else(|_| {
            NaiveDate::parse_from_str(input, "%Y-%m-%d")
                .map(|d| d.and_hms_opt(0, 0, 0).unwrap_or_default())
        })
        .with_context(|| {
            format!(
                "Invalid due date '{}'. Use RFC 3339, \"YYYY-MM-DD HH:MM\" or \"YYYY-MM-DD\"",
                input
            )
        })?;

    offset
        .from_local_datetime(&naive)
        .single()
        .map(|ts| ts.with_timezone(&Utc))
        .with_context(|| format!("Ambiguous due date '{}'", input))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    #[test]
    fn test_parse_due_rfc3339() {
        let offset = FixedOffset::east_opt(8 * 3600).unwrap();
        assert_eq!(
            parse_due("2025-01-10T18:00:00Z", offset).unwrap(),
            utc(2025, 1, 10, 18, 0)
        );
    }

    #[test]
    fn test_parse_due_local_datetime() {
        let offset = FixedOffset::east_opt(8 * 3600).unwrap();
        assert_eq!(
            parse_due("2025-01-11 02:00", offset).unwrap(),
            utc(2025, 1, 10, 18, 0)
        );
    }

    #[test]
    fn test_parse_due_date_only() {
        let offset = FixedOffset::east_opt(0).unwrap();
        assert_eq!(parse_due("2025-01-10", offset).unwrap(), utc(2025, 1, 10, 0, 0));
    }

    #[test]
    fn test_parse_due_invalid() {
        let offset = FixedOffset::east_opt(0).unwrap();
        assert!(parse_due("next tuesday", offset).is_err());
    }
}
