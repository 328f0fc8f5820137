//! Task data models

use super::due::DueStatus;
use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

/// Task identifier, stable for the task's lifetime
pub type TaskId = i64;

/// A single to-do item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique task identifier
    pub id: TaskId,
    /// Display title, never empty
    pub title: String,
    /// Rich-text description as markup
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Whether the task is done
    #[serde(default)]
    pub completed: bool,
    /// When the task was created
    pub created_at: DateTime<Utc>,
    /// When the task was last modified
    pub updated_at: DateTime<Utc>,
    /// Deadline, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    /// Owner of the task
    #[serde(default)]
    pub user_id: String,
}

impl Task {
    /// Create an incomplete task created at `now`
    pub fn new(id: TaskId, title: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: title.into(),
            content: None,
            completed: false,
            created_at: now,
            updated_at: now,
            due_date: None,
            user_id: String::new(),
        }
    }

    /// Set the deadline
    pub fn with_due_date(mut self, due: DateTime<Utc>) -> Self {
        self.due_date = Some(due);
        self
    }

    /// Set the description
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Set the completion flag
    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }

    /// Set the owner
    pub fn with_owner(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = user_id.into();
        self
    }

    /// Whether the task carries a non-empty description
    pub fn has_content(&self) -> bool {
        self.content
            .as_deref()
            .map(|c| !c.trim().is_empty())
            .unwrap_or(false)
    }

    /// Deadline status relative to `now`, `None` without a due date
    pub fn due_status(&self, now: DateTime<Utc>, offset: FixedOffset) -> Option<DueStatus> {
        self.due_date
            .map(|due| DueStatus::classify(due, now, offset))
    }
}

/// Draft for a new task
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub title: String,
    pub content: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
}

impl NewTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn due(mut self, due: DateTime<Utc>) -> Self {
        self.due_date = Some(due);
        self
    }
}

/// Partial update of a task
///
/// Nested options distinguish "leave unchanged" (`None`) from "clear"
/// (`Some(None)`).
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub content: Option<Option<String>>,
    pub due_date: Option<Option<DateTime<Utc>>>,
    pub completed: Option<bool>,
}

impl TaskPatch {
    /// Whether the patch changes nothing
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.due_date.is_none()
            && self.completed.is_none()
    }
}
