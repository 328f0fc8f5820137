//! Task manager for CRUD operations

use super::model::{NewTask, Task, TaskId, TaskPatch};
use super::persistence::TaskStore;
use crate::clock::{Clock, SystemClock};
use crate::error::{Result, TodoError};
use std::sync::Arc;
use tracing::debug;

/// Manager enforcing task rules on top of a storage backend
///
/// Every operation is scoped to one owner: tasks belonging to other owners
/// are invisible and reported as not found.
pub struct TaskManager {
    /// Storage backend
    store: Arc<dyn TaskStore>,
    /// Owner whose tasks this manager sees
    owner: String,
    /// Source of timestamps
    clock: Arc<dyn Clock>,
}

impl TaskManager {
    /// Create a new task manager for `owner`
    pub fn new(store: impl TaskStore + 'static, owner: impl Into<String>) -> Self {
        Self::with_store(Arc::new(store), owner)
    }

    /// Create a new task manager with shared storage
    pub fn with_store(store: Arc<dyn TaskStore>, owner: impl Into<String>) -> Self {
        Self {
            store,
            owner: owner.into(),
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the clock used for timestamps
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// The owner this manager is scoped to
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Create a task
    pub fn create(&self, draft: NewTask) -> Result<Task> {
        let title = validate_title(&draft.title)?;
        let now = self.clock.now();

        let task = Task {
            id: self.store.next_id()?,
            title,
            content: normalize_content(draft.content),
            completed: false,
            created_at: now,
            updated_at: now,
            due_date: draft.due_date,
            user_id: self.owner.clone(),
        };

        self.store.save(&task)?;
        debug!("Created task {} for {}", task.id, self.owner);
        Ok(task)
    }

    /// Load a task owned by this manager's owner
    pub fn get(&self, id: TaskId) -> Result<Task> {
        let task = self.store.load(id)?;
        if task.user_id != self.owner {
            return Err(TodoError::TaskNotFound(id));
        }
        Ok(task)
    }

    /// All tasks of the owner, newest first
    pub fn list(&self) -> Result<Vec<Task>> {
        let mut tasks: Vec<Task> = self
            .store
            .list()?
            .into_iter()
            .filter(|t| t.user_id == self.owner)
            .collect();

        tasks.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(tasks)
    }

    /// Apply a partial update
    pub fn update(&self, id: TaskId, patch: TaskPatch) -> Result<Task> {
        let mut task = self.get(id)?;

        if patch.is_empty() {
            return Ok(task);
        }

        if let Some(title) = patch.title {
            task.title = validate_title(&title)?;
        }
        if let Some(content) = patch.content {
            task.content = normalize_content(content);
        }
        if let Some(due_date) = patch.due_date {
            task.due_date = due_date;
        }
        if let Some(completed) = patch.completed {
            task.completed = completed;
        }
        task.updated_at = self.clock.now();

        self.store.save(&task)?;
        debug!("Updated task {}", id);
        Ok(task)
    }

    /// Set the completion flag
    pub fn set_completed(&self, id: TaskId, completed: bool) -> Result<Task> {
        self.update(
            id,
            TaskPatch {
                completed: Some(completed),
                ..Default::default()
            },
        )
    }

    /// Flip the completion flag
    pub fn toggle(&self, id: TaskId) -> Result<Task> {
        let task = self.get(id)?;
        self.set_completed(id, !task.completed)
    }

    /// Delete a task
    pub fn delete(&self, id: TaskId) -> Result<()> {
        // Ownership check
        self.get(id)?;
        self.store.delete(id)?;
        debug!("Deleted task {}", id);
        Ok(())
    }
}

fn validate_title(title: &str) -> Result<String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(TodoError::Validation(
            "task title must not be empty".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

fn normalize_content(content: Option<String>) -> Option<String> {
    content.filter(|c| !c.trim().is_empty())
}
