//! Task storage trait

use super::model::{Task, TaskId};
use crate::error::Result;

/// Trait for task storage backends
///
/// Stores are plain persistence: ownership checks, validation and timestamps
/// live in [`super::TaskManager`].
pub trait TaskStore: Send + Sync {
    /// Insert or replace a task
    fn save(&self, task: &Task) -> Result<()>;

    /// Load a task by ID
    fn load(&self, id: TaskId) -> Result<Task>;

    /// List every stored task, in no particular order
    fn list(&self) -> Result<Vec<Task>>;

    /// Delete a task
    fn delete(&self, id: TaskId) -> Result<()>;

    /// Check if a task exists
    fn exists(&self, id: TaskId) -> bool;

    /// Identifier for the next new task
    ///
    /// Identifiers are never reissued, not even after the task holding the
    /// highest one is deleted.
    fn next_id(&self) -> Result<TaskId>;
}
