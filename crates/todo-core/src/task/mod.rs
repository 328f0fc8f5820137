//! Task management module
//!
//! This module holds the task model, the storage trait the task data source
//! implements, and the manager that applies ownership, validation and
//! timestamp rules on top of it.
//!
//! # Example
//!
//! ```ignore
//! use todo_core::task::{NewTask, TaskManager};
//!
//! let storage = FileSystemTaskStore::new("/tmp/todo-export")?;
//! let manager = TaskManager::new(storage, "local");
//!
//! let task = manager.create(NewTask::new("Buy milk"))?;
//! manager.set_completed(task.id, true)?;
//!
//! // Newest first, the order exports receive
//! let tasks = manager.list()?;
//! ```

mod due;
mod manager;
mod model;
mod persistence;

pub use due::DueStatus;
pub use manager::TaskManager;
pub use model::{NewTask, Task, TaskId, TaskPatch};
pub use persistence::TaskStore;

#[cfg(test)]
pub use persistence::memory::MemoryTaskStore;
