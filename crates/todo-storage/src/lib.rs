//! todo-storage - Storage library for todo-export
//!
//! This crate provides the file-system task store behind the task manager.

mod task_store;

pub use task_store::{FileSystemTaskStore, TaskFile, CURRENT_SCHEMA_VERSION};
