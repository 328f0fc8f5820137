//! todo-core - Core library for todo-export
//!
//! This crate provides the task model and management rules, deadline
//! classification, configuration, and the multi-format export engine.

pub mod error;
pub mod clock;
pub mod config;
pub mod task;
pub mod export;

pub use error::{Result, TodoError};
