//! todo-export - personal task list with multi-format export
//!
//! ## Quick Start
//!
//! ```bash
//! # Create a config in the current directory
//! todo-export init
//!
//! # Add and complete tasks
//! todo-export task add "Buy milk" --due "2025-01-10 18:00"
//! todo-export task done 1
//!
//! # Export to one format, or back up to all of them
//! todo-export export --format ical
//! todo-export batch
//! ```

mod commands;

fn main() {
    if let Err(err) = commands::run() {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}
