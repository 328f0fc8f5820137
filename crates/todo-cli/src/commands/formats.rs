//! Formats command
//!
//! List the supported export formats.

use anyhow::Result;

use todo_core::export::ExportFormat;

/// Execute the formats command
pub fn execute() -> Result<()> {
    use colored::Colorize;

    println!("{}", "Export formats:".bold());
    for format in ExportFormat::ALL {
        println!(
            "  {:<10} .{:<5} {:<22} {}",
            format.tag().cyan(),
            format.extension(),
            format.mime_type().dimmed(),
            format.description()
        );
    }

    Ok(())
}
