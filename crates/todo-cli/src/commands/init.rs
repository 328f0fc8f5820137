//! Init command
//!
//! Write a default configuration file.

use anyhow::{Context, Result};
use clap::Args;

use super::AppContext;
use todo_core::config::Config;

/// Arguments for the init command
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Force overwrite existing configuration
    #[arg(long)]
    pub force: bool,
}

/// Execute the init command
pub fn execute(args: InitArgs, ctx: &AppContext) -> Result<()> {
    use colored::Colorize;

    let config_path = &ctx.config_path;

    if config_path.exists() && !args.force {
        eprintln!(
            "{} {} already exists. Use --force to overwrite.",
            "⚠".yellow(),
            config_path.display()
        );
        return Ok(());
    }

    let config = Config::default();
    config
        .save(config_path)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    println!("{} Created {}", "✓".green(), config_path.display());

    println!("\n{}", "Next steps:".bold());
    println!("  1. Review {}", config_path.display());
    println!("  2. Add a task:");
    println!("     {}", "todo-export task add \"Buy milk\" --due 2025-01-10".cyan());
    println!("  3. Export:");
    println!("     {}", "todo-export export --format markdown".cyan());

    Ok(())
}
