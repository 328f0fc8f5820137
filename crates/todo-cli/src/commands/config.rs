//! Config command
//!
//! Manage todo-export configuration.

use anyhow::{Context, Result};
use clap::Subcommand;
use std::fs;

use super::AppContext;
use todo_core::config::Config;

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show {
        /// Show as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the configuration file path
    Path,

    /// Reset to default configuration
    Reset {
        /// Force reset without confirmation
        #[arg(long)]
        force: bool,
    },

    /// Validate configuration
    Validate,
}

/// Execute the config command
pub fn execute(cmd: ConfigCommand, ctx: &AppContext) -> Result<()> {
    match cmd {
        ConfigCommand::Show { json } => show_config(ctx, json),
        ConfigCommand::Path => {
            println!("{}", ctx.config_path.display());
            Ok(())
        }
        ConfigCommand::Reset { force } => reset_config(ctx, force),
        ConfigCommand::Validate => validate_config(ctx),
    }
}

fn show_config(ctx: &AppContext, as_json: bool) -> Result<()> {
    use colored::Colorize;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&ctx.config)?);
        return Ok(());
    }

    let source = if ctx.config_path.exists() {
        ctx.config_path.display().to_string()
    } else {
        format!("{} (not found, defaults)", ctx.config_path.display())
    };

    println!("{}", "Configuration:".bold().underline());
    println!("{}", source.dimmed());
    println!();
    println!("{}", toml::to_string_pretty(&ctx.config)?);
    println!("{} {}", "data dir:".dimmed(), ctx.data_dir().display());

    Ok(())
}

fn reset_config(ctx: &AppContext, force: bool) -> Result<()> {
    use colored::Colorize;

    let config_path = &ctx.config_path;

    if !force {
        use dialoguer::Confirm;

        let confirmed = Confirm::new()
            .with_prompt("Reset configuration to defaults?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("Reset cancelled.");
            return Ok(());
        }
    }

    // Backup existing
    if config_path.exists() {
        let backup_path = format!(
            "{}.backup-{}",
            config_path.display(),
            chrono::Local::now().format("%Y%m%d-%H%M%S")
        );
        fs::copy(config_path, &backup_path)?;
        println!("{} Backed up to {}", "✓".green(), backup_path);
    }

    Config::default()
        .save(config_path)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    println!("{} Configuration reset to defaults.", "✓".green());

    Ok(())
}

fn validate_config(ctx: &AppContext) -> Result<()> {
    use colored::Colorize;

    // Offsets are checked on load; the format tag is only parsed on use.
    match ctx.config.export.default_format() {
        Ok(format) => {
            println!("{} Configuration is valid", "✓".green());
            println!("  default format: {}", format.display_name());
            println!("  utc offset:     {}", ctx.offset()?);
            Ok(())
        }
        Err(e) => {
            eprintln!("{} {}", "✗".red(), e);
            Err(e).context("Invalid configuration")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_reset_writes_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "[storage]\nuser_id = \"alice\"\n").unwrap();
        let ctx = AppContext::load(Some(&path), None).unwrap();

        reset_config(&ctx, true).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.storage.user_id, "local");
    }

    #[test]
    fn test_validate_rejects_unknown_format() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "[export]\ndefault_format = \"xlsx\"\n").unwrap();
        let ctx = AppContext::load(Some(&path), None).unwrap();

        assert!(validate_config(&ctx).is_err());
    }
}
