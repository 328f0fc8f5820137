//! Configuration management for todo-export

use crate::clock::{offset_from_minutes, LocaleFormatter};
use crate::error::Result;
use crate::export::{BatchOptions, ExportFormat, ExportOptions, DEFAULT_BATCH_PREFIX};
use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Export settings
    pub export: ExportConfig,
    /// Storage settings
    pub storage: StorageConfig,
}

impl Config {
    /// Load from a TOML file, falling back to defaults if it does not exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Write as pretty TOML, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        debug!("Saved config to {:?}", path);
        Ok(())
    }

    /// Check values that serde cannot
    pub fn validate(&self) -> Result<()> {
        self.export.utc_offset()?;
        Ok(())
    }
}

/// Export-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Format tag used when none is given
    pub default_format: String,
    /// Include completed tasks
    pub include_completed: bool,
    /// Include due dates
    pub include_due_dates: bool,
    /// Directory exports are written to
    pub output_dir: PathBuf,
    /// Filename prefix of batch backups
    pub batch_prefix: String,
    /// Offset for human-readable dates, in minutes east of UTC
    pub utc_offset_minutes: i32,
}

impl ExportConfig {
    /// Parse the configured default format
    pub fn default_format(&self) -> Result<ExportFormat> {
        self.default_format.parse()
    }

    /// Options for a single export using the configured defaults
    pub fn options(&self, format: ExportFormat) -> ExportOptions {
        ExportOptions::new(format)
            .include_completed(self.include_completed)
            .include_due_dates(self.include_due_dates)
    }

    /// Options for a batch export using the configured defaults
    pub fn batch_options(&self) -> BatchOptions {
        BatchOptions {
            prefix: self.batch_prefix.clone(),
            include_completed: self.include_completed,
            include_due_dates: self.include_due_dates,
            ..BatchOptions::default()
        }
    }

    /// The configured offset
    pub fn utc_offset(&self) -> Result<FixedOffset> {
        offset_from_minutes(self.utc_offset_minutes)
    }

    /// Formatter at the configured offset
    pub fn formatter(&self) -> Result<LocaleFormatter> {
        self.utc_offset().map(LocaleFormatter::new)
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            default_format: ExportFormat::Json.tag().to_string(),
            include_completed: true,
            include_due_dates: true,
            output_dir: PathBuf::from("."),
            batch_prefix: DEFAULT_BATCH_PREFIX.to_string(),
            utc_offset_minutes: LocaleFormatter::DEFAULT_OFFSET_MINUTES,
        }
    }
}

/// Storage-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Data directory; the platform data directory when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    /// Owner of the tasks this installation manages
    pub user_id: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            user_id: "local".to_string(),
        }
    }
}
