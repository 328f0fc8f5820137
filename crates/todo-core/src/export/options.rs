//! Export formats and per-call options

use crate::error::{Result, TodoError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Structured-data snapshot
    Json,
    /// Spreadsheet rows
    Csv,
    /// iCalendar VTODO document
    Ical,
    /// Markdown checklist
    Markdown,
}

impl ExportFormat {
    /// Every format, in tag order
    pub const ALL: [ExportFormat; 4] = [
        ExportFormat::Json,
        ExportFormat::Csv,
        ExportFormat::Ical,
        ExportFormat::Markdown,
    ];

    /// The format tag
    pub fn tag(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::Ical => "ical",
            ExportFormat::Markdown => "markdown",
        }
    }

    /// File extension, without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::Ical => "ics",
            ExportFormat::Markdown => "md",
        }
    }

    /// MIME type of the rendered payload
    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Csv => "text/csv",
            ExportFormat::Ical => "text/calendar",
            ExportFormat::Markdown => "text/markdown",
        }
    }

    /// Human-readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            ExportFormat::Json => "JSON",
            ExportFormat::Csv => "CSV",
            ExportFormat::Ical => "iCal",
            ExportFormat::Markdown => "Markdown",
        }
    }

    /// One-line description of what the format is good for
    pub fn description(&self) -> &'static str {
        match self {
            ExportFormat::Json => "Structured data, suited to scripts and backups",
            ExportFormat::Csv => "Spreadsheet table, opens in Excel and similar tools",
            ExportFormat::Ical => "Calendar to-dos, importable into calendar apps",
            ExportFormat::Markdown => "Readable checklist document, suited to sharing",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for ExportFormat {
    type Err = TodoError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            "ical" => Ok(ExportFormat::Ical),
            "markdown" => Ok(ExportFormat::Markdown),
            _ => Err(TodoError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Options for a single export call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    /// Output format
    pub format: ExportFormat,
    /// Keep completed tasks
    pub include_completed: bool,
    /// Emit due-date fields
    pub include_due_dates: bool,
    /// Custom base filename (without extension)
    pub filename: Option<String>,
}

impl ExportOptions {
    /// Options with the defaults: everything included, derived filename
    pub fn new(format: ExportFormat) -> Self {
        Self {
            format,
            include_completed: true,
            include_due_dates: true,
            filename: None,
        }
    }

    /// Options for a format given by tag
    pub fn from_tag(tag: &str) -> Result<Self> {
        tag.parse().map(Self::new)
    }

    /// Set whether completed tasks are exported
    pub fn include_completed(mut self, include: bool) -> Self {
        self.include_completed = include;
        self
    }

    /// Set whether due dates are exported
    pub fn include_due_dates(mut self, include: bool) -> Self {
        self.include_due_dates = include;
        self
    }

    /// Set a custom base filename
    pub fn filename(mut self, name: impl Into<String>) -> Self {
        self.filename = Some(name.into());
        self
    }

    /// The custom base filename, if one was given and is a plain file name
    pub fn custom_filename(&self) -> Option<&str> {
        self.filename.as_deref().and_then(plain_base_name)
    }
}

/// `name` trimmed, if it names a file inside the output directory
///
/// Blank names, `.`/`..` and anything holding a path separator are rejected.
pub fn plain_base_name(name: &str) -> Option<&str> {
    let name = name.trim();
    let plain = !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0']);
    plain.then_some(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_lookup_tables() {
        let exts: Vec<_> = ExportFormat::ALL.iter().map(|f| f.extension()).collect();
        assert_eq!(exts, vec!["json", "csv", "ics", "md"]);

        let mimes: Vec<_> = ExportFormat::ALL.iter().map(|f| f.mime_type()).collect();
        assert_eq!(
            mimes,
            vec!["application/json", "text/csv", "text/calendar", "text/markdown"]
        );
    }

    #[test]
    fn test_parse_tags() {
        for format in ExportFormat::ALL {
            assert_eq!(format.tag().parse::<ExportFormat>().unwrap(), format);
        }
        assert_eq!(" ICAL ".parse::<ExportFormat>().unwrap(), ExportFormat::Ical);
    }

    #[test]
    fn test_parse_unsupported() {
        match "xlsx".parse::<ExportFormat>() {
            Err(TodoError::UnsupportedFormat(tag)) => assert_eq!(tag, "xlsx"),
            other => panic!("expected UnsupportedFormat, got {:?}", other),
        }
        // The extension is not a tag
        assert!("ics".parse::<ExportFormat>().is_err());
        assert!("md".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_options_defaults() {
        let options = ExportOptions::new(ExportFormat::Csv);
        assert!(options.include_completed);
        assert!(options.include_due_dates);
        assert!(options.filename.is_none());
    }

    #[test]
    fn test_from_tag() {
        let options = ExportOptions::from_tag("markdown").unwrap();
        assert_eq!(options.format, ExportFormat::Markdown);
        assert!(matches!(
            ExportOptions::from_tag("pdf"),
            Err(TodoError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_custom_filename_blank() {
        assert_eq!(ExportOptions::new(ExportFormat::Json).filename("  ").custom_filename(), None);
        assert_eq!(
            ExportOptions::new(ExportFormat::Json).filename("backup").custom_filename(),
            Some("backup")
        );
    }

    #[test]
    fn test_custom_filename_with_path_is_dropped() {
        for name in ["../escape", "sub/tasks", "..\\tasks", "/etc/passwd", "..", "."] {
            let options = ExportOptions::new(ExportFormat::Json).filename(name);
            assert_eq!(options.custom_filename(), None, "{}", name);
        }
        assert_eq!(plain_base_name(" my..tasks "), Some("my..tasks"));
    }

    #[test]
    fn test_serde_tag() {
        let json = serde_json::to_string(&ExportFormat::Ical).unwrap();
        assert_eq!(json, "\"ical\"");
    }
}
