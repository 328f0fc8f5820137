//! Wall clock and date formatting capabilities
//!
//! Exports and task mutations never call `Utc::now()` directly; they go
//! through a [`Clock`] so that tests can freeze time. Human-readable dates in
//! the CSV and Markdown payloads go through a [`DateFormatter`].

use crate::error::{Result, TodoError};
use chrono::{DateTime, FixedOffset, Offset, Utc};

/// Source of the current time
pub trait Clock: Send + Sync {
    /// Current instant in UTC
    fn now(&self) -> DateTime<Utc>;
}

/// The system wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at a single instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    /// Create a clock that always returns `at`
    pub fn new(at: DateTime<Utc>) -> Self {
        Self(at)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Locale-specific rendering of a timestamp
pub trait DateFormatter: Send + Sync {
    /// Format a timestamp for display
    fn format(&self, ts: &DateTime<Utc>) -> String;
}

/// Formatter producing the zh-CN `toLocaleString` shape, e.g. `2025/1/10 18:00:00`
///
/// Month and day are not zero-padded, the time is 24-hour and padded. The
/// timestamp is shifted by a fixed offset rather than a named time zone.
#[derive(Debug, Clone, Copy)]
pub struct LocaleFormatter {
    offset: FixedOffset,
}

impl LocaleFormatter {
    /// Offset used when none is configured (UTC+08:00)
    pub const DEFAULT_OFFSET_MINUTES: i32 = 480;

    /// Create a formatter at the given offset
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    /// Create a formatter from an offset in minutes east of UTC
    pub fn from_offset_minutes(minutes: i32) -> Result<Self> {
        offset_from_minutes(minutes).map(Self::new)
    }

    /// Formatter for China Standard Time
    pub fn zh_cn() -> Self {
        Self::new(FixedOffset::east_opt(Self::DEFAULT_OFFSET_MINUTES * 60).unwrap_or(utc_offset()))
    }

    /// Formatter that renders in UTC
    pub fn utc() -> Self {
        Self::new(utc_offset())
    }

    /// The offset this formatter renders at
    pub fn offset(&self) -> FixedOffset {
        self.offset
    }
}

impl Default for LocaleFormatter {
    fn default() -> Self {
        Self::zh_cn()
    }
}

impl DateFormatter for LocaleFormatter {
    fn format(&self, ts: &DateTime<Utc>) -> String {
        ts.with_timezone(&self.offset)
            .format("%Y/%-m/%-d %H:%M:%S")
            .to_string()
    }
}

/// Convert an offset in minutes east of UTC into a `FixedOffset`
pub fn offset_from_minutes(minutes: i32) -> Result<FixedOffset> {
    minutes
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)
        .ok_or_else(|| TodoError::Config(format!("UTC offset out of range: {} minutes", minutes)))
}

fn utc_offset() -> FixedOffset {
    Utc.fix()
}
