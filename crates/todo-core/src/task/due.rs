//! Deadline classification for display

use chrono::{DateTime, Duration, FixedOffset, Utc};
use std::fmt;

/// Where a deadline falls relative to now
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueStatus {
    /// Past due by this many (started) days
    Overdue { days: i64 },
    /// Due later on the current local day
    Today,
    /// Due on the next local day
    Tomorrow,
    /// Due within a week
    InDays(i64),
    /// Due more than a week out
    Later,
}

impl DueStatus {
    /// Classify `due` against `now`, comparing calendar days at `offset`
    pub fn classify(due: DateTime<Utc>, now: DateTime<Utc>, offset: FixedOffset) -> Self {
        if due < now {
            return DueStatus::Overdue {
                days: ceil_days(now - due),
            };
        }

        let due_day = due.with_timezone(&offset).date_naive();
        let today = now.with_timezone(&offset).date_naive();

        if due_day == today {
            return DueStatus::Today;
        }
        if today.succ_opt() == Some(due_day) {
            return DueStatus::Tomorrow;
        }

        let days = ceil_days(due - now);
        if days <= 7 {
            DueStatus::InDays(days)
        } else {
            DueStatus::Later
        }
    }

    /// Whether the deadline has passed
    pub fn is_overdue(&self) -> bool {
        matches!(self, DueStatus::Overdue { .. })
    }

    /// Whether the deadline is today or tomorrow
    pub fn is_imminent(&self) -> bool {
        matches!(self, DueStatus::Today | DueStatus::Tomorrow)
    }
}

impl fmt::Display for DueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DueStatus::Overdue { days } => write!(f, "overdue by {} day(s)", days),
            DueStatus::Today => write!(f, "due today"),
            DueStatus::Tomorrow => write!(f, "due tomorrow"),
            DueStatus::InDays(days) => write!(f, "due in {} days", days),
            DueStatus::Later => write!(f, "due later"),
        }
    }
}

fn ceil_days(span: Duration) -> i64 {
    let ms = span.num_milliseconds();
    let day = Duration::days(1).num_milliseconds();
    (ms + day - 1) / day
}
