//! Date range for fetching events.

use chrono::{DateTime, Duration, NaiveDate, SecondsFormat, Utc};

use crate::error::{CalSyncError, CalSyncResult};

/// Half-open window `[from, to)` of events to sync.
#[derive(Debug, Clone, PartialEq)]
pub struct DateRange {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl DateRange {
    /// `[now, now + days)`
    pub fn upcoming(days: i64) -> CalSyncResult<Self> {
        if days <= 0 {
            return Err(CalSyncError::Config(format!(
                "Number of days must be positive, got {}",
                days
            )));
        }

        let now = Utc::now();
        let to = Duration::try_days(days)
            .and_then(|span| now.checked_add_signed(span))
            .ok_or_else(|| {
                CalSyncError::Config(format!("{} days from now is out of range", days))
            })?;

        Ok(DateRange { from: now, to })
    }

    /// Parse YYYY-MM-DD bounds (both read as midnight UTC).
    pub fn from_args(from: &str, to: &str) -> CalSyncResult<Self> {
        let from = parse_date(from)?;
        let to = parse_date(to)?;

        if to <= from {
            return Err(CalSyncError::Config(format!(
                "Range end {} must be after start {}",
                to.date_naive(),
                from.date_naive()
            )));
        }

        Ok(DateRange { from, to })
    }

    pub fn from_rfc3339(&self) -> String {
        self.from.to_rfc3339_opts(SecondsFormat::Secs, true)
    }

    pub fn to_rfc3339(&self) -> String {
        self.to.to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}

fn parse_date(s: &str) -> CalSyncResult<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
        CalSyncError::Config(format!("Invalid date format '{}'. Expected YYYY-MM-DD", s))
    })?;
    Ok(date.and_time(chrono::NaiveTime::MIN).and_utc())
}
