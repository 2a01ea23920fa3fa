use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use chrono_tz::Tz;
use thiserror::Error;

/// `January 5, 2024`
pub const LONG_DATE_FORMAT: &str = "%B %-d, %Y";

/// `Jan 5, 2024`
pub const SHORT_DATE_FORMAT: &str = "%b %-d, %Y";

#[derive(Error, Debug, PartialEq, Eq)]
#[error("invalid date '{date}': {reason}")]
pub struct ParseDateError {
    pub date: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Instant {
    Date(NaiveDate),
    DateTime(DateTime<FixedOffset>),
}

/// The date a piece of content was published.
///
/// Keeps the original ISO-8601 text alongside the parsed value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishDate {
    raw: String,
    instant: Instant,
}

impl PublishDate {
    /// Parses either a plain `YYYY-MM-DD` date or an RFC 3339 timestamp.
    pub fn parse(date: &str) -> Result<Self, ParseDateError> {
        let date = date.trim();
        let error = |reason: String| ParseDateError {
            date: date.to_string(),
            reason,
        };

        let instant = if date.contains('T') {
            match DateTime::parse_from_rfc3339(date) {
                Ok(datetime) => Instant::DateTime(datetime),
                // Local timestamps without an offset are taken to be UTC.
                Err(err) => NaiveDateTime::parse_from_str(date, "%Y-%m-%dT%H:%M:%S%.f")
                    .map(|datetime| Instant::DateTime(datetime.and_utc().fixed_offset()))
                    .map_err(|_| error(err.to_string()))?,
            }
        } else {
            NaiveDate::parse_from_str(date, "%Y-%m-%d")
                .map(Instant::Date)
                .map_err(|err| error(err.to_string()))?
        };

        Ok(Self {
            raw: date.to_string(),
            instant,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Formats the date using the given `strftime` format.
    ///
    /// Timestamps are shifted into `timezone`. Plain dates are formatted as-is,
    /// since they have no time of day to shift.
    pub fn format(&self, format: &str, timezone: Tz) -> String {
        match &self.instant {
            Instant::Date(date) => date.format(format).to_string(),
            Instant::DateTime(datetime) => datetime
                .with_timezone(&timezone)
                .format(format)
                .to_string(),
        }
    }

    /// Returns the date in the `YYYY-MM-DD` form used by sitemaps.
    pub fn to_w3c_date(&self) -> String {
        match &self.instant {
            Instant::Date(date) => date.format("%Y-%m-%d").to_string(),
            Instant::DateTime(datetime) => datetime.format("%Y-%m-%d").to_string(),
        }
    }

    fn sort_key(&self) -> NaiveDateTime {
        match &self.instant {
            Instant::Date(date) => date.and_time(NaiveTime::default()),
            Instant::DateTime(datetime) => datetime.naive_utc(),
        }
    }
}

impl PartialOrd for PublishDate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PublishDate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key()
            .cmp(&other.sort_key())
            .then_with(|| self.raw.cmp(&other.raw))
    }
}

impl fmt::Display for PublishDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}
