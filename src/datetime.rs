//! Date parsing for `--set-expire` and timestamp rendering.
//!
//! Accepted inputs:
//!
//! - `2024-05-01T12:00:00`, `2024-05-01 12:00:00`, `2024-05-01`: naive,
//!   interpreted in local time (or UTC with `--utc`)
//! - RFC 3339 with an explicit offset, e.g. `2024-05-01T12:00:00+02:00`

use anyhow::{anyhow, Result};
use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::codec::layout::TIMESTAMP_ABSENT;

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

/// A parsed `--set-expire` value.
///
/// Naive values are resolved to a zone only once the CLI knows whether
/// `--utc` was given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpireDate {
    Naive(NaiveDateTime),
    Zoned(DateTime<FixedOffset>),
}

impl ExpireDate {
    /// Epoch seconds for this date.
    ///
    /// # Errors
    ///
    /// Fails for local times that do not exist (DST gaps).
    pub fn to_epoch(self, utc: bool) -> Result<i64> {
        match self {
            Self::Zoned(dt) => Ok(dt.timestamp()),
            Self::Naive(naive) if utc => Ok(Utc.from_utc_datetime(&naive).timestamp()),
            Self::Naive(naive) => Local
                .from_local_datetime(&naive)
                .earliest()
                .map(|dt| dt.timestamp())
                .ok_or_else(|| anyhow!("{} does not exist in the local time zone", naive)),
        }
    }
}

/// Parse a date given on the command line.
///
/// # Errors
///
/// Returns a message naming the input when no format matches.
///
/// # Examples
///
/// ```
/// use nginx_cache_info::datetime::parse_expire_date;
///
/// let date = parse_expire_date("2017-07-14T02:40:00").unwrap();
/// assert_eq!(date.to_epoch(true).unwrap(), 1_500_000_000);
/// ```
pub fn parse_expire_date(s: &str) -> Result<ExpireDate, String> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(ExpireDate::Zoned(dt));
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(ExpireDate::Naive(naive));
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return Ok(ExpireDate::Naive(naive));
        }
    }
    Err(format!("Unable to parse date: '{s}'"))
}

/// Current time in epoch seconds, clamped to zero before 1970.
#[must_use]
pub fn now_epoch() -> u64 {
    u64::try_from(Utc::now().timestamp()).unwrap_or(0)
}

/// Render a header timestamp.
///
/// Returns `None` for nginx's "not set" value and for values chrono cannot
/// represent.
#[must_use]
pub fn format_timestamp(secs: u64, utc: bool) -> Option<String> {
    if secs == TIMESTAMP_ABSENT {
        return None;
    }
    let dt = DateTime::from_timestamp(i64::try_from(secs).ok()?, 0)?;
    let rendered = if utc {
        dt.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    } else {
        dt.with_timezone(&Local)
            .format("%Y-%m-%dT%H:%M:%S%:z")
            .to_string()
    };
    Some(rendered)
}
