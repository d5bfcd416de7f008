//! Datetime parsing and daily schedule helpers.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use chrono_tz::Tz;

use crate::error::{AppError, Result};

/// Formats carrying an explicit UTC offset.
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%z",
];

/// Wall-clock formats, interpreted in the reference timezone.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%B %d, %Y %I:%M %p",
    "%B %d, %Y, %I:%M %p",
    "%A, %B %d, %Y %I:%M %p",
    "%A, %B %d, %Y - %I:%M %p",
    "%B %d, %Y %H:%M",
    "%m/%d/%Y %I:%M %p",
    "%m/%d/%Y %H:%M",
];

/// Date-only formats, taken as local midnight.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%B %d, %Y", "%A, %B %d, %Y", "%m/%d/%Y"];

/// Parse a datetime string in any supported format and convert it to `tz`.
///
/// Strings with an offset are converted; strings without one are read as
/// local time in `tz`.
pub fn parse_datetime(raw: &str, tz: Tz) -> Result<DateTime<Tz>> {
    let s = raw.trim();
    if s.is_empty() {
        return Err(AppError::parse("datetime", "empty value"));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&tz));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Ok(dt.with_timezone(&tz));
    }
    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Ok(dt.with_timezone(&tz));
        }
    }

    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
                .map(|d| d.and_time(NaiveTime::MIN))
        })
        .ok_or_else(|| AppError::parse("datetime", format!("unrecognized format '{s}'")))?;

    tz.from_local_datetime(&naive).earliest().ok_or_else(|| {
        AppError::parse(
            "datetime",
            format!("'{s}' does not exist in {}", tz.name()),
        )
    })
}

/// Start of the calendar day after `now`, in `now`'s timezone.
///
/// When local midnight falls in a DST gap, the first valid instant after it
/// is returned.
pub fn next_midnight(now: DateTime<Tz>) -> Option<DateTime<Tz>> {
    let tz = now.timezone();
    let midnight = now.date_naive().succ_opt()?.and_time(NaiveTime::MIN);

    (0..=180).find_map(|minutes| {
        tz.from_local_datetime(&(midnight + Duration::minutes(minutes)))
            .earliest()
    })
}

/// Time left until `wake`, zero if it already passed.
pub fn until(now: DateTime<Tz>, wake: DateTime<Tz>) -> std::time::Duration {
    (wake - now).to_std().unwrap_or_default()
}
