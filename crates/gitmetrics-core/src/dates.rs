//! Date parsing and daily stepping.

use crate::{Error, Result};
use chrono::{DateTime, Days, Duration, FixedOffset, Local, NaiveDate, NaiveDateTime, Offset, TimeZone};

/// Naive date-time layouts accepted besides RFC 3339.
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"];

/// Naive date layouts, read as local midnight.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Parse a user-supplied date.
///
/// Accepts RFC 3339 timestamps as-is. Naive dates and date-times are read
/// in the local time zone.
pub fn parse_date(input: &str) -> Result<DateTime<FixedOffset>> {
    let text = input.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt);
    }

    let naive = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        });

    naive
        .and_then(|naive| Local.from_local_datetime(&naive).earliest())
        .map(|dt| dt.fixed_offset())
        .ok_or_else(|| {
            Error::Parse(format!(
                "Had trouble with \"{}\", try \"YYYY-MM-DD\" format",
                input
            ))
        })
}

/// Current local time.
pub fn now() -> DateTime<FixedOffset> {
    Local::now().fixed_offset()
}

/// Day boundaries from `start` to `end`, both inclusive, one calendar day
/// apart.
///
/// A `start` expressed in the local zone steps by local calendar days, so a
/// range crossing a daylight saving change keeps its last day. Any other
/// offset is kept fixed. Empty when `end` precedes `start`.
pub fn date_range(start: DateTime<FixedOffset>, end: DateTime<FixedOffset>) -> Vec<DateTime<FixedOffset>> {
    if start.with_timezone(&Local).offset().fix() == *start.offset() {
        date_range_in(&Local, start, end)
    } else {
        date_range_in(start.offset(), start, end)
    }
}

/// Day boundaries stepped by calendar days in `tz`.
///
/// Each boundary keeps the wall-clock time of `start`. A wall-clock time
/// skipped by a forward transition moves one hour later. Boundaries after
/// `end` are dropped.
pub fn date_range_in<Tz: TimeZone>(
    tz: &Tz,
    start: DateTime<FixedOffset>,
    end: DateTime<FixedOffset>,
) -> Vec<DateTime<FixedOffset>> {
    if end < start {
        return Vec::new();
    }
    let first = start.with_timezone(tz).naive_local();
    let days = (end.with_timezone(tz).date_naive() - first.date()).num_days();

    (0..=days as u64)
        .filter_map(|i| first.checked_add_days(Days::new(i)))
        .filter_map(|naive| {
            tz.from_local_datetime(&naive)
                .earliest()
                .or_else(|| tz.from_local_datetime(&(naive + Duration::hours(1))).earliest())
        })
        .map(|dt| dt.fixed_offset())
        .filter(|dt| *dt <= end)
        .collect()
}

/// Format as `YYYY-MM-DD`.
pub fn format_day(dt: &DateTime<FixedOffset>) -> String {
    dt.format("%Y-%m-%d").to_string()
}

/// Fail with [`Error::InvalidRange`] when `end` precedes `start`.
pub fn check_range(start: DateTime<FixedOffset>, end: DateTime<FixedOffset>) -> Result<()> {
    if end < start {
        return Err(Error::InvalidRange {
            start: start.to_rfc3339(),
            end: end.to_rfc3339(),
        });
    }
    Ok(())
}
