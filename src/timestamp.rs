//! Timestamp conversion for transaction dates
//!
//! Accepted text forms:
//! - `YYYY-MM-DD` and `YYYY/MM/DD` (midnight)
//! - either date form followed by ` HH:MM:SS` or `THH:MM:SS`, optional fractional seconds
//! - RFC 3339 with an offset, converted to UTC
//!
//! Integer cells are Unix epoch seconds. Frames store everything as
//! microseconds since the epoch.

use crate::error::{Result, StatError};
use chrono::{DateTime, NaiveDate, NaiveDateTime};

const SECONDS_PER_DAY: i64 = 86_400;

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%dT%H:%M:%S%.f",
];

/// Parse a date or timestamp string
///
/// # Example
/// ```
/// use rfm_oec::timestamp::parse_timestamp;
///
/// let ts = parse_timestamp("2016/04/01").unwrap();
/// assert_eq!(ts.to_string(), "2016-04-01 00:00:00");
/// ```
pub fn parse_timestamp(input: &str) -> Result<NaiveDateTime> {
    let s = input.trim();

    for fmt in DATETIME_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(ts);
        }
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(date.and_time(chrono::NaiveTime::MIN));
        }
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Ok(ts.naive_utc());
    }

    Err(StatError::Parse(format!("'{}' is not a recognized date", input)))
}

/// Timestamp from Unix epoch seconds
pub fn from_epoch_seconds(secs: i64) -> Result<NaiveDateTime> {
    DateTime::from_timestamp(secs, 0)
        .map(|ts| ts.naive_utc())
        .ok_or_else(|| StatError::Parse(format!("epoch seconds {} out of range", secs)))
}

/// Microseconds since the Unix epoch, the unit of datetime frame columns
pub fn to_epoch_micros(ts: NaiveDateTime) -> i64 {
    ts.and_utc().timestamp_micros()
}

pub fn from_epoch_micros(micros: i64) -> Result<NaiveDateTime> {
    let nanos = (micros.rem_euclid(1_000_000) * 1_000) as u32;
    DateTime::from_timestamp(micros.div_euclid(1_000_000), nanos)
        .map(|ts| ts.naive_utc())
        .ok_or_else(|| StatError::Parse(format!("epoch microseconds {} out of range", micros)))
}

/// Whole days from `earlier` to `later`, floored toward negative infinity
///
/// Matches the day component of a timedelta: 1 hour in the past is `-1` days,
/// 23 hours in the future is `0` days, half a second in the past is `-1` days.
pub fn whole_days_between(later: NaiveDateTime, earlier: NaiveDateTime) -> i64 {
    let delta = later - earlier;
    // num_seconds truncates toward zero; a negative sub-second part must round down
    let seconds = delta.num_seconds() - i64::from(delta.subsec_nanos() < 0);
    seconds.div_euclid(SECONDS_PER_DAY)
}
