//! Shared parsing and rendering helpers for commands.

use anyhow::{Result, anyhow};
use chrono::{NaiveDate, NaiveDateTime, Timelike};

/// Differences smaller than this are rendered as a zero balance.
pub const DISPLAY_EPSILON: f64 = 1e-3;

/// Parses a point in time given as `HH:MM` (on `today`) or `YYYY-MM-DDTHH:MM`.
pub fn parse_time_arg(raw: &str, today: NaiveDate) -> Result<NaiveDateTime> {
    if let Ok(time) = chrono::NaiveTime::parse_from_str(raw, "%H:%M") {
        return Ok(today.and_time(time));
    }
    parse_datetime_arg(raw)
}

/// Parses a full timestamp, `YYYY-MM-DDTHH:MM` with optional seconds.
pub fn parse_datetime_arg(raw: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .map_err(|_| anyhow!("invalid time '{raw}', expected HH:MM or YYYY-MM-DDTHH:MM"))
}

/// Parses a calendar date, `YYYY-MM-DD`.
pub fn parse_date_arg(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| anyhow!("invalid date '{raw}', expected YYYY-MM-DD"))
}

/// Truncates a timestamp to minute precision, matching the stored format.
pub fn truncate_to_minute(instant: NaiveDateTime) -> NaiveDateTime {
    instant
        .with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(instant)
}

/// Formats fractional hours as `7h 30m`. Sub-minute remainders are dropped.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn format_hours(hours: f64) -> String {
    let total_minutes = (hours.max(0.0) * 60.0).round() as u64;
    let (h, m) = (total_minutes / 60, total_minutes % 60);
    if h > 0 {
        format!("{h}h {m:02}m")
    } else {
        format!("{m}m")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    #[test]
    fn time_arg_accepts_bare_and_full_forms() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
        assert_eq!(
            parse_time_arg("09:30", today).unwrap(),
            today.and_time(NaiveTime::from_hms_opt(9, 30, 0).unwrap())
        );
        assert_eq!(
            parse_time_arg("2025-02-01T08:15", today).unwrap(),
            NaiveDate::from_ymd_opt(2025, 2, 1)
                .unwrap()
                .and_time(NaiveTime::from_hms_opt(8, 15, 0).unwrap())
        );
        assert!(parse_time_arg("soonish", today).is_err());
    }

    #[test]
    fn hours_render_as_hours_and_minutes() {
        assert_eq!(format_hours(7.5), "7h 30m");
        assert_eq!(format_hours(0.25), "15m");
        assert_eq!(format_hours(0.0), "0m");
        assert_eq!(format_hours(-2.0), "0m");
        assert_eq!(format_hours(8.0), "8h 00m");
    }

    #[test]
    fn truncation_drops_seconds() {
        let instant = NaiveDate::from_ymd_opt(2025, 1, 6)
            .unwrap()
            .and_time(NaiveTime::from_hms_opt(9, 30, 42).unwrap());
        assert_eq!(
            truncate_to_minute(instant).time(),
            NaiveTime::from_hms_opt(9, 30, 0).unwrap()
        );
    }
}
