//! Time utilities: parsing HH:MM, duration computations, formatting minutes.

use crate::errors::{AppError, AppResult};
use chrono::{NaiveDateTime, NaiveTime};

pub const FMT_DATETIME: &str = "%Y-%m-%d %H:%M";

pub fn parse_time(t: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(t, "%H:%M").ok()
}

pub fn parse_optional_time(input: Option<&String>) -> AppResult<Option<NaiveTime>> {
    if let Some(s) = input {
        let t = parse_time(s).ok_or_else(|| AppError::InvalidTime(s.to_string()))?;
        Ok(Some(t))
    } else {
        Ok(None)
    }
}

/// Minutes from `start` to `end`, clamped at zero so clock skew or malformed
/// input can never produce negative worked time.
pub fn minutes_between(start: NaiveDateTime, end: NaiveDateTime) -> i64 {
    (end - start).num_minutes().max(0)
}

pub fn format_minutes(mins: i64) -> String {
    let sign = if mins < 0 { "-" } else { "" };
    let m = mins.abs();
    format!("{}{:02}:{:02}", sign, m / 60, m % 60)
}

pub fn format_datetime(dt: NaiveDateTime) -> String {
    dt.format(FMT_DATETIME).to_string()
}

pub fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, FMT_DATETIME).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dt(s: &str) -> NaiveDateTime {
        parse_datetime(s).unwrap()
    }

    #[test]
    fn minutes_between_clamps_negative_spans() {
        let a = dt("2025-06-01 09:00");
        let b = dt("2025-06-01 08:30");
        assert_eq!(minutes_between(a, b), 0);
        assert_eq!(minutes_between(b, a), 30);
    }

    #[test]
    fn datetime_round_trip() {
        let d = NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_hms_opt(9, 15, 0)
            .unwrap();
        assert_eq!(parse_datetime(&format_datetime(d)).unwrap(), d);
    }

    #[test]
    fn format_minutes_handles_sign() {
        assert_eq!(format_minutes(570), "09:30");
        assert_eq!(format_minutes(-30), "-00:30");
    }
}
