//! Date parsing and the period filter grammar shared by `list` and `record`.

use crate::errors::{AppError, AppResult};
use chrono::NaiveDate;

pub fn parse_date(d: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()
}

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Translate a period expression into SQL conditions on a TEXT `date` column.
///
/// Supported formats:
/// - `YYYY`, `YYYY-MM`, `YYYY-MM-DD` — a single year/month/day
/// - `start:end` — a range in any one of those formats (same length both sides)
/// - `all` — no filtering
///
/// Returns (conditions, params); both empty for `all` / `None`.
pub fn period_conditions(period: Option<&str>) -> AppResult<(Vec<String>, Vec<String>)> {
    let mut conditions = Vec::new();
    let mut params = Vec::new();

    let Some(p) = period else {
        return Ok((conditions, params));
    };

    if p.eq_ignore_ascii_case("all") {
        return Ok((conditions, params));
    }

    if let Some((start_raw, end_raw)) = p.split_once(':') {
        let start = start_raw.trim();
        let end = end_raw.trim();

        if start.is_empty() || end.is_empty() || start.len() != end.len() {
            return Err(AppError::InvalidPeriod(p.to_string()));
        }

        let expr = strftime_expr(start.len()).ok_or_else(|| AppError::InvalidPeriod(p.to_string()))?;
        conditions.push(format!("{expr} >= ?"));
        conditions.push(format!("{expr} <= ?"));
        params.push(start.to_string());
        params.push(end.to_string());
    } else {
        let expr = strftime_expr(p.len()).ok_or_else(|| AppError::InvalidPeriod(p.to_string()))?;
        conditions.push(format!("{expr} = ?"));
        params.push(p.to_string());
    }

    Ok((conditions, params))
}

fn strftime_expr(len: usize) -> Option<&'static str> {
    match len {
        4 => Some("strftime('%Y', date)"),
        7 => Some("strftime('%Y-%m', date)"),
        10 => Some("date"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_month_filter() {
        let (conds, params) = period_conditions(Some("2025-06")).unwrap();
        assert_eq!(conds, vec!["strftime('%Y-%m', date) = ?"]);
        assert_eq!(params, vec!["2025-06"]);
    }

    #[test]
    fn day_range_filter() {
        let (conds, params) = period_conditions(Some("2025-06-01:2025-06-10")).unwrap();
        assert_eq!(conds.len(), 2);
        assert_eq!(params, vec!["2025-06-01", "2025-06-10"]);
    }

    #[test]
    fn all_bypasses_filtering() {
        let (conds, params) = period_conditions(Some("all")).unwrap();
        assert!(conds.is_empty());
        assert!(params.is_empty());
    }

    #[test]
    fn mismatched_range_rejected() {
        assert!(period_conditions(Some("2025:2025-06")).is_err());
        assert!(period_conditions(Some("junk")).is_err());
    }
}
