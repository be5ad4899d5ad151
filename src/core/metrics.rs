//! The one shared attendance policy.
//!
//! Every path that needs late/early-out/overtime/attendance-% derivation
//! (clock-out, rebuild, reporting) goes through `WorkPolicy::evaluate`, so
//! the thresholds have exactly one definition and cannot drift between call
//! sites. The values come from the config file, not from constants.

use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::models::leave::DayPart;
use crate::utils::time::{minutes_between, parse_time};
use chrono::{NaiveDateTime, NaiveTime};
use serde::Serialize;

#[derive(Debug, Clone, Copy)]
pub struct WorkPolicy {
    /// Clock-ins at or after this local time are late.
    pub late_after: NaiveTime,
    /// Net minutes of a standard day; below this is an early-out and it is
    /// also the base of the attendance percentage.
    pub standard_day_minutes: i64,
    /// Net minutes above which the day counts as overtime.
    pub overtime_after_minutes: i64,
    /// Minutes debited for a full / half leave day.
    pub full_day_leave_minutes: i64,
    pub half_day_leave_minutes: i64,
}

/// Pure derivation from (clock_in, clock_out, break_minutes). No I/O.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct DayMetrics {
    pub work_minutes: i64,
    pub break_minutes: i64,
    pub overtime_minutes: i64,
    pub is_late: bool,
    pub is_early_out: bool,
    pub is_overtime: bool,
    pub attendance_pct: i64,
}

impl WorkPolicy {
    pub fn from_config(cfg: &Config) -> AppResult<Self> {
        let late_after = parse_time(&cfg.late_after)
            .ok_or_else(|| AppError::Config(format!("invalid late_after: {}", cfg.late_after)))?;

        if cfg.standard_day_minutes <= 0 {
            return Err(AppError::Config(format!(
                "standard_day_minutes must be positive, got {}",
                cfg.standard_day_minutes
            )));
        }

        Ok(Self {
            late_after,
            standard_day_minutes: cfg.standard_day_minutes,
            overtime_after_minutes: cfg.overtime_after_minutes,
            full_day_leave_minutes: cfg.full_day_leave_minutes,
            half_day_leave_minutes: cfg.half_day_leave_minutes,
        })
    }

    pub fn evaluate(
        &self,
        clock_in: NaiveDateTime,
        clock_out: NaiveDateTime,
        break_minutes: i64,
    ) -> DayMetrics {
        // Clamped at zero on both levels: a negative raw span (clock skew)
        // and breaks exceeding the span both floor at zero net minutes.
        let raw = minutes_between(clock_in, clock_out);
        let work_minutes = (raw - break_minutes.max(0)).max(0);

        let is_late = clock_in.time() >= self.late_after;
        let is_early_out = work_minutes < self.standard_day_minutes;
        let is_overtime = work_minutes > self.overtime_after_minutes;
        let overtime_minutes = if is_overtime {
            work_minutes - self.overtime_after_minutes
        } else {
            0
        };

        let pct = ((work_minutes as f64 / self.standard_day_minutes as f64) * 100.0).round() as i64;
        let attendance_pct = pct.min(100);

        DayMetrics {
            work_minutes,
            break_minutes: break_minutes.max(0),
            overtime_minutes,
            is_late,
            is_early_out,
            is_overtime,
            attendance_pct,
        }
    }

    /// Metrics for a leave-placeholder day: zero-duration, nothing flagged.
    pub fn placeholder_metrics(&self) -> DayMetrics {
        DayMetrics {
            work_minutes: 0,
            break_minutes: 0,
            overtime_minutes: 0,
            is_late: false,
            is_early_out: false,
            is_overtime: false,
            attendance_pct: 0,
        }
    }

    /// Minutes one leave day debits from the balance.
    pub fn leave_day_minutes(&self, day_part: DayPart) -> i64 {
        match day_part {
            DayPart::Full => self.full_day_leave_minutes,
            DayPart::Half => self.half_day_leave_minutes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::time::parse_datetime;

    fn policy() -> WorkPolicy {
        WorkPolicy::from_config(&Config::default()).unwrap()
    }

    fn dt(s: &str) -> NaiveDateTime {
        parse_datetime(s).unwrap()
    }

    #[test]
    fn late_checkin_at_nine_fifteen() {
        let m = policy().evaluate(dt("2025-06-02 09:15"), dt("2025-06-02 17:00"), 0);
        assert!(m.is_late);
    }

    #[test]
    fn checkin_before_nine_is_not_late() {
        let m = policy().evaluate(dt("2025-06-02 08:45"), dt("2025-06-02 17:00"), 0);
        assert!(!m.is_late);
    }

    #[test]
    fn early_out_after_460_minutes() {
        // 460 net minutes, no breaks: early-out, 96% attendance.
        let m = policy().evaluate(dt("2025-06-02 09:00"), dt("2025-06-02 16:40"), 0);
        assert_eq!(m.work_minutes, 460);
        assert!(m.is_early_out);
        assert!(!m.is_overtime);
        assert_eq!(m.attendance_pct, 96);
    }

    #[test]
    fn overtime_with_break() {
        // 600 raw minutes minus a 30-minute break: 570 net, 30 overtime.
        let m = policy().evaluate(dt("2025-06-02 09:00"), dt("2025-06-02 19:00"), 30);
        assert_eq!(m.break_minutes, 30);
        assert_eq!(m.work_minutes, 570);
        assert!(m.is_overtime);
        assert_eq!(m.overtime_minutes, 30);
        assert_eq!(m.attendance_pct, 100);
    }

    #[test]
    fn net_minutes_never_negative() {
        // Breaks longer than the span clamp at zero.
        let m = policy().evaluate(dt("2025-06-02 09:00"), dt("2025-06-02 09:30"), 120);
        assert_eq!(m.work_minutes, 0);
        assert_eq!(m.overtime_minutes, 0);
        assert_eq!(m.attendance_pct, 0);

        // Reversed timestamps (clock skew) also clamp.
        let m = policy().evaluate(dt("2025-06-02 17:00"), dt("2025-06-02 09:00"), 0);
        assert_eq!(m.work_minutes, 0);
    }

    #[test]
    fn attendance_capped_at_100() {
        let m = policy().evaluate(dt("2025-06-02 08:00"), dt("2025-06-02 20:00"), 0);
        assert_eq!(m.attendance_pct, 100);
    }

    #[test]
    fn exact_standard_day_is_not_early_out() {
        let m = policy().evaluate(dt("2025-06-02 08:00"), dt("2025-06-02 16:00"), 0);
        assert_eq!(m.work_minutes, 480);
        assert!(!m.is_early_out);
        assert!(!m.is_overtime);
        assert_eq!(m.attendance_pct, 100);
    }

    #[test]
    fn leave_day_minutes_follow_day_part() {
        let p = policy();
        assert_eq!(p.leave_day_minutes(DayPart::Full), 480);
        assert_eq!(p.leave_day_minutes(DayPart::Half), 240);
    }
}
