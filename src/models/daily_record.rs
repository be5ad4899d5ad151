use crate::models::session::RecordSource;
use chrono::NaiveDate;
use serde::Serialize;

/// The canonical one-row-per-user-per-day attendance summary.
/// Unique on (user_id, date); always rebuildable from sessions + breaks.
#[derive(Debug, Clone, Serialize)]
pub struct DailyRecord {
    pub user_id: String,
    pub role: String, // role snapshot at write time
    pub date: NaiveDate,
    pub clock_in: String,  // "HH:MM", empty for placeholders
    pub clock_out: String, // "HH:MM", empty while the session is open
    pub work_minutes: i64,
    pub break_minutes: i64,
    pub overtime_minutes: i64,
    pub is_late: bool,
    pub is_early_out: bool,
    pub is_overtime: bool,
    pub attendance_pct: i64, // 0–100
    pub source: RecordSource,
    pub device: String,
    pub note: String,
    pub updated_at: String,
}

impl DailyRecord {
    pub fn date_str(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}
