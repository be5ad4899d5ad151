use chrono::NaiveDateTime;
use serde::Serialize;

/// A sub-interval of a session during which work time does not accrue.
/// At most one interval per session may have `break_end = None`, enforced by
/// a partial unique index on the breaks table.
#[derive(Debug, Clone, Serialize)]
pub struct BreakInterval {
    pub id: i64,
    pub session_id: i64,
    pub break_start: NaiveDateTime,
    pub break_end: Option<NaiveDateTime>,
    pub duration_minutes: Option<i64>, // computed at close, read-only afterward
    pub reason: String,
}

impl BreakInterval {
    pub fn is_open(&self) -> bool {
        self.break_end.is_none()
    }
}
