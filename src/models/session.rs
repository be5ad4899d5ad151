use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::Serialize;

/// One user's primary clock-in/clock-out span for a single calendar day.
///
/// At most one `active` session may exist per (user, date); the storage
/// layer enforces this with a partial unique index, so the invariant holds
/// even under concurrent clock-in requests.
#[derive(Debug, Clone, Serialize)]
pub struct ClockSession {
    pub id: i64,
    pub user_id: String,
    pub date: NaiveDate,           // ⇔ sessions.date (TEXT "YYYY-MM-DD")
    pub clock_in: NaiveDateTime,   // ⇔ sessions.clock_in (TEXT "YYYY-MM-DD HH:MM")
    pub clock_out: Option<NaiveDateTime>,
    pub status: SessionStatus,     // ⇔ sessions.status ('active' | 'completed')
    pub break_minutes: i64,        // sum over closed breaks, recomputed on break-end
    pub work_minutes: Option<i64>, // set at completion
    pub device: String,            // device/location metadata from the caller
    pub note: String,
    pub source: RecordSource,      // ⇔ sessions.source ('clock' | 'leave')
    pub leave_request_id: Option<i64>, // provenance for leave placeholders
    pub created_at: String,        // ISO8601
}

impl ClockSession {
    /// Session opened by a real clock-in event.
    pub fn opened(user_id: &str, date: NaiveDate, clock_in: NaiveDateTime, device: &str) -> Self {
        Self {
            id: 0,
            user_id: user_id.to_string(),
            date,
            clock_in,
            clock_out: None,
            status: SessionStatus::Active,
            break_minutes: 0,
            work_minutes: None,
            device: device.to_string(),
            note: String::new(),
            source: RecordSource::Clock,
            leave_request_id: None,
            created_at: Local::now().to_rfc3339(),
        }
    }

    /// Zero-duration completed session standing in for an approved leave day.
    pub fn leave_placeholder(user_id: &str, date: NaiveDate, leave_request_id: i64, note: &str) -> Self {
        let midnight = date.and_hms_opt(0, 0, 0).unwrap_or_default();
        Self {
            id: 0,
            user_id: user_id.to_string(),
            date,
            clock_in: midnight,
            clock_out: Some(midnight),
            status: SessionStatus::Completed,
            break_minutes: 0,
            work_minutes: Some(0),
            device: String::new(),
            note: note.to_string(),
            source: RecordSource::Leave,
            leave_request_id: Some(leave_request_id),
            created_at: Local::now().to_rfc3339(),
        }
    }

    pub fn date_str(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum SessionStatus {
    Active,
    Completed,
}

impl SessionStatus {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            SessionStatus::Active => "active",
            SessionStatus::Completed => "completed",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "active" => Some(SessionStatus::Active),
            "completed" => Some(SessionStatus::Completed),
            _ => None,
        }
    }
}

/// Who wrote a session or daily record: a real clock event or the leave
/// reconciliation bridge. Kept on the row so a placeholder overwritten by a
/// real clock-out stays auditable instead of silently swapping meaning.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum RecordSource {
    Clock,
    Leave,
}

impl RecordSource {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            RecordSource::Clock => "clock",
            RecordSource::Leave => "leave",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "clock" => Some(RecordSource::Clock),
            "leave" => Some(RecordSource::Leave),
            _ => None,
        }
    }
}
