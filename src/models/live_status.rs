use serde::Serialize;

/// Denormalized "who is in right now" entry, one per user.
/// A projection of sessions + breaks, never a source of truth: it may be
/// stale between transitions and can be rebuilt from scratch at any time.
#[derive(Debug, Clone, Serialize)]
pub struct LiveStatus {
    pub user_id: String,
    pub state: LiveState,
    pub last_activity: String, // "YYYY-MM-DD HH:MM" of the latest transition
    pub work_minutes: i64,     // running totals for the current day
    pub break_minutes: i64,
    pub updated_at: String,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum LiveState {
    In,
    Break,
    Out,
}

impl LiveState {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            LiveState::In => "in",
            LiveState::Break => "break",
            LiveState::Out => "out",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "in" => Some(LiveState::In),
            "break" => Some(LiveState::Break),
            "out" => Some(LiveState::Out),
            _ => None,
        }
    }
}
