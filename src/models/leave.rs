use chrono::NaiveDate;
use serde::Serialize;

/// Leave request lifecycle: pending → {approved, cancelled};
/// approved → cancelled (admin-only, reverses the balance debit).
#[derive(Debug, Clone, Serialize)]
pub struct LeaveRequest {
    pub id: i64,
    pub user_id: String,
    pub leave_type: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub day_part: DayPart,
    pub state: LeaveState,
    pub requested_minutes: i64, // days × (full- or half-day minutes), fixed at request time
    pub note: String,
    pub created_at: String,
    pub decided_at: Option<String>,
}

impl LeaveRequest {
    /// Dates covered by the request, inclusive of both ends.
    pub fn dates(&self) -> Vec<NaiveDate> {
        let mut out = Vec::new();
        let mut d = self.start_date;
        while d <= self.end_date {
            out.push(d);
            match d.succ_opt() {
                Some(next) => d = next,
                None => break,
            }
        }
        out
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum LeaveState {
    Pending,
    Approved,
    Cancelled,
}

impl LeaveState {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            LeaveState::Pending => "pending",
            LeaveState::Approved => "approved",
            LeaveState::Cancelled => "cancelled",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(LeaveState::Pending),
            "approved" => Some(LeaveState::Approved),
            "cancelled" => Some(LeaveState::Cancelled),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum DayPart {
    Full,
    Half,
}

impl DayPart {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            DayPart::Full => "full",
            DayPart::Half => "half",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "full" => Some(DayPart::Full),
            "half" => Some(DayPart::Half),
            _ => None,
        }
    }
}

/// Per (user, year, leave type) annual quota. Existence of a row is what
/// makes a leave type quota-tracked for that user; mutated only inside the
/// approval/cancellation transaction.
#[derive(Debug, Clone, Serialize)]
pub struct LeaveBalance {
    pub user_id: String,
    pub year: i32,
    pub leave_type: String,
    pub allocated: i64, // minutes
    pub used: i64,      // minutes
}

impl LeaveBalance {
    pub fn remaining(&self) -> i64 {
        self.allocated - self.used
    }
}
