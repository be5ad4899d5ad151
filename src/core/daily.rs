//! Daily Record Aggregator: folds a session snapshot plus derived metrics
//! into the canonical one-row-per-user-per-day reporting record.
//!
//! The upsert writes absolute values keyed on (user, date), so it is safe to
//! call any number of times with the same snapshot. Precedence between the
//! two writer paths is explicit via the `source` tag: a real clock-out
//! overwrites a leave placeholder (and retags it `clock`), while leave
//! approval never writes over an existing record.

use crate::core::metrics::DayMetrics;
use crate::db;
use crate::errors::AppResult;
use crate::models::daily_record::DailyRecord;
use crate::models::session::{ClockSession, RecordSource};
use chrono::Local;
use rusqlite::Connection;

/// Upsert the canonical record for a completed (or placeholder) session.
pub fn upsert_from_session(
    conn: &Connection,
    session: &ClockSession,
    metrics: &DayMetrics,
    role: &str,
) -> AppResult<DailyRecord> {
    let record = record_from_session(session, metrics, role);
    db::daily::upsert(conn, &record)?;
    Ok(record)
}

pub fn record_from_session(
    session: &ClockSession,
    metrics: &DayMetrics,
    role: &str,
) -> DailyRecord {
    let clock_out = session
        .clock_out
        .map(|t| t.format("%H:%M").to_string())
        .unwrap_or_default();

    // Placeholders carry empty clock columns: there was no real punch.
    let (clock_in, clock_out) = match session.source {
        RecordSource::Clock => (session.clock_in.format("%H:%M").to_string(), clock_out),
        RecordSource::Leave => (String::new(), String::new()),
    };

    DailyRecord {
        user_id: session.user_id.clone(),
        role: role.to_string(),
        date: session.date,
        clock_in,
        clock_out,
        work_minutes: metrics.work_minutes,
        break_minutes: metrics.break_minutes,
        overtime_minutes: metrics.overtime_minutes,
        is_late: metrics.is_late,
        is_early_out: metrics.is_early_out,
        is_overtime: metrics.is_overtime,
        attendance_pct: metrics.attendance_pct,
        source: session.source,
        device: session.device.clone(),
        note: session.note.clone(),
        updated_at: Local::now().to_rfc3339(),
    }
}
