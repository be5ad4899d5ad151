//! Live Status Projector.
//!
//! The cache row is always recomputed from session/break truth, never edited
//! in place. The state function below is the invariant: an active session
//! projects `in` or `break`, only the absence of one projects `out`, so the
//! "active session but status OUT" corruption the cache could otherwise
//! accumulate is structurally unrepresentable. The read path still verifies
//! stored rows against the truth and re-projects on mismatch, because the
//! cache is allowed to be stale by design (consumers poll it).

use crate::db;
use crate::errors::AppResult;
use crate::models::live_status::{LiveState, LiveStatus};
use crate::utils::date::today;
use crate::utils::time::format_datetime;
use chrono::Local;
use rusqlite::Connection;

/// Recompute one user's entry from today's session and breaks and overwrite
/// the cache row. Cheap enough to run on every transition.
pub fn refresh(conn: &Connection, user_id: &str) -> AppResult<LiveStatus> {
    let status = project(conn, user_id)?;
    db::live::upsert(conn, &status)?;
    Ok(status)
}

/// Pure projection at the current instant, no cache write.
pub fn project(conn: &Connection, user_id: &str) -> AppResult<LiveStatus> {
    project_at(conn, user_id, Local::now().naive_local())
}

/// Projection at an explicit instant. Running totals count closed breaks plus
/// the open span up to `now`, so a user on break accrues pause, not work.
pub fn project_at(
    conn: &Connection,
    user_id: &str,
    now: chrono::NaiveDateTime,
) -> AppResult<LiveStatus> {
    let date = now.date();
    let active = db::sessions::find_active(conn, user_id, date)?;

    let (state, last_activity, work_minutes, break_minutes) = match &active {
        Some(session) => {
            let open_break = db::breaks::find_open(conn, session.id)?;
            let state = if open_break.is_some() {
                LiveState::Break
            } else {
                LiveState::In
            };

            let last = open_break
                .as_ref()
                .map(|b| format_datetime(b.break_start))
                .unwrap_or_else(|| format_datetime(session.clock_in));

            let open_span = open_break
                .as_ref()
                .map(|b| (now - b.break_start).num_minutes().max(0))
                .unwrap_or(0);
            let elapsed = (now - session.clock_in).num_minutes().max(0);
            let breaks = session.break_minutes + open_span;
            let work = (elapsed - breaks).max(0);

            (state, last, work, breaks)
        }
        None => {
            // Completed sessions still contribute today's totals to the board.
            let done = db::sessions::list_for_day(conn, user_id, date)?;
            let last = done
                .iter()
                .filter_map(|s| s.clock_out)
                .max()
                .map(format_datetime)
                .unwrap_or_default();
            let work: i64 = done.iter().filter_map(|s| s.work_minutes).sum();
            let breaks: i64 = done.iter().map(|s| s.break_minutes).sum();

            (LiveState::Out, last, work, breaks)
        }
    };

    Ok(LiveStatus {
        user_id: user_id.to_string(),
        state,
        last_activity,
        work_minutes,
        break_minutes,
        updated_at: Local::now().to_rfc3339(),
    })
}

/// Read model for the dashboard. Stored rows that disagree with session
/// truth (e.g. a crash between session write and cache write) are repaired
/// by re-projecting before they are returned.
pub fn get(conn: &Connection, user_id: Option<&str>) -> AppResult<Vec<LiveStatus>> {
    let stored = db::live::list(conn, user_id)?;

    let mut out = Vec::with_capacity(stored.len());
    for entry in stored {
        let active = db::sessions::find_active(conn, &entry.user_id, today())?;
        let consistent = match (&entry.state, &active) {
            (LiveState::Out, Some(_)) => false,
            (LiveState::In | LiveState::Break, None) => false,
            _ => true,
        };

        if consistent {
            out.push(entry);
        } else {
            out.push(refresh(conn, &entry.user_id)?);
        }
    }

    Ok(out)
}
