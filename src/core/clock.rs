//! Clock Session Store operations: clock-in and clock-out.

use crate::core::metrics::{DayMetrics, WorkPolicy};
use crate::core::{daily, live};
use crate::db;
use crate::db::audit::AuditEntry;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::caller::Caller;
use crate::models::session::ClockSession;
use crate::utils::time::minutes_between;
use chrono::{NaiveDate, NaiveDateTime};

pub struct ClockLogic;

impl ClockLogic {
    /// Open a session for (caller, date). Rejected with `AlreadyActive` by
    /// the storage-level unique index if one is already open, so a double
    /// clock-in never creates a second row.
    pub fn clock_in(
        pool: &mut DbPool,
        caller: &Caller,
        date: NaiveDate,
        at: NaiveDateTime,
        device: &str,
    ) -> AppResult<ClockSession> {
        let mut session = ClockSession::opened(&caller.user_id, date, at, device);
        session.id = db::sessions::insert_session(&pool.conn, &session)?;

        live::refresh(&pool.conn, &caller.user_id)?;

        db::audit::record(
            &pool.conn,
            AuditEntry::new("clock_in", &caller.user_id, &caller.user_id, "session")
                .entity_id(session.id)
                .new_values(&session),
        );

        Ok(session)
    }

    /// Close the active session for (caller, date).
    ///
    /// Runs as one transaction: any open break is force-closed and counted,
    /// the break rollup is recomputed from closed breaks, the session is
    /// completed, and the daily record and live-status cache are rewritten.
    /// The downstream writes are absolute-value upserts on top of that, so
    /// even a retried clock-out cannot double-count.
    pub fn clock_out(
        pool: &mut DbPool,
        policy: &WorkPolicy,
        caller: &Caller,
        date: NaiveDate,
        at: NaiveDateTime,
        note: Option<&str>,
    ) -> AppResult<DayMetrics> {
        let tx = pool.conn.transaction()?;

        let session = db::sessions::find_active(&tx, &caller.user_id, date)?.ok_or_else(|| {
            AppError::NoActiveSession {
                user: caller.user_id.clone(),
                date: date.format("%Y-%m-%d").to_string(),
            }
        })?;

        // An open break is closed at the clock-out instant and counted, so
        // the day never under-reports break time.
        if let Some(open) = db::breaks::find_open(&tx, session.id)? {
            let duration = minutes_between(open.break_start, at);
            db::breaks::close_break(&tx, open.id, at, duration)?;
        }
        let break_minutes = db::sessions::refresh_break_minutes(&tx, session.id)?;

        let metrics = policy.evaluate(session.clock_in, at, break_minutes);
        db::sessions::complete_session(
            &tx,
            session.id,
            at,
            break_minutes,
            metrics.work_minutes,
            note,
        )?;

        let completed = db::sessions::find_by_id(&tx, session.id)?
            .ok_or_else(|| AppError::NotFound(format!("session {}", session.id)))?;
        daily::upsert_from_session(&tx, &completed, &metrics, caller.role.as_str())?;
        live::refresh(&tx, &caller.user_id)?;

        tx.commit()?;

        db::audit::record(
            &pool.conn,
            AuditEntry::new("clock_out", &caller.user_id, &caller.user_id, "session")
                .entity_id(session.id)
                .old(&session)
                .new_values(&metrics),
        );

        Ok(metrics)
    }
}
