//! Break Tracker operations: start and end a break inside an active session.

use crate::core::live;
use crate::db;
use crate::db::audit::AuditEntry;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::break_interval::BreakInterval;
use crate::models::caller::Caller;
use crate::utils::time::minutes_between;
use chrono::{NaiveDate, NaiveDateTime};

pub struct BreakLogic;

impl BreakLogic {
    /// Open a break on the caller's active session for `date`.
    /// `NoActiveSession` when there is nothing to pause; `BreakAlreadyOpen`
    /// (via the partial unique index) when one is already running.
    pub fn start(
        pool: &mut DbPool,
        caller: &Caller,
        date: NaiveDate,
        at: NaiveDateTime,
        reason: &str,
    ) -> AppResult<BreakInterval> {
        let session = db::sessions::find_active(&pool.conn, &caller.user_id, date)?
            .ok_or_else(|| AppError::NoActiveSession {
                user: caller.user_id.clone(),
                date: date.format("%Y-%m-%d").to_string(),
            })?;

        let break_id = db::breaks::insert_break(&pool.conn, session.id, at, reason)?;
        live::refresh(&pool.conn, &caller.user_id)?;

        let interval = BreakInterval {
            id: break_id,
            session_id: session.id,
            break_start: at,
            break_end: None,
            duration_minutes: None,
            reason: reason.to_string(),
        };

        db::audit::record(
            &pool.conn,
            AuditEntry::new("break_start", &caller.user_id, &caller.user_id, "break")
                .entity_id(break_id)
                .new_values(&interval),
        );

        Ok(interval)
    }

    /// Close the open break and return its duration in minutes.
    ///
    /// The session's cumulative rollup is recomputed as a SUM over all
    /// closed breaks rather than incremented, so replays and corrections
    /// converge to the same value.
    pub fn end(
        pool: &mut DbPool,
        caller: &Caller,
        date: NaiveDate,
        at: NaiveDateTime,
    ) -> AppResult<i64> {
        let tx = pool.conn.transaction()?;

        let session = db::sessions::find_active(&tx, &caller.user_id, date)?.ok_or_else(|| {
            AppError::NoActiveSession {
                user: caller.user_id.clone(),
                date: date.format("%Y-%m-%d").to_string(),
            }
        })?;

        let open = db::breaks::find_open(&tx, session.id)?.ok_or(AppError::NoOpenBreak)?;

        let duration = minutes_between(open.break_start, at);
        db::breaks::close_break(&tx, open.id, at, duration)?;
        db::sessions::refresh_break_minutes(&tx, session.id)?;
        live::refresh(&tx, &caller.user_id)?;

        tx.commit()?;

        db::audit::record(
            &pool.conn,
            AuditEntry::new("break_end", &caller.user_id, &caller.user_id, "break")
                .entity_id(open.id)
                .old(&open)
                .new_values(&duration),
        );

        Ok(duration)
    }
}
