//! Leave Reconciliation Bridge.
//!
//! Approval and cancellation are the only multi-step writes in the engine
//! and each runs as a single transaction: balance mutation, request state
//! flip and placeholder synthesis/retraction commit or abort together. The
//! balance is only ever touched inside these transactions (read-modify-write
//! under the same tx), so concurrent approvals for one user/year serialize
//! at the database instead of racing in application code.

use crate::core::metrics::WorkPolicy;
use crate::core::{daily, live};
use crate::db;
use crate::db::audit::AuditEntry;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::caller::Caller;
use crate::models::leave::{DayPart, LeaveRequest, LeaveState};
use crate::models::session::ClockSession;
use chrono::{Datelike, Local, NaiveDate};

pub struct LeaveLogic;

impl LeaveLogic {
    /// File a pending request. The minute cost is fixed here, at request
    /// time, so approval and a later reversal debit and credit the same
    /// amount even if the policy changes in between.
    pub fn request(
        pool: &mut DbPool,
        policy: &WorkPolicy,
        caller: &Caller,
        leave_type: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
        day_part: DayPart,
        note: &str,
    ) -> AppResult<LeaveRequest> {
        if end_date < start_date {
            return Err(AppError::InvalidDate(format!(
                "end date {} precedes start date {}",
                end_date, start_date
            )));
        }

        let days = (end_date - start_date).num_days() + 1;
        let requested_minutes = days * policy.leave_day_minutes(day_part);

        let mut request = LeaveRequest {
            id: 0,
            user_id: caller.user_id.clone(),
            leave_type: leave_type.to_string(),
            start_date,
            end_date,
            day_part,
            state: LeaveState::Pending,
            requested_minutes,
            note: note.to_string(),
            created_at: Local::now().to_rfc3339(),
            decided_at: None,
        };
        request.id = db::leave::insert_request(&pool.conn, &request)?;

        db::audit::record(
            &pool.conn,
            AuditEntry::new("leave_request", &caller.user_id, &caller.user_id, "leave_request")
                .entity_id(request.id)
                .new_values(&request),
        );

        Ok(request)
    }

    /// Approve a pending request. Admin-only.
    ///
    /// One transaction: re-validate `pending`, debit the balance when the
    /// leave type is quota-tracked (a balance row exists for the request
    /// year), flip the state, and synthesize a zero-duration completed
    /// session plus daily record for every date in the range not already
    /// covered by real attendance. `InsufficientBalance` aborts with no
    /// mutation observed.
    pub fn approve(pool: &mut DbPool, policy: &WorkPolicy, caller: &Caller, request_id: i64) -> AppResult<LeaveRequest> {
        caller.require_admin("approving leave")?;

        let tx = pool.conn.transaction()?;

        let request = db::leave::find_request(&tx, request_id)?
            .ok_or_else(|| AppError::NotFound(format!("leave request {}", request_id)))?;

        if request.state != LeaveState::Pending {
            return Err(AppError::InvalidState(format!(
                "leave request {} is {}, only pending requests can be approved",
                request_id,
                request.state.to_db_str()
            )));
        }

        let year = request.start_date.year();
        if let Some(balance) =
            db::leave::find_balance(&tx, &request.user_id, year, &request.leave_type)?
        {
            if balance.used + request.requested_minutes > balance.allocated {
                return Err(AppError::InsufficientBalance {
                    used: balance.used,
                    allocated: balance.allocated,
                    requested: request.requested_minutes,
                });
            }
            db::leave::adjust_balance_used(
                &tx,
                &request.user_id,
                year,
                &request.leave_type,
                request.requested_minutes,
            )?;
        }

        let decided_at = Local::now().to_rfc3339();
        db::leave::set_request_state(&tx, request_id, LeaveState::Approved, &decided_at)?;

        for date in request.dates() {
            // Real attendance wins: dates already holding a session or a
            // daily record are left untouched.
            if db::sessions::exists_for_day(&tx, &request.user_id, date)?
                || db::daily::exists(&tx, &request.user_id, date)?
            {
                continue;
            }

            let mut placeholder = ClockSession::leave_placeholder(
                &request.user_id,
                date,
                request_id,
                &request.leave_type,
            );
            placeholder.id = db::sessions::insert_session(&tx, &placeholder)?;

            let metrics = policy.placeholder_metrics();
            daily::upsert_from_session(&tx, &placeholder, &metrics, "employee")?;
        }

        tx.commit()?;

        let approved = db::leave::find_request(&pool.conn, request_id)?
            .ok_or_else(|| AppError::NotFound(format!("leave request {}", request_id)))?;

        db::audit::record(
            &pool.conn,
            AuditEntry::new("leave_approve", &caller.user_id, &request.user_id, "leave_request")
                .entity_id(request_id)
                .old(&request)
                .new_values(&approved),
        );

        Ok(approved)
    }

    /// Cancel a request.
    ///
    /// Pending requests can be cancelled by their owner or an admin.
    /// Approved requests are admin-only and reverse exactly what approval
    /// did: credit back `requested_minutes` and retract the placeholder
    /// sessions and records this request created (found by provenance,
    /// never by guessing at dates).
    pub fn cancel(pool: &mut DbPool, caller: &Caller, request_id: i64) -> AppResult<LeaveRequest> {
        let request = db::leave::find_request(&pool.conn, request_id)?
            .ok_or_else(|| AppError::NotFound(format!("leave request {}", request_id)))?;

        let decided_at = Local::now().to_rfc3339();

        match request.state {
            LeaveState::Pending => {
                if caller.user_id != request.user_id {
                    caller.require_admin("cancelling another user's leave")?;
                }
                db::leave::set_request_state(
                    &pool.conn,
                    request_id,
                    LeaveState::Cancelled,
                    &decided_at,
                )?;
            }
            LeaveState::Approved => {
                caller.require_admin("cancelling an approved leave")?;

                let tx = pool.conn.transaction()?;

                let year = request.start_date.year();
                if db::leave::find_balance(&tx, &request.user_id, year, &request.leave_type)?
                    .is_some()
                {
                    db::leave::adjust_balance_used(
                        &tx,
                        &request.user_id,
                        year,
                        &request.leave_type,
                        -request.requested_minutes,
                    )?;
                }

                let dates = db::sessions::delete_leave_placeholders(&tx, request_id)?;
                db::daily::delete_leave_records(&tx, &request.user_id, &dates)?;
                db::leave::set_request_state(&tx, request_id, LeaveState::Cancelled, &decided_at)?;

                tx.commit()?;
                live::refresh(&pool.conn, &request.user_id)?;
            }
            LeaveState::Cancelled => {
                return Err(AppError::InvalidState(format!(
                    "leave request {} is already cancelled",
                    request_id
                )));
            }
        }

        let cancelled = db::leave::find_request(&pool.conn, request_id)?
            .ok_or_else(|| AppError::NotFound(format!("leave request {}", request_id)))?;

        db::audit::record(
            &pool.conn,
            AuditEntry::new("leave_cancel", &caller.user_id, &request.user_id, "leave_request")
                .entity_id(request_id)
                .old(&request)
                .new_values(&cancelled),
        );

        Ok(cancelled)
    }

    /// Seed or raise a user's annual allocation. Admin-only; creating the
    /// balance row is what makes the leave type quota-tracked for that user.
    pub fn grant(
        pool: &mut DbPool,
        caller: &Caller,
        user_id: &str,
        year: i32,
        leave_type: &str,
        minutes: i64,
    ) -> AppResult<()> {
        caller.require_admin("granting leave allocation")?;

        db::leave::grant_balance(&pool.conn, user_id, year, leave_type, minutes)?;

        db::audit::record(
            &pool.conn,
            AuditEntry::new("leave_grant", &caller.user_id, user_id, "leave_balance")
                .new_values(&serde_json::json!({
                    "year": year,
                    "leave_type": leave_type,
                    "allocated": minutes,
                })),
        );

        Ok(())
    }
}
