//! Disaster recovery: regenerate the derived stores (daily records and the
//! live-status cache) from the sessions + breaks source of truth.
//!
//! Both derived stores are plain projections, so this can run at any time
//! and converges to the same result as the incremental writes.

use crate::core::metrics::WorkPolicy;
use crate::core::{daily, live};
use crate::db;
use crate::db::audit::AuditEntry;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::models::caller::Caller;
use crate::models::session::{RecordSource, SessionStatus};

pub struct RebuildLogic;

pub struct RebuildReport {
    pub records: usize,
    pub live_entries: usize,
}

impl RebuildLogic {
    pub fn run(pool: &mut DbPool, policy: &WorkPolicy, caller: &Caller) -> AppResult<RebuildReport> {
        let tx = pool.conn.transaction()?;

        let mut records = 0;
        for (user, date) in db::sessions::all_user_days(&tx)? {
            let sessions = db::sessions::list_for_day(&tx, &user, date)?;

            // The canonical record derives from the newest completed session
            // of the day; an active session has nothing to report yet.
            let Some(session) = sessions
                .iter()
                .filter(|s| s.status == SessionStatus::Completed)
                .last()
            else {
                continue;
            };

            let metrics = match session.source {
                RecordSource::Leave => policy.placeholder_metrics(),
                RecordSource::Clock => {
                    let break_minutes = db::breaks::list_for_session(&tx, session.id)?
                        .iter()
                        .filter_map(|b| b.duration_minutes)
                        .sum();
                    match session.clock_out {
                        Some(out) => policy.evaluate(session.clock_in, out, break_minutes),
                        None => continue,
                    }
                }
            };

            // Preserve the role snapshot of an existing record if there is one.
            let role = db::daily::find(&tx, &user, date)?
                .map(|r| r.role)
                .unwrap_or_else(|| "employee".to_string());

            daily::upsert_from_session(&tx, session, &metrics, &role)?;
            records += 1;
        }

        let users = db::sessions::all_users(&tx)?;
        let live_entries = users.len();
        for user in &users {
            live::refresh(&tx, user)?;
        }

        tx.commit()?;

        db::audit::record(
            &pool.conn,
            AuditEntry::new("rebuild", &caller.user_id, "", "daily_records").new_values(
                &serde_json::json!({
                    "records": records,
                    "live_entries": live_entries,
                }),
            ),
        );

        Ok(RebuildReport {
            records,
            live_entries,
        })
    }
}
