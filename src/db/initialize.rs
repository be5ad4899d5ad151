use crate::db::migrate::run_pending_migrations;
use crate::errors::AppResult;
use rusqlite::Connection;

/// Bring the attendance schema up to date on open.
///
/// The migration engine owns every table and index definition — sessions,
/// breaks, daily records, live status, leave and audit — so nothing else in
/// the crate creates schema objects.
pub fn init_db(conn: &Connection) -> AppResult<()> {
    run_pending_migrations(conn)?;
    Ok(())
}
