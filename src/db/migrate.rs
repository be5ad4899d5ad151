//! Idempotent schema migrations. Every `ensure_*` step is safe to re-run;
//! `run_pending_migrations` is invoked on every database open.

use rusqlite::{Connection, Result};

/// Clock sessions: one active session per (user, date), enforced by the
/// partial unique index rather than a check-then-write in application code,
/// so two racing clock-ins fail deterministically with a constraint error.
fn ensure_sessions_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS sessions (
            id               INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id          TEXT NOT NULL,
            date             TEXT NOT NULL,
            clock_in         TEXT NOT NULL,
            clock_out        TEXT,
            status           TEXT NOT NULL CHECK(status IN ('active','completed')),
            break_minutes    INTEGER NOT NULL DEFAULT 0,
            work_minutes     INTEGER,
            device           TEXT NOT NULL DEFAULT '',
            note             TEXT NOT NULL DEFAULT '',
            source           TEXT NOT NULL DEFAULT 'clock' CHECK(source IN ('clock','leave')),
            leave_request_id INTEGER,
            created_at       TEXT NOT NULL
        );

        CREATE UNIQUE INDEX IF NOT EXISTS ux_sessions_active
            ON sessions(user_id, date) WHERE status = 'active';
        CREATE INDEX IF NOT EXISTS idx_sessions_user_date ON sessions(user_id, date);
        CREATE INDEX IF NOT EXISTS idx_sessions_leave_req ON sessions(leave_request_id);
        "#,
    )?;
    Ok(())
}

/// Break intervals: at most one open break per session, same partial-index
/// technique as the sessions table.
fn ensure_breaks_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS breaks (
            id               INTEGER PRIMARY KEY AUTOINCREMENT,
            session_id       INTEGER NOT NULL REFERENCES sessions(id),
            break_start      TEXT NOT NULL,
            break_end        TEXT,
            duration_minutes INTEGER,
            reason           TEXT NOT NULL DEFAULT ''
        );

        CREATE UNIQUE INDEX IF NOT EXISTS ux_breaks_open
            ON breaks(session_id) WHERE break_end IS NULL;
        CREATE INDEX IF NOT EXISTS idx_breaks_session ON breaks(session_id);
        "#,
    )?;
    Ok(())
}

/// Canonical daily records: the reporting surface, unique per (user, date).
/// Upserts must write absolute values only, never increments.
fn ensure_daily_records_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS daily_records (
            user_id          TEXT NOT NULL,
            role             TEXT NOT NULL DEFAULT 'employee',
            date             TEXT NOT NULL,
            clock_in         TEXT NOT NULL DEFAULT '',
            clock_out        TEXT NOT NULL DEFAULT '',
            work_minutes     INTEGER NOT NULL DEFAULT 0,
            break_minutes    INTEGER NOT NULL DEFAULT 0,
            overtime_minutes INTEGER NOT NULL DEFAULT 0,
            late             INTEGER NOT NULL DEFAULT 0,
            early_out        INTEGER NOT NULL DEFAULT 0,
            overtime         INTEGER NOT NULL DEFAULT 0,
            attendance_pct   INTEGER NOT NULL DEFAULT 0,
            source           TEXT NOT NULL DEFAULT 'clock' CHECK(source IN ('clock','leave')),
            device           TEXT NOT NULL DEFAULT '',
            note             TEXT NOT NULL DEFAULT '',
            updated_at       TEXT NOT NULL,
            PRIMARY KEY (user_id, date)
        );

        CREATE INDEX IF NOT EXISTS idx_daily_date ON daily_records(date);
        "#,
    )?;
    Ok(())
}

/// Live status cache: one row per user, a projection of sessions + breaks.
fn ensure_live_status_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS live_status (
            user_id       TEXT PRIMARY KEY,
            state         TEXT NOT NULL CHECK(state IN ('in','break','out')),
            last_activity TEXT NOT NULL DEFAULT '',
            work_minutes  INTEGER NOT NULL DEFAULT 0,
            break_minutes INTEGER NOT NULL DEFAULT 0,
            updated_at    TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn ensure_leave_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS leave_requests (
            id                INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id           TEXT NOT NULL,
            leave_type        TEXT NOT NULL,
            start_date        TEXT NOT NULL,
            end_date          TEXT NOT NULL,
            day_part          TEXT NOT NULL DEFAULT 'full' CHECK(day_part IN ('full','half')),
            state             TEXT NOT NULL DEFAULT 'pending' CHECK(state IN ('pending','approved','cancelled')),
            requested_minutes INTEGER NOT NULL,
            note              TEXT NOT NULL DEFAULT '',
            created_at        TEXT NOT NULL,
            decided_at        TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_leave_requests_user ON leave_requests(user_id, state);

        CREATE TABLE IF NOT EXISTS leave_balances (
            user_id    TEXT NOT NULL,
            year       INTEGER NOT NULL,
            leave_type TEXT NOT NULL,
            allocated  INTEGER NOT NULL DEFAULT 0,
            used       INTEGER NOT NULL DEFAULT 0,
            PRIMARY KEY (user_id, year, leave_type)
        );
        "#,
    )?;
    Ok(())
}

/// Append-only audit trail. Best-effort consumers only; nothing in the
/// engine reads it back on the hot path.
fn ensure_audit_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS audit (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            at            TEXT NOT NULL,
            action        TEXT NOT NULL,
            actor         TEXT NOT NULL,
            affected_user TEXT NOT NULL DEFAULT '',
            entity        TEXT NOT NULL DEFAULT '',
            entity_id     TEXT NOT NULL DEFAULT '',
            old_values    TEXT NOT NULL DEFAULT '',
            new_values    TEXT NOT NULL DEFAULT ''
        );
        "#,
    )?;
    Ok(())
}

/// Run every pending migration step. All steps are idempotent.
pub fn run_pending_migrations(conn: &Connection) -> Result<()> {
    ensure_sessions_table(conn)?;
    ensure_breaks_table(conn)?;
    ensure_daily_records_table(conn)?;
    ensure_live_status_table(conn)?;
    ensure_leave_tables(conn)?;
    ensure_audit_table(conn)?;
    Ok(())
}
