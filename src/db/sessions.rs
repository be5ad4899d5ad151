use crate::errors::{AppError, AppResult};
use crate::models::session::{ClockSession, RecordSource, SessionStatus};
use crate::utils::date::parse_date;
use crate::utils::time::{format_datetime, parse_datetime};
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection, OptionalExtension, Result, Row};

pub fn map_row(row: &Row) -> Result<ClockSession> {
    let date_str: String = row.get("date")?;
    let date = parse_date(&date_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::InvalidDate(date_str.clone())),
        )
    })?;

    let clock_in = get_datetime(row, "clock_in")?;
    let clock_out: Option<String> = row.get("clock_out")?;
    let clock_out = match clock_out {
        Some(s) => Some(parse_datetime_col(&s)?),
        None => None,
    };

    let status_str: String = row.get("status")?;
    let status = SessionStatus::from_db_str(&status_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::Other(format!("Invalid status: {}", status_str))),
        )
    })?;

    let source_str: String = row.get("source")?;
    let source = RecordSource::from_db_str(&source_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::Other(format!("Invalid source: {}", source_str))),
        )
    })?;

    Ok(ClockSession {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        date,
        clock_in,
        clock_out,
        status,
        break_minutes: row.get("break_minutes")?,
        work_minutes: row.get("work_minutes")?,
        device: row.get("device")?,
        note: row.get("note")?,
        source,
        leave_request_id: row.get("leave_request_id")?,
        created_at: row.get("created_at")?,
    })
}

fn get_datetime(row: &Row, col: &str) -> Result<NaiveDateTime> {
    let s: String = row.get(col)?;
    parse_datetime_col(&s)
}

fn parse_datetime_col(s: &str) -> Result<NaiveDateTime> {
    parse_datetime(s).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::InvalidTime(s.to_string())),
        )
    })
}

/// Insert a new session row. The partial unique index on
/// (user_id, date) WHERE status='active' is the single-writer defense: a
/// concurrent clock-in for the same day loses with `AlreadyActive` instead
/// of silently overwriting the winner.
pub fn insert_session(conn: &Connection, s: &ClockSession) -> AppResult<i64> {
    let res = conn.execute(
        "INSERT INTO sessions
            (user_id, date, clock_in, clock_out, status, break_minutes, work_minutes,
             device, note, source, leave_request_id, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        params![
            s.user_id,
            s.date_str(),
            format_datetime(s.clock_in),
            s.clock_out.map(format_datetime),
            s.status.to_db_str(),
            s.break_minutes,
            s.work_minutes,
            s.device,
            s.note,
            s.source.to_db_str(),
            s.leave_request_id,
            s.created_at,
        ],
    );

    match res {
        Ok(_) => Ok(conn.last_insert_rowid()),
        Err(e) if AppError::is_constraint_violation(&e) => Err(AppError::AlreadyActive {
            user: s.user_id.clone(),
            date: s.date_str(),
        }),
        Err(e) => Err(e.into()),
    }
}

pub fn find_active(
    conn: &Connection,
    user_id: &str,
    date: NaiveDate,
) -> AppResult<Option<ClockSession>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM sessions
         WHERE user_id = ?1 AND date = ?2 AND status = 'active'",
    )?;

    let session = stmt
        .query_row(
            params![user_id, date.format("%Y-%m-%d").to_string()],
            map_row,
        )
        .optional()?;

    Ok(session)
}

pub fn find_by_id(conn: &Connection, id: i64) -> AppResult<Option<ClockSession>> {
    let mut stmt = conn.prepare("SELECT * FROM sessions WHERE id = ?1")?;
    let session = stmt.query_row([id], map_row).optional()?;
    Ok(session)
}

/// All sessions for one (user, date), oldest first. A day normally holds at
/// most one completed session plus corrections, but the reader must not
/// assume that.
pub fn list_for_day(conn: &Connection, user_id: &str, date: NaiveDate) -> AppResult<Vec<ClockSession>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM sessions WHERE user_id = ?1 AND date = ?2 ORDER BY clock_in ASC",
    )?;

    let rows = stmt.query_map(
        params![user_id, date.format("%Y-%m-%d").to_string()],
        map_row,
    )?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn exists_for_day(conn: &Connection, user_id: &str, date: NaiveDate) -> AppResult<bool> {
    let mut stmt = conn.prepare("SELECT 1 FROM sessions WHERE user_id = ?1 AND date = ?2 LIMIT 1")?;
    let exists = stmt.exists(params![user_id, date.format("%Y-%m-%d").to_string()])?;
    Ok(exists)
}

/// Close a session: clock-out timestamp, recomputed totals, completed status.
/// Sessions are never hard-deleted; corrections write new values on top.
pub fn complete_session(
    conn: &Connection,
    id: i64,
    clock_out: NaiveDateTime,
    break_minutes: i64,
    work_minutes: i64,
    note: Option<&str>,
) -> AppResult<()> {
    conn.execute(
        "UPDATE sessions
         SET clock_out = ?2, status = 'completed', break_minutes = ?3,
             work_minutes = ?4,
             note = CASE WHEN ?5 IS NULL THEN note ELSE ?5 END
         WHERE id = ?1",
        params![id, format_datetime(clock_out), break_minutes, work_minutes, note],
    )?;
    Ok(())
}

/// Recompute the cumulative break rollup as a SUM over closed breaks.
/// Deliberately not an incremental add, so replays and corrections converge.
pub fn refresh_break_minutes(conn: &Connection, session_id: i64) -> AppResult<i64> {
    conn.execute(
        "UPDATE sessions
         SET break_minutes = (
             SELECT COALESCE(SUM(duration_minutes), 0)
             FROM breaks
             WHERE session_id = ?1 AND break_end IS NOT NULL
         )
         WHERE id = ?1",
        [session_id],
    )?;

    let minutes = conn.query_row(
        "SELECT break_minutes FROM sessions WHERE id = ?1",
        [session_id],
        |row| row.get(0),
    )?;
    Ok(minutes)
}

/// Remove the placeholder sessions a leave request created. Real clock
/// sessions are never touched: the provenance column scopes the delete.
pub fn delete_leave_placeholders(conn: &Connection, leave_request_id: i64) -> AppResult<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT date FROM sessions WHERE leave_request_id = ?1 AND source = 'leave'",
    )?;
    let rows = stmt.query_map([leave_request_id], |row| row.get::<_, String>(0))?;

    let mut dates = Vec::new();
    for r in rows {
        dates.push(r?);
    }

    conn.execute(
        "DELETE FROM sessions WHERE leave_request_id = ?1 AND source = 'leave'",
        [leave_request_id],
    )?;

    Ok(dates)
}

/// Distinct (user, date) pairs across all sessions, for full rebuilds.
pub fn all_user_days(conn: &Connection) -> AppResult<Vec<(String, NaiveDate)>> {
    let mut stmt =
        conn.prepare("SELECT DISTINCT user_id, date FROM sessions ORDER BY user_id, date")?;

    let rows = stmt.query_map([], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
    })?;

    let mut out = Vec::new();
    for r in rows {
        let (user, date_str) = r?;
        let date = parse_date(&date_str)
            .ok_or_else(|| AppError::InvalidDate(date_str.clone()))?;
        out.push((user, date));
    }
    Ok(out)
}

pub fn all_users(conn: &Connection) -> AppResult<Vec<String>> {
    let mut stmt = conn.prepare("SELECT DISTINCT user_id FROM sessions ORDER BY user_id")?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
