use crate::errors::{AppError, AppResult};
use crate::models::break_interval::BreakInterval;
use crate::utils::time::{format_datetime, parse_datetime};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension, Result, Row};

pub fn map_row(row: &Row) -> Result<BreakInterval> {
    let start_str: String = row.get("break_start")?;
    let break_start = parse_col(&start_str)?;

    let end_str: Option<String> = row.get("break_end")?;
    let break_end = match end_str {
        Some(s) => Some(parse_col(&s)?),
        None => None,
    };

    Ok(BreakInterval {
        id: row.get("id")?,
        session_id: row.get("session_id")?,
        break_start,
        break_end,
        duration_minutes: row.get("duration_minutes")?,
        reason: row.get("reason")?,
    })
}

fn parse_col(s: &str) -> Result<NaiveDateTime> {
    parse_datetime(s).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::InvalidTime(s.to_string())),
        )
    })
}

/// Open a break. The partial unique index on (session_id) WHERE break_end IS
/// NULL rejects a second open break, which surfaces as `BreakAlreadyOpen`.
pub fn insert_break(
    conn: &Connection,
    session_id: i64,
    break_start: NaiveDateTime,
    reason: &str,
) -> AppResult<i64> {
    let res = conn.execute(
        "INSERT INTO breaks (session_id, break_start, reason) VALUES (?1, ?2, ?3)",
        params![session_id, format_datetime(break_start), reason],
    );

    match res {
        Ok(_) => Ok(conn.last_insert_rowid()),
        Err(e) if AppError::is_constraint_violation(&e) => Err(AppError::BreakAlreadyOpen),
        Err(e) => Err(e.into()),
    }
}

pub fn find_open(conn: &Connection, session_id: i64) -> AppResult<Option<BreakInterval>> {
    let mut stmt =
        conn.prepare("SELECT * FROM breaks WHERE session_id = ?1 AND break_end IS NULL")?;
    let interval = stmt.query_row([session_id], map_row).optional()?;
    Ok(interval)
}

/// Close a break; the interval is read-only afterward.
pub fn close_break(
    conn: &Connection,
    break_id: i64,
    break_end: NaiveDateTime,
    duration_minutes: i64,
) -> AppResult<()> {
    conn.execute(
        "UPDATE breaks SET break_end = ?2, duration_minutes = ?3 WHERE id = ?1",
        params![break_id, format_datetime(break_end), duration_minutes],
    )?;
    Ok(())
}

pub fn list_for_session(conn: &Connection, session_id: i64) -> AppResult<Vec<BreakInterval>> {
    let mut stmt =
        conn.prepare("SELECT * FROM breaks WHERE session_id = ?1 ORDER BY break_start ASC")?;
    let rows = stmt.query_map([session_id], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
