use crate::errors::{AppError, AppResult};
use crate::models::leave::{DayPart, LeaveBalance, LeaveRequest, LeaveState};
use crate::utils::date::parse_date;
use rusqlite::{params, Connection, OptionalExtension, Result, Row};

pub fn map_request_row(row: &Row) -> Result<LeaveRequest> {
    let start_str: String = row.get("start_date")?;
    let end_str: String = row.get("end_date")?;

    let start_date = parse_date(&start_str).ok_or_else(|| invalid_date(&start_str))?;
    let end_date = parse_date(&end_str).ok_or_else(|| invalid_date(&end_str))?;

    let state_str: String = row.get("state")?;
    let state = LeaveState::from_db_str(&state_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::Other(format!("Invalid state: {}", state_str))),
        )
    })?;

    let part_str: String = row.get("day_part")?;
    let day_part = DayPart::from_db_str(&part_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::Other(format!("Invalid day part: {}", part_str))),
        )
    })?;

    Ok(LeaveRequest {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        leave_type: row.get("leave_type")?,
        start_date,
        end_date,
        day_part,
        state,
        requested_minutes: row.get("requested_minutes")?,
        note: row.get("note")?,
        created_at: row.get("created_at")?,
        decided_at: row.get("decided_at")?,
    })
}

fn invalid_date(s: &str) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        0,
        rusqlite::types::Type::Text,
        Box::new(AppError::InvalidDate(s.to_string())),
    )
}

pub fn insert_request(conn: &Connection, r: &LeaveRequest) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO leave_requests
            (user_id, leave_type, start_date, end_date, day_part, state,
             requested_minutes, note, created_at, decided_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            r.user_id,
            r.leave_type,
            r.start_date.format("%Y-%m-%d").to_string(),
            r.end_date.format("%Y-%m-%d").to_string(),
            r.day_part.to_db_str(),
            r.state.to_db_str(),
            r.requested_minutes,
            r.note,
            r.created_at,
            r.decided_at,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn find_request(conn: &Connection, id: i64) -> AppResult<Option<LeaveRequest>> {
    let mut stmt = conn.prepare("SELECT * FROM leave_requests WHERE id = ?1")?;
    let request = stmt.query_row([id], map_request_row).optional()?;
    Ok(request)
}

pub fn set_request_state(
    conn: &Connection,
    id: i64,
    state: LeaveState,
    decided_at: &str,
) -> AppResult<()> {
    conn.execute(
        "UPDATE leave_requests SET state = ?2, decided_at = ?3 WHERE id = ?1",
        params![id, state.to_db_str(), decided_at],
    )?;
    Ok(())
}

pub fn list_requests(conn: &Connection, user_id: Option<&str>) -> AppResult<Vec<LeaveRequest>> {
    let mut out = Vec::new();

    match user_id {
        Some(u) => {
            let mut stmt = conn
                .prepare("SELECT * FROM leave_requests WHERE user_id = ?1 ORDER BY start_date")?;
            let rows = stmt.query_map([u], map_request_row)?;
            for r in rows {
                out.push(r?);
            }
        }
        None => {
            let mut stmt = conn.prepare("SELECT * FROM leave_requests ORDER BY start_date")?;
            let rows = stmt.query_map([], map_request_row)?;
            for r in rows {
                out.push(r?);
            }
        }
    }

    Ok(out)
}

pub fn find_balance(
    conn: &Connection,
    user_id: &str,
    year: i32,
    leave_type: &str,
) -> AppResult<Option<LeaveBalance>> {
    let mut stmt = conn.prepare(
        "SELECT user_id, year, leave_type, allocated, used
         FROM leave_balances
         WHERE user_id = ?1 AND year = ?2 AND leave_type = ?3",
    )?;

    let balance = stmt
        .query_row(params![user_id, year, leave_type], |row| {
            Ok(LeaveBalance {
                user_id: row.get(0)?,
                year: row.get(1)?,
                leave_type: row.get(2)?,
                allocated: row.get(3)?,
                used: row.get(4)?,
            })
        })
        .optional()?;

    Ok(balance)
}

/// Adjust `used` by a signed delta. Only ever called inside the approval or
/// cancellation transaction so the read-modify-write cannot interleave with
/// another approval for the same balance.
pub fn adjust_balance_used(
    conn: &Connection,
    user_id: &str,
    year: i32,
    leave_type: &str,
    delta: i64,
) -> AppResult<()> {
    let changed = conn.execute(
        "UPDATE leave_balances SET used = used + ?4
         WHERE user_id = ?1 AND year = ?2 AND leave_type = ?3",
        params![user_id, year, leave_type, delta],
    )?;

    if changed == 0 {
        return Err(AppError::NotFound(format!(
            "leave balance for {} / {} / {}",
            user_id, year, leave_type
        )));
    }
    Ok(())
}

/// Create or raise an allocation. `used` is preserved on conflict, and an
/// existing allocation is never lowered: a smaller grant could leave the row
/// with `allocated < used`.
pub fn grant_balance(
    conn: &Connection,
    user_id: &str,
    year: i32,
    leave_type: &str,
    allocated: i64,
) -> AppResult<()> {
    conn.execute(
        "INSERT INTO leave_balances (user_id, year, leave_type, allocated, used)
         VALUES (?1, ?2, ?3, ?4, 0)
         ON CONFLICT(user_id, year, leave_type) DO UPDATE SET
            allocated = MAX(allocated, excluded.allocated)",
        params![user_id, year, leave_type, allocated],
    )?;
    Ok(())
}

pub fn list_balances(conn: &Connection, user_id: &str) -> AppResult<Vec<LeaveBalance>> {
    let mut stmt = conn.prepare(
        "SELECT user_id, year, leave_type, allocated, used
         FROM leave_balances WHERE user_id = ?1
         ORDER BY year, leave_type",
    )?;

    let rows = stmt.query_map([user_id], |row| {
        Ok(LeaveBalance {
            user_id: row.get(0)?,
            year: row.get(1)?,
            leave_type: row.get(2)?,
            allocated: row.get(3)?,
            used: row.get(4)?,
        })
    })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
