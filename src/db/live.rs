use crate::errors::{AppError, AppResult};
use crate::models::live_status::{LiveState, LiveStatus};
use rusqlite::{params, Connection, OptionalExtension, Result, Row};

pub fn map_row(row: &Row) -> Result<LiveStatus> {
    let state_str: String = row.get("state")?;
    let state = LiveState::from_db_str(&state_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::Other(format!("Invalid state: {}", state_str))),
        )
    })?;

    Ok(LiveStatus {
        user_id: row.get("user_id")?,
        state,
        last_activity: row.get("last_activity")?,
        work_minutes: row.get("work_minutes")?,
        break_minutes: row.get("break_minutes")?,
        updated_at: row.get("updated_at")?,
    })
}

/// Overwrite the cache row for one user. The caller always supplies a value
/// freshly projected from session/break truth, never an edited copy.
pub fn upsert(conn: &Connection, s: &LiveStatus) -> AppResult<()> {
    conn.execute(
        "INSERT INTO live_status
            (user_id, state, last_activity, work_minutes, break_minutes, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT(user_id) DO UPDATE SET
            state = excluded.state,
            last_activity = excluded.last_activity,
            work_minutes = excluded.work_minutes,
            break_minutes = excluded.break_minutes,
            updated_at = excluded.updated_at",
        params![
            s.user_id,
            s.state.to_db_str(),
            s.last_activity,
            s.work_minutes,
            s.break_minutes,
            s.updated_at,
        ],
    )?;
    Ok(())
}

pub fn find(conn: &Connection, user_id: &str) -> AppResult<Option<LiveStatus>> {
    let mut stmt = conn.prepare("SELECT * FROM live_status WHERE user_id = ?1")?;
    let status = stmt.query_row([user_id], map_row).optional()?;
    Ok(status)
}

pub fn list(conn: &Connection, user_id: Option<&str>) -> AppResult<Vec<LiveStatus>> {
    let mut out = Vec::new();

    match user_id {
        Some(u) => {
            if let Some(s) = find(conn, u)? {
                out.push(s);
            }
        }
        None => {
            let mut stmt = conn.prepare("SELECT * FROM live_status ORDER BY user_id")?;
            let rows = stmt.query_map([], map_row)?;
            for r in rows {
                out.push(r?);
            }
        }
    }

    Ok(out)
}
