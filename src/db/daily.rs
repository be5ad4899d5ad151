use crate::errors::{AppError, AppResult};
use crate::models::daily_record::DailyRecord;
use crate::models::session::RecordSource;
use crate::utils::date::{parse_date, period_conditions};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Result, Row};

pub fn map_row(row: &Row) -> Result<DailyRecord> {
    let date_str: String = row.get("date")?;
    let date = parse_date(&date_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::InvalidDate(date_str.clone())),
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

    Ok(DailyRecord {
        user_id: row.get("user_id")?,
        role: row.get("role")?,
        date,
        clock_in: row.get("clock_in")?,
        clock_out: row.get("clock_out")?,
        work_minutes: row.get("work_minutes")?,
        break_minutes: row.get("break_minutes")?,
        overtime_minutes: row.get("overtime_minutes")?,
        is_late: row.get::<_, i64>("late")? == 1,
        is_early_out: row.get::<_, i64>("early_out")? == 1,
        is_overtime: row.get::<_, i64>("overtime")? == 1,
        attendance_pct: row.get("attendance_pct")?,
        source,
        device: row.get("device")?,
        note: row.get("note")?,
        updated_at: row.get("updated_at")?,
    })
}

/// Idempotent upsert keyed on (user_id, date). Every column is written as an
/// absolute value, so retrying after a partial failure cannot double-count.
pub fn upsert(conn: &Connection, r: &DailyRecord) -> AppResult<()> {
    conn.execute(
        "INSERT INTO daily_records
            (user_id, role, date, clock_in, clock_out, work_minutes, break_minutes,
             overtime_minutes, late, early_out, overtime, attendance_pct,
             source, device, note, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)
         ON CONFLICT(user_id, date) DO UPDATE SET
            role = excluded.role,
            clock_in = excluded.clock_in,
            clock_out = excluded.clock_out,
            work_minutes = excluded.work_minutes,
            break_minutes = excluded.break_minutes,
            overtime_minutes = excluded.overtime_minutes,
            late = excluded.late,
            early_out = excluded.early_out,
            overtime = excluded.overtime,
            attendance_pct = excluded.attendance_pct,
            source = excluded.source,
            device = excluded.device,
            note = excluded.note,
            updated_at = excluded.updated_at",
        params![
            r.user_id,
            r.role,
            r.date_str(),
            r.clock_in,
            r.clock_out,
            r.work_minutes,
            r.break_minutes,
            r.overtime_minutes,
            r.is_late as i64,
            r.is_early_out as i64,
            r.is_overtime as i64,
            r.attendance_pct,
            r.source.to_db_str(),
            r.device,
            r.note,
            r.updated_at,
        ],
    )?;
    Ok(())
}

pub fn find(conn: &Connection, user_id: &str, date: NaiveDate) -> AppResult<Option<DailyRecord>> {
    let mut stmt =
        conn.prepare("SELECT * FROM daily_records WHERE user_id = ?1 AND date = ?2")?;
    let record = stmt
        .query_row(
            params![user_id, date.format("%Y-%m-%d").to_string()],
            map_row,
        )
        .optional()?;
    Ok(record)
}

pub fn exists(conn: &Connection, user_id: &str, date: NaiveDate) -> AppResult<bool> {
    let mut stmt =
        conn.prepare("SELECT 1 FROM daily_records WHERE user_id = ?1 AND date = ?2 LIMIT 1")?;
    let exists = stmt.exists(params![user_id, date.format("%Y-%m-%d").to_string()])?;
    Ok(exists)
}

/// List records with optional user and period filters
/// (YYYY, YYYY-MM, YYYY-MM-DD, start:end ranges, or `all`).
pub fn list(
    conn: &Connection,
    user_id: Option<&str>,
    period: Option<&str>,
) -> AppResult<Vec<DailyRecord>> {
    let (mut conditions, mut params) = period_conditions(period)?;

    if let Some(u) = user_id {
        conditions.push("user_id = ?".to_string());
        params.push(u.to_string());
    }

    let mut query = "SELECT * FROM daily_records".to_string();
    if !conditions.is_empty() {
        query.push_str(" WHERE ");
        query.push_str(&conditions.join(" AND "));
    }
    query.push_str(" ORDER BY date ASC, user_id ASC");

    let mut stmt = conn.prepare(&query)?;
    let bind: Vec<&dyn rusqlite::ToSql> = params.iter().map(|s| s as &dyn rusqlite::ToSql).collect();
    let rows = stmt.query_map(rusqlite::params_from_iter(bind), map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Remove leave-placeholder records for the given (user, dates). Clock-sourced
/// records are left alone: precedence belongs to real attendance data.
pub fn delete_leave_records(conn: &Connection, user_id: &str, dates: &[String]) -> AppResult<usize> {
    let mut deleted = 0;
    for date in dates {
        deleted += conn.execute(
            "DELETE FROM daily_records WHERE user_id = ?1 AND date = ?2 AND source = 'leave'",
            params![user_id, date],
        )?;
    }
    Ok(deleted)
}
