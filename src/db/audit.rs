//! Append-only audit sink, modeled on the portal's compliance log contract:
//! {action, actor, affected_user, entity, entity_id, old_values, new_values}.
//!
//! Writes are best-effort by design: a failed audit insert is reported as a
//! warning and never fails the attendance operation that triggered it.

use crate::errors::AppResult;
use crate::ui::messages::warning;
use chrono::Local;
use rusqlite::{params, Connection};
use serde::Serialize;

pub struct AuditEntry<'a> {
    pub action: &'a str,
    pub actor: &'a str,
    pub affected_user: &'a str,
    pub entity: &'a str,
    pub entity_id: String,
    pub old_values: String,
    pub new_values: String,
}

impl<'a> AuditEntry<'a> {
    pub fn new(action: &'a str, actor: &'a str, affected_user: &'a str, entity: &'a str) -> Self {
        Self {
            action,
            actor,
            affected_user,
            entity,
            entity_id: String::new(),
            old_values: String::new(),
            new_values: String::new(),
        }
    }

    pub fn entity_id(mut self, id: i64) -> Self {
        self.entity_id = id.to_string();
        self
    }

    pub fn old<T: Serialize>(mut self, value: &T) -> Self {
        self.old_values = serde_json::to_string(value).unwrap_or_default();
        self
    }

    pub fn new_values<T: Serialize>(mut self, value: &T) -> Self {
        self.new_values = serde_json::to_string(value).unwrap_or_default();
        self
    }
}

fn append(conn: &Connection, e: &AuditEntry) -> AppResult<()> {
    let now = Local::now().to_rfc3339();

    let mut stmt = conn.prepare_cached(
        "INSERT INTO audit (at, action, actor, affected_user, entity, entity_id, old_values, new_values)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
    )?;

    stmt.execute(params![
        now,
        e.action,
        e.actor,
        e.affected_user,
        e.entity,
        e.entity_id,
        e.old_values,
        e.new_values,
    ])?;

    Ok(())
}

/// Record an audit entry, demoting failures to a warning. Compliance logging
/// must never be able to break attendance tracking.
pub fn record(conn: &Connection, e: AuditEntry) {
    if let Err(err) = append(conn, &e) {
        warning(format!("audit write failed for '{}': {}", e.action, err));
    }
}

pub fn list(conn: &Connection) -> AppResult<Vec<(String, String, String, String)>> {
    let mut stmt = conn.prepare(
        "SELECT at, action, actor, affected_user FROM audit ORDER BY at DESC, id DESC",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
        ))
    })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
