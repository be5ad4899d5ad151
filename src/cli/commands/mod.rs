pub mod breaks;
pub mod clock;
pub mod config;
pub mod init;
pub mod leave;
pub mod list;
pub mod log;
pub mod rebuild;
pub mod status;

use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::models::caller::{Caller, Role};
use crate::utils::date::{parse_date, today};
use crate::utils::time::parse_time;
use chrono::{Local, NaiveDate, NaiveDateTime};

/// Resolve the caller identity: explicit `--user` beats the configured
/// default; role comes from the global `--role` flag or the config.
pub fn resolve_caller(cfg: &Config, user: Option<&String>, role: Option<&String>) -> AppResult<Caller> {
    let user_id = user.cloned().unwrap_or_else(|| cfg.default_user.clone());

    let role_str = role.cloned().unwrap_or_else(|| cfg.default_role.clone());
    let role = Role::from_str_opt(&role_str)
        .ok_or_else(|| AppError::Config(format!("invalid role: {}", role_str)))?;

    Ok(Caller::new(&user_id, role))
}

/// Resolve an event instant from optional `--date` / `--at` flags.
/// Missing date means today; missing time means the current local time.
pub fn resolve_instant(
    date: Option<&String>,
    at: Option<&String>,
) -> AppResult<(NaiveDate, NaiveDateTime)> {
    let day = match date {
        Some(d) => parse_date(d).ok_or_else(|| AppError::InvalidDate(d.to_string()))?,
        None => today(),
    };

    let time = match at {
        Some(t) => parse_time(t).ok_or_else(|| AppError::InvalidTime(t.to_string()))?,
        None => Local::now().time(),
    };

    Ok((day, day.and_time(time)))
}
