//! Unified application error type.
//! All modules (db, core, cli, utils) return AppError to keep the error
//! handling consistent and easy to manage.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid time format: {0}")]
    InvalidTime(String),

    #[error("Invalid period filter: {0}")]
    InvalidPeriod(String),

    // ---------------------------
    // Clock / break state conflicts
    // ---------------------------
    #[error("An active session already exists for {user} on {date}")]
    AlreadyActive { user: String, date: String },

    #[error("No active session for {user} on {date}")]
    NoActiveSession { user: String, date: String },

    #[error("A break is already open for this session")]
    BreakAlreadyOpen,

    #[error("No open break for this session")]
    NoOpenBreak,

    // ---------------------------
    // Leave workflow
    // ---------------------------
    #[error("Insufficient leave balance: {used} of {allocated} minutes used, {requested} requested")]
    InsufficientBalance {
        used: i64,
        allocated: i64,
        requested: i64,
    },

    #[error("Invalid state transition: {0}")]
    InvalidState(String),

    #[error("Not authorized: {0}")]
    NotAuthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load configuration")]
    ConfigLoad,

    #[error("Failed to save configuration")]
    ConfigSave,

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// True when the underlying rusqlite error is a uniqueness-constraint
    /// violation. The storage layer enforces the one-active-session and
    /// one-open-break invariants with partial unique indexes, so a racing
    /// writer surfaces here rather than silently overwriting state.
    pub fn is_constraint_violation(err: &rusqlite::Error) -> bool {
        matches!(
            err,
            rusqlite::Error::SqliteFailure(e, _)
                if e.code == rusqlite::ErrorCode::ConstraintViolation
        )
    }
}
