use clap::{Parser, Subcommand};

/// Command-line interface definition for punchcard
/// Time & attendance engine: clock events, breaks, daily records, live
/// status and leave reconciliation over SQLite
#[derive(Parser)]
#[command(
    name = "punchcard",
    version = env!("CARGO_PKG_VERSION"),
    about = "Track clock-in/out, breaks and leave; derive daily attendance records backed by SQLite",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    /// Caller role for this invocation (employee or admin)
    #[arg(global = true, long = "role")]
    pub role: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file
    Config {
        #[arg(long = "print", help = "Print the current configuration to stdout")]
        print_config: bool,
    },

    /// Clock in or out
    Clock {
        #[command(subcommand)]
        action: ClockAction,
    },

    /// Start or end a break on the active session
    #[command(name = "break")]
    Break {
        #[command(subcommand)]
        action: BreakAction,
    },

    /// Leave requests, approvals and balances
    Leave {
        #[command(subcommand)]
        action: LeaveAction,
    },

    /// Show the live in/break/out board
    Status {
        #[arg(long, help = "Show only this user")]
        user: Option<String>,
    },

    /// Show one canonical daily attendance record
    Record {
        /// Date (YYYY-MM-DD)
        date: String,

        #[arg(long, help = "User id (defaults to the configured user)")]
        user: Option<String>,
    },

    /// List daily attendance records
    List {
        /// Filter by period.
        ///
        /// Supported formats:
        /// - YYYY                  → entire year (e.g. "2025")
        /// - YYYY-MM               → entire month (e.g. "2025-06")
        /// - YYYY-MM-DD            → specific day (e.g. "2025-06-18")
        ///
        /// Ranges (start:end) in the same format:
        /// - YYYY:YYYY             → year range  (e.g. "2024:2025")
        /// - YYYY-MM:YYYY-MM       → month range (e.g. "2025-06:2025-08")
        /// - YYYY-MM-DD:YYYY-MM-DD → day range   (e.g. "2025-06-01:2025-06-10")
        ///
        /// Special value:
        /// - all                   → the entire archive (bypass date filtering)
        #[arg(
            long,
            short,
            help = "Filter by year/month/day or a custom range (YYYY, YYYY-MM, YYYY-MM-DD, or ranges)"
        )]
        period: Option<String>,

        #[arg(long, help = "Filter by user id")]
        user: Option<String>,

        #[arg(long, help = "Emit records as JSON instead of a table")]
        json: bool,
    },

    /// Rebuild daily records and live status from sessions and breaks
    Rebuild,

    /// Print the audit trail
    Log {
        #[arg(long = "print", help = "Print rows from the audit table")]
        print: bool,
    },
}

#[derive(Subcommand)]
pub enum ClockAction {
    /// Open today's session
    In {
        #[arg(long, help = "User id (defaults to the configured user)")]
        user: Option<String>,

        #[arg(long, help = "Date (YYYY-MM-DD), defaults to today")]
        date: Option<String>,

        #[arg(long, help = "Clock-in time (HH:MM), defaults to now")]
        at: Option<String>,

        #[arg(long, help = "Device/location metadata", default_value = "cli")]
        device: String,
    },

    /// Complete the active session and write the daily record
    Out {
        #[arg(long, help = "User id (defaults to the configured user)")]
        user: Option<String>,

        #[arg(long, help = "Date (YYYY-MM-DD), defaults to today")]
        date: Option<String>,

        #[arg(long, help = "Clock-out time (HH:MM), defaults to now")]
        at: Option<String>,

        #[arg(long, help = "Free-text note stored on the session")]
        note: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum BreakAction {
    /// Open a break (at most one per session)
    Start {
        #[arg(long, help = "User id (defaults to the configured user)")]
        user: Option<String>,

        #[arg(long, help = "Date (YYYY-MM-DD), defaults to today")]
        date: Option<String>,

        #[arg(long, help = "Break start time (HH:MM), defaults to now")]
        at: Option<String>,

        #[arg(long, help = "Break reason", default_value = "")]
        reason: String,
    },

    /// Close the open break
    End {
        #[arg(long, help = "User id (defaults to the configured user)")]
        user: Option<String>,

        #[arg(long, help = "Date (YYYY-MM-DD), defaults to today")]
        date: Option<String>,

        #[arg(long, help = "Break end time (HH:MM), defaults to now")]
        at: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum LeaveAction {
    /// File a pending leave request
    Request {
        /// First day of leave (YYYY-MM-DD)
        start: String,

        /// Last day of leave (YYYY-MM-DD), defaults to the start day
        end: Option<String>,

        #[arg(long, help = "User id (defaults to the configured user)")]
        user: Option<String>,

        #[arg(long = "type", help = "Leave type name", default_value = "annual")]
        leave_type: String,

        #[arg(long, help = "Request half days instead of full days")]
        half_day: bool,

        #[arg(long, help = "Free-text note", default_value = "")]
        note: String,
    },

    /// Approve a pending request (admin only)
    Approve {
        /// Leave request id
        id: i64,

        #[arg(long, help = "Acting admin user id (defaults to the configured user)")]
        actor: Option<String>,
    },

    /// Cancel a request (approved requests: admin only)
    Cancel {
        /// Leave request id
        id: i64,

        #[arg(long, help = "Acting user id (defaults to the configured user)")]
        actor: Option<String>,
    },

    /// Seed or raise an annual allocation (admin only)
    Grant {
        #[arg(long, help = "User receiving the allocation")]
        user: String,

        #[arg(long, help = "Calendar year of the allocation")]
        year: i32,

        #[arg(long = "type", help = "Leave type name", default_value = "annual")]
        leave_type: String,

        #[arg(long, help = "Allocated minutes for the year")]
        minutes: i64,

        #[arg(long, help = "Acting admin user id (defaults to the configured user)")]
        actor: Option<String>,
    },

    /// Show a user's balances
    Balance {
        #[arg(long, help = "User id (defaults to the configured user)")]
        user: Option<String>,
    },

    /// List leave requests
    List {
        #[arg(long, help = "Filter by user id")]
        user: Option<String>,
    },
}
