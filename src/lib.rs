//! punchcard library root.
//! Exposes the CLI parser, the high-level run() function, and the internal
//! engine modules (clock sessions, breaks, metrics, daily records, live
//! status, leave reconciliation).

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod models;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    match &cli.command {
        Commands::Init => cli::commands::init::handle(cli),
        Commands::Config { .. } => cli::commands::config::handle(&cli.command, cfg),
        Commands::Clock { .. } => cli::commands::clock::handle(cli, cfg),
        Commands::Break { .. } => cli::commands::breaks::handle(cli, cfg),
        Commands::Leave { .. } => cli::commands::leave::handle(cli, cfg),
        Commands::Status { .. } => cli::commands::status::handle(&cli.command, cfg),
        Commands::Record { .. } | Commands::List { .. } => {
            cli::commands::list::handle(&cli.command, cfg)
        }
        Commands::Rebuild => cli::commands::rebuild::handle(cli, cfg),
        Commands::Log { .. } => cli::commands::log::handle(&cli.command, cfg),
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    let cli = Cli::parse();

    // Load the config once; a --db override replaces the database path for
    // this invocation only.
    let mut cfg = Config::load();
    if let Some(custom_db) = &cli.db {
        cfg.database = custom_db.clone();
    }

    dispatch(&cli, &cfg)
}
