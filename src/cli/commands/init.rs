use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::success;

/// Create the config file (unless in test mode) and an initialized database.
pub fn handle(cli: &Cli) -> AppResult<()> {
    Config::init_all(cli.db.clone(), cli.test)?;

    // Opening the pool runs the migrations and leaves a ready schema behind.
    let cfg = if let Some(db) = &cli.db {
        Config {
            database: db.clone(),
            ..Config::load()
        }
    } else {
        Config::load()
    };

    DbPool::new(&cfg.database)?;
    success("Database initialized");

    Ok(())
}
