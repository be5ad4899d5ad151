use crate::cli::commands::resolve_caller;
use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::core::metrics::WorkPolicy;
use crate::core::rebuild::RebuildLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::success;

/// Regenerate the derived stores from sessions + breaks.
pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    if matches!(cli.command, Commands::Rebuild) {
        let caller = resolve_caller(cfg, None, cli.role.as_ref())?;
        let policy = WorkPolicy::from_config(cfg)?;
        let mut pool = DbPool::new(&cfg.database)?;

        let report = RebuildLogic::run(&mut pool, &policy, &caller)?;
        success(format!(
            "Rebuilt {} daily records and {} live status entries",
            report.records, report.live_entries
        ));
    }

    Ok(())
}
