use crate::cli::commands::{resolve_caller, resolve_instant};
use crate::cli::parser::{BreakAction, Cli, Commands};
use crate::config::Config;
use crate::core::breaks::BreakLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::success;
use crate::utils::time::format_minutes;

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let Commands::Break { action } = &cli.command else {
        return Ok(());
    };

    let mut pool = DbPool::new(&cfg.database)?;

    match action {
        BreakAction::Start {
            user,
            date,
            at,
            reason,
        } => {
            let caller = resolve_caller(cfg, user.as_ref(), cli.role.as_ref())?;
            let (day, instant) = resolve_instant(date.as_ref(), at.as_ref())?;

            let interval = BreakLogic::start(&mut pool, &caller, day, instant, reason)?;
            success(format!(
                "{} on break since {} (break {})",
                caller.user_id,
                interval.break_start.format("%H:%M"),
                interval.id
            ));
        }
        BreakAction::End { user, date, at } => {
            let caller = resolve_caller(cfg, user.as_ref(), cli.role.as_ref())?;
            let (day, instant) = resolve_instant(date.as_ref(), at.as_ref())?;

            let duration = BreakLogic::end(&mut pool, &caller, day, instant)?;
            success(format!(
                "{} back from break after {}",
                caller.user_id,
                format_minutes(duration)
            ));
        }
    }

    Ok(())
}
