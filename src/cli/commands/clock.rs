use crate::cli::commands::{resolve_caller, resolve_instant};
use crate::cli::parser::{Cli, ClockAction, Commands};
use crate::config::Config;
use crate::core::clock::ClockLogic;
use crate::core::metrics::WorkPolicy;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::success;
use crate::utils::time::format_minutes;

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let Commands::Clock { action } = &cli.command else {
        return Ok(());
    };

    let mut pool = DbPool::new(&cfg.database)?;

    match action {
        ClockAction::In {
            user,
            date,
            at,
            device,
        } => {
            let caller = resolve_caller(cfg, user.as_ref(), cli.role.as_ref())?;
            let (day, instant) = resolve_instant(date.as_ref(), at.as_ref())?;

            let session = ClockLogic::clock_in(&mut pool, &caller, day, instant, device)?;
            success(format!(
                "{} clocked in on {} at {} (session {})",
                caller.user_id,
                session.date_str(),
                session.clock_in.format("%H:%M"),
                session.id
            ));
        }
        ClockAction::Out {
            user,
            date,
            at,
            note,
        } => {
            let caller = resolve_caller(cfg, user.as_ref(), cli.role.as_ref())?;
            let (day, instant) = resolve_instant(date.as_ref(), at.as_ref())?;
            let policy = WorkPolicy::from_config(cfg)?;

            let metrics =
                ClockLogic::clock_out(&mut pool, &policy, &caller, day, instant, note.as_deref())?;

            let mut flags = Vec::new();
            if metrics.is_late {
                flags.push("late");
            }
            if metrics.is_early_out {
                flags.push("early-out");
            }
            if metrics.is_overtime {
                flags.push("overtime");
            }
            let flags = if flags.is_empty() {
                String::new()
            } else {
                format!(" [{}]", flags.join(", "))
            };

            success(format!(
                "{} clocked out: worked {}, breaks {}, attendance {}%{}",
                caller.user_id,
                format_minutes(metrics.work_minutes),
                format_minutes(metrics.break_minutes),
                metrics.attendance_pct,
                flags
            ));
        }
    }

    Ok(())
}
