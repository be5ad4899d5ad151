use crate::cli::commands::resolve_caller;
use crate::cli::parser::{Cli, Commands, LeaveAction};
use crate::config::Config;
use crate::core::leave::LeaveLogic;
use crate::core::metrics::WorkPolicy;
use crate::db;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::leave::DayPart;
use crate::ui::messages::success;
use crate::utils::date::parse_date;
use crate::utils::table::{Column, Table};
use crate::utils::time::format_minutes;

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let Commands::Leave { action } = &cli.command else {
        return Ok(());
    };

    let mut pool = DbPool::new(&cfg.database)?;
    let policy = WorkPolicy::from_config(cfg)?;

    match action {
        LeaveAction::Request {
            start,
            end,
            user,
            leave_type,
            half_day,
            note,
        } => {
            let caller = resolve_caller(cfg, user.as_ref(), cli.role.as_ref())?;

            let start_date =
                parse_date(start).ok_or_else(|| AppError::InvalidDate(start.to_string()))?;
            let end_date = match end {
                Some(e) => parse_date(e).ok_or_else(|| AppError::InvalidDate(e.to_string()))?,
                None => start_date,
            };
            let day_part = if *half_day { DayPart::Half } else { DayPart::Full };

            let request = LeaveLogic::request(
                &mut pool, &policy, &caller, leave_type, start_date, end_date, day_part, note,
            )?;

            success(format!(
                "Leave request {} filed: {} {}..{} ({})",
                request.id,
                request.leave_type,
                request.start_date,
                request.end_date,
                format_minutes(request.requested_minutes)
            ));
        }
        LeaveAction::Approve { id, actor } => {
            let caller = resolve_caller(cfg, actor.as_ref(), cli.role.as_ref())?;
            let request = LeaveLogic::approve(&mut pool, &policy, &caller, *id)?;
            success(format!(
                "Leave request {} approved for {} ({}..{})",
                request.id, request.user_id, request.start_date, request.end_date
            ));
        }
        LeaveAction::Cancel { id, actor } => {
            let caller = resolve_caller(cfg, actor.as_ref(), cli.role.as_ref())?;
            let request = LeaveLogic::cancel(&mut pool, &caller, *id)?;
            success(format!(
                "Leave request {} cancelled for {}",
                request.id, request.user_id
            ));
        }
        LeaveAction::Grant {
            user,
            year,
            leave_type,
            minutes,
            actor,
        } => {
            let caller = resolve_caller(cfg, actor.as_ref(), cli.role.as_ref())?;
            LeaveLogic::grant(&mut pool, &caller, user, *year, leave_type, *minutes)?;
            success(format!(
                "Granted {} of {} leave to {} for {}",
                format_minutes(*minutes),
                leave_type,
                user,
                year
            ));
        }
        LeaveAction::Balance { user } => {
            let caller = resolve_caller(cfg, user.as_ref(), cli.role.as_ref())?;
            let balances = db::leave::list_balances(&pool.conn, &caller.user_id)?;

            let mut table = Table::new(vec![
                Column::new("YEAR", 5),
                Column::new("TYPE", 12),
                Column::new("ALLOCATED", 9),
                Column::new("USED", 9),
                Column::new("REMAINING", 9),
            ]);
            for b in &balances {
                table.add_row(vec![
                    b.year.to_string(),
                    b.leave_type.clone(),
                    format_minutes(b.allocated),
                    format_minutes(b.used),
                    format_minutes(b.remaining()),
                ]);
            }
            print!("{}", table.render());
        }
        LeaveAction::List { user } => {
            let requests = db::leave::list_requests(&pool.conn, user.as_deref())?;

            let mut table = Table::new(vec![
                Column::new("ID", 4),
                Column::new("USER", 10),
                Column::new("TYPE", 12),
                Column::new("FROM", 10),
                Column::new("TO", 10),
                Column::new("PART", 4),
                Column::new("STATE", 9),
                Column::new("MINUTES", 7),
            ]);
            for r in &requests {
                table.add_row(vec![
                    r.id.to_string(),
                    r.user_id.clone(),
                    r.leave_type.clone(),
                    r.start_date.to_string(),
                    r.end_date.to_string(),
                    r.day_part.to_db_str().to_string(),
                    r.state.to_db_str().to_string(),
                    r.requested_minutes.to_string(),
                ]);
            }
            print!("{}", table.render());
        }
    }

    Ok(())
}
