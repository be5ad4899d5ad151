use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::daily_record::DailyRecord;
use crate::ui::messages::info;
use crate::utils::date::parse_date;
use crate::utils::table::{Column, Table};
use crate::utils::time::format_minutes;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    match cmd {
        Commands::Record { date, user } => {
            let pool = DbPool::new(&cfg.database)?;
            let day = parse_date(date).ok_or_else(|| AppError::InvalidDate(date.to_string()))?;
            let user_id = user.clone().unwrap_or_else(|| cfg.default_user.clone());

            let record = db::daily::find(&pool.conn, &user_id, day)?.ok_or_else(|| {
                AppError::NotFound(format!("daily record for {} on {}", user_id, date))
            })?;

            print!("{}", render(&[record]));
        }
        Commands::List { period, user, json } => {
            let pool = DbPool::new(&cfg.database)?;
            let records = db::daily::list(&pool.conn, user.as_deref(), period.as_deref())?;

            if *json {
                let out = serde_json::to_string_pretty(&records)
                    .map_err(|e| AppError::Other(e.to_string()))?;
                println!("{}", out);
                return Ok(());
            }

            if records.is_empty() {
                info("No daily records found");
                return Ok(());
            }

            print!("{}", render(&records));
        }
        _ => {}
    }

    Ok(())
}

fn render(records: &[DailyRecord]) -> String {
    let mut table = Table::new(vec![
        Column::new("DATE", 10),
        Column::new("USER", 10),
        Column::new("IN", 5),
        Column::new("OUT", 5),
        Column::new("WORKED", 7),
        Column::new("BREAKS", 7),
        Column::new("OT", 6),
        Column::new("PCT", 4),
        Column::new("FLAGS", 20),
        Column::new("SRC", 5),
    ]);

    for r in records {
        let mut flags = Vec::new();
        if r.is_late {
            flags.push("late");
        }
        if r.is_early_out {
            flags.push("early-out");
        }
        if r.is_overtime {
            flags.push("overtime");
        }

        table.add_row(vec![
            r.date_str(),
            r.user_id.clone(),
            r.clock_in.clone(),
            r.clock_out.clone(),
            format_minutes(r.work_minutes),
            format_minutes(r.break_minutes),
            format_minutes(r.overtime_minutes),
            format!("{}%", r.attendance_pct),
            flags.join(","),
            r.source.to_db_str().to_string(),
        ]);
    }

    table.render()
}
