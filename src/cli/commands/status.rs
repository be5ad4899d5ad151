use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::live;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::info;
use crate::utils::table::{Column, Table};
use crate::utils::time::format_minutes;

/// Live board: who is in, on break, or out right now. Polled, not pushed;
/// the read path repairs stale cache rows before rendering.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Status { user } = cmd {
        let pool = DbPool::new(&cfg.database)?;
        let entries = live::get(&pool.conn, user.as_deref())?;

        if entries.is_empty() {
            info("No live status entries");
            return Ok(());
        }

        let mut table = Table::new(vec![
            Column::new("USER", 10),
            Column::new("STATE", 6),
            Column::new("LAST ACTIVITY", 17),
            Column::new("WORKED", 7),
            Column::new("PAUSED", 7),
        ]);

        for e in &entries {
            table.add_row(vec![
                e.user_id.clone(),
                e.state.to_db_str().to_uppercase(),
                e.last_activity.clone(),
                format_minutes(e.work_minutes),
                format_minutes(e.break_minutes),
            ]);
        }

        print!("{}", table.render());
    }

    Ok(())
}
