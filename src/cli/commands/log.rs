use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::utils::table::{Column, Table};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if matches!(cmd, Commands::Log { print: true }) {
        let pool = DbPool::new(&cfg.database)?;
        let entries = db::audit::list(&pool.conn)?;

        let mut table = Table::new(vec![
            Column::new("AT", 27),
            Column::new("ACTION", 14),
            Column::new("ACTOR", 10),
            Column::new("AFFECTED", 10),
        ]);
        for (at, action, actor, affected) in &entries {
            table.add_row(vec![
                at.clone(),
                action.clone(),
                actor.clone(),
                affected.clone(),
            ]);
        }
        print!("{}", table.render());
    }

    Ok(())
}
