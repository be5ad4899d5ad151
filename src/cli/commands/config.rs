use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::{AppError, AppResult};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Config { print_config } = cmd {
        if *print_config {
            let yaml = cfg.to_yaml().map_err(|_| AppError::ConfigLoad)?;
            println!("{}", yaml);
        }
    }

    Ok(())
}
