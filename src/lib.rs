pub mod cli;
pub mod core;
pub mod providers;

use crate::core::config::AppConfig;
use crate::core::{Converter, Direction};
use crate::providers::NbpRateProvider;
use anyhow::Result;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    Rate { inverse: bool, json: bool },
    Convert { amount: String, inverse: bool },
    Session { inverse: bool },
}

fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");
    Ok(config)
}

fn new_converter(config: &AppConfig, inverse: bool) -> Converter<NbpRateProvider> {
    let provider = NbpRateProvider::new(config.nbp_base_url());
    let direction = Direction::from_inverse(inverse || config.display.inverse);
    Converter::new(provider, direction)
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("kurs starting...");
    let config = load_config(config_path)?;

    match command {
        AppCommand::Rate { inverse, json } => {
            let converter = new_converter(&config, inverse);
            cli::rate::run(&converter, json).await
        }
        AppCommand::Convert { amount, inverse } => {
            let mut converter = new_converter(&config, inverse);
            cli::rate::run_convert(&mut converter, &amount).await
        }
        AppCommand::Session { inverse } => {
            let mut converter = new_converter(&config, inverse);
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            let mut stdout = std::io::stdout();
            cli::session::run(&mut converter, stdin, &mut stdout).await
        }
    }
}
