pub mod cli;
pub mod core;
pub mod loader;

use anyhow::Result;
use tracing::{debug, info};

/// Commands that operate on a loaded configuration.
pub enum AppCommand {
    Recommend { json: bool },
}

pub fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Hedge advisor starting...");

    let config = match config_path {
        Some(path) => core::config::AppConfig::load_from_path(path)?,
        None => core::config::AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    match command {
        AppCommand::Recommend { json } => cli::recommend::run(&config, json),
    }
}
