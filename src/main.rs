//! VideoGate CLI
//!
//! Checks video uploads against a codec and container compatibility policy
//! before they are accepted for storage.
//!
//! # Usage
//!
//! ```bash
//! videogate check clip.mp4 clip.flv
//! videogate validate uploads/ --format json
//! videogate validate /tmp/upload-8f3a --name "Leg Day.MOV"
//! videogate policy --format toml
//! ```

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use videogate::adapters::tracing_log::init_logging;
use videogate::app::container::DefaultAppContainer;
use videogate::cli::{commands, Cli, Commands};
use videogate::config_initialization::initialize_configuration_hierarchy;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let config = initialize_configuration_hierarchy(&cli)?;
    init_logging(&config.logging)?;
    info!("Starting VideoGate");

    let container = DefaultAppContainer::new(config)?;

    let passed = match cli.command {
        Commands::Validate(args) => {
            info!("Executing validate command");
            commands::validate(&container, args).await
        }
        Commands::Check(args) => {
            info!("Executing check command");
            commands::check(&container, args)
        }
        Commands::Policy(args) => {
            info!("Executing policy command");
            commands::policy(&container, args).map(|()| true)
        }
    };

    match passed {
        Ok(true) => Ok(ExitCode::SUCCESS),
        Ok(false) => {
            info!("One or more inputs were rejected");
            Ok(ExitCode::from(1))
        }
        Err(e) => {
            error!("Command failed: {:#}", e);
            Err(e)
        }
    }
}
