//! TrimX AI Clipper
//!
//! Picks the best moments of a long video for a given intent by asking an
//! AI collaborator to read the transcript, then cuts each moment into its
//! own file.
//!
//! # Usage
//!
//! ```bash
//! clipper-ai run --request request.json
//! clipper-ai prompt --request request.json
//! clipper-ai interpret --response answer.txt --min 15 --max 40
//! clipper-ai config
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use trimx_ai::adapters::tracing_log::init_tracing;
use trimx_ai::cli::{commands, Cli, Commands};
use trimx_ai::config_initialization::initialize_configuration_hierarchy;

/// Main entry point for the TrimX AI clipper
#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Resolve configuration before logging so the configured level applies
    let loaded = initialize_configuration_hierarchy(&cli).context("Failed to load configuration")?;
    init_tracing(&loaded.config.logging).context("Failed to initialize logging")?;

    match &loaded.source {
        Some(path) => info!("Loaded configuration from: {}", path.display()),
        None => info!("No configuration file found, using defaults"),
    }
    if loaded.env_overrides + loaded.cli_overrides > 0 {
        info!(
            env = loaded.env_overrides,
            cli = loaded.cli_overrides,
            "Applied configuration overrides"
        );
    }

    // Execute the requested command
    match cli.command {
        Commands::Run(args) => {
            info!("Executing run command");
            commands::run(args, &loaded.config).await?;
        }
        Commands::Prompt(args) => {
            info!("Executing prompt command");
            commands::prompt(args)?;
        }
        Commands::Interpret(args) => {
            info!("Executing interpret command");
            commands::interpret(args)?;
        }
        Commands::Config => {
            commands::show_config(&loaded.config)?;
        }
    }

    Ok(())
}
