mod cli;
mod commands;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use doctemplater_core::{load_config, load_config_or_default, validate_config, Config};

use cli::{Cli, Command, LogFormat};

/// Configuration file used when neither --config nor DOCTEMPLATER_CONFIG is set
const DEFAULT_CONFIG_FILE: &str = "doctemplater.toml";

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format);

    if let Err(e) = run(cli).await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

/// Logs go to stderr so command output on stdout stays machine-readable.
fn init_logging(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}

fn load(explicit: Option<&PathBuf>) -> Result<Config> {
    let config = match explicit {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load config from {:?}", path))?,
        None => {
            let path = std::env::var("DOCTEMPLATER_CONFIG")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));
            load_config_or_default(&path)
                .with_context(|| format!("Failed to load config from {:?}", path))?
        }
    };

    validate_config(&config).context("Configuration validation failed")?;
    Ok(config)
}

async fn run(cli: Cli) -> Result<()> {
    let config = load(cli.config.as_ref())?;
    info!("Database path: {:?}", config.database.path);

    match cli.command {
        Command::Questions(command) => commands::questions::run(command, &config),
        Command::Generate(args) => commands::generate::run(args, &config).await,
        Command::Config => commands::print_config(&config),
    }
}
