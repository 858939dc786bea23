//! Storm Config - Main Entry Point
//!
//! Renders the Storm backup configuration from environment settings and
//! writes it to stdout or a file.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use storm_config::config::{GeneratorSettings, Options};
use storm_config::render;

/// Storm configuration generator.
#[derive(Parser, Debug)]
#[command(name = "storm_config")]
#[command(about = "Generate the YAML configuration for the Storm backup tool")]
#[command(version)]
struct Args {
    /// Options JSON, e.g. '{"telegram":{"chat":"dv"},"tasker":{"log":false}}'.
    /// Overrides `STORM_OPTIONS`.
    #[arg(long)]
    options: Option<String>,

    /// File with one `source[:dest]` backup folder per line.
    /// Overrides `STORM_BACKUP_FOLDERS`.
    #[arg(long)]
    folders_file: Option<PathBuf>,

    /// Write the configuration to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Path to the .env file for environment variables.
    #[arg(long, default_value = ".env")]
    env_file: String,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "warn")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level);

    if let Err(e) = dotenvy::from_filename(&args.env_file) {
        debug!("Could not load .env file ({}): {}", args.env_file, e);
    }

    let mut settings =
        GeneratorSettings::from_env().context("Failed to load generator settings from environment")?;

    if let Some(options) = args.options {
        settings.options = options;
    }

    if let Some(path) = &args.folders_file {
        settings
            .load_backup_folders(path)
            .with_context(|| format!("Failed to load folder list from {}", path.display()))?;
    }

    let options = Options::parse(&settings.options).context("Failed to parse generator options")?;

    let yaml = render::render(&settings, &options).context("Failed to render configuration")?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, &yaml)
                .with_context(|| format!("Failed to write configuration to {}", path.display()))?;
            info!("Configuration written to {}", path.display());
        }
        None => {
            std::io::stdout()
                .lock()
                .write_all(yaml.as_bytes())
                .context("Failed to write configuration to stdout")?;
        }
    }

    Ok(())
}

/// Initializes the logging subsystem. Logs go to stderr; stdout carries the YAML.
fn init_logging(level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
