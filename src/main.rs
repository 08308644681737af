//! TAO - application configuration inspector
//!
//! Binary entry point. Parses the command line, loads the configuration and
//! hands off to the command implementations in the library.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info};

use tao::commands::{ClearCommand, ConvertCommand, FingerprintCommand, HashCommand, InspectCommand};
use tao::core::TaoConfig;
use tao::{APP_NAME, VERSION};

/// Inspect application configuration, screen and signing data
#[derive(Parser, Debug)]
#[command(name = "tao", version)]
#[command(about = "Application configuration, screen and signature inspector", long_about = None)]
struct Args {
    /// Configuration file (defaults to the platform config directory)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Initialize against a device profile and print the report
    Inspect {
        /// Device profile (TOML)
        #[arg(long)]
        profile: PathBuf,

        /// Print the snapshot as JSON
        #[arg(long)]
        json: bool,
    },
    /// Wipe the stored preferences of the profile's package
    Clear {
        #[arg(long)]
        profile: PathBuf,
    },
    /// Convert a length between physical units
    Convert {
        value: f32,
        /// inch, mm, cm, twip or pt
        from: String,
        to: String,
    },
    /// Digest a file
    Hash {
        file: PathBuf,

        #[arg(long, default_value = "SHA-1")]
        algorithm: String,
    },
    /// Signing certificate fingerprint of the profile's package
    Fingerprint {
        #[arg(long)]
        profile: PathBuf,

        #[arg(long, default_value_t = ':')]
        separator: char,

        #[arg(long, default_value = "SHA-1")]
        algorithm: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = match args.config {
        Some(path) => path,
        None => TaoConfig::config_file().context("Cannot determine the configuration directory")?,
    };
    let config = load_or_create_config(&config_path).await?;

    tao::core::logging::init_tracing(&config.logging)
        .expect("Failed to set tracing subscriber");

    info!("{} v{} starting...", APP_NAME, VERSION);
    debug!("Configuration: {:?}", config_path);

    match args.command {
        Command::Inspect { profile, json } => {
            InspectCommand { profile, json }.execute(&config).await?;
        }
        Command::Clear { profile } => {
            ClearCommand { profile }.execute(&config).await?;
        }
        Command::Convert { value, from, to } => {
            ConvertCommand { value, from, to }.execute()?;
        }
        Command::Hash { file, algorithm } => {
            HashCommand { file, algorithm }.execute()?;
        }
        Command::Fingerprint { profile, separator, algorithm } => {
            FingerprintCommand { profile, separator, algorithm }.execute().await?;
        }
    }

    Ok(())
}

/// Load or create the configuration file
async fn load_or_create_config(config_path: &Path) -> Result<TaoConfig> {
    if config_path.exists() {
        let content = tokio::fs::read_to_string(config_path)
            .await
            .with_context(|| format!("Cannot read {}", config_path.display()))?;
        Ok(TaoConfig::from_toml_str(&content)?)
    } else {
        let config = TaoConfig::default();

        if let Some(dir) = config_path.parent() {
            tokio::fs::create_dir_all(dir).await?;
        }
        tokio::fs::write(config_path, config.to_toml_string()?).await?;

        Ok(config)
    }
}
