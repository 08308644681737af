//! TAO Configuration
//!
//! Settings for the library and the `tao` tool:
//! - Preference store backend and location
//! - Logging level and format
//! - Digest algorithms used for signature introspection
//! - Diagnostic report behaviour

use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use directories::ProjectDirs;
use tracing::{info, debug};

use crate::error::{Result, TaoError};

/// Preference store backend
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    /// JSON documents on disk, one per package
    #[default]
    File,
    /// Process-local, nothing survives a restart
    Memory,
}

/// Preference store configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StoreConfig {
    /// Backend to use
    pub backend: StoreBackend,
    /// Directory holding the per-package preference files
    pub dir: Option<PathBuf>,
}

impl StoreConfig {
    /// Directory the file backend writes to
    pub fn resolved_dir(&self) -> Result<PathBuf> {
        match &self.dir {
            Some(dir) => Ok(dir.clone()),
            None => TaoConfig::data_dir()
                .map(|dir| dir.join("prefs"))
                .ok_or_else(|| TaoError::Config("Cannot determine data directory".into())),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default level filter, overridden by `TAO_LOG`
    pub level: String,
    /// Include source file and line in log lines
    pub with_file: bool,
    /// Include the module target in log lines
    pub with_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            with_file: false,
            with_target: false,
        }
    }
}

/// Signature introspection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SigningConfig {
    /// Digest used for the base64 key hash
    pub key_hash_algorithm: String,
    /// Digest used for the hex fingerprints
    pub fingerprint_algorithm: String,
}

impl Default for SigningConfig {
    fn default() -> Self {
        Self {
            key_hash_algorithm: "SHA-1".to_string(),
            fingerprint_algorithm: "SHA-1".to_string(),
        }
    }
}

/// Diagnostic report configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Print the application report right after init
    pub print_info_on_init: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self { print_info_on_init: true }
    }
}

/// Main TAO configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TaoConfig {
    /// Configuration version for migrations
    pub version: u32,
    /// Preference store settings
    pub store: StoreConfig,
    /// Logging settings
    pub logging: LoggingConfig,
    /// Signature settings
    pub signing: SigningConfig,
    /// Report settings
    pub report: ReportConfig,
}

impl Default for TaoConfig {
    fn default() -> Self {
        Self {
            version: 1,
            store: StoreConfig::default(),
            logging: LoggingConfig::default(),
            signing: SigningConfig::default(),
            report: ReportConfig::default(),
        }
    }
}

impl TaoConfig {
    /// Get the configuration directory path
    pub fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("at", "tsvetkov", "TAO")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Get the configuration file path
    pub fn config_file() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("config.toml"))
    }

    /// Get the data directory path
    pub fn data_dir() -> Option<PathBuf> {
        ProjectDirs::from("at", "tsvetkov", "TAO")
            .map(|dirs| dirs.data_dir().to_path_buf())
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Render configuration as TOML text
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load configuration from a file, falling back to defaults when it does not exist
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            debug!("Loading config from {:?}", path);
            let contents = std::fs::read_to_string(path)?;
            Self::from_toml_str(&contents)
        } else {
            info!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, self.to_toml_string()?)?;

        debug!("Config saved to {:?}", path);
        Ok(())
    }
}
