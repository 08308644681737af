//! TAO - application configuration toolkit
//!
//! Startup facts about an application and the device it runs on: version
//! tracking across launches, screen classification, signing certificate
//! fingerprints and a typed preference store.
//!
//! ## Architecture
//!
//! - `tao-core`: errors, configuration, logging and the preference store
//! - `tao-display`: unit conversion and screen classification
//! - `tao-signing`: signing certificates, key hashes and digests
//! - `tao-app-config`: the application configuration manager
//!
//! This crate adds device profiles and the `tao` command line tool.

#![warn(clippy::all)]

pub mod commands;
pub mod profile;

pub use tao_app_config as app_config;
pub use tao_core as core;
pub use tao_display as display;
pub use tao_signing as signing;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "TAO";

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::profile::{DeviceProfile, ProfileHandle};
    pub use tao_app_config::{AppConfig, AppConfigBuilder, AppHandle, ApplicationSnapshot, TaoContext};
    pub use tao_core::{ConfigStore, PrefValue, StoreProvider, TaoConfig, TaoError};
    pub use tao_display::{DeviceType, Screen};
    pub use tao_signing::{DigestAlgorithm, SignatureInspector};
}
