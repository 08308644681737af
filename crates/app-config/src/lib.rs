//! TAO App Config
//!
//! Application startup: version tracking, screen and signature facts, the
//! preference pass-through and the diagnostic report.

pub mod context;
pub mod manager;
pub mod platform;
pub mod report;
pub mod snapshot;
pub mod trial;

pub use context::{InitState, TaoContext};
pub use manager::{AppConfig, AppConfigBuilder, APP_VERSION_CODE, APP_VERSION_NAME};
pub use platform::{AppHandle, DeviceIdSource, PackageInfo, PackageMetadataSource};
pub use snapshot::{ApplicationSnapshot, VersionCheck};

/// Platform lookup errors
#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("Package not found: {0}")]
    PackageNotFound(String),
}
