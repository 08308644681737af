//! Platform Handle
//!
//! Everything the manager asks the host platform for during init.

use serde::{Deserialize, Serialize};
use tao_display::DisplayMetricsSource;
use tao_signing::SignatureSource;

use crate::PlatformError;

/// Package metadata
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageInfo {
    pub package_name: String,
    pub version_name: String,
    pub version_code: i64,
    /// Human-readable application label
    pub label: String,
    /// Application flags mark the build as debuggable
    pub debuggable: bool,
}

/// Package manager lookups
pub trait PackageMetadataSource {
    fn package_info(&self, package_name: &str) -> Result<PackageInfo, PlatformError>;
}

/// Opaque per-device identifier
pub trait DeviceIdSource {
    fn read_device_id(&self) -> Option<String>;
}

/// The running application as seen by the platform
pub trait AppHandle {
    /// Package name of the running application
    fn package_name(&self) -> &str;

    fn packages(&self) -> &dyn PackageMetadataSource;

    fn display(&self) -> &dyn DisplayMetricsSource;

    fn signatures(&self) -> &dyn SignatureSource;

    fn device_ids(&self) -> &dyn DeviceIdSource;

    /// A debugger is attached right now
    fn is_debugger_connected(&self) -> bool {
        false
    }
}
