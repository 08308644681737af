//! Device profiles
//!
//! A TOML description of an installed package and the device it runs on.
//! Loading a profile yields a [`ProfileHandle`], the platform handle the
//! application manager is initialized against.
//!
//! ```toml
//! device_id = "9774d56d682e549c"
//!
//! [package]
//! package_name = "ua.at.tsvetkov.demo"
//! version_name = "1.2"
//! version_code = 12
//! label = "Demo"
//! debuggable = true
//!
//! [display]
//! width_px = 1080.0
//! height_px = 2400.0
//! xdpi = 411.0
//! ydpi = 411.0
//!
//! [signing]
//! api_level = 34
//! certificates = ["3082030d308201f5a003020102"]
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use tao_app_config::{
    AppHandle, DeviceIdSource, PackageInfo, PackageMetadataSource, PlatformError,
};
use tao_display::{DisplayMetricsSource, StaticDisplay};
use tao_signing::{
    source_for_era, Certificate, PlatformEra, SignatureSource, SigningInfo, StaticSigning,
};

/// Signing section of a profile
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SigningProfile {
    /// Platform API level, selects the signature query shape
    pub api_level: u32,
    /// Package is signed by more than one signer
    pub multiple_signers: bool,
    /// Hex encoded certificates, signing order
    pub certificates: Vec<String>,
    /// Hex encoded rotation lineage. Defaults to `certificates`.
    pub lineage: Vec<String>,
}

impl Default for SigningProfile {
    fn default() -> Self {
        Self {
            api_level: 34,
            multiple_signers: false,
            certificates: Vec::new(),
            lineage: Vec::new(),
        }
    }
}

/// Device profile file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceProfile {
    pub device_id: Option<String>,
    pub debugger_connected: bool,
    pub package: PackageInfo,
    pub display: StaticDisplay,
    pub signing: SigningProfile,
}

impl DeviceProfile {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("Invalid device profile")
    }

    pub async fn load(path: &Path) -> Result<Self> {
        debug!("Loading device profile from {:?}", path);
        let contents = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Cannot read device profile {}", path.display()))?;
        Self::from_toml_str(&contents)
    }

    fn signing_info(&self) -> Result<SigningInfo> {
        let decode = |encoded: &Vec<String>| -> Result<Vec<Certificate>> {
            encoded
                .iter()
                .map(|hex| Certificate::from_hex(hex).context("Invalid certificate in profile"))
                .collect()
        };

        let apk_content_signers = decode(&self.signing.certificates)?;
        let signing_certificate_history = if self.signing.lineage.is_empty() {
            apk_content_signers.clone()
        } else {
            decode(&self.signing.lineage)?
        };

        Ok(SigningInfo {
            has_multiple_signers: self.signing.multiple_signers,
            apk_content_signers,
            signing_certificate_history,
        })
    }

    /// Build the platform handle described by this profile
    pub fn into_handle(self) -> Result<ProfileHandle> {
        if self.package.package_name.is_empty() {
            anyhow::bail!("Device profile has no package name");
        }

        let signing = StaticSigning::new().with_package(&self.package.package_name, self.signing_info()?);
        let era = PlatformEra::from_api_level(self.signing.api_level);
        debug!("Signature source for API {}: {:?}", self.signing.api_level, era);

        Ok(ProfileHandle {
            package: self.package,
            display: self.display,
            signatures: source_for_era(era, signing),
            device_id: self.device_id,
            debugger_connected: self.debugger_connected,
        })
    }
}

/// Platform handle backed by a device profile
pub struct ProfileHandle {
    package: PackageInfo,
    display: StaticDisplay,
    signatures: Box<dyn SignatureSource>,
    device_id: Option<String>,
    debugger_connected: bool,
}

impl PackageMetadataSource for ProfileHandle {
    fn package_info(&self, package_name: &str) -> std::result::Result<PackageInfo, PlatformError> {
        if package_name == self.package.package_name {
            Ok(self.package.clone())
        } else {
            Err(PlatformError::PackageNotFound(package_name.to_string()))
        }
    }
}

impl DeviceIdSource for ProfileHandle {
    fn read_device_id(&self) -> Option<String> {
        self.device_id.clone()
    }
}

impl AppHandle for ProfileHandle {
    fn package_name(&self) -> &str {
        &self.package.package_name
    }

    fn packages(&self) -> &dyn PackageMetadataSource {
        self
    }

    fn display(&self) -> &dyn DisplayMetricsSource {
        &self.display
    }

    fn signatures(&self) -> &dyn SignatureSource {
        self.signatures.as_ref()
    }

    fn device_ids(&self) -> &dyn DeviceIdSource {
        self
    }

    fn is_debugger_connected(&self) -> bool {
        self.debugger_connected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROFILE: &str = r#"
device_id = "9774d56d682e549c"

[package]
package_name = "ua.at.tsvetkov.demo"
version_name = "1.2"
version_code = 12
label = "Demo"
debuggable = true

[display]
width_px = 1600.0
height_px = 2560.0
xdpi = 320.0
ydpi = 320.0
telephony = false

[signing]
api_level = 27
certificates = ["616263"]
"#;

    #[test]
    fn test_parse_profile() {
        let profile = DeviceProfile::from_toml_str(PROFILE).unwrap();
        assert_eq!(profile.package.version_code, 12);
        assert_eq!(profile.display.width_px, 1600.0);
        assert_eq!(profile.display.density_dpi, 420.0);
        assert_eq!(profile.signing.api_level, 27);
        assert!(!profile.debugger_connected);
    }

    #[test]
    fn test_handle_answers_platform_queries() {
        let handle = DeviceProfile::from_toml_str(PROFILE).unwrap().into_handle().unwrap();

        assert_eq!(handle.package_name(), "ua.at.tsvetkov.demo");
        assert!(handle.packages().package_info("other.pkg").is_err());
        assert_eq!(handle.device_ids().read_device_id().as_deref(), Some("9774d56d682e549c"));

        let certificates = handle.signatures().signatures("ua.at.tsvetkov.demo").unwrap();
        assert_eq!(certificates, vec![Certificate::new(b"abc".to_vec())]);
    }

    #[test]
    fn test_rejects_bad_certificate() {
        let text = PROFILE.replace("616263", "zz");
        let profile = DeviceProfile::from_toml_str(&text).unwrap();
        assert!(profile.into_handle().is_err());
    }

    #[test]
    fn test_rejects_missing_package_name() {
        assert!(DeviceProfile::default().into_handle().is_err());
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("device.toml");
        std::fs::write(&path, PROFILE).unwrap();

        let profile = DeviceProfile::load(&path).await.unwrap();
        assert_eq!(profile.package.label, "Demo");
        assert!(DeviceProfile::load(&dir.path().join("missing.toml")).await.is_err());
    }
}
