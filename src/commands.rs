//! CLI commands for TAO
//!
//! Each command is a plain options struct with an `execute` method, so the
//! binary and scripts drive the same code.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use tracing::info;

use tao_app_config::{report, AppConfig, AppConfigBuilder, AppHandle};
use tao_core::TaoConfig;
use tao_display::converter::convert;
use tao_display::Unit;
use tao_signing::{DigestAlgorithm, SignatureInspector};

use crate::profile::DeviceProfile;

async fn init_from_profile(config: &TaoConfig, profile: &Path) -> Result<AppConfig> {
    let handle = DeviceProfile::load(profile).await?.into_handle()?;
    let builder = AppConfigBuilder::from_config(config)
        .context("Cannot set up the preference store")?
        .with_print_info_on_init(false);
    Ok(builder.init(&handle))
}

/// Initialize against a device profile and print the report
pub struct InspectCommand {
    pub profile: PathBuf,
    pub json: bool,
}

impl InspectCommand {
    /// Returns the printed text
    pub async fn execute(&self, config: &TaoConfig) -> Result<String> {
        let app = init_from_profile(config, &self.profile).await?;

        let output = if self.json {
            serde_json::to_string_pretty(app.snapshot())?
        } else {
            report::render(app.snapshot(), &app.all_entries())
        };

        println!("{}", output);
        Ok(output)
    }
}

/// Wipe the preferences of the profile's package
pub struct ClearCommand {
    pub profile: PathBuf,
}

impl ClearCommand {
    pub async fn execute(&self, config: &TaoConfig) -> Result<()> {
        let app = init_from_profile(config, &self.profile).await?;
        app.clear()
            .with_context(|| format!("Cannot clear preferences of {}", app.package_name()))?;

        info!("Preferences of {} cleared", app.package_name());
        println!("Cleared preferences of {}", app.package_name());
        Ok(())
    }
}

/// Physical unit conversion
pub struct ConvertCommand {
    pub value: f32,
    pub from: String,
    pub to: String,
}

impl ConvertCommand {
    pub fn execute(&self) -> Result<f32> {
        let from = parse_unit(&self.from)?;
        let to = parse_unit(&self.to)?;
        let result = convert(self.value, from, to);

        println!("{} {} = {} {}", self.value, from.as_str(), result, to.as_str());
        Ok(result)
    }
}

fn parse_unit(name: &str) -> Result<Unit> {
    Unit::from_name(name).ok_or_else(|| anyhow!("Unknown unit '{}' (inch, mm, cm, twip, pt)", name))
}

/// File digest as uppercase hex
pub struct HashCommand {
    pub file: PathBuf,
    pub algorithm: String,
}

impl HashCommand {
    pub fn execute(&self) -> Result<String> {
        let algorithm: DigestAlgorithm = self.algorithm.parse()?;
        let hash = algorithm
            .hash_file_string(&self.file)
            .with_context(|| format!("Cannot hash {}", self.file.display()))?;

        println!("{}  {}", hash, self.file.display());
        Ok(hash)
    }
}

/// Signing certificate fingerprint of the profile's package
pub struct FingerprintCommand {
    pub profile: PathBuf,
    pub separator: char,
    pub algorithm: String,
}

impl FingerprintCommand {
    pub async fn execute(&self) -> Result<String> {
        let handle = DeviceProfile::load(&self.profile).await?.into_handle()?;
        let algorithm: DigestAlgorithm = self.algorithm.parse()?;

        let inspector = SignatureInspector::new(handle.signatures());
        let package = handle.package_name();
        let fingerprint = inspector.fingerprint_with(package, self.separator, algorithm);
        if fingerprint.is_empty() {
            return Err(anyhow!("No signing certificate for {}", package));
        }

        println!("{}", fingerprint);
        Ok(fingerprint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tao_core::StoreBackend;

    const PROFILE: &str = r#"
[package]
package_name = "ua.at.tsvetkov.demo"
version_name = "2.0"
version_code = 20
label = "Demo"
debuggable = true

[signing]
certificates = ["616263"]
"#;

    fn write_profile(dir: &tempfile::TempDir) -> PathBuf {
        let path = dir.path().join("device.toml");
        std::fs::write(&path, PROFILE).unwrap();
        path
    }

    fn file_config(dir: &tempfile::TempDir) -> TaoConfig {
        let mut config = TaoConfig::default();
        config.store.backend = StoreBackend::File;
        config.store.dir = Some(dir.path().join("prefs"));
        config
    }

    #[test]
    fn test_convert() {
        let command = ConvertCommand {
            value: 1.0,
            from: "inch".to_string(),
            to: "mm".to_string(),
        };
        assert!((command.execute().unwrap() - 25.4).abs() < 1e-4);

        let bad = ConvertCommand {
            value: 1.0,
            from: "furlong".to_string(),
            to: "mm".to_string(),
        };
        assert!(bad.execute().is_err());
    }

    #[test]
    fn test_hash() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"abc").unwrap();
        file.flush().unwrap();

        let command = HashCommand {
            file: file.path().to_path_buf(),
            algorithm: "SHA-1".to_string(),
        };
        assert_eq!(command.execute().unwrap(), "A9993E364706816ABA3E25717850C26C9CD0D89D");

        let unsupported = HashCommand {
            file: file.path().to_path_buf(),
            algorithm: "CRC32".to_string(),
        };
        assert!(unsupported.execute().is_err());
    }

    #[tokio::test]
    async fn test_inspect_persists_between_runs() {
        let dir = tempfile::tempdir().unwrap();
        let config = file_config(&dir);
        let command = InspectCommand {
            profile: write_profile(&dir),
            json: true,
        };

        let first = command.execute(&config).await.unwrap();
        assert!(first.contains("\"is_fresh_installation\": true"));

        let second = command.execute(&config).await.unwrap();
        assert!(second.contains("\"is_fresh_installation\": false"));
        assert!(dir.path().join("prefs").join("ua.at.tsvetkov.demo.json").exists());
    }

    #[tokio::test]
    async fn test_clear_resets_fresh_installation() {
        let dir = tempfile::tempdir().unwrap();
        let config = file_config(&dir);
        let profile = write_profile(&dir);

        ClearCommand { profile: profile.clone() }.execute(&config).await.unwrap();

        let report = InspectCommand { profile, json: false }.execute(&config).await.unwrap();
        assert!(report.contains("| Fresh installation             true"));
    }

    #[tokio::test]
    async fn test_fingerprint() {
        let dir = tempfile::tempdir().unwrap();
        let command = FingerprintCommand {
            profile: write_profile(&dir),
            separator: ':',
            algorithm: "MD5".to_string(),
        };
        assert_eq!(
            command.execute().await.unwrap(),
            "90:01:50:98:3C:D2:4F:B0:D6:96:3F:7D:28:E1:7F:72"
        );
    }
}
