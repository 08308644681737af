//! Application Snapshot
//!
//! Immutable record of everything computed during init.

use serde::Serialize;
use tao_display::{DeviceType, Diagonal};
use tao_signing::DigestAlgorithm;

/// Fresh-install and upgrade flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VersionCheck {
    pub is_fresh_installation: bool,
    pub is_new_version: bool,
}

impl VersionCheck {
    /// Compare the stored version code, if any, with the running one.
    ///
    /// A missing or negative stored code means the app never ran before.
    /// The upgrade test compares against the stored code, or 0 when absent.
    pub fn evaluate(stored: Option<i64>, current: i64) -> Self {
        Self {
            is_fresh_installation: stored.map_or(true, |code| code < 0),
            is_new_version: current > stored.unwrap_or(0),
        }
    }
}

/// Application facts gathered once at init
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplicationSnapshot {
    pub package_name: String,
    pub app_name: String,
    pub app_version_name: String,
    pub app_version_code: i64,
    pub android_id: String,
    pub is_fresh_installation: bool,
    pub is_new_version: bool,
    pub device_type: DeviceType,
    pub diagonal_in_inches: f64,
    pub diagonal: Option<Diagonal>,
    pub is_phone: bool,
    pub is_tablet: bool,
    pub signature_key_hash: String,
    /// Digest behind both fingerprint renderings
    pub signature_fingerprint_algorithm: DigestAlgorithm,
    /// Fingerprint with space separated byte pairs
    pub signature_fingerprint: String,
    /// Fingerprint with colon separated byte pairs
    pub signature_fingerprint_colon: String,
    pub is_debuggable: bool,
    pub is_being_debugged: bool,
    /// Version markers reached durable storage during init
    pub version_markers_persisted: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_launch() {
        let check = VersionCheck::evaluate(None, 5);
        assert!(check.is_fresh_installation);
        assert!(check.is_new_version);
    }

    #[test]
    fn test_first_launch_with_version_zero() {
        let check = VersionCheck::evaluate(None, 0);
        assert!(check.is_fresh_installation);
        assert!(!check.is_new_version);
    }

    #[test]
    fn test_upgrade_same_and_downgrade() {
        assert_eq!(
            VersionCheck::evaluate(Some(3), 5),
            VersionCheck { is_fresh_installation: false, is_new_version: true }
        );
        assert_eq!(
            VersionCheck::evaluate(Some(5), 5),
            VersionCheck { is_fresh_installation: false, is_new_version: false }
        );
        assert_eq!(
            VersionCheck::evaluate(Some(7), 5),
            VersionCheck { is_fresh_installation: false, is_new_version: false }
        );
    }

    #[test]
    fn test_negative_marker_counts_as_fresh() {
        let check = VersionCheck::evaluate(Some(-1), 2);
        assert!(check.is_fresh_installation);
        assert!(check.is_new_version);
    }
}
