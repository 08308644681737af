//! Diagnostic Report
//!
//! Fixed-width box with the application identity followed by every stored
//! preference, sorted by key.

use std::collections::BTreeMap;

use tao_core::PrefValue;

use crate::snapshot::ApplicationSnapshot;

/// Width every boxed line is padded to, before the closing bar
pub const MAX_LENGTH: usize = 93;

/// Narrowest key column of the preference table
pub const MIN_KEY_WIDTH: usize = 31;

const PREFERENCES_HEADER: &str = "|                             Default Shared Preferences Data";

fn line_double() -> String {
    "=".repeat(MAX_LENGTH + 1)
}

fn boxed(line: &str) -> String {
    format!("{:<width$}|\n", line, width = MAX_LENGTH)
}

fn row(label: &str, value: impl std::fmt::Display) -> String {
    boxed(&format!("| {:<31}{}", label, value))
}

/// Truncate towards zero, keeping at most two decimals
pub fn format_diagonal(inches: f64) -> String {
    let truncated = (inches * 100.0).trunc() / 100.0;
    format!("{}", truncated)
}

/// Render the report for a snapshot and the committed preferences
pub fn render(snapshot: &ApplicationSnapshot, preferences: &BTreeMap<String, PrefValue>) -> String {
    let separator = line_double();
    let bucket = snapshot
        .diagonal
        .map(|d| d.as_str())
        .unwrap_or("UNKNOWN");

    let mut out = String::from(" \n");
    out.push_str(&separator);
    out.push('\n');
    out.push_str(&row("Application name", &snapshot.app_name));
    out.push_str(&row("Android  device ID", &snapshot.android_id));
    out.push_str(&row("Application package", &snapshot.package_name));
    let fingerprint_label = format!(
        "Signature Fingerprint {}",
        snapshot.signature_fingerprint_algorithm
    );
    out.push_str(&row(&fingerprint_label, &snapshot.signature_fingerprint));
    out.push_str(&row(&fingerprint_label, &snapshot.signature_fingerprint_colon));
    out.push_str(&row("Signature Key Hash", &snapshot.signature_key_hash));
    out.push_str(&row(
        "Diagonal",
        format!("{} - {}\"", bucket, format_diagonal(snapshot.diagonal_in_inches)),
    ));
    out.push_str(&row("New app version", snapshot.is_new_version));
    out.push_str(&row("Fresh installation", snapshot.is_fresh_installation));
    out.push_str(&separator);
    out.push('\n');
    out.push_str(&boxed(PREFERENCES_HEADER));
    out.push_str(&separator);
    out.push('\n');

    let key_width = preferences
        .keys()
        .map(|k| k.chars().count())
        .max()
        .unwrap_or(0)
        .max(MIN_KEY_WIDTH);

    for (key, value) in preferences {
        out.push_str(&boxed(&format!("| {:<width$}{}", key, value, width = key_width)));
    }

    out.push_str(&separator);
    out.push_str("\n ");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tao_display::{DeviceType, Diagonal};
    use tao_signing::DigestAlgorithm;

    fn snapshot() -> ApplicationSnapshot {
        ApplicationSnapshot {
            package_name: "ua.at.tsvetkov.demo".to_string(),
            app_name: "Demo".to_string(),
            app_version_name: "1.0".to_string(),
            app_version_code: 5,
            android_id: "abc123".to_string(),
            is_fresh_installation: true,
            is_new_version: true,
            device_type: DeviceType::Phone,
            diagonal_in_inches: 6.4789,
            diagonal: Some(Diagonal::Phone6),
            is_phone: true,
            is_tablet: false,
            signature_key_hash: "qZk+NkcGgWq6PiVxeFDCbJzQ2J0=".to_string(),
            signature_fingerprint_algorithm: DigestAlgorithm::Sha1,
            signature_fingerprint: "A9 99".to_string(),
            signature_fingerprint_colon: "A9:99".to_string(),
            is_debuggable: true,
            is_being_debugged: false,
            version_markers_persisted: true,
        }
    }

    #[test]
    fn test_format_diagonal_truncates() {
        assert_eq!(format_diagonal(6.4789), "6.47");
        assert_eq!(format_diagonal(6.4), "6.4");
        assert_eq!(format_diagonal(7.0), "7");
        assert_eq!(format_diagonal(0.0), "0");
    }

    #[test]
    fn test_rows_are_padded_and_closed() {
        let mut prefs = BTreeMap::new();
        prefs.insert("b_key".to_string(), PrefValue::Int(2));
        prefs.insert("a_key".to_string(), PrefValue::Bool(true));

        let report = render(&snapshot(), &prefs);
        for line in report.lines().filter(|l| l.starts_with('|')) {
            assert_eq!(line.chars().count(), MAX_LENGTH + 1);
            assert!(line.ends_with('|'));
        }
        assert!(report.contains("| Diagonal                       PHONE_6 - 6.47\""));
        assert!(report.contains("| Fresh installation             true"));
        assert!(report.contains("Default Shared Preferences Data"));

        let a = report.find("a_key").unwrap();
        let b = report.find("b_key").unwrap();
        assert!(a < b);
    }

    #[test]
    fn test_fingerprint_rows_name_the_algorithm() {
        let report = render(&snapshot(), &BTreeMap::new());
        assert!(report.contains("| Signature Fingerprint SHA-1    A9 99"));
        assert!(report.contains("| Signature Fingerprint SHA-1    A9:99"));

        let mut sha256 = snapshot();
        sha256.signature_fingerprint_algorithm = DigestAlgorithm::Sha256;
        let report = render(&sha256, &BTreeMap::new());
        assert!(report.contains("| Signature Fingerprint SHA-256  A9 99"));
        assert!(!report.contains("SHA-1"));
    }

    #[test]
    fn test_long_keys_widen_column() {
        let key = "k".repeat(40);
        let mut prefs = BTreeMap::new();
        prefs.insert(key.clone(), PrefValue::Long(9));

        let report = render(&snapshot(), &prefs);
        assert!(report.contains(&format!("| {}9", key)));
    }
}
