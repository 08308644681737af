//! Signature Inspector
//!
//! Key hash and fingerprint of a package's first signing certificate. Nothing
//! is cached: every call queries the source and hashes again. Failures are
//! logged and reported as an empty string.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::{debug, warn};

use crate::digest::{format_fingerprint, DigestAlgorithm};
use crate::source::{Certificate, SignatureSource};
use crate::SignatureError;

/// Reads signing certificates through a [`SignatureSource`]
pub struct SignatureInspector<'a> {
    source: &'a dyn SignatureSource,
}

impl<'a> SignatureInspector<'a> {
    pub fn new(source: &'a dyn SignatureSource) -> Self {
        Self { source }
    }

    /// Signing certificates of a package, empty when the lookup fails
    pub fn signatures(&self, package_name: &str) -> Vec<Certificate> {
        match self.source.signatures(package_name) {
            Ok(certificates) => certificates,
            Err(e) => {
                warn!("Cannot read signatures of {}: {}", package_name, e);
                Vec::new()
            }
        }
    }

    fn first_certificate_digest(
        &self,
        package_name: &str,
        algorithm: DigestAlgorithm,
    ) -> Result<Vec<u8>, SignatureError> {
        let certificates = self.source.signatures(package_name)?;
        let first = certificates
            .first()
            .ok_or_else(|| SignatureError::NoSignature(package_name.to_string()))?;
        debug!(
            "Hashing {} byte certificate of {} with {}",
            first.len(),
            package_name,
            algorithm
        );
        Ok(algorithm.digest(first.as_bytes()))
    }

    /// SHA-1 key hash, base64 encoded
    pub fn key_hash(&self, package_name: &str) -> String {
        self.key_hash_with(package_name, DigestAlgorithm::Sha1)
    }

    /// Key hash with an explicit digest, base64 encoded
    pub fn key_hash_with(&self, package_name: &str, algorithm: DigestAlgorithm) -> String {
        match self.first_certificate_digest(package_name, algorithm) {
            Ok(digest) => STANDARD.encode(digest),
            Err(e) => {
                warn!("Cannot compute key hash of {}: {}", package_name, e);
                String::new()
            }
        }
    }

    /// Key hash for an algorithm given by name
    pub fn key_hash_named(&self, package_name: &str, algorithm: &str) -> String {
        match algorithm.parse::<DigestAlgorithm>() {
            Ok(algorithm) => self.key_hash_with(package_name, algorithm),
            Err(e) => {
                warn!("Cannot compute key hash of {}: {}", package_name, e);
                String::new()
            }
        }
    }

    /// SHA-1 fingerprint as uppercase hex pairs joined by `separator`
    pub fn fingerprint(&self, package_name: &str, separator: char) -> String {
        self.fingerprint_with(package_name, separator, DigestAlgorithm::Sha1)
    }

    pub fn fingerprint_with(
        &self,
        package_name: &str,
        separator: char,
        algorithm: DigestAlgorithm,
    ) -> String {
        match self.first_certificate_digest(package_name, algorithm) {
            Ok(digest) => format_fingerprint(&digest, separator),
            Err(e) => {
                warn!("Cannot compute fingerprint of {}: {}", package_name, e);
                String::new()
            }
        }
    }

    /// Fingerprint for an algorithm given by name
    pub fn fingerprint_named(&self, package_name: &str, separator: char, algorithm: &str) -> String {
        match algorithm.parse::<DigestAlgorithm>() {
            Ok(algorithm) => self.fingerprint_with(package_name, separator, algorithm),
            Err(e) => {
                warn!("Cannot compute fingerprint of {}: {}", package_name, e);
                String::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{source_for_era, PlatformEra, SigningInfo, StaticSigning};

    const PACKAGE: &str = "ua.at.tsvetkov.demo";

    fn signing() -> StaticSigning {
        StaticSigning::new()
            .with_certificate(PACKAGE, Certificate::new(b"abc".to_vec()))
            .with_package("empty.pkg", SigningInfo::default())
    }

    #[test]
    fn test_key_hash() {
        let source = source_for_era(PlatformEra::SigningCertificates, signing());
        let inspector = SignatureInspector::new(source.as_ref());

        assert_eq!(inspector.key_hash(PACKAGE), "qZk+NkcGgWq6PiVxeFDCbJzQ2J0=");
        assert_eq!(
            inspector.key_hash_with(PACKAGE, DigestAlgorithm::Sha256),
            "ungWv48Bz+pBQUDeXa4iI7ADYaOWF3qctBD/YfIAFa0="
        );
    }

    #[test]
    fn test_fingerprints() {
        let source = source_for_era(PlatformEra::Legacy, signing());
        let inspector = SignatureInspector::new(source.as_ref());

        assert_eq!(
            inspector.fingerprint(PACKAGE, ':'),
            "A9:99:3E:36:47:06:81:6A:BA:3E:25:71:78:50:C2:6C:9C:D0:D8:9D"
        );
        assert_eq!(
            inspector.fingerprint(PACKAGE, ' '),
            "A9 99 3E 36 47 06 81 6A BA 3E 25 71 78 50 C2 6C 9C D0 D8 9D"
        );
        assert_eq!(
            inspector.fingerprint_named(PACKAGE, ':', "MD5"),
            "90:01:50:98:3C:D2:4F:B0:D6:96:3F:7D:28:E1:7F:72"
        );
    }

    #[test]
    fn test_failures_yield_empty_strings() {
        let source = source_for_era(PlatformEra::SigningCertificates, signing());
        let inspector = SignatureInspector::new(source.as_ref());

        assert_eq!(inspector.key_hash("missing.pkg"), "");
        assert_eq!(inspector.fingerprint("missing.pkg", ':'), "");
        assert_eq!(inspector.key_hash("empty.pkg"), "");
        assert_eq!(inspector.key_hash_named(PACKAGE, "CRC32"), "");
        assert!(inspector.signatures("missing.pkg").is_empty());
    }

    #[test]
    fn test_repeated_calls_are_stable() {
        let source = source_for_era(PlatformEra::SigningCertificates, signing());
        let inspector = SignatureInspector::new(source.as_ref());
        assert_eq!(inspector.key_hash(PACKAGE), inspector.key_hash(PACKAGE));
    }
}
