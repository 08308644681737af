//! Signature Sources
//!
//! Package managers expose signing certificates in two shapes depending on
//! the platform release: a `SigningInfo` record (API 28 and later) or a flat
//! legacy signature list. Each shape gets its own [`SignatureSource`], and the
//! era is chosen once when the platform handle is built.

use std::collections::HashMap;
use serde::{Deserialize, Serialize};

use crate::SignatureError;

/// First API level exposing signing certificate records
pub const SIGNING_CERTIFICATES_API_LEVEL: u32 = 28;

/// Raw bytes of an encoded signing certificate
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Certificate(Vec<u8>);

impl Certificate {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Parse a hex encoded certificate
    pub fn from_hex(encoded: &str) -> Result<Self, SignatureError> {
        let compact: String = encoded
            .chars()
            .filter(|c| !c.is_whitespace() && *c != ':')
            .collect();
        hex::decode(&compact)
            .map(Self)
            .map_err(|e| SignatureError::InvalidCertificate(e.to_string()))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Modern signing record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SigningInfo {
    /// Package is signed by more than one signer
    pub has_multiple_signers: bool,
    /// Signers of the package contents
    pub apk_content_signers: Vec<Certificate>,
    /// Current certificate and its rotation lineage
    pub signing_certificate_history: Vec<Certificate>,
}

impl SigningInfo {
    /// Certificates that identify the package
    pub fn certificates(&self) -> &[Certificate] {
        if self.has_multiple_signers {
            &self.apk_content_signers
        } else {
            &self.signing_certificate_history
        }
    }
}

/// Platform query for modern signing records
pub trait SigningCertificateQuery: Send + Sync {
    /// `Ok(None)` when the package exists but carries no signing record
    fn signing_info(&self, package_name: &str) -> Result<Option<SigningInfo>, SignatureError>;
}

/// Platform query for the legacy signature list
pub trait LegacySignatureQuery: Send + Sync {
    fn legacy_signatures(&self, package_name: &str) -> Result<Vec<Certificate>, SignatureError>;
}

/// Ordered signing certificates of a package, whatever the platform era
pub trait SignatureSource: Send + Sync {
    fn signatures(&self, package_name: &str) -> Result<Vec<Certificate>, SignatureError>;
}

/// Platform release family, as far as signatures are concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlatformEra {
    Legacy,
    SigningCertificates,
}

impl PlatformEra {
    pub fn from_api_level(api_level: u32) -> Self {
        if api_level >= SIGNING_CERTIFICATES_API_LEVEL {
            PlatformEra::SigningCertificates
        } else {
            PlatformEra::Legacy
        }
    }
}

/// Source backed by `SigningInfo`
#[derive(Debug, Clone)]
pub struct ModernSignatureSource<Q> {
    query: Q,
}

impl<Q: SigningCertificateQuery> ModernSignatureSource<Q> {
    pub fn new(query: Q) -> Self {
        Self { query }
    }
}

impl<Q: SigningCertificateQuery> SignatureSource for ModernSignatureSource<Q> {
    fn signatures(&self, package_name: &str) -> Result<Vec<Certificate>, SignatureError> {
        Ok(self
            .query
            .signing_info(package_name)?
            .map(|info| info.certificates().to_vec())
            .unwrap_or_default())
    }
}

/// Source backed by the legacy signature list
#[derive(Debug, Clone)]
pub struct LegacySignatureSource<Q> {
    query: Q,
}

impl<Q: LegacySignatureQuery> LegacySignatureSource<Q> {
    pub fn new(query: Q) -> Self {
        Self { query }
    }
}

impl<Q: LegacySignatureQuery> SignatureSource for LegacySignatureSource<Q> {
    fn signatures(&self, package_name: &str) -> Result<Vec<Certificate>, SignatureError> {
        self.query.legacy_signatures(package_name)
    }
}

/// Pick the source matching the platform era
pub fn source_for_era<Q>(era: PlatformEra, query: Q) -> Box<dyn SignatureSource>
where
    Q: SigningCertificateQuery + LegacySignatureQuery + 'static,
{
    match era {
        PlatformEra::SigningCertificates => Box::new(ModernSignatureSource::new(query)),
        PlatformEra::Legacy => Box::new(LegacySignatureSource::new(query)),
    }
}

/// Fixed signing data per package
#[derive(Debug, Clone, Default)]
pub struct StaticSigning {
    packages: HashMap<String, SigningInfo>,
}

impl StaticSigning {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_package(mut self, package_name: &str, info: SigningInfo) -> Self {
        self.packages.insert(package_name.to_string(), info);
        self
    }

    /// Package signed by a single certificate
    pub fn with_certificate(self, package_name: &str, certificate: Certificate) -> Self {
        self.with_package(
            package_name,
            SigningInfo {
                has_multiple_signers: false,
                apk_content_signers: vec![certificate.clone()],
                signing_certificate_history: vec![certificate],
            },
        )
    }

    fn lookup(&self, package_name: &str) -> Result<&SigningInfo, SignatureError> {
        self.packages
            .get(package_name)
            .ok_or_else(|| SignatureError::PackageNotFound(package_name.to_string()))
    }
}

impl SigningCertificateQuery for StaticSigning {
    fn signing_info(&self, package_name: &str) -> Result<Option<SigningInfo>, SignatureError> {
        self.lookup(package_name).map(|info| Some(info.clone()))
    }
}

impl LegacySignatureQuery for StaticSigning {
    fn legacy_signatures(&self, package_name: &str) -> Result<Vec<Certificate>, SignatureError> {
        self.lookup(package_name).map(|info| info.certificates().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cert(byte: u8) -> Certificate {
        Certificate::new(vec![byte; 4])
    }

    #[test]
    fn test_era_from_api_level() {
        assert_eq!(PlatformEra::from_api_level(27), PlatformEra::Legacy);
        assert_eq!(PlatformEra::from_api_level(28), PlatformEra::SigningCertificates);
        assert_eq!(PlatformEra::from_api_level(34), PlatformEra::SigningCertificates);
    }

    #[test]
    fn test_modern_prefers_content_signers_when_multiple() {
        let info = SigningInfo {
            has_multiple_signers: true,
            apk_content_signers: vec![cert(1), cert(2)],
            signing_certificate_history: vec![cert(9)],
        };
        let source = ModernSignatureSource::new(StaticSigning::new().with_package("a.b", info));
        assert_eq!(source.signatures("a.b").unwrap(), vec![cert(1), cert(2)]);
    }

    #[test]
    fn test_modern_uses_history_for_single_signer() {
        let info = SigningInfo {
            has_multiple_signers: false,
            apk_content_signers: vec![cert(1)],
            signing_certificate_history: vec![cert(3), cert(4)],
        };
        let source = ModernSignatureSource::new(StaticSigning::new().with_package("a.b", info));
        assert_eq!(source.signatures("a.b").unwrap(), vec![cert(3), cert(4)]);
    }

    #[test]
    fn test_both_eras_normalize_to_same_shape() {
        let signing = StaticSigning::new().with_certificate("a.b", cert(7));
        let modern = source_for_era(PlatformEra::SigningCertificates, signing.clone());
        let legacy = source_for_era(PlatformEra::Legacy, signing);

        assert_eq!(modern.signatures("a.b").unwrap(), legacy.signatures("a.b").unwrap());
    }

    #[test]
    fn test_unknown_package() {
        let source = LegacySignatureSource::new(StaticSigning::new());
        assert!(matches!(
            source.signatures("missing"),
            Err(SignatureError::PackageNotFound(_))
        ));
    }

    #[test]
    fn test_certificate_from_hex() {
        let certificate = Certificate::from_hex("30:82 01 0a").unwrap();
        assert_eq!(certificate.as_bytes(), &[0x30, 0x82, 0x01, 0x0a]);
        assert!(Certificate::from_hex("zz").is_err());
    }
}
