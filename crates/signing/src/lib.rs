//! TAO Signing
//!
//! Signing certificate lookup across platform releases, key hashes,
//! fingerprints and general purpose message digests.

pub mod digest;
pub mod inspector;
pub mod source;

pub use digest::{format_fingerprint, DigestAlgorithm};
pub use inspector::SignatureInspector;
pub use source::{
    source_for_era, Certificate, LegacySignatureQuery, LegacySignatureSource,
    ModernSignatureSource, PlatformEra, SignatureSource, SigningCertificateQuery, SigningInfo,
    StaticSigning,
};

/// Signature errors
#[derive(Debug, thiserror::Error)]
pub enum SignatureError {
    #[error("Package not found: {0}")]
    PackageNotFound(String),
    #[error("Unsupported digest algorithm: {0}")]
    UnsupportedAlgorithm(String),
    #[error("No signature for package: {0}")]
    NoSignature(String),
    #[error("Invalid certificate: {0}")]
    InvalidCertificate(String),
}
