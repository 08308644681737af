//! Message Digests
//!
//! Hashing of byte slices, streams and files with the algorithms the Android
//! `MessageDigest` names cover, and hex rendering of the results.

use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha2::Digest;

use crate::SignatureError;

const BUFFER_SIZE: usize = 8192;

/// Supported digest algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DigestAlgorithm {
    #[serde(rename = "MD5")]
    Md5,
    #[default]
    #[serde(rename = "SHA-1")]
    Sha1,
    #[serde(rename = "SHA-256")]
    Sha256,
    #[serde(rename = "SHA-384")]
    Sha384,
    #[serde(rename = "SHA-512")]
    Sha512,
}

impl DigestAlgorithm {
    /// Canonical algorithm name
    pub fn name(&self) -> &'static str {
        match self {
            DigestAlgorithm::Md5 => "MD5",
            DigestAlgorithm::Sha1 => "SHA-1",
            DigestAlgorithm::Sha256 => "SHA-256",
            DigestAlgorithm::Sha384 => "SHA-384",
            DigestAlgorithm::Sha512 => "SHA-512",
        }
    }

    /// Digest length in bytes
    pub fn output_len(&self) -> usize {
        match self {
            DigestAlgorithm::Md5 => 16,
            DigestAlgorithm::Sha1 => 20,
            DigestAlgorithm::Sha256 => 32,
            DigestAlgorithm::Sha384 => 48,
            DigestAlgorithm::Sha512 => 64,
        }
    }

    /// Digest of an in-memory buffer
    pub fn digest(&self, data: &[u8]) -> Vec<u8> {
        match self {
            DigestAlgorithm::Md5 => md5::Md5::digest(data).to_vec(),
            DigestAlgorithm::Sha1 => sha1::Sha1::digest(data).to_vec(),
            DigestAlgorithm::Sha256 => sha2::Sha256::digest(data).to_vec(),
            DigestAlgorithm::Sha384 => sha2::Sha384::digest(data).to_vec(),
            DigestAlgorithm::Sha512 => sha2::Sha512::digest(data).to_vec(),
        }
    }

    /// Digest of everything a reader yields
    pub fn digest_reader<R: Read>(&self, reader: R) -> io::Result<Vec<u8>> {
        match self {
            DigestAlgorithm::Md5 => stream::<md5::Md5, R>(reader),
            DigestAlgorithm::Sha1 => stream::<sha1::Sha1, R>(reader),
            DigestAlgorithm::Sha256 => stream::<sha2::Sha256, R>(reader),
            DigestAlgorithm::Sha384 => stream::<sha2::Sha384, R>(reader),
            DigestAlgorithm::Sha512 => stream::<sha2::Sha512, R>(reader),
        }
    }

    /// Digest of a file's contents
    pub fn digest_file(&self, path: &Path) -> io::Result<Vec<u8>> {
        let file = File::open(path)?;
        self.digest_reader(BufReader::new(file))
    }

    /// Uppercase hex digest of a buffer
    pub fn hash_string(&self, data: &[u8]) -> String {
        hex::encode_upper(self.digest(data))
    }

    /// Uppercase hex digest of a file
    pub fn hash_file_string(&self, path: &Path) -> io::Result<String> {
        Ok(hex::encode_upper(self.digest_file(path)?))
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DigestAlgorithm {
    type Err = SignatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_uppercase();

        match normalized.as_str() {
            "MD5" => Ok(DigestAlgorithm::Md5),
            "SHA" | "SHA1" => Ok(DigestAlgorithm::Sha1),
            "SHA256" => Ok(DigestAlgorithm::Sha256),
            "SHA384" => Ok(DigestAlgorithm::Sha384),
            "SHA512" => Ok(DigestAlgorithm::Sha512),
            _ => Err(SignatureError::UnsupportedAlgorithm(s.to_string())),
        }
    }
}

fn stream<D: Digest, R: Read>(mut reader: R) -> io::Result<Vec<u8>> {
    let mut hasher = D::new();
    let mut buffer = [0u8; BUFFER_SIZE];

    loop {
        match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => hasher.update(&buffer[..n]),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }

    Ok(hasher.finalize().to_vec())
}

/// Uppercase hex byte pairs joined by `separator`, without a trailing one
pub fn format_fingerprint(digest: &[u8], separator: char) -> String {
    let mut out = String::with_capacity(digest.len() * 3);
    for (i, byte) in digest.iter().enumerate() {
        if i > 0 {
            out.push(separator);
        }
        out.push_str(&format!("{:02X}", byte));
    }
    out
}
