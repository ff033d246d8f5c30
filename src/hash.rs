//! Fingerprint: SHA-256 of a song file's content, truncated to 16 hex chars.
//!
//! The fingerprint is the cache-validity key: a cached parse is reused only while the
//! file still hashes to the stored value. Modification times are never consulted.
//! The 64-bit truncation keeps the catalog column readable and matches catalogs
//! written by earlier versions; collisions are not a concern at library scale.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Length of a fingerprint in hex characters.
pub const FINGERPRINT_LEN: usize = 16;

/// Content fingerprint of a song file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

#[derive(Debug, Error, PartialEq)]
pub enum FingerprintError {
    #[error("invalid fingerprint length: expected 16 hex chars, got {0}")]
    InvalidLength(usize),

    #[error("invalid hex character in fingerprint")]
    InvalidHex,
}

/// Lowercase hex SHA-256 of `data`, cut to [`FINGERPRINT_LEN`] characters.
pub(crate) fn short_sha256(data: &[u8]) -> String {
    let digest = Sha256::digest(data);
    hex::encode(&digest[..FINGERPRINT_LEN / 2])
}

impl Fingerprint {
    /// Fingerprint of text content (hashed as UTF-8).
    pub fn of(content: &str) -> Self {
        Self(short_sha256(content.as_bytes()))
    }

    /// Wrap a stored value after checking its format.
    pub fn from_str_checked(s: &str) -> Result<Self, FingerprintError> {
        if s.len() != FINGERPRINT_LEN {
            return Err(FingerprintError::InvalidLength(s.len()));
        }
        if !s.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(FingerprintError::InvalidHex);
        }
        Ok(Self(s.to_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Fingerprint {
    type Err = FingerprintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str_checked(s)
    }
}

impl AsRef<str> for Fingerprint {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
