//! Redemption fingerprints.
//!
//! A fingerprint is `keccak256(abi.encodePacked(string code, string uri))`,
//! the value the collection contract stores through `addValidHashes` and
//! recomputes when a pass is redeemed. Packed encoding writes each `string`
//! as its raw UTF-8 bytes with no length prefix and no padding, so the
//! preimage is exactly `code || uri`. Changing anything here makes every
//! previously registered fingerprint unredeemable.

use std::fmt;
use std::str::FromStr;

use alloy_primitives::{B256, keccak256};
use alloy_sol_types::SolValue;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Version of the packed-encoding contract shared with the on-chain verifier.
pub const PACKED_ENCODING_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FingerprintError {
    #[error("redemption code must not be empty")]
    EmptyCode,
    #[error("metadata uri must not be empty")]
    EmptyUri,
    #[error("invalid fingerprint: {0}")]
    InvalidHex(String),
    #[error("bad line: \"{0}\"")]
    BadLine(String),
    #[error("invalid hash list: {0}")]
    InvalidJson(String),
    #[error("no valid hashes found")]
    NoHashes,
}

/// A 32-byte redemption fingerprint.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint(B256);

impl Fingerprint {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(B256::from(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0.0
    }

    /// Parse a `0x`-prefixed, 64-digit hex string.
    pub fn from_hex(s: &str) -> Result<Self, FingerprintError> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .ok_or_else(|| FingerprintError::InvalidHex("missing 0x prefix".into()))?;

        if digits.len() != 64 {
            return Err(FingerprintError::InvalidHex(format!(
                "expected 64 hex characters, got {}",
                digits.len()
            )));
        }

        let bytes = hex::decode(digits)
            .map_err(|e| FingerprintError::InvalidHex(format!("invalid hex: {e}")))?;
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| FingerprintError::InvalidHex("decoded to wrong length".into()))?;

        Ok(Self::from_bytes(arr))
    }

    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0.as_slice()))
    }
}

/// Derive the fingerprint for a redemption code and its metadata uri.
pub fn derive(code: &str, uri: &str) -> Result<Fingerprint, FingerprintError> {
    if code.is_empty() {
        return Err(FingerprintError::EmptyCode);
    }
    if uri.is_empty() {
        return Err(FingerprintError::EmptyUri);
    }

    let packed = (code.to_owned(), uri.to_owned()).abi_encode_packed();
    Ok(Fingerprint(keccak256(packed)))
}

/// Parse the free-form hash list operators paste into the dashboard.
///
/// Accepts either a JSON array of strings or one entry per line. Each entry
/// is an existing `0x` fingerprint or a `CODE,uri` pair that is derived on
/// the fly. Stray quotes, commas and brackets around an entry are ignored.
pub fn parse_hash_list(input: &str) -> Result<Vec<Fingerprint>, FingerprintError> {
    let raw = input.trim();

    let entries: Vec<String> = if raw.starts_with('[') {
        serde_json::from_str::<Vec<String>>(raw)
            .map_err(|e| FingerprintError::InvalidJson(e.to_string()))?
            .into_iter()
            .map(|h| h.trim().to_string())
            .collect()
    } else {
        raw.lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect()
    };

    let hashes = entries
        .iter()
        .map(|entry| parse_entry(entry))
        .collect::<Result<Vec<_>, _>>()?;

    if hashes.is_empty() {
        return Err(FingerprintError::NoHashes);
    }
    Ok(hashes)
}

fn parse_entry(entry: &str) -> Result<Fingerprint, FingerprintError> {
    let cleaned = entry
        .trim_matches(|c: char| c == ',' || c == '"' || c == '[' || c == ']' || c.is_whitespace())
        .to_ascii_lowercase();

    if cleaned.starts_with("0x") && cleaned.len() == 66 {
        return Fingerprint::from_hex(&cleaned)
            .map_err(|_| FingerprintError::BadLine(entry.to_string()));
    }

    let mut parts = entry.split(',').map(str::trim);
    let code = parts.next().unwrap_or_default();
    let uri = parts.next().unwrap_or_default();
    if code.is_empty() || uri.is_empty() {
        return Err(FingerprintError::BadLine(entry.to_string()));
    }

    derive(code, uri)
}

impl FromStr for Fingerprint {
    type Err = FingerprintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", self.to_hex())
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Fingerprint {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Fingerprint {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
