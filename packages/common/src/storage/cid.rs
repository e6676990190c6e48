use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::error::StorageError;

/// Multicodec prefix for a CIDv1 over raw bytes with a sha2-256 multihash.
const RAW_SHA256_PREFIX: &str = "01551220";
/// Multicodec prefix for a CIDv1 over dag-json with a sha2-256 multihash.
const DAG_JSON_SHA256_PREFIX: &str = "01a9021220";
/// Multibase prefix for lowercase base16.
const BASE16: char = 'f';

/// Longest identifier accepted from a pinning service.
const MAX_CID_LEN: usize = 128;

/// A content identifier returned by a pinning service.
///
/// Remote services hand back CIDv0 (`Qm…`) or CIDv1 (`bafy…`) strings; the
/// local store produces base16 CIDv1 values. All of them are opaque here
/// beyond basic shape validation.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Cid(String);

impl Cid {
    /// Validate an identifier received from a pinning service or a client.
    pub fn parse(s: &str) -> Result<Self, StorageError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(StorageError::InvalidCid("empty content identifier".into()));
        }
        if s.len() > MAX_CID_LEN {
            return Err(StorageError::InvalidCid(format!(
                "content identifier longer than {MAX_CID_LEN} characters"
            )));
        }
        if !s.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(StorageError::InvalidCid(format!(
                "content identifier must be alphanumeric: {s}"
            )));
        }
        Ok(Self(s.to_string()))
    }

    /// CID of a single raw file, as computed by the local store.
    pub fn for_raw(data: &[u8]) -> Self {
        Self::with_prefix(RAW_SHA256_PREFIX, data)
    }

    /// CID of a directory manifest, as computed by the local store.
    pub fn for_directory(manifest: &[u8]) -> Self {
        Self::with_prefix(DAG_JSON_SHA256_PREFIX, manifest)
    }

    fn with_prefix(prefix: &str, data: &[u8]) -> Self {
        let digest = Sha256::digest(data);
        Self(format!("{BASE16}{prefix}{}", hex::encode(digest)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `ipfs://<cid>`
    pub fn to_uri(&self) -> String {
        format!("ipfs://{}", self.0)
    }

    /// `ipfs://<cid>/<folder>/<index>.json`, the uri of one metadata item
    /// inside a directory bundle.
    pub fn item_uri(&self, folder: &str, index: usize) -> String {
        format!("ipfs://{}/{}", self.0, item_path(folder, index))
    }
}

/// Positional path of a metadata document inside its bundle.
pub fn item_path(folder: &str, index: usize) -> String {
    format!("{folder}/{index}.json")
}

impl fmt::Debug for Cid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cid({})", self.0)
    }
}

impl fmt::Display for Cid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for Cid {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Cid {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
