use async_trait::async_trait;

use super::cid::Cid;
use super::error::StorageError;

/// A file handed to a pinning service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinFile {
    /// File name, or the relative path inside a directory bundle
    /// (e.g. `metadata/0.json`).
    pub path: String,
    /// MIME content type, when known.
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

impl PinFile {
    pub fn new(path: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            path: path.into(),
            content_type: None,
            data,
        }
    }

    pub fn json(path: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            path: path.into(),
            content_type: Some("application/json".into()),
            data,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

/// Content-addressed pinning service.
#[async_trait]
pub trait PinStore: Send + Sync {
    /// Pin a single file and return its content identifier.
    async fn pin_file(&self, file: PinFile) -> Result<Cid, StorageError>;

    /// Pin every file as a member of one directory and return the
    /// directory's root identifier. Members stay addressable as
    /// `<root>/<file.path>`.
    async fn pin_directory(&self, name: &str, files: Vec<PinFile>) -> Result<Cid, StorageError>;
}

/// Reject absolute paths, empty segments and parent traversal.
pub(crate) fn validate_member_path(path: &str) -> Result<(), StorageError> {
    let invalid = path.is_empty()
        || path.starts_with('/')
        || path.contains('\\')
        || path
            .split('/')
            .any(|seg| seg.is_empty() || seg == "." || seg == "..");
    if invalid {
        return Err(StorageError::InvalidPath(path.to_string()));
    }
    Ok(())
}
