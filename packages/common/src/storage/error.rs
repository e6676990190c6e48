use std::fmt;

/// Errors that can occur while pinning content.
#[derive(Debug)]
pub enum StorageError {
    /// The requested content was not found.
    NotFound(String),
    /// An I/O error occurred.
    Io(std::io::Error),
    /// A content identifier is malformed.
    InvalidCid(String),
    /// A bundle member path is not a safe relative path.
    InvalidPath(String),
    /// The file exceeds the configured size limit.
    SizeLimitExceeded { actual: u64, limit: u64 },
    /// The pinning service rejected the request or could not be reached.
    Upstream(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(what) => write!(f, "content not found: {what}"),
            Self::Io(err) => write!(f, "storage IO error: {err}"),
            Self::InvalidCid(msg) => write!(f, "invalid content identifier: {msg}"),
            Self::InvalidPath(path) => write!(f, "invalid bundle path: {path}"),
            Self::SizeLimitExceeded { actual, limit } => {
                write!(f, "file exceeds size limit ({actual} > {limit} bytes)")
            }
            Self::Upstream(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

#[cfg(feature = "pinata")]
impl From<reqwest::Error> for StorageError {
    fn from(err: reqwest::Error) -> Self {
        Self::Upstream(err.to_string())
    }
}
