use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use super::cid::Cid;
use super::error::StorageError;
use super::traits::{PinFile, PinStore, validate_member_path};

/// Filesystem-backed content-addressed pin store.
///
/// Layout:
/// - `{base_path}/blobs/{cid}` for single files
/// - `{base_path}/dirs/{cid}/{member path}` for directory bundles
///
/// Identifiers are base16 CIDv1 values over sha2-256, so pinning the same
/// content twice yields the same identifier and writes nothing new. A
/// directory's identifier covers its member paths and member identifiers,
/// not the bundle name.
pub struct FilesystemPinStore {
    base_path: PathBuf,
    max_size: u64,
}

impl FilesystemPinStore {
    /// Create a new filesystem pin store.
    pub async fn new(base_path: PathBuf, max_size: u64) -> Result<Self, StorageError> {
        fs::create_dir_all(base_path.join("blobs")).await?;
        fs::create_dir_all(base_path.join("dirs")).await?;
        fs::create_dir_all(base_path.join(".tmp")).await?;
        Ok(Self {
            base_path,
            max_size,
        })
    }

    fn blob_path(&self, cid: &Cid) -> PathBuf {
        self.base_path.join("blobs").join(cid.as_str())
    }

    fn dir_path(&self, cid: &Cid) -> PathBuf {
        self.base_path.join("dirs").join(cid.as_str())
    }

    fn temp_path(&self) -> PathBuf {
        self.base_path
            .join(".tmp")
            .join(uuid::Uuid::new_v4().to_string())
    }

    fn check_size(&self, len: usize) -> Result<(), StorageError> {
        if len as u64 > self.max_size {
            return Err(StorageError::SizeLimitExceeded {
                actual: len as u64,
                limit: self.max_size,
            });
        }
        Ok(())
    }

    /// Read pinned content back. `path` selects a member of a directory
    /// bundle; `None` reads a single pinned file.
    pub async fn fetch(&self, cid: &Cid, path: Option<&str>) -> Result<Vec<u8>, StorageError> {
        let target = match path {
            Some(p) => {
                validate_member_path(p)?;
                self.dir_path(cid).join(p)
            }
            None => self.blob_path(cid),
        };

        match fs::read(&target).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let what = match path {
                    Some(p) => format!("{cid}/{p}"),
                    None => cid.to_string(),
                };
                Err(StorageError::NotFound(what))
            }
            Err(e) => Err(e.into()),
        }
    }
}

async fn write_file(path: &Path, data: &[u8]) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }
    fs::write(path, data).await?;
    Ok(())
}

#[async_trait]
impl PinStore for FilesystemPinStore {
    async fn pin_file(&self, file: PinFile) -> Result<Cid, StorageError> {
        self.check_size(file.data.len())?;

        let cid = Cid::for_raw(&file.data);
        let blob_path = self.blob_path(&cid);

        if fs::try_exists(&blob_path).await? {
            return Ok(cid);
        }

        let temp_path = self.temp_path();
        if let Err(e) = fs::write(&temp_path, &file.data).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        if let Err(e) = fs::rename(&temp_path, &blob_path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        tracing::debug!(%cid, path = %file.path, "Pinned file");
        Ok(cid)
    }

    async fn pin_directory(&self, name: &str, files: Vec<PinFile>) -> Result<Cid, StorageError> {
        if files.is_empty() {
            return Err(StorageError::InvalidPath(format!(
                "directory bundle '{name}' has no members"
            )));
        }

        let mut manifest = BTreeMap::new();
        for file in &files {
            validate_member_path(&file.path)?;
            self.check_size(file.data.len())?;
            let member = Cid::for_raw(&file.data);
            if manifest.insert(file.path.clone(), member.to_string()).is_some() {
                return Err(StorageError::InvalidPath(format!(
                    "duplicate member {}",
                    file.path
                )));
            }
        }

        let manifest_bytes = serde_json::to_vec(&manifest)
            .map_err(|e| StorageError::Upstream(format!("manifest encoding failed: {e}")))?;
        let cid = Cid::for_directory(&manifest_bytes);
        let dir_path = self.dir_path(&cid);

        if fs::try_exists(&dir_path).await? {
            return Ok(cid);
        }

        let temp_dir = self.temp_path();
        let staged = async {
            for file in &files {
                write_file(&temp_dir.join(&file.path), &file.data).await?;
            }
            Ok::<(), StorageError>(())
        }
        .await;

        if let Err(e) = staged {
            let _ = fs::remove_dir_all(&temp_dir).await;
            return Err(e);
        }

        if let Err(e) = fs::rename(&temp_dir, &dir_path).await {
            let _ = fs::remove_dir_all(&temp_dir).await;
            // Another request pinned the identical bundle first.
            if fs::try_exists(&dir_path).await? {
                return Ok(cid);
            }
            return Err(e.into());
        }

        tracing::debug!(%cid, name, members = files.len(), "Pinned directory");
        Ok(cid)
    }
}
