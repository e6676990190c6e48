use dashboard_common::CanonicalAddress;
use dashboard_common::fingerprint::{self, Fingerprint, FingerprintError};
use dashboard_common::storage::{Cid, PinFile, PinStore, StorageError, item_path};
use serde::Serialize;
use thiserror::Error;
use tracing::instrument;

use crate::config::PublishConfig;

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("at least one image and one code are required")]
    EmptyInput,
    #[error("passes and images count mismatch: {images} images, {codes} codes")]
    CountMismatch { images: usize, codes: usize },
    #[error("code on line {line} is blank")]
    BlankCode { line: usize },
    #[error("at most {limit} items per publication, got {actual}")]
    TooManyItems { actual: usize, limit: usize },
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Fingerprint(#[from] FingerprintError),
    #[error("metadata encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
}

/// One uploaded image, in the order the operator supplied it.
#[derive(Debug, Clone)]
pub struct ImagePayload {
    pub filename: String,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

/// NFT metadata document stored at `<folder>/<index>.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetadataDocument {
    pub name: String,
    pub description: String,
    pub image: String,
}

impl MetadataDocument {
    fn new(collection_name: &str, index: usize, code: &str, image: &Cid) -> Self {
        Self {
            name: format!("{collection_name} #{}", index + 1),
            description: format!("Claimed with {code}"),
            image: image.to_uri(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedItem {
    pub code: String,
    pub uri: String,
    pub hash: Fingerprint,
}

/// Result of a publication: the bundle root and one item per code.
#[derive(Debug, Clone)]
pub struct Publication {
    pub cid: Cid,
    pub items: Vec<PublishedItem>,
}

impl Publication {
    pub fn hashes(&self) -> Vec<Fingerprint> {
        self.items.iter().map(|i| i.hash).collect()
    }
}

/// Split the operator's pass list into codes: one per line, trimmed, blank
/// lines dropped.
pub fn parse_codes(input: &str) -> Vec<String> {
    input
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

/// Uploads images and their metadata documents, then derives the redemption
/// fingerprint of every item. Nothing is written to the registry.
pub struct MetadataPublisher<'a> {
    store: &'a dyn PinStore,
    config: &'a PublishConfig,
}

impl<'a> MetadataPublisher<'a> {
    pub fn new(store: &'a dyn PinStore, config: &'a PublishConfig) -> Self {
        Self { store, config }
    }

    #[instrument(skip(self, images, codes), fields(address = %address, items = images.len()))]
    pub async fn publish(
        &self,
        address: &CanonicalAddress,
        collection_name: Option<&str>,
        images: Vec<ImagePayload>,
        codes: Vec<String>,
    ) -> Result<Publication, PublishError> {
        if images.is_empty() || codes.is_empty() {
            return Err(PublishError::EmptyInput);
        }
        if images.len() != codes.len() {
            return Err(PublishError::CountMismatch {
                images: images.len(),
                codes: codes.len(),
            });
        }
        if let Some(i) = codes.iter().position(|c| c.trim().is_empty()) {
            return Err(PublishError::BlankCode { line: i + 1 });
        }
        if images.len() > self.config.max_items {
            return Err(PublishError::TooManyItems {
                actual: images.len(),
                limit: self.config.max_items,
            });
        }

        let name = collection_name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(self.config.default_collection_name.as_str());
        let folder = self.config.metadata_folder.as_str();

        let mut image_cids = Vec::with_capacity(images.len());
        for image in images {
            let mut file = PinFile::new(image.filename, image.data);
            if let Some(ct) = image.content_type {
                file = file.with_content_type(ct);
            }
            image_cids.push(self.store.pin_file(file).await?);
        }
        tracing::info!(count = image_cids.len(), "Uploaded images");

        let mut documents = Vec::with_capacity(codes.len());
        for (i, (code, image)) in codes.iter().zip(&image_cids).enumerate() {
            let doc = MetadataDocument::new(name, i, code, image);
            documents.push(PinFile::json(item_path(folder, i), serde_json::to_vec(&doc)?));
        }

        let root = self
            .store
            .pin_directory(&format!("{address}-metadata"), documents)
            .await?;
        tracing::info!(cid = %root, "Uploaded metadata bundle");

        let items = codes
            .into_iter()
            .enumerate()
            .map(|(i, code)| {
                let uri = root.item_uri(folder, i);
                let hash = fingerprint::derive(&code, &uri)?;
                Ok(PublishedItem { code, uri, hash })
            })
            .collect::<Result<Vec<_>, FingerprintError>>()?;

        Ok(Publication { cid: root, items })
    }
}
