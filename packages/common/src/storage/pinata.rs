use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use super::cid::Cid;
use super::error::StorageError;
use super::traits::{PinFile, PinStore, validate_member_path};

const PIN_FILE_ENDPOINT: &str = "/pinning/pinFileToIPFS";

/// Successful response of `pinFileToIPFS`.
#[derive(Debug, Deserialize)]
struct PinResponse {
    #[serde(rename = "IpfsHash")]
    ipfs_hash: String,
    #[serde(rename = "PinSize", default)]
    pin_size: u64,
}

/// Client for a Pinata-compatible pinning API.
pub struct PinataPinStore {
    client: reqwest::Client,
    api_url: String,
    jwt: String,
    max_size: u64,
}

impl PinataPinStore {
    pub fn new(
        api_url: impl Into<String>,
        jwt: impl Into<String>,
        max_size: u64,
        timeout: Duration,
    ) -> Result<Self, StorageError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            jwt: jwt.into(),
            max_size,
        })
    }

    fn part(&self, file: PinFile) -> Result<Part, StorageError> {
        if file.data.len() as u64 > self.max_size {
            return Err(StorageError::SizeLimitExceeded {
                actual: file.data.len() as u64,
                limit: self.max_size,
            });
        }

        let content_type = file.content_type.unwrap_or_else(|| {
            mime_guess::from_path(&file.path)
                .first_or_octet_stream()
                .to_string()
        });

        Part::bytes(file.data)
            .file_name(file.path)
            .mime_str(&content_type)
            .map_err(|e| StorageError::Upstream(format!("invalid content type: {e}")))
    }

    async fn submit(&self, form: Form) -> Result<Cid, StorageError> {
        let res = self
            .client
            .post(format!("{}{PIN_FILE_ENDPOINT}", self.api_url))
            .bearer_auth(&self.jwt)
            .multipart(form)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            let reason = upstream_reason(&body).unwrap_or_else(|| format!("HTTP {status}"));
            tracing::warn!(%status, %reason, "Pinning request rejected");
            return Err(StorageError::Upstream(reason));
        }

        let pinned: PinResponse = res.json().await?;
        tracing::debug!(cid = %pinned.ipfs_hash, size = pinned.pin_size, "Pinned content");
        Cid::parse(&pinned.ipfs_hash)
    }
}

/// Pull a human-readable reason out of an error body. The service answers
/// either `{"error": "..."}` or `{"error": {"reason": "...", "details": "..."}}`.
fn upstream_reason(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let error = value.get("error")?;
    if let Some(msg) = error.as_str() {
        return Some(msg.to_string());
    }
    let reason = error.get("reason").and_then(|r| r.as_str());
    let details = error.get("details").and_then(|d| d.as_str());
    match (reason, details) {
        (Some(r), Some(d)) => Some(format!("{r}: {d}")),
        (Some(r), None) => Some(r.to_string()),
        (None, Some(d)) => Some(d.to_string()),
        (None, None) => None,
    }
}

#[async_trait]
impl PinStore for PinataPinStore {
    async fn pin_file(&self, file: PinFile) -> Result<Cid, StorageError> {
        let form = Form::new().part("file", self.part(file)?);
        self.submit(form).await
    }

    async fn pin_directory(&self, name: &str, files: Vec<PinFile>) -> Result<Cid, StorageError> {
        if files.is_empty() {
            return Err(StorageError::InvalidPath(format!(
                "directory bundle '{name}' has no members"
            )));
        }

        let mut form = Form::new();
        for file in files {
            validate_member_path(&file.path)?;
            form = form.part("file", self.part(file)?);
        }

        form = form
            .text("pinataMetadata", serde_json::json!({ "name": name }).to_string())
            .text(
                "pinataOptions",
                serde_json::json!({ "wrapWithDirectory": true }).to_string(),
            );

        self.submit(form).await
    }
}
