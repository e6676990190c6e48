use serde::{Deserialize, Serialize};

use crate::publish::{Publication, PublishedItem};

#[derive(Serialize, utoipa::ToSchema)]
pub struct PublishedItemResponse {
    #[schema(example = "PASS-001")]
    pub code: String,
    #[schema(example = "ipfs://bafyroot/metadata/0.json")]
    pub uri: String,
    #[schema(example = "0x54c65df561f2b4b4ead118a18e2f83a95bc122eaa8529024bfce1bf07e1dfb3a")]
    pub hash: String,
}

impl From<PublishedItem> for PublishedItemResponse {
    fn from(i: PublishedItem) -> Self {
        Self {
            code: i.code,
            uri: i.uri,
            hash: i.hash.to_hex(),
        }
    }
}

/// Result of a publication: the bundle root, the fingerprints to register
/// on-chain and the combined per-item view.
#[derive(Serialize, utoipa::ToSchema)]
pub struct PublishResponse {
    #[schema(example = "bafyroot")]
    pub cid: String,
    pub hashes: Vec<String>,
    pub items: Vec<PublishedItemResponse>,
}

impl From<Publication> for PublishResponse {
    fn from(p: Publication) -> Self {
        Self {
            cid: p.cid.to_string(),
            hashes: p.hashes().iter().map(|h| h.to_hex()).collect(),
            items: p.items.into_iter().map(Into::into).collect(),
        }
    }
}

/// Body of `POST /hashes`.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct HashListRequest {
    /// JSON array of hashes, or one `0x…` hash or `CODE,uri` pair per line.
    #[schema(example = "PASS-001,ipfs://bafyroot/metadata/0.json")]
    pub input: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct HashListResponse {
    pub hashes: Vec<String>,
}
