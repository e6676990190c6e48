use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::collection::{ActiveCollection, CollectionState};

/// Body of `PUT /collections/{address}`.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct UpsertCollectionRequest {
    /// Root CID of the published metadata bundle.
    #[schema(example = "bafybeigdyrzt5sfp7udm7hu76uh7y26nf3efuylqabf3oclgtqy55fbzdi")]
    pub cid: Option<String>,
    /// Address of the controlling account.
    #[schema(example = "0x00000000000000000000000000000000000000bb")]
    pub owner: Option<String>,
}

/// Body of `PUT /collections/{address}/activate`.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct ActivateRequest {
    #[schema(example = "bafybeigdyrzt5sfp7udm7hu76uh7y26nf3efuylqabf3oclgtqy55fbzdi")]
    pub cid: Option<String>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct OkResponse {
    #[schema(example = true)]
    pub ok: bool,
}

impl OkResponse {
    pub fn ok() -> Self {
        Self { ok: true }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct CollectionResponse {
    #[schema(example = "0x00000000000000000000000000000000000000aa")]
    pub address: String,
    #[schema(example = "0x00000000000000000000000000000000000000bb")]
    pub owner: String,
    /// Null until the first publication is recorded.
    pub cid: Option<String>,
    /// Whether the public frontend currently serves this collection.
    #[schema(example = false)]
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CollectionState> for CollectionResponse {
    fn from(s: CollectionState) -> Self {
        Self {
            address: s.collection.address,
            owner: s.collection.owner,
            cid: s.collection.cid,
            active: s.active,
            created_at: s.collection.created_at,
            updated_at: s.collection.updated_at,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ActiveCollectionResponse {
    #[schema(example = "0x00000000000000000000000000000000000000aa")]
    pub address: String,
    pub cid: Option<String>,
}

impl From<ActiveCollection> for ActiveCollectionResponse {
    fn from(a: ActiveCollection) -> Self {
        Self {
            address: a.address,
            cid: a.cid,
        }
    }
}
