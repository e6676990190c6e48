use axum::{
    Json,
    extract::{DefaultBodyLimit, Multipart, Path, State},
};
use dashboard_common::CanonicalAddress;
use dashboard_common::fingerprint::parse_hash_list;
use tracing::instrument;

use crate::config::PublishConfig;
use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::models::publish::*;
use crate::publish::{ImagePayload, MetadataPublisher, parse_codes};
use crate::state::AppState;

pub fn publish_body_limit(config: &PublishConfig) -> DefaultBodyLimit {
    DefaultBodyLimit::max(config.max_upload_size)
}

/// Last path segment of a client-supplied filename.
fn flat_filename(raw: Option<&str>, index: usize) -> String {
    raw.and_then(|name| name.rsplit(['/', '\\']).next())
        .map(str::trim)
        .filter(|name| !name.is_empty() && *name != "." && *name != "..")
        .map(str::to_string)
        .unwrap_or_else(|| format!("image-{index}"))
}

#[utoipa::path(
    post,
    path = "/{address}/publish",
    tag = "Publishing",
    operation_id = "publishCollection",
    summary = "Publish images and metadata",
    description = "Uploads each `image` part in order, pins one metadata document per code as `metadata/<i>.json` inside a single directory bundle, and returns the bundle CID with the fingerprint of every (code, uri) pair. \
        `codes` holds one pass code per line and must match the number of images. An optional `name` sets the collection display name. \
        Nothing is recorded in the registry; call `PUT /collections/{address}` with the returned CID afterwards.",
    params(("address" = String, Path, description = "Collection contract address")),
    request_body(content_type = "multipart/form-data", description = "`image` files, `codes` text and optional `name`"),
    responses(
        (status = 200, description = "Published", body = PublishResponse),
        (status = 400, description = "Empty input or count mismatch (VALIDATION_ERROR), pinning failure (UPSTREAM_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, multipart))]
pub async fn publish_collection(
    State(state): State<AppState>,
    Path(address): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<PublishResponse>, AppError> {
    let address = CanonicalAddress::parse(&address)?;

    let mut images = Vec::new();
    let mut codes = Vec::new();
    let mut name: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        match field.name() {
            Some("image") => {
                let filename = flat_filename(field.file_name(), images.len());
                let content_type = field.content_type().map(str::to_string);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read image: {e}")))?;
                images.push(ImagePayload {
                    filename,
                    content_type,
                    data: data.to_vec(),
                });
            }
            Some("codes") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read codes: {e}")))?;
                codes.extend(parse_codes(&text));
            }
            Some("name") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read name: {e}")))?;
                name = Some(text);
            }
            _ => {} // Ignore unknown fields.
        }
    }

    let publication = MetadataPublisher::new(&*state.pin_store, &state.config.publish)
        .publish(&address, name.as_deref(), images, codes)
        .await?;

    Ok(Json(publication.into()))
}

#[utoipa::path(
    post,
    path = "/hashes",
    tag = "Publishing",
    operation_id = "deriveHashes",
    summary = "Parse a hash list",
    description = "Accepts a JSON array of `0x` hashes, or one entry per line where each line is a `0x` hash or a `CODE,uri` pair. Pairs are hashed on the fly.",
    request_body = HashListRequest,
    responses(
        (status = 200, description = "Parsed fingerprints", body = HashListResponse),
        (status = 400, description = "Malformed line or empty list (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(payload))]
pub async fn derive_hashes(
    AppJson(payload): AppJson<HashListRequest>,
) -> Result<Json<HashListResponse>, AppError> {
    let hashes = parse_hash_list(&payload.input)?;
    Ok(Json(HashListResponse {
        hashes: hashes.iter().map(|h| h.to_hex()).collect(),
    }))
}
