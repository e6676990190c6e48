use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use dashboard_common::address::AddressError;
use dashboard_common::fingerprint::FingerprintError;
use dashboard_common::storage::StorageError;
use sea_orm::DbErr;
use serde::Serialize;

use crate::publish::PublishError;

/// Structured error response returned by all endpoints on failure.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Machine-readable error code. One of: `VALIDATION_ERROR`, `NOT_FOUND`,
    /// `DUPLICATE`, `UPSTREAM_ERROR`, `INTERNAL_ERROR`.
    #[schema(example = "VALIDATION_ERROR")]
    pub code: &'static str,
    /// Human-readable error description.
    #[schema(example = "address must start with 0x")]
    pub message: String,
}

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    Validation(String),
    NotFound(String),
    Duplicate(String),
    /// A collaborator (pinning service or datastore) failed. The message is
    /// passed through to the client unchanged.
    Upstream(String),
    Internal(String),
}

impl AppError {
    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        match self {
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    code: "VALIDATION_ERROR",
                    message: msg,
                },
            ),
            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    code: "NOT_FOUND",
                    message: msg,
                },
            ),
            AppError::Duplicate(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    code: "DUPLICATE",
                    message: msg,
                },
            ),
            AppError::Upstream(msg) => {
                tracing::warn!("Upstream error: {}", msg);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorBody {
                        code: "UPSTREAM_ERROR",
                        message: msg,
                    },
                )
            }
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        code: "INTERNAL_ERROR",
                        message: "An unexpected error occurred".into(),
                    },
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        AppError::Upstream(err.to_string())
    }
}

impl From<AddressError> for AppError {
    fn from(err: AddressError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<FingerprintError> for AppError {
    fn from(err: FingerprintError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::SizeLimitExceeded { .. } | StorageError::InvalidPath(_) => {
                AppError::Validation(err.to_string())
            }
            StorageError::NotFound(what) => AppError::NotFound(format!("Content {what} not found")),
            StorageError::Io(e) => AppError::Internal(format!("Pin store IO error: {e}")),
            StorageError::InvalidCid(_) | StorageError::Upstream(_) => {
                AppError::Upstream(err.to_string())
            }
        }
    }
}

impl From<PublishError> for AppError {
    fn from(err: PublishError) -> Self {
        match err {
            PublishError::EmptyInput
            | PublishError::CountMismatch { .. }
            | PublishError::BlankCode { .. }
            | PublishError::TooManyItems { .. } => AppError::Validation(err.to_string()),
            PublishError::Fingerprint(e) => e.into(),
            PublishError::Storage(e) => e.into(),
            PublishError::Encode(e) => AppError::Internal(format!("Metadata encoding failed: {e}")),
        }
    }
}
