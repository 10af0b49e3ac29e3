//! Unified server error type.
//!
//! Every handler returns `Result<T, ServerError>`, which implements
//! [`axum::response::IntoResponse`] so errors are automatically converted
//! to a JSON-body HTTP response with an appropriate status code.
//!
//! **Security note:** upstream bodies and internal messages arrive here
//! already redacted.  With `error_details` disabled they are dropped
//! entirely and every failure past input validation becomes a bare 500.

use axum::Json;
use axum::extract::rejection::BytesRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use review_enhancer::EnhanceError;
use serde_json::json;
use thiserror::Error;

pub const UPSTREAM_FAILED: &str = "Failed to fetch from provider API";
pub const INVALID_UPSTREAM: &str = "Invalid provider response";
pub const INTERNAL: &str = "Something went wrong";

/// All errors that can occur in the review-server request lifecycle.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Propagated from the review pipeline.  `details` selects whether the
    /// upstream status and diagnostic text reach the caller.
    #[error("{source}")]
    Enhance {
        #[source]
        source: EnhanceError,
        details: bool,
    },

    /// The request body could not be buffered, e.g. it exceeds the body
    /// limit.  Rendered with axum's status and message, as JSON.
    #[error("request body rejected: {0}")]
    Body(#[from] BytesRejection),
}

impl ServerError {
    pub fn enhance(source: EnhanceError, details: bool) -> Self {
        Self::Enhance { source, details }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ServerError::Enhance { source, details } => match source {
                // Client-facing errors: expose the message directly.
                EnhanceError::MethodNotAllowed(m) => {
                    (StatusCode::METHOD_NOT_ALLOWED, json!({ "error": m }))
                }
                EnhanceError::MissingInput(m) => (StatusCode::BAD_REQUEST, json!({ "error": m })),

                EnhanceError::Upstream { status, body } if details => (
                    StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                    json!({ "error": UPSTREAM_FAILED, "details": body }),
                ),
                EnhanceError::Upstream { .. } => {
                    (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": UPSTREAM_FAILED }))
                }
                EnhanceError::InvalidUpstreamResponse(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": INVALID_UPSTREAM }))
                }
                EnhanceError::Internal(m) if details => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": INTERNAL, "details": m }),
                ),
                EnhanceError::Internal(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": INTERNAL }))
                }
            },
            ServerError::Body(rejection) => {
                (rejection.status(), json!({ "error": rejection.body_text() }))
            }
        };
        (status, Json(body)).into_response()
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
