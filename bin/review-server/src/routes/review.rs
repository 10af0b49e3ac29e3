//! The review endpoint.
//!
//! Registered for every verb so that a mismatched verb gets the JSON 405
//! body of the configured contract instead of axum's empty default.  Which
//! verb and which input location are accepted is decided once at startup by
//! [`InputMode`].

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::{Query, State};
use axum::http::{Method, Uri};
use axum::routing::any;
use axum::{Json, Router};
use review_enhancer::{InputMode, ReviewResponse};
use serde::Deserialize;
use tracing::{debug, warn};
use utoipa::{IntoParams, OpenApi, ToSchema};

use crate::error::ServerError;
use crate::state::AppState;

pub const REVIEW_PATH: &str = "/api/generate-review";

#[derive(OpenApi)]
#[openapi(
    paths(generate_review),
    components(schemas(ReviewBody, ReviewResponse))
)]
pub struct ReviewApi;

/// Query string of the GET contract.  When `review` is repeated the first
/// value wins.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReviewQuery {
    /// Review text to summarize and improve.
    pub review: Option<String>,
}

/// JSON body of the POST contract.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ReviewBody {
    /// Review text to summarize and improve.
    pub review: Option<String>,
}

/// Register the review route.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route(REVIEW_PATH, any(generate_review))
}

/// Summarize and rewrite one customer review.
///
/// The server answers either `GET ?review=…` or `POST {"review": "…"}`,
/// depending on `REVIEW_INPUT_MODE`; the other verb gets 405.
#[utoipa::path(
    method(get, post),
    path = "/api/generate-review",
    tag = "review",
    params(ReviewQuery),
    request_body(content = ReviewBody, description = "POST contract only"),
    responses(
        (status = 200, description = "Review summarized and rewritten", body = ReviewResponse),
        (status = 400, description = "Review missing or blank"),
        (status = 405, description = "Verb does not match the configured contract"),
        (status = 413, description = "POST body exceeds the request body limit"),
        (
            status = 500,
            description = "Provider or internal failure; provider status is forwarded \
                           when error details are enabled"
        ),
    )
)]
pub async fn generate_review(
    State(state): State<Arc<AppState>>,
    method: Method,
    uri: Uri,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<ReviewResponse>, ServerError> {
    let mode = state.enhancer.mode();
    let review = match mode {
        InputMode::Query => review_from_query(&uri),
        // A wrong verb still gets its 405 below, whatever the body looked like.
        InputMode::Body if !mode.accepts(method.as_str()) => None,
        InputMode::Body => match body {
            Ok(body) => review_from_body(&body),
            Err(rejection) => {
                warn!(error = %rejection, "review body not readable");
                return Err(rejection.into());
            }
        },
    };
    debug!(present = review.is_some(), "review extracted");

    state
        .enhancer
        .handle(method.as_str(), review.as_deref())
        .await
        .map(Json)
        .map_err(|e| ServerError::enhance(e, state.config.error_details))
}

/// A malformed query string counts as a missing review.  Only the first
/// `review` pair is used.
fn review_from_query(uri: &Uri) -> Option<String> {
    let Query(pairs) = Query::<Vec<(String, String)>>::try_from_uri(uri).ok()?;
    pairs.into_iter().find(|(key, _)| key == "review").map(|(_, value)| value)
}

/// Anything but a JSON object with a string `review` counts as missing.
fn review_from_body(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<ReviewBody>(body).ok()?.review
}

// ── Tests ──────────────────────────────────────────────────────────────────────
