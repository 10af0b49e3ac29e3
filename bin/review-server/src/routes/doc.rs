use axum::routing::get;
use axum::{Json, Router};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::routes::{health, review};
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(info(
    title = "review-server",
    description = "Summarizes and rewrites customer reviews with an LLM provider",
    version = "0.1.0"
))]
pub struct ApiDoc;

pub fn get_docs() -> utoipa::openapi::OpenApi {
    let mut root = ApiDoc::openapi();
    root.merge(health::HealthApi::openapi());
    root.merge(review::ReviewApi::openapi());
    root
}

/// Serve the generated document at `/api-docs/openapi.json`.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/api-docs/openapi.json", get(|| async { Json(get_docs()) }))
}
