//! Axum router construction.
//!
//! [`build`] assembles the complete application router, including:
//! - Middleware layers (CORS, per-request trace-ID injection)
//! - Optional OpenAPI document (disable with `REVIEW_ENABLE_DOCS=false`)
//! - Health / heartbeat route
//! - The review endpoint

pub mod doc;
mod health;
pub mod review;

use axum::{middleware, Router};
use crate::middleware::{cors, trace};
use crate::state::AppState;
use std::sync::Arc;
use tower::ServiceBuilder;

// ── Router builder ────────────────────────────────────────────────────────────

/// Build the complete Axum [`Router`] for the application.
pub fn build(state: Arc<AppState>) -> Router {
    let mut app = Router::new()
        .merge(health::router())
        .merge(review::router());

    if state.config.enable_docs {
        app = app.merge(doc::router());
    }

    app
        // Outermost layers execute first on the way in.
        .layer(ServiceBuilder::new().layer(cors::cors_layer(&state)))
        .layer(middleware::from_fn(trace::trace_middleware))
        .with_state(state)
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod test {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use http_body_util::BodyExt;
    use review_enhancer::{CompletionProvider, CompletionRequest, ProviderError, ReviewEnhancer};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::middleware::trace::X_TRACE_ID;

    enum Reply {
        Text(&'static str),
        Status(u16, &'static str),
        Invalid,
    }

    struct FakeProvider {
        reply: Reply,
        calls: Mutex<usize>,
    }

    impl FakeProvider {
        fn calls(&self) -> usize {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl CompletionProvider for FakeProvider {
        async fn complete(&self, _request: &CompletionRequest) -> Result<String, ProviderError> {
            *self.calls.lock().unwrap() += 1;
            match &self.reply {
                Reply::Text(t) => Ok((*t).to_owned()),
                Reply::Status(status, body) => {
                    Err(ProviderError::Status { status: *status, body: (*body).to_owned() })
                }
                Reply::Invalid => Err(ProviderError::InvalidResponse("no content".into())),
            }
        }
    }

    fn test_app(reply: Reply, env: &[(&str, &str)]) -> (Router, Arc<FakeProvider>) {
        let mut pairs: Vec<(String, String)> = vec![("API_KEY".into(), "test-key".into())];
        pairs.extend(env.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())));
        let config = Config::from_lookup(|k| {
            pairs.iter().rev().find(|(key, _)| key == k).map(|(_, v)| v.clone())
        })
        .unwrap();

        let provider = Arc::new(FakeProvider { reply, calls: Mutex::new(0) });
        let enhancer =
            ReviewEnhancer::new(provider.clone(), config.prompt.clone(), config.input_mode);
        let state = Arc::new(AppState { config: Arc::new(config), enhancer: Arc::new(enhancer) });
        (build(state), provider)
    }

    async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn get_contract_returns_summary_and_rewrite() {
        let (app, provider) = test_app(Reply::Text("Summary.\nImproved text."), &[]);
        let (status, body) = send(app, get("/api/generate-review?review=Pretty%20good")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "original": "Pretty good",
                "summary": "Summary.",
                "improvedReview": "Improved text."
            })
        );
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn get_contract_rejects_post_without_calling_provider() {
        let (app, provider) = test_app(Reply::Text("unused"), &[]);
        let req = post_json("/api/generate-review", json!({ "review": "hi" }));
        let (status, body) = send(app, req).await;

        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body, json!({ "error": "Only GET requests are allowed" }));
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn get_contract_rejects_missing_and_blank_review() {
        for uri in [
            "/api/generate-review",
            "/api/generate-review?review=",
            "/api/generate-review?review=%20%20%20",
        ] {
            let (app, provider) = test_app(Reply::Text("unused"), &[]);
            let (status, body) = send(app, get(uri)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "uri: {uri}");
            assert_eq!(body, json!({ "error": "Missing ?review= in query" }));
            assert_eq!(provider.calls(), 0);
        }
    }

    #[tokio::test]
    async fn body_contract_accepts_post_and_rejects_get() {
        let env = [("REVIEW_INPUT_MODE", "body")];

        let (router, provider) = test_app(Reply::Text("Short.\nLonger\nrewrite."), &env);
        let req = post_json("/api/generate-review", json!({ "review": "ok-ish" }));
        let (status, body) = send(router, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["original"], "ok-ish");
        assert_eq!(body["summary"], "Short.");
        assert_eq!(body["improvedReview"], "Longer rewrite.");
        assert_eq!(provider.calls(), 1);

        let (router, provider) = test_app(Reply::Text("unused"), &env);
        let (status, body) = send(router, get("/api/generate-review?review=ok")).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body, json!({ "error": "Only POST requests are allowed" }));
        assert_eq!(provider.calls(), 0);

        let (router, provider) = test_app(Reply::Text("unused"), &env);
        let req = post_json("/api/generate-review", json!({ "review": "  " }));
        let (status, body) = send(router, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Missing review in body" }));
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn oversized_body_gets_json_413_without_calling_provider() {
        let env = [("REVIEW_INPUT_MODE", "body")];
        let review = "x".repeat(3 * 1024 * 1024);

        let (router, provider) = test_app(Reply::Text("unused"), &env);
        let req = post_json("/api/generate-review", json!({ "review": review }));
        let (status, body) = send(router, req).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert!(body["error"].as_str().is_some_and(|e| !e.is_empty()), "got {body}");
        assert_eq!(provider.calls(), 0);

        // The verb is still checked first.
        let (router, provider) = test_app(Reply::Text("unused"), &env);
        let req = Request::put("/api/generate-review").body(Body::from(review)).unwrap();
        let (status, body) = send(router, req).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body, json!({ "error": "Only POST requests are allowed" }));
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn repeated_review_parameter_uses_first_value() {
        let (app, provider) = test_app(Reply::Text("S.\nR."), &[]);
        let (status, body) = send(app, get("/api/generate-review?review=a&review=b")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["original"], "a");
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn upstream_rate_limit_is_forwarded_with_details() {
        let (app, provider) = test_app(Reply::Status(429, "Rate limit reached"), &[]);
        let (status, body) = send(app, get("/api/generate-review?review=hello")).await;

        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            body,
            json!({ "error": "Failed to fetch from provider API", "details": "Rate limit reached" })
        );
        assert_eq!(provider.calls(), 1, "no retry");
    }

    #[tokio::test]
    async fn upstream_failure_collapses_when_details_disabled() {
        let (app, provider) = test_app(
            Reply::Status(429, "Rate limit reached"),
            &[("REVIEW_ERROR_DETAILS", "false")],
        );
        let (status, body) = send(app, get("/api/generate-review?review=hello")).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "Failed to fetch from provider API" }));
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn invalid_upstream_response_is_500() {
        let (app, _) = test_app(Reply::Invalid, &[]);
        let (status, body) = send(app, get("/api/generate-review?review=hello")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "Invalid provider response" }));
    }

    #[tokio::test]
    async fn repeated_requests_are_identical() {
        let (router, _) = test_app(Reply::Text("S.\nR."), &[]);
        let (_, first) = send(router.clone(), get("/api/generate-review?review=same")).await;
        let (_, second) = send(router, get("/api/generate-review?review=same")).await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn trace_id_is_echoed_or_generated() {
        let (router, _) = test_app(Reply::Text("unused"), &[]);
        let id = "5b0a5c3e-8f0e-4d57-9d55-6a1f0b1e2c3d";
        let req = Request::get("/health").header(X_TRACE_ID, id).body(Body::empty()).unwrap();
        let resp = router.clone().oneshot(req).await.unwrap();
        assert_eq!(resp.headers().get(X_TRACE_ID).unwrap(), id);

        let resp = router.oneshot(get("/health")).await.unwrap();
        let generated = resp.headers().get(X_TRACE_ID).unwrap().to_str().unwrap();
        assert!(uuid::Uuid::parse_str(generated).is_ok());
    }

    #[tokio::test]
    async fn openapi_document_lists_review_route() {
        let (router, _) = test_app(Reply::Text("unused"), &[]);
        let (status, body) = send(router, get("/api-docs/openapi.json")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["paths"]["/api/generate-review"].is_object());
        assert!(body["paths"]["/health"].is_object());

        let (router, _) = test_app(Reply::Text("unused"), &[("REVIEW_ENABLE_DOCS", "false")]);
        let (status, _) = send(router, get("/api-docs/openapi.json")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
