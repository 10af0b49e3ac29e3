//! Outbound chat-completion providers.
//!
//! [`CompletionProvider`] is the seam between the review logic and the
//! network.  [`OpenAiProvider`] talks to any OpenAI-compatible
//! `/chat/completions` endpoint; tests plug in an in-memory implementation.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::ProviderError;
use crate::redact::REDACTED;
use crate::types::{CompletionRequest, CompletionResponse};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Bearer credential for the provider.  `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Returns `None` for a blank key.
    pub fn new(key: impl Into<String>) -> Option<Self> {
        let key: String = key.into();
        let key = key.trim();
        if key.is_empty() { None } else { Some(Self(key.to_owned())) }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ApiKey({REDACTED})")
    }
}

#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Issue one completion request and return the trimmed, non-blank text of
    /// the first choice.  Implementations must not retry.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError>;
}

/// `reqwest`-backed client for OpenAI-compatible chat-completion APIs.
pub struct OpenAiProvider {
    http: Client,
    base_url: String,
    api_key: ApiKey,
}

impl OpenAiProvider {
    /// Client without an explicit timeout: the call waits as long as the
    /// transport allows.
    pub fn new(base_url: impl Into<String>, api_key: ApiKey) -> Result<Self, ProviderError> {
        Self::with_timeout(base_url, api_key, None)
    }

    pub fn with_timeout(
        base_url: impl Into<String>,
        api_key: ApiKey,
        timeout: Option<Duration>,
    ) -> Result<Self, ProviderError> {
        let mut builder =
            Client::builder().user_agent(concat!("review-enhancer/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self { http: builder.build()?, base_url: base_url.into(), api_key })
    }

    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

impl fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key)
            .finish()
    }
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError> {
        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(self.api_key.expose())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ProviderError::Status { status: status.as_u16(), body });
        }

        let bytes = response.bytes().await?;
        let decoded: CompletionResponse = serde_json::from_slice(&bytes)
            .map_err(|e| ProviderError::InvalidResponse(format!("undecodable body: {e}")))?;

        decoded
            .first_content()
            .map(str::to_owned)
            .ok_or_else(|| {
                ProviderError::InvalidResponse("missing choices[0].message.content".into())
            })
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
