//! The review request operation: method check, input validation, one
//! provider call, and reshaping of the reply.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use tracing::{debug, error, info};

use crate::error::{EnhanceError, ProviderError};
use crate::parse::parse_completion;
use crate::prompt::PromptSettings;
use crate::provider::CompletionProvider;
use crate::redact::Redactor;
use crate::types::ReviewResponse;

/// Which inbound contract the endpoint speaks.  A server runs exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// `GET ?review=…`
    #[default]
    Query,
    /// `POST {"review": "…"}`
    Body,
}

impl InputMode {
    /// Configuration name of the mode, as accepted by `FromStr`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Body => "body",
        }
    }

    pub fn method(self) -> &'static str {
        match self {
            Self::Query => "GET",
            Self::Body => "POST",
        }
    }

    /// Whether an inbound HTTP verb matches this contract.  Case-insensitive.
    pub fn accepts(self, method: &str) -> bool {
        method.eq_ignore_ascii_case(self.method())
    }

    pub fn method_not_allowed_message(self) -> &'static str {
        match self {
            Self::Query => "Only GET requests are allowed",
            Self::Body => "Only POST requests are allowed",
        }
    }

    pub fn missing_input_message(self) -> &'static str {
        match self {
            Self::Query => "Missing ?review= in query",
            Self::Body => "Missing review in body",
        }
    }
}

impl FromStr for InputMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "query" | "get" => Ok(Self::Query),
            "body" | "post" => Ok(Self::Body),
            other => Err(format!("unknown input mode '{other}' (expected 'query' or 'body')")),
        }
    }
}

pub struct ReviewEnhancer {
    provider: Arc<dyn CompletionProvider>,
    settings: PromptSettings,
    mode: InputMode,
    redactor: Redactor,
}

impl fmt::Debug for ReviewEnhancer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReviewEnhancer")
            .field("settings", &self.settings)
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

impl ReviewEnhancer {
    pub fn new(
        provider: Arc<dyn CompletionProvider>,
        settings: PromptSettings,
        mode: InputMode,
    ) -> Self {
        Self { provider, settings, mode, redactor: Redactor::new() }
    }

    /// Replace the redactor applied to upstream error bodies and messages.
    pub fn with_redactor(mut self, redactor: Redactor) -> Self {
        self.redactor = redactor;
        self
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    pub fn settings(&self) -> &PromptSettings {
        &self.settings
    }

    /// Full request lifecycle.  `method` is the inbound HTTP verb and
    /// `review` the value extracted from the query or body, if any.
    ///
    /// Method and input are checked before the provider is touched.
    pub async fn handle(
        &self,
        method: &str,
        review: Option<&str>,
    ) -> Result<ReviewResponse, EnhanceError> {
        if !self.mode.accepts(method) {
            debug!(%method, expected = self.mode.method(), "rejecting request method");
            return Err(EnhanceError::MethodNotAllowed(self.mode.method_not_allowed_message()));
        }

        let review = match review {
            Some(r) if !r.trim().is_empty() => r,
            _ => return Err(EnhanceError::MissingInput(self.mode.missing_input_message())),
        };

        self.enhance(review).await
    }

    /// One provider call for an already-validated review.
    pub async fn enhance(&self, review: &str) -> Result<ReviewResponse, EnhanceError> {
        let request = self.settings.build_request(review);
        debug!(model = %request.model, review_len = review.len(), "requesting completion");

        let content = self
            .provider
            .complete(&request)
            .await
            .map_err(|e| self.classify(e))?;

        let parsed = parse_completion(&content, self.settings.output_format);
        info!(
            model = %request.model,
            output_len = content.len(),
            "review enhanced"
        );

        Ok(ReviewResponse {
            original: review.to_owned(),
            summary: parsed.summary,
            improved_review: parsed.improved_review,
        })
    }

    fn classify(&self, err: ProviderError) -> EnhanceError {
        match err {
            ProviderError::Status { status, body } => {
                let body = self.redactor.redact(&body);
                error!(status, body = %body, "provider API error");
                EnhanceError::Upstream { status, body }
            }
            ProviderError::InvalidResponse(m) => {
                error!(reason = %m, "invalid provider response");
                EnhanceError::InvalidUpstreamResponse(m)
            }
            ProviderError::Transport(e) => {
                let message = self.redactor.redact(&e.to_string());
                error!(error = %message, "provider request failed");
                EnhanceError::Internal(message)
            }
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
