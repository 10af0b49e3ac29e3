//! Wire types for the outbound chat-completion call and the inbound review
//! response.
//!
//! The outbound structures follow the OpenAI chat-completion REST shape so
//! any compatible provider (OpenAI, Groq, a local gateway) can be targeted by
//! changing only the base URL.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ── Chat Completions ─────────────────────────────────────────────────────────

/// A single message in the outbound conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// The role of the message author (`"system"` or `"user"`).
    pub role: String,
    /// The content of the message.
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: "system".into(), content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: "user".into(), content: content.into() }
    }
}

/// Asks the provider for a JSON object instead of free text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseFormat {
    #[serde(rename = "type")]
    pub kind: String,
}

impl ResponseFormat {
    pub fn json_object() -> Self {
        Self { kind: "json_object".into() }
    }
}

/// Request body for `POST {base_url}/chat/completions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Provider model identifier, e.g. `gpt-4o-mini`.
    pub model: String,
    /// System instruction followed by the user message.
    pub messages: Vec<ChatMessage>,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub response_format: Option<ResponseFormat>,
}

/// The subset of a chat-completion response this crate reads.
///
/// Everything is optional so that a structurally odd but valid JSON body is
/// reported as "no content" rather than a decode error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompletionResponse {
    #[serde(default)]
    pub choices: Vec<CompletionChoice>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompletionChoice {
    #[serde(default)]
    pub message: Option<CompletionMessage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompletionMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl CompletionResponse {
    /// Trimmed `choices[0].message.content`, or `None` when absent or blank.
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .first()?
            .message
            .as_ref()?
            .content
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }
}

// ── Review response ──────────────────────────────────────────────────────────

/// Successful result of one review request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponse {
    /// The review exactly as received.
    pub original: String,
    /// One-sentence summary, or `"No summary generated."`.
    pub summary: String,
    /// Rewritten review, or `"No improved review generated."`.
    pub improved_review: String,
}
