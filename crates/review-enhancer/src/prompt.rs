//! Prompt text and sampling settings for the outbound completion request.

use std::str::FromStr;

use crate::types::{ChatMessage, CompletionRequest, ResponseFormat};

/// System instruction for the default free-text output.
pub const SYSTEM_PROMPT: &str = "You are a helpful assistant that summarizes and improves \
    customer reviews. Always return:\n\
    1. A short summary (one sentence).\n\
    2. An improved, natural-sounding review.";

/// System instruction used when the provider is asked for a JSON object.
pub const STRUCTURED_SYSTEM_PROMPT: &str = "You are a helpful assistant that summarizes and \
    improves customer reviews. Always answer with a JSON object that has exactly two string \
    fields:\n\
    \"summary\": a short summary (one sentence).\n\
    \"improvedReview\": an improved, natural-sounding review.";

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_MAX_TOKENS: u32 = 250;
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

/// How the provider is asked to shape its reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Summary on the first line, rewrite on the following lines.
    #[default]
    Lines,
    /// `{"summary": …, "improvedReview": …}`, falling back to [`Lines`](Self::Lines)
    /// parsing when the reply does not validate.
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lines" | "text" => Ok(Self::Lines),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown output format '{other}' (expected 'lines' or 'json')")),
        }
    }
}

/// Model selection and sampling parameters, fixed for the process lifetime.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptSettings {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
    pub output_format: OutputFormat,
}

impl Default for PromptSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_owned(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            output_format: OutputFormat::default(),
        }
    }
}

impl PromptSettings {
    /// Build a fresh two-message completion request embedding `review`.
    pub fn build_request(&self, review: &str) -> CompletionRequest {
        let (system, response_format) = match self.output_format {
            OutputFormat::Lines => (SYSTEM_PROMPT, None),
            OutputFormat::Json => (STRUCTURED_SYSTEM_PROMPT, Some(ResponseFormat::json_object())),
        };

        CompletionRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage::system(system), ChatMessage::user(user_message(review))],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            response_format,
        }
    }
}

/// The user turn: the review is quoted verbatim, untrimmed.
pub fn user_message(review: &str) -> String {
    format!("Summarize and improve this review:\n\n\"{review}\"")
}

// ── Tests ──────────────────────────────────────────────────────────────────────
