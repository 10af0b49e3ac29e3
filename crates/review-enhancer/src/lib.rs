//! review-enhancer – turns a raw customer review into a one-sentence summary
//! and an improved rewrite by asking an OpenAI-compatible chat-completion
//! provider.
//!
//! The crate is transport-agnostic on the inbound side: an HTTP server hands
//! the request method and the extracted review text to
//! [`ReviewEnhancer::handle`] and renders the [`EnhanceError`] it may get
//! back.  The outbound side sits behind the [`CompletionProvider`] trait so a
//! fake provider can be injected in tests.

pub mod enhancer;
pub mod error;
pub mod parse;
pub mod prompt;
pub mod provider;
pub mod redact;
pub mod types;

pub use enhancer::{InputMode, ReviewEnhancer};
pub use error::{EnhanceError, ProviderError};
pub use parse::{NO_IMPROVED_REVIEW, NO_SUMMARY, ParsedReview};
pub use prompt::{OutputFormat, PromptSettings};
pub use provider::{ApiKey, CompletionProvider, OpenAiProvider};
pub use redact::Redactor;
pub use types::{ChatMessage, CompletionRequest, ReviewResponse};
