use thiserror::Error;

/// Errors returned by a [`CompletionProvider`](crate::CompletionProvider).
///
/// Display strings never include the upstream body: it may reflect request
/// headers back and has to go through a [`Redactor`](crate::Redactor) first.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The request never produced an HTTP response (DNS, connect, timeout…).
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The provider answered with a non-2xx status.
    #[error("provider returned error status {status}")]
    Status { status: u16, body: String },

    /// 2xx, but the body did not carry usable completion text.
    #[error("invalid provider response: {0}")]
    InvalidResponse(String),
}

/// Terminal outcome of a single review request.  None of these are retried.
#[derive(Debug, Error)]
pub enum EnhanceError {
    /// The request used the verb the configured contract does not accept.
    #[error("{0}")]
    MethodNotAllowed(&'static str),

    /// The review was absent or blank after trimming.
    #[error("{0}")]
    MissingInput(&'static str),

    /// The provider answered with a non-2xx status.  `body` is already
    /// redacted.
    #[error("provider returned error status {status}")]
    Upstream { status: u16, body: String },

    /// The provider answered 2xx without usable completion text.
    #[error("invalid provider response: {0}")]
    InvalidUpstreamResponse(String),

    /// Anything else, including network failures.  The message is redacted.
    #[error("internal error: {0}")]
    Internal(String),
}
