//! Scrubs credentials out of text before it is logged or returned.
//!
//! Provider error bodies are echoed to callers and written to the server log.
//! If a provider ever reflects request headers, the bearer token would travel
//! with them, so every such string passes through [`Redactor::redact`].

use std::sync::LazyLock;

use regex::Regex;

pub const REDACTED: &str = "[REDACTED]";

// Case-sensitive, and the value must look like a token, so prose such as
// "bearer of bad news" is left alone.
static BEARER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bBearer\s+[A-Za-z0-9._~+/=-]{8,}").expect("valid regex"));

static SECRET_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bsk-[A-Za-z0-9_-]{8,}").expect("valid regex"));

#[derive(Debug, Clone, Default)]
pub struct Redactor {
    secrets: Vec<String>,
}

impl Redactor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also mask this exact value wherever it appears.  Blank values are
    /// ignored.
    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        let secret: String = secret.into();
        if !secret.trim().is_empty() {
            self.secrets.push(secret);
        }
        self
    }

    pub fn redact(&self, text: &str) -> String {
        let mut out = text.to_owned();
        for secret in &self.secrets {
            if out.contains(secret.as_str()) {
                out = out.replace(secret.as_str(), REDACTED);
            }
        }
        let out = BEARER.replace_all(&out, format!("Bearer {REDACTED}").as_str());
        SECRET_KEY.replace_all(&out, REDACTED).into_owned()
    }
}
