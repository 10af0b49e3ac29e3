//! Server configuration, loaded from environment variables at startup.

use std::time::Duration;

use anyhow::{Context, bail};
use review_enhancer::prompt::{DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_TEMPERATURE};
use review_enhancer::provider::DEFAULT_BASE_URL;
use review_enhancer::{ApiKey, InputMode, OutputFormat, PromptSettings};

/// Runtime configuration for review-server.
///
/// Every field except the provider credential has a default, so a bare
/// `API_KEY=… review-server` serves the GET contract on port 3000.
#[derive(Debug, Clone)]
pub struct Config {
    /// TCP address to bind (default: `"0.0.0.0:3000"`).
    pub bind_address: String,

    /// `tracing` filter string, e.g. `"info"` or `"debug,tower_http=warn"`.
    pub log_level: String,

    /// When `true`, emit log records as newline-delimited JSON.
    pub log_json: bool,

    /// Comma-separated CORS origins; `None` allows any origin.
    pub cors_allowed_origins: Option<String>,

    /// Serve the OpenAPI document at `/api-docs/openapi.json`.
    pub enable_docs: bool,

    /// Inbound contract: `GET ?review=` or `POST {"review"}`.
    pub input_mode: InputMode,

    /// Forward upstream status and error body to callers.  When `false`,
    /// every upstream or internal failure is a bare 500.
    pub error_details: bool,

    /// Base URL of the OpenAI-compatible provider.
    pub provider_url: String,

    /// Model, sampling and output-shape settings for the outbound call.
    pub prompt: PromptSettings,

    /// Client-side timeout for the provider call; `None` leaves it to the
    /// transport.
    pub upstream_timeout: Option<Duration>,

    /// Provider bearer credential.
    pub api_key: ApiKey,
}

impl Config {
    /// Build [`Config`] from the process environment.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build [`Config`] from an arbitrary key lookup.  Fails when `API_KEY` is
    /// missing or blank, or when a set value does not parse.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let env_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_owned());
        let flag = |key: &str, default: bool| {
            lookup(key)
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(default)
        };

        let input_mode = env_or("REVIEW_INPUT_MODE", "query")
            .parse::<InputMode>()
            .map_err(anyhow::Error::msg)
            .context("REVIEW_INPUT_MODE")?;
        let output_format = env_or("REVIEW_OUTPUT_FORMAT", "lines")
            .parse::<OutputFormat>()
            .map_err(anyhow::Error::msg)
            .context("REVIEW_OUTPUT_FORMAT")?;

        let max_tokens: u32 = parse_or(&lookup, "REVIEW_MAX_TOKENS", DEFAULT_MAX_TOKENS)?;
        if max_tokens == 0 {
            bail!("REVIEW_MAX_TOKENS must be greater than 0");
        }
        let temperature: f64 = parse_or(&lookup, "REVIEW_TEMPERATURE", DEFAULT_TEMPERATURE)?;
        if !(0.0..=2.0).contains(&temperature) {
            bail!("REVIEW_TEMPERATURE ({temperature}) must be between 0.0 and 2.0");
        }

        let upstream_timeout = match lookup("REVIEW_UPSTREAM_TIMEOUT_SECS") {
            Some(v) => {
                let secs: u64 = v.trim().parse().context("REVIEW_UPSTREAM_TIMEOUT_SECS")?;
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        let api_key = lookup("API_KEY")
            .and_then(ApiKey::new)
            .context("API_KEY must be set to the provider credential")?;

        Ok(Self {
            bind_address: env_or("REVIEW_BIND", "0.0.0.0:3000"),
            log_level: env_or("REVIEW_LOG", "info"),
            log_json: flag("REVIEW_LOG_JSON", false),
            cors_allowed_origins: lookup("REVIEW_CORS_ORIGINS"),
            enable_docs: flag("REVIEW_ENABLE_DOCS", true),
            input_mode,
            error_details: flag("REVIEW_ERROR_DETAILS", true),
            provider_url: env_or("REVIEW_PROVIDER_URL", DEFAULT_BASE_URL),
            prompt: PromptSettings {
                model: env_or("REVIEW_MODEL", DEFAULT_MODEL),
                max_tokens,
                temperature,
                output_format,
            },
            upstream_timeout,
            api_key,
        })
    }
}

// ── private helpers ──────────────────────────────────────────────────────────

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(v) => v.trim().parse().with_context(|| format!("{key}='{v}' is not valid")),
        None => Ok(default),
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
