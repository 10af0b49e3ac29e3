//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use review_enhancer::{OpenAiProvider, Redactor, ReviewEnhancer};

use crate::config::Config;

/// State shared across all HTTP handlers.  Immutable after startup.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Server configuration (env-derived).
    pub config: Arc<Config>,
    /// The review pipeline, wired to the configured provider.
    pub enhancer: Arc<ReviewEnhancer>,
}

impl AppState {
    /// Wire the production [`OpenAiProvider`] from `config`.  The configured
    /// key is also handed to the redactor.
    pub fn from_config(config: Config) -> anyhow::Result<Self> {
        let provider = OpenAiProvider::with_timeout(
            config.provider_url.clone(),
            config.api_key.clone(),
            config.upstream_timeout,
        )?;
        let enhancer =
            ReviewEnhancer::new(Arc::new(provider), config.prompt.clone(), config.input_mode)
                .with_redactor(Redactor::new().with_secret(config.api_key.expose()));

        Ok(Self { config: Arc::new(config), enhancer: Arc::new(enhancer) })
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
