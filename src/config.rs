use anyhow::{Context, Result};
use std::env;

/// Runtime configuration, injected from the environment (or a .env file).
/// The API key is never embedded in source.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub model: String,
    pub request_timeout_secs: u64,
    pub retry_transient: bool,
    pub lenient_classify: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let api_key = env::var("GEMINI_API_KEY")
            .context("GEMINI_API_KEY must be set (environment or .env file)")?;

        let model = env::var("GEMINI_MODEL").unwrap_or_else(|_| "gemini-2.0-flash".to_string());

        let request_timeout_secs = env::var("REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30);

        Ok(Self {
            api_key,
            model,
            request_timeout_secs,
            retry_transient: env_flag("RETRY_TRANSIENT"),
            lenient_classify: env_flag("LENIENT_CLASSIFY"),
        })
    }
}

fn env_flag(name: &str) -> bool {
    matches!(
        env::var(name).ok().as_deref(),
        Some("1") | Some("true") | Some("yes")
    )
}
