//! Provider selection: builds the rewrite backend from config.
//!
//! No credential means no provider: the gateway then reports
//! `aiEnabled: false` and refuses rewrites with 503.

use std::sync::Arc;
use std::time::Duration;
use lengthwise_core::provider::Provider;
use tracing::{info, warn};
use crate::openai_compat::{DEFAULT_TIMEOUT, OpenAiCompatProvider};

/// Build the configured provider, or `None` when no API key is set.
pub fn build_from_config(config: &lengthwise_config::AppConfig) -> Option<Arc<dyn Provider>> {
    build_with_timeout(config, DEFAULT_TIMEOUT)
}

/// Same as [`build_from_config`] with an explicit HTTP timeout.
pub fn build_with_timeout(
    config: &lengthwise_config::AppConfig,
    timeout: Duration,
) -> Option<Arc<dyn Provider>> {
    let Some(api_key) = config.api_key.as_deref() else {
        warn!("No API key configured; AI rewriting is disabled");
        return None;
    };

    let base_url = config
        .api_url
        .clone()
        .unwrap_or_else(|| default_base_url(&config.provider));

    info!(provider = %config.provider, base_url = %base_url, model = %config.model, "Provider initialized");

    Some(Arc::new(OpenAiCompatProvider::with_timeout(
        &config.provider,
        &base_url,
        api_key,
        timeout,
    )))
}

/// Get the default base URL for well-known providers.
pub fn default_base_url(provider_name: &str) -> String {
    match provider_name {
        "openai" => "https://api.openai.com/v1".into(),
        "openrouter" => "https://openrouter.ai/api/v1".into(),
        "ollama" => "http://localhost:11434/v1".into(),
        "deepseek" => "https://api.deepseek.com/v1".into(),
        "groq" => "https://api.groq.com/openai/v1".into(),
        "together" => "https://api.together.xyz/v1".into(),
        "fireworks" => "https://api.fireworks.ai/inference/v1".into(),
        "vllm" => "http://localhost:8000/v1".into(),
        "llamacpp" | "llama.cpp" => "http://localhost:8080/v1".into(),
        _ => format!("https://{provider_name}.api.example.com/v1"),
    }
}
