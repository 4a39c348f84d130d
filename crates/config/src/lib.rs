//! Configuration loading, validation, and management for Lengthwise.
//!
//! Loads configuration from `~/.lengthwise/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use lengthwise_core::Persona;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.lengthwise/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Upstream model credential. Absent = rewriting disabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Provider name, used to pick a default base URL
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Override for the provider's base URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    /// Chat model used for rewrites
    #[serde(default = "default_model")]
    pub model: String,

    /// Gateway configuration
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Token ceilings and sampling settings
    #[serde(default)]
    pub limits: LimitsConfig,

    /// Settings for the calling side
    #[serde(default)]
    pub client: ClientConfig,

    /// Persona folded into the tone descriptor
    #[serde(default)]
    pub persona: Persona,
}

fn default_provider() -> String {
    "openai".into()
}
fn default_model() -> String {
    "gpt-3.5-turbo".into()
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("provider", &self.provider)
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("gateway", &self.gateway)
            .field("limits", &self.limits)
            .field("client", &self.client)
            .field("persona", &self.persona)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    /// Browser origins allowed by CORS
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

fn default_port() -> u16 {
    3000
}
fn default_host() -> String {
    "0.0.0.0".into()
}
fn default_allowed_origins() -> Vec<String> {
    vec![
        "http://localhost:5173".into(),
        "http://localhost:3000".into(),
    ]
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
            allowed_origins: default_allowed_origins(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Estimated input tokens above which a request is refused
    #[serde(default = "default_max_input_tokens")]
    pub max_input_tokens: u32,

    /// Hard ceiling on generated tokens
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Allowed overshoot of the target, in percent
    #[serde(default = "default_tolerance_percent")]
    pub tolerance_percent: u32,

    /// Presence and frequency penalty sent with every request
    #[serde(default = "default_penalty")]
    pub penalty: f32,
}

fn default_max_input_tokens() -> u32 {
    10_000
}
fn default_max_output_tokens() -> u32 {
    1_000
}
fn default_temperature() -> f32 {
    0.7
}
fn default_tolerance_percent() -> u32 {
    10
}
fn default_penalty() -> f32 {
    0.1
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_input_tokens: default_max_input_tokens(),
            max_output_tokens: default_max_output_tokens(),
            temperature: default_temperature(),
            tolerance_percent: default_tolerance_percent(),
            penalty: default_penalty(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of a running gateway
    #[serde(default = "default_backend_url")]
    pub backend_url: String,

    #[serde(default = "default_health_timeout")]
    pub health_timeout_secs: u64,

    #[serde(default = "default_enhance_timeout")]
    pub enhance_timeout_secs: u64,

    /// Quiet period before a resize fires a rewrite
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Attempts per rewrite when the output comes back too long
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

fn default_backend_url() -> String {
    "http://localhost:3000".into()
}
fn default_health_timeout() -> u64 {
    5
}
fn default_enhance_timeout() -> u64 {
    60
}
fn default_debounce_ms() -> u64 {
    300
}
fn default_max_attempts() -> u32 {
    3
}
fn default_retry_backoff_ms() -> u64 {
    500
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            backend_url: default_backend_url(),
            health_timeout_secs: default_health_timeout(),
            enhance_timeout_secs: default_enhance_timeout(),
            debounce_ms: default_debounce_ms(),
            max_attempts: default_max_attempts(),
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.lengthwise/config.toml).
    ///
    /// Environment variables override the file:
    /// - `LENGTHWISE_API_KEY` (highest priority), then `OPENAI_API_KEY`
    /// - `LENGTHWISE_MODEL`, `LENGTHWISE_API_URL`
    /// - `PORT`, `FRONTEND_URL`
    /// - `LENGTHWISE_BACKEND_URL`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides using `lookup` to read variables.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if self.api_key.is_none() {
            self.api_key = lookup("LENGTHWISE_API_KEY").or_else(|| lookup("OPENAI_API_KEY"));
        }
        if let Some(model) = lookup("LENGTHWISE_MODEL") {
            self.model = model;
        }
        if let Some(url) = lookup("LENGTHWISE_API_URL") {
            self.api_url = Some(url);
        }
        if let Some(port) = lookup("PORT") {
            match port.parse() {
                Ok(port) => self.gateway.port = port,
                Err(_) => tracing::warn!(port = %port, "Ignoring unparseable PORT"),
            }
        }
        if let Some(origin) = lookup("FRONTEND_URL") {
            if !self.gateway.allowed_origins.contains(&origin) {
                self.gateway.allowed_origins.push(origin);
            }
        }
        if let Some(url) = lookup("LENGTHWISE_BACKEND_URL") {
            self.client.backend_url = url;
        }
        // Blank keys are as good as none.
        if self.api_key.as_deref().is_some_and(|k| k.trim().is_empty()) {
            self.api_key = None;
        }
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".lengthwise")
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.limits.temperature) {
            return Err(ConfigError::ValidationError(
                "limits.temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.limits.max_input_tokens == 0 || self.limits.max_output_tokens == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_input_tokens and limits.max_output_tokens must be > 0".into(),
            ));
        }

        if self.client.max_attempts == 0 {
            return Err(ConfigError::ValidationError(
                "client.max_attempts must be at least 1".into(),
            ));
        }

        Ok(())
    }

    /// Check if an API key is available (from config or environment).
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Generate a default config TOML string.
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            provider: default_provider(),
            api_url: None,
            model: default_model(),
            gateway: GatewayConfig::default(),
            limits: LimitsConfig::default(),
            client: ClientConfig::default(),
            persona: Persona::default(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
