//! HTTP client for a running gateway.
//!
//! Every rewrite is preceded by a health probe with its own short timeout.
//! A failed probe returns [`ClientError::Unreachable`] and the rewrite call
//! is never issued.

use std::time::Duration;

use lengthwise_config::ClientConfig;
use lengthwise_core::rewrite::RewriteRequest;
use lengthwise_core::text;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ClientError;
use crate::retry::RetryPolicy;

/// Body of `GET /api/health`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: String,
    #[serde(default)]
    pub ai_enabled: bool,
}

/// An accepted rewrite as the caller sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enhanced {
    /// Sanitized body text.
    pub content: String,
    pub subject: Option<String>,
    /// Recounted locally from `content`.
    pub word_count: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EnhancePayload<'a> {
    content: &'a str,
    tone: &'a str,
    target_words: u32,
    input_type: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EnhanceReply {
    enhanced_content: String,
    #[serde(default)]
    subject: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorReply {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    enhanced_content: Option<String>,
    #[serde(default)]
    subject: Option<String>,
}

pub struct EnhanceClient {
    base_url: String,
    http: reqwest::Client,
    health_timeout: Duration,
    enhance_timeout: Duration,
}

impl EnhanceClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let defaults = ClientConfig::default();
        Self {
            base_url: base_url.into().trim().trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
            health_timeout: Duration::from_secs(defaults.health_timeout_secs),
            enhance_timeout: Duration::from_secs(defaults.enhance_timeout_secs),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(&config.backend_url).with_timeouts(
            Duration::from_secs(config.health_timeout_secs),
            Duration::from_secs(config.enhance_timeout_secs),
        )
    }

    pub fn with_timeouts(mut self, health: Duration, enhance: Duration) -> Self {
        self.health_timeout = health;
        self.enhance_timeout = enhance;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<String, ClientError> {
        if self.base_url.is_empty() {
            return Err(ClientError::NotConfigured);
        }
        Ok(format!("{}{path}", self.base_url))
    }

    /// Probe `GET /api/health`. Any failure maps to `Unreachable`.
    pub async fn health(&self) -> Result<HealthStatus, ClientError> {
        let url = self.endpoint("/api/health")?;
        let response = self
            .http
            .get(&url)
            .timeout(self.health_timeout)
            .send()
            .await
            .map_err(|e| ClientError::Unreachable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ClientError::Unreachable(format!(
                "health check returned {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::Unreachable(e.to_string()))
    }

    /// Health probe, then one rewrite call.
    pub async fn enhance(&self, request: &RewriteRequest) -> Result<Enhanced, ClientError> {
        let url = self.endpoint("/api/enhance")?;
        self.health().await?;

        let payload = EnhancePayload {
            content: &request.content,
            tone: request.tone.as_str(),
            target_words: request.target_words,
            input_type: request.document_type.as_str(),
        };
        debug!(url = %url, target = request.target_words, "Sending rewrite");

        let response = self
            .http
            .post(&url)
            .timeout(self.enhance_timeout)
            .json(&payload)
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        if !status.is_success() {
            let reply: ErrorReply = serde_json::from_slice(&bytes).unwrap_or(ErrorReply {
                error: None,
                enhanced_content: None,
                subject: None,
            });
            return Err(ClientError::Rejected {
                status: status.as_u16(),
                message: reply
                    .error
                    .unwrap_or_else(|| "Failed to enhance content".into()),
                draft: reply.enhanced_content.map(|d| text::sanitize(&d)),
                subject: reply.subject,
            });
        }

        let reply: EnhanceReply =
            serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(e.to_string()))?;

        let content = text::sanitize(&reply.enhanced_content);
        let word_count = text::count_words(&content);
        info!(word_count, target = request.target_words, "Rewrite received");

        Ok(Enhanced {
            content,
            subject: reply.subject,
            word_count,
        })
    }

    /// [`enhance`](Self::enhance) under `policy`.
    pub async fn enhance_with_retry(
        &self,
        request: &RewriteRequest,
        policy: &RetryPolicy,
    ) -> Result<Enhanced, ClientError> {
        policy.run(|_| self.enhance(request)).await
    }
}
