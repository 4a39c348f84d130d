//! Error types for the Lengthwise domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! `ProviderError` covers the upstream model backend; `RewriteFailure`
//! is the structured result every rewrite failure is surfaced as.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),
}

/// Why a rewrite was refused or failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// No language-model backend is configured.
    Unavailable,
    /// Content was empty after trimming.
    EmptyContent,
    /// Target word count below 1.
    InvalidTarget,
    /// Estimated input tokens above the configured ceiling.
    InputTooLong,
    /// The model returned nothing usable.
    ModelError,
    /// The upstream rejected our credential.
    UpstreamAuth,
    /// The upstream rate-limited us.
    RateLimited,
    /// The body exceeded the tolerance window. Recoverable by retrying.
    TooLongOutput,
    /// Anything else.
    Unknown,
}

impl FailureReason {
    /// HTTP status the gateway answers with for this reason.
    pub fn http_status(self) -> u16 {
        match self {
            Self::Unavailable => 503,
            Self::EmptyContent | Self::InvalidTarget | Self::InputTooLong | Self::TooLongOutput => {
                400
            }
            Self::UpstreamAuth => 401,
            Self::RateLimited => 429,
            Self::ModelError | Self::Unknown => 500,
        }
    }
}

/// A structured rewrite failure.
///
/// `draft` is only populated for [`FailureReason::TooLongOutput`], so the
/// caller can show the rejected attempt without another round trip. An
/// email draft keeps its subject line in `subject`.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct RewriteFailure {
    pub reason: FailureReason,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub draft: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
}

impl RewriteFailure {
    pub fn new(reason: FailureReason, message: impl Into<String>) -> Self {
        Self {
            reason,
            message: message.into(),
            draft: None,
            subject: None,
        }
    }

    pub fn unavailable() -> Self {
        Self::new(
            FailureReason::Unavailable,
            "AI enhancement is currently unavailable. Please check the server configuration.",
        )
    }

    pub fn empty_content() -> Self {
        Self::new(FailureReason::EmptyContent, "Content is required")
    }

    pub fn invalid_target() -> Self {
        Self::new(FailureReason::InvalidTarget, "Invalid target word count")
    }

    pub fn input_too_long(max_input_tokens: u32) -> Self {
        Self::new(
            FailureReason::InputTooLong,
            format!("Input too long. Maximum {max_input_tokens} tokens allowed."),
        )
    }

    pub fn model_error(message: impl Into<String>) -> Self {
        Self::new(FailureReason::ModelError, message)
    }

    pub fn too_long_output(word_count: usize, draft: impl Into<String>) -> Self {
        Self {
            reason: FailureReason::TooLongOutput,
            message: format!(
                "Response too long ({word_count} words). Please try again for a shorter version."
            ),
            draft: Some(draft.into()),
            subject: None,
        }
    }

    /// Attach the subject line of a rejected email draft.
    pub fn with_subject(mut self, subject: Option<String>) -> Self {
        self.subject = subject;
        self
    }
}

impl From<ProviderError> for RewriteFailure {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::AuthenticationFailed(_) => Self::new(
                FailureReason::UpstreamAuth,
                "Invalid API key. Please check your API key configuration.",
            ),
            ProviderError::RateLimited { .. } => Self::new(
                FailureReason::RateLimited,
                "Rate limit exceeded. Please try again in a moment.",
            ),
            ProviderError::NotConfigured(_) => Self::unavailable(),
            other => Self::new(FailureReason::Unknown, other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_displays_correctly() {
        let err = RewriteFailure::from(ProviderError::ApiError {
            status_code: 429,
            message: "Too many requests".into(),
        });
        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("Too many requests"));
    }

    #[test]
    fn status_codes_follow_reason() {
        assert_eq!(FailureReason::Unavailable.http_status(), 503);
        assert_eq!(FailureReason::InvalidTarget.http_status(), 400);
        assert_eq!(FailureReason::TooLongOutput.http_status(), 400);
        assert_eq!(FailureReason::UpstreamAuth.http_status(), 401);
        assert_eq!(FailureReason::RateLimited.http_status(), 429);
        assert_eq!(FailureReason::ModelError.http_status(), 500);
    }

    #[test]
    fn provider_errors_map_to_reasons() {
        let auth: RewriteFailure = ProviderError::AuthenticationFailed("bad key".into()).into();
        assert_eq!(auth.reason, FailureReason::UpstreamAuth);

        let limited: RewriteFailure = ProviderError::RateLimited {
            retry_after_secs: 5,
        }
        .into();
        assert_eq!(limited.reason, FailureReason::RateLimited);

        let network: RewriteFailure = ProviderError::Network("connection reset".into()).into();
        assert_eq!(network.reason, FailureReason::Unknown);
        assert!(network.message.contains("connection reset"));
    }

    #[test]
    fn only_too_long_output_carries_a_draft() {
        let failure = RewriteFailure::too_long_output(70, "draft text");
        assert_eq!(failure.draft.as_deref(), Some("draft text"));
        assert!(failure.message.contains("70 words"));
        assert!(RewriteFailure::invalid_target().draft.is_none());
    }

    #[test]
    fn too_long_draft_keeps_subject() {
        let failure = RewriteFailure::too_long_output(70, "body").with_subject(Some("Hi".into()));
        assert_eq!(failure.subject.as_deref(), Some("Hi"));
        assert!(RewriteFailure::too_long_output(70, "body").subject.is_none());

        let json = serde_json::to_value(&failure).unwrap();
        assert_eq!(json["subject"], "Hi");
        assert_eq!(json["reason"], "too_long_output");
    }
}
