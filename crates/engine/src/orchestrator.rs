//! The rewrite pipeline: validate, budget, call the model, accept or reject.

use std::sync::Arc;

use lengthwise_config::AppConfig;
use lengthwise_core::error::RewriteFailure;
use lengthwise_core::provider::{Provider, ProviderRequest};
use lengthwise_core::rewrite::{RewriteRequest, RewriteResult};
use lengthwise_core::text::{self, TOKENS_PER_WORD_TENTHS};
use tracing::{debug, info, warn};

use crate::prompt::RewriteRequestBuilder;

/// Output budget per target word, in tenths (1.3 tokens/word, doubled).
const OUTPUT_TOKENS_PER_WORD_TENTHS: u64 = TOKENS_PER_WORD_TENTHS * 2;

/// Sampling and budget settings for every rewrite call.
#[derive(Debug, Clone, PartialEq)]
pub struct EnhanceSettings {
    pub model: String,
    pub temperature: f32,
    pub penalty: f32,
    pub max_input_tokens: u32,
    pub max_output_tokens: u32,
    pub tolerance_percent: u32,
}

impl Default for EnhanceSettings {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

impl EnhanceSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            model: config.model.clone(),
            temperature: config.limits.temperature,
            penalty: config.limits.penalty,
            max_input_tokens: config.limits.max_input_tokens,
            max_output_tokens: config.limits.max_output_tokens,
            tolerance_percent: config.limits.tolerance_percent,
        }
    }

    /// `min(max_output_tokens, ceil(target * 2.6))`.
    pub fn max_tokens_for(&self, target_words: u32) -> u32 {
        let budget = text::ceil_tenths(u64::from(target_words), OUTPUT_TOKENS_PER_WORD_TENTHS);
        u32::try_from(budget)
            .unwrap_or(u32::MAX)
            .min(self.max_output_tokens)
    }

    /// Largest accepted body length: `ceil(target * (100 + tolerance) / 100)`.
    pub fn max_allowed_words(&self, target_words: u32) -> usize {
        let scaled = u64::from(target_words) * (100 + u64::from(self.tolerance_percent));
        usize::try_from(scaled.div_ceil(100)).unwrap_or(usize::MAX)
    }
}

/// Runs one length-constrained rewrite per call.
///
/// Holds no mutable state; share it behind an `Arc`.
pub struct EnhancementOrchestrator {
    provider: Option<Arc<dyn Provider>>,
    settings: EnhanceSettings,
}

impl EnhancementOrchestrator {
    pub fn new(provider: Option<Arc<dyn Provider>>, settings: EnhanceSettings) -> Self {
        Self { provider, settings }
    }

    /// Whether a model backend is configured.
    pub fn is_available(&self) -> bool {
        self.provider.is_some()
    }

    pub fn settings(&self) -> &EnhanceSettings {
        &self.settings
    }

    pub async fn enhance(&self, request: &RewriteRequest) -> Result<RewriteResult, RewriteFailure> {
        let Some(provider) = self.provider.as_ref() else {
            return Err(RewriteFailure::unavailable());
        };

        if request.content.trim().is_empty() {
            return Err(RewriteFailure::empty_content());
        }

        let target = request.target_words;
        if target < 1 {
            return Err(RewriteFailure::invalid_target());
        }

        let input_tokens = text::estimate_tokens(&request.content);
        if input_tokens > u64::from(self.settings.max_input_tokens) {
            warn!(input_tokens, max = self.settings.max_input_tokens, "Rewrite input over budget");
            return Err(RewriteFailure::input_too_long(self.settings.max_input_tokens));
        }

        let max_tokens = self.settings.max_tokens_for(target);
        let provider_request = ProviderRequest {
            model: self.settings.model.clone(),
            messages: RewriteRequestBuilder::build(request).into_messages(),
            temperature: self.settings.temperature,
            max_tokens: Some(max_tokens),
            presence_penalty: Some(self.settings.penalty),
            frequency_penalty: Some(self.settings.penalty),
        };

        debug!(
            provider = provider.name(),
            target,
            input_tokens,
            max_tokens,
            document_type = request.document_type.as_str(),
            "Requesting rewrite"
        );

        let response = provider.complete(provider_request).await.map_err(|e| {
            warn!(provider = provider.name(), error = %e, "Provider call failed");
            RewriteFailure::from(e)
        })?;

        let raw = response.message.content.trim();
        if raw.is_empty() {
            warn!("Provider returned no content");
            return Err(RewriteFailure::model_error("No content received from AI"));
        }

        let (subject, body) = if request.document_type.is_email() {
            split_subject(raw)
        } else {
            (None, raw)
        };

        let body = text::sanitize(body);
        let word_count = text::count_words(&body);
        let max_allowed = self.settings.max_allowed_words(target);

        if word_count > max_allowed {
            warn!(word_count, target, max_allowed, "Rewrite rejected as too long");
            return Err(RewriteFailure::too_long_output(word_count, body).with_subject(subject));
        }

        info!(word_count, target, has_subject = subject.is_some(), "Rewrite accepted");

        Ok(RewriteResult {
            body,
            subject,
            word_count,
        })
    }
}

/// Split `Subject: <line>\n<body>` into its parts.
///
/// Text without the prefix, or without a line break after it, is all body.
pub fn split_subject(text: &str) -> (Option<String>, &str) {
    let Some(rest) = text.strip_prefix("Subject:") else {
        return (None, text);
    };
    match rest.split_once('\n') {
        Some((subject, body)) => (Some(subject.trim().to_string()), body.trim()),
        None => (None, text),
    }
}
