//! # Lengthwise Engine
//!
//! Turns a [`RewriteRequest`](lengthwise_core::RewriteRequest) into a model
//! call and decides whether the answer fits the requested length.

pub mod orchestrator;
pub mod prompt;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use orchestrator::{EnhanceSettings, EnhancementOrchestrator, split_subject};
pub use prompt::{ModelInstruction, RewriteAction, RewriteRequestBuilder};
