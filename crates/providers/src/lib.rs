//! LLM Provider implementations for Lengthwise.
//!
//! All providers implement the `lengthwise_core::Provider` trait.
//! The router builds the configured one.

pub mod openai_compat;
pub mod router;

pub use openai_compat::OpenAiCompatProvider;
pub use router::build_from_config;
