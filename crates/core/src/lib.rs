//! # Lengthwise Core
//!
//! Domain types, traits, and error definitions for the Lengthwise
//! length-constrained rewriting service. This crate has **no framework
//! dependencies**: it defines the domain model the other crates build on.
//!
//! The text rules in [`text`] are used verbatim by both the gateway and the
//! client, which is what keeps their word counts in agreement.

pub mod error;
pub mod message;
pub mod provider;
pub mod rewrite;
pub mod text;

// Re-export key types at crate root for ergonomics
pub use error::{FailureReason, ProviderError, RewriteFailure};
pub use message::{Message, Role};
pub use provider::{Provider, ProviderRequest, ProviderResponse, Usage};
pub use rewrite::{DocumentType, LengthPreset, Persona, RewriteRequest, RewriteResult, ToneDescriptor};
pub use text::{count_words, estimate_tokens, normalize_whitespace, sanitize, words_for_height};
