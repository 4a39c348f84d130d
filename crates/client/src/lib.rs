//! # Lengthwise Client
//!
//! Caller side of the gateway: the HTTP client, bounded retry for too-long
//! rewrites, resize debouncing and last-request-wins sessions.

pub mod client;
pub mod debounce;
pub mod error;
pub mod retry;
pub mod session;

pub use client::{EnhanceClient, Enhanced, HealthStatus};
pub use debounce::ResizeDebouncer;
pub use error::ClientError;
pub use retry::RetryPolicy;
pub use session::{RewriteSession, Ticket};
