//! Bounded retry for rewrites that come back too long.

use std::future::Future;
use std::time::Duration;

use lengthwise_config::ClientConfig;
use tracing::{debug, warn};

use crate::error::ClientError;

/// Fixed-backoff retry limited to too-long rejections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Never below 1.
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&ClientConfig::default())
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.max_attempts, Duration::from_millis(config.retry_backoff_ms))
    }

    /// A policy that never retries.
    pub fn once() -> Self {
        Self::new(1, Duration::ZERO)
    }

    /// Run `op` until it succeeds, fails for a reason other than a too-long
    /// draft, or the attempts run out. `op` receives the 1-based attempt.
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T, ClientError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, ClientError>>,
    {
        let mut attempt = 1;
        loop {
            match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_too_long() && attempt < self.max_attempts => {
                    warn!(attempt, max_attempts = self.max_attempts, "Rewrite too long, retrying");
                    tokio::time::sleep(self.backoff).await;
                    attempt += 1;
                }
                Err(err) => {
                    debug!(attempt, error = %err, "Giving up on rewrite");
                    return Err(err);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn too_long() -> ClientError {
        ClientError::Rejected {
            status: 400,
            message: "Response too long (80 words).".into(),
            draft: Some("draft".into()),
            subject: None,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn stops_after_max_attempts() {
        let calls = Arc::new(AtomicU32::new(0));
        let policy = RetryPolicy::new(3, Duration::from_millis(500));

        let counter = calls.clone();
        let result: Result<(), _> = policy
            .run(|_| {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Err(too_long())
                }
            })
            .await;

        assert!(result.unwrap_err().is_too_long());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn succeeds_on_later_attempt() {
        let policy = RetryPolicy::new(3, Duration::from_millis(500));
        let start = tokio::time::Instant::now();

        let result = policy
            .run(|attempt| async move {
                if attempt < 2 { Err(too_long()) } else { Ok(attempt) }
            })
            .await;

        assert_eq!(result.unwrap(), 2);
        assert!(start.elapsed() >= Duration::from_millis(500));
    }

    #[tokio::test]
    async fn other_failures_are_not_retried() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let result: Result<(), _> = RetryPolicy::default()
            .run(|_| {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Err(ClientError::Rejected {
                        status: 429,
                        message: "Rate limit exceeded.".into(),
                        draft: None,
                        subject: None,
                    })
                }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn attempts_never_drop_below_one() {
        assert_eq!(RetryPolicy::new(0, Duration::ZERO).max_attempts, 1);
        assert_eq!(RetryPolicy::default().max_attempts, 3);
        assert_eq!(RetryPolicy::default().backoff, Duration::from_millis(500));
    }
}
