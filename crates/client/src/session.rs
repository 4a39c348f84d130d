//! Last-request-wins bookkeeping for overlapping rewrites.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identifies one submitted rewrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

/// Hands out increasing tickets; only the newest one may deliver.
#[derive(Debug, Default)]
pub struct RewriteSession {
    latest: AtomicU64,
}

impl RewriteSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a request. Makes every earlier ticket stale.
    pub fn begin(&self) -> Ticket {
        Ticket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }

    /// Keep `value` only if `ticket` is still the newest.
    pub fn accept<T>(&self, ticket: Ticket, value: T) -> Option<T> {
        if self.is_current(ticket) {
            Some(value)
        } else {
            tracing::debug!(ticket = ticket.0, "Discarding stale rewrite response");
            None
        }
    }

    /// Take a ticket, await `fut` and deliver its output only if no newer
    /// request began meanwhile.
    pub async fn submit<T, Fut>(&self, fut: Fut) -> Option<T>
    where
        Fut: Future<Output = T>,
    {
        let ticket = self.begin();
        let value = fut.await;
        self.accept(ticket, value)
    }
}
