//! Admission gate for catalog requests.
//!
//! This is a polling gate, not a token bucket. Each admitted request bumps a
//! counter that a detached task decrements one window later. Callers that
//! find the counter at the limit poll until it drops below the limit and are
//! then let through without being counted themselves. Blocked callers are not
//! queued, so a herd released at the same moment can briefly exceed the limit.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use tokio::time::{sleep, Duration};
use tracing::debug;

/// Length of the counting window.
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(60);

/// How often a blocked caller re-checks the counter.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Per-client request counter with a rolling one-minute release.
#[derive(Debug, Clone)]
pub struct RequestGate {
    requests: Arc<AtomicU32>,
    limit: u32,
    window: Duration,
    poll_interval: Duration,
}

impl RequestGate {
    /// Create a gate admitting `limit` counted requests per minute.
    pub fn new(limit: u32) -> Self {
        Self::with_timing(limit, DEFAULT_WINDOW, DEFAULT_POLL_INTERVAL)
    }

    /// Create a gate with a custom window and poll interval.
    pub fn with_timing(limit: u32, window: Duration, poll_interval: Duration) -> Self {
        Self {
            requests: Arc::new(AtomicU32::new(0)),
            limit,
            window,
            poll_interval,
        }
    }

    /// Configured requests per window.
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Requests counted in the current window.
    pub fn requests(&self) -> u32 {
        self.requests.load(Ordering::SeqCst)
    }

    /// Wait until the caller may send a request.
    ///
    /// Must be called from within a Tokio runtime: the delayed decrement is a
    /// spawned task.
    pub async fn admit(&self) {
        let limit = self.limit;
        let counted = self
            .requests
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| {
                (n < limit).then_some(n + 1)
            })
            .is_ok();

        if counted {
            let requests = Arc::clone(&self.requests);
            let window = self.window;
            tokio::spawn(async move {
                sleep(window).await;
                requests.fetch_sub(1, Ordering::SeqCst);
            });
            return;
        }

        debug!(limit = limit, "Catalog request gate full, waiting");
        while self.requests() >= limit {
            sleep(self.poll_interval).await;
        }
    }
}
