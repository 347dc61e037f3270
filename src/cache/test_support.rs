//! In-memory upstream used by the cache tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::anyhow;
use async_trait::async_trait;
use serde_json::json;
use tokio::sync::watch;

use crate::upstream::{Item, UpstreamClient};

/// Serves `{ "rank": 1..=n }` items and records every request.
pub(crate) struct FakeUpstream {
    items: usize,
    delay: Duration,
    failures_left: AtomicUsize,
    gated_term: Option<String>,
    gate: watch::Sender<bool>,
    calls: AtomicUsize,
    requests: Mutex<Vec<(String, String, usize)>>,
}

impl FakeUpstream {
    pub(crate) fn new(items: usize) -> Self {
        Self {
            items,
            delay: Duration::ZERO,
            failures_left: AtomicUsize::new(0),
            gated_term: None,
            gate: watch::Sender::new(false),
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Every search sleeps for `delay` before answering.
    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// The first `n` searches fail.
    pub(crate) fn failing(self, n: usize) -> Self {
        self.failures_left.store(n, Ordering::SeqCst);
        self
    }

    /// Searches for `term` block until [`FakeUpstream::open_gate`] is called.
    pub(crate) fn gated(mut self, term: &str) -> Self {
        self.gated_term = Some(term.to_string());
        self
    }

    pub(crate) fn open_gate(&self) {
        self.gate.send_replace(true);
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn requests(&self) -> Vec<(String, String, usize)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl UpstreamClient for FakeUpstream {
    async fn search(
        &self,
        term: &str,
        country: &str,
        max_results: usize,
    ) -> anyhow::Result<Vec<Item>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests
            .lock()
            .unwrap()
            .push((term.to_string(), country.to_string(), max_results));

        if self.gated_term.as_deref() == Some(term) {
            let mut gate = self.gate.subscribe();
            if gate.wait_for(|open| *open).await.is_err() {
                return Err(anyhow!("gate dropped"));
            }
        }
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let should_fail = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if should_fail {
            return Err(anyhow!("upstream unavailable"));
        }

        Ok((1..=self.items.min(max_results))
            .map(|rank| json!({ "rank": rank, "name": format!("{term} #{rank}") }))
            .collect())
    }
}
