//! A controllable [`PairSource`] for pagination and detail tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::{watch, Semaphore};

use crate::domain::{Category, PairId, TokenPair};
use crate::error::SourceError;
use crate::source::{MockPairSource, MockSourceConfig, PairPage, PairSource};

/// Generated data with test hooks around every request.
///
/// - Gate: when enabled, each request waits for a permit from
///   [`release`](Self::release) before returning.
/// - Failures: the first `n` page requests fail with
///   [`SourceError::PageFetch`]; the first `n` single-pair requests fail
///   with [`SourceError::PairFetch`].
/// - Recording: every page request is recorded in arrival order.
pub struct ControlledSource {
    inner: MockPairSource,
    gate: Option<Semaphore>,
    failures_left: AtomicUsize,
    one_failures_left: AtomicUsize,
    page_requests: Mutex<Vec<(Category, usize)>>,
    one_requests: AtomicUsize,
    requests: watch::Sender<usize>,
}

impl ControlledSource {
    /// Source with `pairs_per_category` pairs per category and no latency.
    pub fn new(pairs_per_category: usize) -> Self {
        Self {
            inner: MockPairSource::new(MockSourceConfig {
                pairs_per_category,
                latency_ms: 0,
                seed: 0,
            }),
            gate: None,
            failures_left: AtomicUsize::new(0),
            one_failures_left: AtomicUsize::new(0),
            page_requests: Mutex::new(Vec::new()),
            one_requests: AtomicUsize::new(0),
            requests: watch::channel(0).0,
        }
    }

    /// Hold every request until [`release`](Self::release) is called.
    pub fn gated(mut self) -> Self {
        self.gate = Some(Semaphore::new(0));
        self
    }

    /// Fail the first `n` page requests.
    pub fn failing_first(self, n: usize) -> Self {
        self.failures_left.store(n, Ordering::SeqCst);
        self
    }

    /// Fail the first `n` single-pair requests.
    pub fn failing_one(self, n: usize) -> Self {
        self.one_failures_left.store(n, Ordering::SeqCst);
        self
    }

    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Let `n` held requests complete.
    pub fn release(&self, n: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(n);
        }
    }

    /// Wait until `n` requests of any kind have reached the source.
    pub async fn wait_for_requests(&self, n: usize) {
        let mut rx = self.requests.subscribe();
        let _ = rx.wait_for(|count| *count >= n).await;
    }

    /// Page requests in arrival order.
    pub fn page_requests(&self) -> Vec<(Category, usize)> {
        self.page_requests.lock().clone()
    }

    pub fn page_fetches(&self) -> usize {
        self.page_requests.lock().len()
    }

    pub fn one_fetches(&self) -> usize {
        self.one_requests.load(Ordering::SeqCst)
    }

    async fn pass_gate(&self) {
        self.requests.send_modify(|count| *count += 1);
        if let Some(gate) = &self.gate {
            if let Ok(permit) = gate.acquire().await {
                permit.forget();
            }
        }
    }

    fn take_failure(counter: &AtomicUsize) -> bool {
        counter
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

#[async_trait]
impl PairSource for ControlledSource {
    async fn fetch_page(
        &self,
        category: Category,
        page: usize,
        page_size: usize,
    ) -> Result<PairPage, SourceError> {
        self.page_requests.lock().push((category, page));
        self.pass_gate().await;
        if Self::take_failure(&self.failures_left) {
            return Err(SourceError::PageFetch {
                category,
                page,
                reason: "injected failure".into(),
            });
        }
        self.inner.fetch_page(category, page, page_size).await
    }

    async fn fetch_one(&self, id: &PairId) -> Result<Option<TokenPair>, SourceError> {
        self.one_requests.fetch_add(1, Ordering::SeqCst);
        self.pass_gate().await;
        if Self::take_failure(&self.one_failures_left) {
            return Err(SourceError::PairFetch {
                pair_id: id.clone(),
                reason: "injected failure".into(),
            });
        }
        self.inner.fetch_one(id).await
    }

    fn source_name(&self) -> &'static str {
        "controlled"
    }
}
