//! One category column with incremental page loading.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::cache::{QueryCache, QueryData, QueryKey, QueryState};
use crate::domain::{Category, TokenPair};
use crate::error::{ConfigError, SourceError};
use crate::source::{PairPage, PairSource};

/// Page size and scroll trigger distance.
#[derive(Debug, Clone, Deserialize)]
pub struct PaginationConfig {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Distance from the bottom, in pixels, at which the next page loads.
    #[serde(default = "default_scroll_threshold_px")]
    pub scroll_threshold_px: f64,
}

const fn default_page_size() -> usize {
    20
}

const fn default_scroll_threshold_px() -> f64 {
    200.0
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            scroll_threshold_px: default_scroll_threshold_px(),
        }
    }
}

impl PaginationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "page_size",
                reason: "must be greater than 0".into(),
            });
        }
        if self.scroll_threshold_px.is_nan() || self.scroll_threshold_px < 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "scroll_threshold_px",
                reason: "must not be negative".into(),
            });
        }
        Ok(())
    }
}

/// Scroll position of a column's viewport.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollMetrics {
    pub scroll_top: f64,
    pub scroll_height: f64,
    pub client_height: f64,
}

impl ScrollMetrics {
    /// Pixels left below the visible area.
    #[must_use]
    pub fn remaining(&self) -> f64 {
        self.scroll_height - self.scroll_top - self.client_height
    }
}

/// Result of a page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The page was appended; `added` pairs came with it.
    Applied { added: usize },
    /// The page arrived after unmount and was dropped.
    Discarded,
    /// Nothing was requested: a fetch was in flight, no pages remain, the
    /// scroll position was not near the end, or the column is unmounted.
    Skipped,
}

/// A category column backed by the shared query cache.
///
/// Pages accumulate under [`QueryKey::Column`] in fetch order. The cache's
/// in-flight mark is the only fetch guard, so two columns over the same
/// category never request the same page twice.
pub struct PairColumn {
    category: Category,
    key: QueryKey,
    source: Arc<dyn PairSource>,
    cache: Arc<QueryCache>,
    config: PaginationConfig,
    mounted: AtomicBool,
}

impl PairColumn {
    pub fn new(
        category: Category,
        source: Arc<dyn PairSource>,
        cache: Arc<QueryCache>,
        config: PaginationConfig,
    ) -> Self {
        Self {
            category,
            key: QueryKey::Column(category),
            source,
            cache,
            config,
            mounted: AtomicBool::new(true),
        }
    }

    #[must_use]
    pub fn category(&self) -> Category {
        self.category
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::Acquire)
    }

    /// Detach the column. Fetches completing afterwards are discarded.
    pub fn unmount(&self) {
        if self.mounted.swap(false, Ordering::AcqRel) {
            debug!(category = %self.category, "Column unmounted");
        }
    }

    fn pages(&self) -> Vec<PairPage> {
        self.cache
            .get(&self.key)
            .data()
            .and_then(QueryData::pages)
            .map(<[PairPage]>::to_vec)
            .unwrap_or_default()
    }

    /// Load the first page unless the cache already holds this column.
    pub async fn load_initial(&self) -> Result<FetchOutcome, SourceError> {
        if self.cache.get(&self.key).data().is_some() {
            return Ok(FetchOutcome::Skipped);
        }
        self.fetch_next_page().await
    }

    /// Request the page after the last one loaded.
    pub async fn fetch_next_page(&self) -> Result<FetchOutcome, SourceError> {
        if !self.is_mounted() || !self.has_next_page() {
            return Ok(FetchOutcome::Skipped);
        }
        if !self.cache.begin_fetch(&self.key) {
            return Ok(FetchOutcome::Skipped);
        }

        let page = self.pages().len();
        debug!(category = %self.category, page, "Fetching page");
        let result = self
            .source
            .fetch_page(self.category, page, self.config.page_size)
            .await;

        if !self.is_mounted() {
            debug!(category = %self.category, page, "Discarding page fetched after unmount");
            self.cache.abandon_fetch(&self.key);
            return Ok(FetchOutcome::Discarded);
        }

        match result {
            Ok(fetched) => {
                let added = fetched.pairs.len();
                debug!(
                    category = %self.category,
                    page,
                    added,
                    has_more = fetched.has_more,
                    "Page loaded"
                );
                self.cache.complete_fetch_with(&self.key, |current| {
                    let mut pages = match current {
                        Some(QueryData::Pages(pages)) => pages,
                        _ => Vec::new(),
                    };
                    pages.push(fetched);
                    QueryData::Pages(pages)
                });
                Ok(FetchOutcome::Applied { added })
            }
            Err(e) => {
                warn!(category = %self.category, page, error = %e, "Page fetch failed");
                self.cache.fail_fetch(&self.key, e.to_string());
                Err(e)
            }
        }
    }

    /// Load the next page if the viewport is within the threshold of the end.
    pub async fn on_scroll(&self, metrics: ScrollMetrics) -> Result<FetchOutcome, SourceError> {
        if metrics.remaining() >= self.config.scroll_threshold_px {
            return Ok(FetchOutcome::Skipped);
        }
        self.fetch_next_page().await
    }

    /// Whether another page exists. True before the first page loads.
    #[must_use]
    pub fn has_next_page(&self) -> bool {
        self.pages().last().map_or(true, |p| p.has_more)
    }

    #[must_use]
    pub fn is_fetching(&self) -> bool {
        self.cache.get(&self.key).is_fetching()
    }

    /// The last fetch error, if the column is in a failed state.
    #[must_use]
    pub fn error(&self) -> Option<String> {
        match self.cache.get(&self.key) {
            QueryState::Failed { error, .. } => Some(error),
            _ => None,
        }
    }

    /// Every loaded pair, in page order.
    #[must_use]
    pub fn pairs(&self) -> Vec<TokenPair> {
        self.pages().into_iter().flat_map(|p| p.pairs).collect()
    }

    /// Category total reported by the first page, or zero before it loads.
    #[must_use]
    pub fn total(&self) -> usize {
        self.pages().first().map_or(0, |p| p.total)
    }

    #[must_use]
    pub fn pages_loaded(&self) -> usize {
        self.pages().len()
    }
}
