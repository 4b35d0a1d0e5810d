//! Data source boundary.
//!
//! The board only ever talks to a [`PairSource`]; the transport behind it is
//! not its concern. [`MockPairSource`] generates deterministic data for local
//! runs and tests.

mod mock;

use async_trait::async_trait;

use crate::domain::{Category, PairId, TokenPair};
use crate::error::SourceError;

pub use mock::{MockPairSource, MockSourceConfig};

/// One offset-addressed slice of a category's pairs.
#[derive(Debug, Clone, PartialEq)]
pub struct PairPage {
    pub pairs: Vec<TokenPair>,
    /// Whether a page after this one exists.
    pub has_more: bool,
    /// Total pairs in the category.
    pub total: usize,
}

impl PairPage {
    /// An empty terminal page.
    #[must_use]
    pub fn exhausted(total: usize) -> Self {
        Self {
            pairs: Vec::new(),
            has_more: false,
            total,
        }
    }
}

/// Asynchronous fetch interface for pair data.
#[async_trait]
pub trait PairSource: Send + Sync {
    /// Fetch page `page` (zero-based) of `category`, `page_size` pairs per page.
    ///
    /// Pages are disjoint by construction: page `n` covers offsets
    /// `n * page_size .. (n + 1) * page_size`.
    async fn fetch_page(
        &self,
        category: Category,
        page: usize,
        page_size: usize,
    ) -> Result<PairPage, SourceError>;

    /// Fetch a single pair. `Ok(None)` means the pair does not exist.
    async fn fetch_one(&self, id: &PairId) -> Result<Option<TokenPair>, SourceError>;

    /// Source name for logging.
    fn source_name(&self) -> &'static str;
}
