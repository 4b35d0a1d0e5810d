//! Deterministic generated pair data.

use std::time::Duration;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use tracing::debug;

use super::{PairPage, PairSource};
use crate::domain::{Badge, BadgeKind, Category, PairId, PairLinks, TokenPair, Txns};
use crate::error::SourceError;

/// Ids within a category occupy `offset .. offset + CATEGORY_ID_SPAN`.
const CATEGORY_ID_SPAN: usize = 1000;

const NAMES: [(&str, &str); 11] = [
    ("MOCHI", "Mochi Roll"),
    ("GLYPH", "GlyphStone"),
    ("NEB", "Nebula Coin"),
    ("FOAM", "Foam Protocol"),
    ("CRWL", "CrawlToken"),
    ("OWL", "NightOwl Finance"),
    ("PLNK", "PlanktonX"),
    ("RIFT", "Rift Shard"),
    ("KOKO", "KoKo Beans"),
    ("SPRK", "SparkBite"),
    ("BUB", "BubbleChain"),
];

/// Settings for [`MockPairSource`].
#[derive(Debug, Clone, Deserialize)]
pub struct MockSourceConfig {
    /// Pairs available in each category.
    #[serde(default = "default_pairs_per_category")]
    pub pairs_per_category: usize,
    /// Simulated network latency per request.
    #[serde(default = "default_latency_ms")]
    pub latency_ms: u64,
    /// Seed mixed into every generated pair.
    #[serde(default)]
    pub seed: u64,
}

const fn default_pairs_per_category() -> usize {
    100
}

const fn default_latency_ms() -> u64 {
    300
}

impl Default for MockSourceConfig {
    fn default() -> Self {
        Self {
            pairs_per_category: default_pairs_per_category(),
            latency_ms: default_latency_ms(),
            seed: 0,
        }
    }
}

impl MockSourceConfig {
    #[must_use]
    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }

    /// Largest supported `pairs_per_category`.
    pub const MAX_PAIRS_PER_CATEGORY: usize = CATEGORY_ID_SPAN;
}

/// Pair source backed by generated data.
///
/// Every pair is derived from its numeric id and the configured seed, so a
/// page fetch and a later `fetch_one` for the same id agree on every field.
pub struct MockPairSource {
    config: MockSourceConfig,
}

impl MockPairSource {
    pub fn new(config: MockSourceConfig) -> Self {
        Self { config }
    }

    fn id_offset(category: Category) -> usize {
        match category {
            Category::New => 0,
            Category::FinalStretch => CATEGORY_ID_SPAN,
            Category::Migrated => 2 * CATEGORY_ID_SPAN,
            Category::Trending => 3 * CATEGORY_ID_SPAN,
        }
    }

    /// Resolve `token-{n}` back to its category and in-category index.
    fn locate(&self, id: &PairId) -> Option<(Category, usize)> {
        let n: usize = id.as_str().strip_prefix("token-")?.parse().ok()?;
        let category = *Category::ALL.get(n / CATEGORY_ID_SPAN)?;
        let index = n % CATEGORY_ID_SPAN;
        (index < self.config.pairs_per_category).then_some((category, index))
    }

    async fn simulate_latency(&self) {
        let latency = self.config.latency();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
    }

    /// Generate the pair with global id `n`.
    #[must_use]
    pub fn generate(&self, n: usize, category: Category) -> TokenPair {
        let mut rng = StdRng::seed_from_u64(self.config.seed ^ (n as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15));
        let (symbol, name) = NAMES[n % NAMES.len()];

        let market_cap = rng.gen_range(10_000.0..10_000_000.0);
        let liquidity = market_cap * rng.gen_range(0.1..0.5);
        let volume_24h = market_cap * rng.gen_range(0.05..0.3);

        let mut badges = Vec::new();
        if rng.gen_bool(0.3) {
            badges.push(Badge::labelled(BadgeKind::Bagholder, "bagholder"));
        }
        if rng.gen_bool(0.2) {
            badges.push(Badge::new(BadgeKind::Verified));
        }

        let links = PairLinks {
            website: rng.gen_bool(0.5).then(|| format!("https://token{n}.com")),
            twitter: rng.gen_bool(0.7).then(|| format!("https://twitter.com/token{n}")),
            telegram: rng.gen_bool(0.4).then(|| format!("https://t.me/token{n}")),
            discord: None,
        };

        TokenPair {
            id: PairId::new(format!("token-{n}")),
            symbol: if n > 6 {
                format!("{symbol}{n}")
            } else {
                symbol.to_string()
            },
            name: name.to_string(),
            image: format!("https://picsum.photos/seed/{}/100/100", symbol.to_lowercase()),
            market_cap,
            liquidity,
            volume_24h,
            price: rng.gen_range(0.0001..100.0),
            price_change_24h: rng.gen_range(-50.0..150.0),
            txns: Txns {
                buys: rng.gen_range(50..500),
                sells: rng.gen_range(30..400),
            },
            holders: rng.gen_range(100..5000),
            age: random_age(&mut rng),
            badges,
            links,
            category,
        }
    }
}

fn random_age(rng: &mut impl Rng) -> String {
    let roll: f64 = rng.gen();
    if roll < 0.3 {
        format!("{}m", rng.gen_range(1..60))
    } else if roll < 0.6 {
        format!("{}h", rng.gen_range(1..24))
    } else if roll < 0.9 {
        format!("{}s", rng.gen_range(1..60))
    } else {
        format!("{}d", rng.gen_range(1..30))
    }
}

#[async_trait]
impl PairSource for MockPairSource {
    async fn fetch_page(
        &self,
        category: Category,
        page: usize,
        page_size: usize,
    ) -> Result<PairPage, SourceError> {
        if page_size == 0 {
            return Err(SourceError::InvalidPageSize(page_size));
        }
        self.simulate_latency().await;

        let total = self.config.pairs_per_category;
        let start = page.saturating_mul(page_size);
        if start >= total {
            debug!(%category, page, "Page past end of category");
            return Ok(PairPage::exhausted(total));
        }
        let end = (start + page_size).min(total);
        let offset = Self::id_offset(category);
        let pairs = (start..end)
            .map(|i| self.generate(offset + i, category))
            .collect();

        Ok(PairPage {
            pairs,
            has_more: end < total,
            total,
        })
    }

    async fn fetch_one(&self, id: &PairId) -> Result<Option<TokenPair>, SourceError> {
        self.simulate_latency().await;
        Ok(self
            .locate(id)
            .map(|(category, index)| self.generate(Self::id_offset(category) + index, category)))
    }

    fn source_name(&self) -> &'static str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> MockPairSource {
        MockPairSource::new(MockSourceConfig {
            latency_ms: 0,
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn pages_are_disjoint_and_offset_by_category() {
        let source = source();
        let first = source.fetch_page(Category::FinalStretch, 0, 20).await.unwrap();
        let second = source.fetch_page(Category::FinalStretch, 1, 20).await.unwrap();

        assert_eq!(first.pairs[0].id.as_str(), "token-1000");
        assert_eq!(second.pairs[0].id.as_str(), "token-1020");
        assert!(first.pairs.iter().all(|p| p.category == Category::FinalStretch));
        assert!(first.has_more);
        assert_eq!(first.total, 100);
    }

    #[tokio::test]
    async fn last_page_reports_no_more() {
        let source = source();
        let last = source.fetch_page(Category::New, 4, 20).await.unwrap();
        assert_eq!(last.pairs.len(), 20);
        assert!(!last.has_more);

        let past = source.fetch_page(Category::New, 5, 20).await.unwrap();
        assert!(past.pairs.is_empty());
        assert!(!past.has_more);
    }

    #[tokio::test]
    async fn fetch_one_matches_page_data() {
        let source = source();
        let page = source.fetch_page(Category::Migrated, 0, 5).await.unwrap();
        let target = &page.pairs[3];

        let fetched = source.fetch_one(&target.id).await.unwrap();
        assert_eq!(fetched.as_ref(), Some(target));
    }

    #[tokio::test]
    async fn fetch_one_unknown_is_none() {
        let source = source();
        assert_eq!(source.fetch_one(&PairId::new("token-150")).await.unwrap(), None);
        assert_eq!(source.fetch_one(&PairId::new("token-9000")).await.unwrap(), None);
        assert_eq!(source.fetch_one(&PairId::new("garbage")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn zero_page_size_is_rejected() {
        let err = source().fetch_page(Category::New, 0, 0).await.unwrap_err();
        assert_eq!(err, SourceError::InvalidPageSize(0));
    }

    #[test]
    fn generated_values_stay_in_range() {
        let source = source();
        for n in 0..50 {
            let pair = source.generate(n, Category::New);
            assert!(pair.price > 0.0 && pair.price < 100.0);
            assert!(pair.liquidity <= pair.market_cap * 0.5);
            assert!(!pair.age.is_empty());
        }
    }
}
