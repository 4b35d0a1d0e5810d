//! One tick of the simulated price feed.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::Deserialize;
use tracing::{debug, trace};

use super::random::{sample_indices, FeedRandom};
use crate::cache::QueryCache;
use crate::domain::PriceMove;
use crate::error::ConfigError;
use crate::store::{Action, ViewStore};

/// Feed timing and move bounds.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    /// Whether the feed starts running.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    /// Largest fractional move per tick, e.g. `0.05` for ±5%.
    #[serde(default = "default_max_change")]
    pub max_change: f64,
    #[serde(default = "default_min_updates")]
    pub min_updates: usize,
    #[serde(default = "default_max_updates")]
    pub max_updates: usize,
}

const fn default_enabled() -> bool {
    true
}

const fn default_interval_ms() -> u64 {
    2000
}

const fn default_max_change() -> f64 {
    0.05
}

const fn default_min_updates() -> usize {
    2
}

const fn default_max_updates() -> usize {
    5
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            interval_ms: default_interval_ms(),
            max_change: default_max_change(),
            min_updates: default_min_updates(),
            max_updates: default_max_updates(),
        }
    }
}

impl FeedConfig {
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "interval_ms",
                reason: "must be greater than 0".into(),
            });
        }
        if !(self.max_change > 0.0 && self.max_change < 1.0) {
            return Err(ConfigError::InvalidValue {
                field: "max_change",
                reason: format!("must be in (0, 1), got {}", self.max_change),
            });
        }
        if self.min_updates == 0 {
            return Err(ConfigError::InvalidValue {
                field: "min_updates",
                reason: "must be at least 1".into(),
            });
        }
        if self.min_updates > self.max_updates {
            return Err(ConfigError::InvalidValue {
                field: "max_updates",
                reason: format!(
                    "must be at least min_updates ({}), got {}",
                    self.min_updates, self.max_updates
                ),
            });
        }
        Ok(())
    }
}

/// What one tick did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Distinct pairs in the cache when the tick started.
    pub population: usize,
    pub moves: Vec<PriceMove>,
}

impl TickReport {
    /// True when the tick moved nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }
}

/// Computes simulated moves and writes them into both stores.
///
/// [`tick`](Self::tick) is synchronous: by the time it returns, every selected
/// pair has its new price in the view store and in every cached copy, so no
/// reader can see one write without the other.
pub struct PriceFeedSimulator {
    cache: Arc<QueryCache>,
    store: Arc<ViewStore>,
    config: FeedConfig,
    random: Mutex<Box<dyn FeedRandom>>,
}

impl PriceFeedSimulator {
    pub fn new(
        cache: Arc<QueryCache>,
        store: Arc<ViewStore>,
        config: FeedConfig,
        random: impl FeedRandom + 'static,
    ) -> Self {
        Self {
            cache,
            store,
            config,
            random: Mutex::new(Box::new(random)),
        }
    }

    #[must_use]
    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    /// Run one tick against the current cache snapshot.
    pub fn tick(&self) -> TickReport {
        let population = self.cache.pairs_snapshot();
        if population.is_empty() {
            debug!("Tick skipped, cache is empty");
            return TickReport::default();
        }

        let moves: Vec<PriceMove> = {
            let mut random = self.random.lock();
            let count = random
                .count_between(self.config.min_updates, self.config.max_updates)
                .min(population.len());
            sample_indices(&mut **random, population.len(), count)
                .into_iter()
                .map(|i| {
                    let change = random.change_within(self.config.max_change);
                    PriceMove::compute(&population[i], change)
                })
                .collect()
        };

        for mv in &moves {
            self.store.dispatch(Action::UpdatePrice(mv.to_update()));
            let copies = self.cache.update_pair(&mv.pair_id, |pair| mv.apply_to(pair));
            trace!(
                pair_id = %mv.pair_id,
                old_price = mv.old_price,
                new_price = mv.new_price,
                direction = ?mv.direction,
                copies,
                "Price moved"
            );
        }

        debug!(population = population.len(), moves = moves.len(), "Tick applied");
        TickReport {
            population: population.len(),
            moves,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{QueryData, QueryKey};
    use crate::domain::{Category, Direction, PairId, TokenPair};
    use crate::feed::RngRandom;
    use crate::source::PairPage;
    use crate::testkit::random::ScriptedRandom;

    fn seeded_cache(n: usize) -> Arc<QueryCache> {
        let cache = Arc::new(QueryCache::default());
        let pairs: Vec<TokenPair> = (0..n)
            .map(|i| TokenPair::new(format!("token-{i}"), "NEB", Category::New, 10.0 + i as f64))
            .collect();
        cache.set_data(
            &QueryKey::Column(Category::New),
            QueryData::Pages(vec![PairPage {
                total: pairs.len(),
                pairs,
                has_more: false,
            }]),
        );
        cache
    }

    #[test]
    fn empty_cache_is_a_no_op() {
        let store = Arc::new(ViewStore::new());
        let sim = PriceFeedSimulator::new(
            Arc::new(QueryCache::default()),
            store.clone(),
            FeedConfig::default(),
            RngRandom::seeded(1),
        );
        let report = sim.tick();
        assert!(report.is_empty());
        assert_eq!(report.population, 0);
        assert!(store.snapshot().price_updates.is_empty());
    }

    #[test]
    fn scripted_tick_writes_both_stores() {
        let cache = seeded_cache(4);
        let store = Arc::new(ViewStore::new());
        // Two updates; picks index 1 then (of the remaining) index 0; moves +2% and 0.
        let random = ScriptedRandom::new()
            .with_counts([2])
            .with_indices([1, 0])
            .with_changes([0.02, 0.0]);
        let sim = PriceFeedSimulator::new(cache.clone(), store.clone(), FeedConfig::default(), random);

        let report = sim.tick();
        assert_eq!(report.moves.len(), 2);

        let first = &report.moves[0];
        assert_eq!(first.pair_id, PairId::new("token-1"));
        assert_eq!(first.direction, Direction::Up);
        assert!((first.new_price - 11.0 * 1.02).abs() < 1e-12);

        let second = &report.moves[1];
        assert_eq!(second.direction, Direction::Neutral);
        assert_eq!(second.new_price, second.old_price);

        for mv in &report.moves {
            let cached = cache.pair(&mv.pair_id).unwrap();
            let update = store.price_update(&mv.pair_id).unwrap();
            assert_eq!(cached.price, update.price);
            assert_eq!(cached.price_change_24h, mv.new_change_24h);
        }
    }

    #[test]
    fn count_is_capped_at_population() {
        let cache = seeded_cache(2);
        let store = Arc::new(ViewStore::new());
        let random = ScriptedRandom::new().with_counts([5]);
        let sim = PriceFeedSimulator::new(cache, store.clone(), FeedConfig::default(), random);

        let report = sim.tick();
        assert_eq!(report.moves.len(), 2);
        assert_eq!(store.snapshot().price_updates.len(), 2);
    }

    #[test]
    fn config_validation() {
        assert!(FeedConfig::default().validate().is_ok());

        let bad = FeedConfig {
            min_updates: 6,
            ..Default::default()
        };
        assert!(matches!(
            bad.validate(),
            Err(ConfigError::InvalidValue { field: "max_updates", .. })
        ));

        let bad = FeedConfig {
            max_change: 1.0,
            ..Default::default()
        };
        assert!(matches!(
            bad.validate(),
            Err(ConfigError::InvalidValue { field: "max_change", .. })
        ));

        let bad = FeedConfig {
            interval_ms: 0,
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }
}
