//! Integration tests for the price feed.
//!
//! Covers tick consistency between the two stores, direction correctness and
//! the bounds on how many pairs move per tick.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use pairpulse::cache::{QueryCache, QueryData, QueryKey};
use pairpulse::domain::{Category, Direction, PairId};
use pairpulse::feed::{FeedConfig, FeedController, PriceFeedSimulator, RngRandom};
use pairpulse::store::{Slice, ViewStore};
use pairpulse::testkit::domain::{column_cache, make_pairs, page, pair};
use pairpulse::testkit::random::ScriptedRandom;

#[test]
fn test_cache_and_store_agree_after_every_tick() {
    let cache = column_cache(50);
    let store = Arc::new(ViewStore::new());
    let sim = PriceFeedSimulator::new(
        cache.clone(),
        store.clone(),
        FeedConfig::default(),
        RngRandom::seeded(42),
    );

    for _ in 0..200 {
        let report = sim.tick();
        for mv in &report.moves {
            let cached = cache.pair(&mv.pair_id).unwrap();
            let update = store.price_update(&mv.pair_id).unwrap();
            assert_eq!(cached.price, update.price, "{}", mv.pair_id);
            assert_eq!(cached.price, mv.new_price);
            assert_eq!(update.direction, mv.direction);
        }
    }
}

#[test]
fn test_direction_follows_sign_of_change() {
    let cache = column_cache(3);
    let store = Arc::new(ViewStore::new());
    let random = ScriptedRandom::new()
        .with_counts([3])
        .with_indices([0, 0, 0])
        .with_changes([0.03, -0.01, 0.0]);
    let sim = PriceFeedSimulator::new(cache, store, FeedConfig::default(), random);

    let report = sim.tick();
    let directions: Vec<Direction> = report.moves.iter().map(|m| m.direction).collect();
    assert_eq!(directions, [Direction::Up, Direction::Down, Direction::Neutral]);

    for mv in &report.moves {
        match mv.direction {
            Direction::Up => assert!(mv.new_price > mv.old_price),
            Direction::Down => assert!(mv.new_price < mv.old_price),
            Direction::Neutral => assert_eq!(mv.new_price, mv.old_price),
        }
    }
}

#[test]
fn test_moved_count_stays_within_bounds() {
    let config = FeedConfig {
        min_updates: 2,
        max_updates: 5,
        ..Default::default()
    };

    for population in [1usize, 2, 3, 10] {
        let cache = column_cache(population);
        let store = Arc::new(ViewStore::new());
        let sim = PriceFeedSimulator::new(
            cache,
            store,
            config.clone(),
            RngRandom::seeded(population as u64),
        );

        for _ in 0..100 {
            let report = sim.tick();
            let n = report.moves.len();
            assert!(n <= population);
            assert!(n <= config.max_updates);
            assert!(n >= config.min_updates.min(population));

            let distinct: HashSet<&PairId> = report.moves.iter().map(|m| &m.pair_id).collect();
            assert_eq!(distinct.len(), n, "pairs in one tick are distinct");
        }
    }
}

#[test]
fn test_change_bounded_by_max_change() {
    let cache = column_cache(20);
    let store = Arc::new(ViewStore::new());
    let config = FeedConfig {
        max_change: 0.02,
        ..Default::default()
    };
    let sim = PriceFeedSimulator::new(cache, store, config, RngRandom::seeded(9));

    for _ in 0..100 {
        for mv in sim.tick().moves {
            assert!(mv.change.abs() <= 0.02);
        }
    }
}

#[test]
fn test_every_cached_copy_moves_together() {
    let cache = Arc::new(QueryCache::default());
    cache.set_data(
        &QueryKey::Column(Category::New),
        QueryData::Pages(vec![page(make_pairs(1, Category::New), false)]),
    );
    cache.set_data(
        &QueryKey::Pair(PairId::new("token-0")),
        QueryData::Pair(Some(pair("token-0", Category::New, 10.0))),
    );
    let store = Arc::new(ViewStore::new());
    let random = ScriptedRandom::new().with_changes([0.05]);
    let sim = PriceFeedSimulator::new(cache.clone(), store, FeedConfig::default(), random);

    let report = sim.tick();
    assert_eq!(report.population, 1, "duplicates count once");
    assert_eq!(report.moves.len(), 1);

    let detail = cache.get(&QueryKey::Pair(PairId::new("token-0")));
    let detail_price = detail.data().unwrap().pairs().next().unwrap().price;
    assert_eq!(detail_price, report.moves[0].new_price);
}

#[tokio::test(start_paused = true)]
async fn test_controller_ticks_on_interval() {
    let cache = column_cache(10);
    let store = Arc::new(ViewStore::new());
    let sim = PriceFeedSimulator::new(
        cache,
        store.clone(),
        FeedConfig::default(),
        RngRandom::seeded(1),
    );
    let mut feed = FeedController::new(Arc::new(sim));
    feed.set_enabled(true);

    tokio::time::sleep(Duration::from_millis(2_001)).await;
    let after_one = store.version(Slice::PriceUpdates);
    assert!(after_one > 0);

    tokio::time::sleep(Duration::from_millis(2_000)).await;
    assert!(store.version(Slice::PriceUpdates) > after_one);

    feed.set_enabled(false);
    let stopped = store.version(Slice::PriceUpdates);
    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(store.version(Slice::PriceUpdates), stopped);
}
