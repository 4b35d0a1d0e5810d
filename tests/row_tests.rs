//! Integration tests for row flash behaviour under the running feed.

use std::sync::Arc;
use std::time::Duration;

use pairpulse::domain::{Direction, PriceUpdate};
use pairpulse::feed::{FeedConfig, FeedController, PriceFeedSimulator};
use pairpulse::store::{Action, ViewStore};
use pairpulse::testkit::domain::{column_cache, pair_at};
use pairpulse::testkit::random::ScriptedRandom;
use pairpulse::view::{FlashState, PairRow, ViewConfig};

async fn settle() {
    for _ in 0..4 {
        tokio::task::yield_now().await;
    }
}

#[tokio::test(start_paused = true)]
async fn test_identical_price_does_not_flash_twice() {
    let cache = column_cache(2);
    let store = Arc::new(ViewStore::new());
    let pair = pair_at(&cache, 0);
    let id = pair.id.clone();
    let row = PairRow::mount(pair, cache, store.clone(), &ViewConfig::default());

    store.dispatch(Action::UpdatePrice(PriceUpdate::new(id.clone(), 12.0, Direction::Up)));
    settle().await;
    assert_eq!(row.snapshot().flashes, 1);

    tokio::time::sleep(Duration::from_millis(800)).await;
    assert_eq!(row.snapshot().flash, FlashState::Idle);

    // Same price again: the store changes (new timestamp) but the row does not.
    store.dispatch(Action::UpdatePrice(PriceUpdate::new(id, 12.0, Direction::Up)));
    settle().await;
    let snap = row.snapshot();
    assert_eq!(snap.flashes, 1);
    assert_eq!(snap.flash, FlashState::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_flash_restarts_on_new_price() {
    let cache = column_cache(1);
    let store = Arc::new(ViewStore::new());
    let pair = pair_at(&cache, 0);
    let id = pair.id.clone();
    let row = PairRow::mount(pair, cache, store.clone(), &ViewConfig::default());

    store.dispatch(Action::UpdatePrice(PriceUpdate::new(id.clone(), 11.0, Direction::Up)));
    settle().await;
    tokio::time::sleep(Duration::from_millis(500)).await;

    store.dispatch(Action::UpdatePrice(PriceUpdate::new(id, 10.5, Direction::Down)));
    settle().await;
    assert_eq!(row.snapshot().flash, FlashState::Flashing(Direction::Down));

    // 700ms after the first update the second flash is still running.
    tokio::time::sleep(Duration::from_millis(250)).await;
    assert!(row.snapshot().flash.is_flashing());

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(row.snapshot().flash, FlashState::Idle);
    assert_eq!(row.snapshot().flashes, 2);
}

#[tokio::test(start_paused = true)]
async fn test_flash_decays_within_duration_under_feed() {
    let cache = column_cache(1);
    let store = Arc::new(ViewStore::new());
    let feed_config = FeedConfig {
        interval_ms: 2_000,
        min_updates: 1,
        max_updates: 1,
        ..Default::default()
    };
    let random = ScriptedRandom::new().with_changes([0.04]);
    let sim = PriceFeedSimulator::new(cache.clone(), store.clone(), feed_config, random);
    let mut feed = FeedController::new(Arc::new(sim));

    let view = ViewConfig {
        flash_duration_ms: 700,
    };
    let row = PairRow::mount(pair_at(&cache, 0), cache.clone(), store, &view);
    let mut rx = row.watch();
    feed.set_enabled(true);

    rx.changed().await.unwrap();
    let flashed_at = tokio::time::Instant::now();
    let snap = rx.borrow_and_update().clone();
    assert_eq!(snap.flash, FlashState::Flashing(Direction::Up));
    assert_eq!(snap.price, pair_at(&cache, 0).price);

    rx.changed().await.unwrap();
    assert_eq!(rx.borrow().flash, FlashState::Idle);
    let decay = flashed_at.elapsed();
    assert!(decay >= Duration::from_millis(700));
    assert!(decay <= Duration::from_millis(701), "decayed after {decay:?}");
}

#[tokio::test(start_paused = true)]
async fn test_pending_update_price_wins_over_cache() {
    let cache = column_cache(1);
    let store = Arc::new(ViewStore::new());
    let pair = pair_at(&cache, 0);
    let id = pair.id.clone();
    let row = PairRow::mount(pair, cache, store.clone(), &ViewConfig::default());
    assert_eq!(row.snapshot().price, 10.0);

    store.dispatch(Action::UpdatePrice(PriceUpdate::new(id.clone(), 9.0, Direction::Down)));
    settle().await;
    assert_eq!(row.snapshot().price, 9.0);

    store.dispatch(Action::ClearPriceUpdate(id));
    settle().await;
    assert_eq!(row.snapshot().price, 10.0);
}
