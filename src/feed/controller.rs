//! Starts and stops the feed's interval task.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info};

use super::simulator::PriceFeedSimulator;

/// Owns the feed's timer.
///
/// While enabled, one background task ticks the simulator on the configured
/// interval. Each tick runs to completion before the task awaits the next one,
/// so ticks never overlap. Disabling or dropping the controller aborts the
/// task; re-enabling starts a fresh timer and missed ticks are not replayed.
pub struct FeedController {
    simulator: Arc<PriceFeedSimulator>,
    task: Option<JoinHandle<()>>,
}

impl FeedController {
    pub fn new(simulator: Arc<PriceFeedSimulator>) -> Self {
        Self {
            simulator,
            task: None,
        }
    }

    #[must_use]
    pub fn simulator(&self) -> &Arc<PriceFeedSimulator> {
        &self.simulator
    }

    /// Start or stop the feed. Must be called within a Tokio runtime when
    /// enabling.
    pub fn set_enabled(&mut self, enabled: bool) {
        if enabled {
            self.start();
        } else {
            self.stop();
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    fn start(&mut self) {
        if self.is_running() {
            return;
        }
        let simulator = Arc::clone(&self.simulator);
        let period = simulator.config().interval();
        info!(interval_ms = period.as_millis() as u64, "Price feed started");

        self.task = Some(tokio::spawn(async move {
            // First tick fires one period after start.
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                simulator.tick();
            }
        }));
    }

    fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            info!("Price feed stopped");
        }
    }
}

impl Drop for FeedController {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            debug!("Price feed released on drop");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::cache::QueryCache;
    use crate::feed::{FeedConfig, RngRandom};
    use crate::store::ViewStore;
    use crate::testkit::domain::column_cache;

    fn controller(cache: Arc<QueryCache>, store: Arc<ViewStore>) -> FeedController {
        let sim = PriceFeedSimulator::new(cache, store, FeedConfig::default(), RngRandom::seeded(3));
        FeedController::new(Arc::new(sim))
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_only_while_enabled() {
        let store = Arc::new(ViewStore::new());
        let mut feed = controller(column_cache(10), store.clone());
        assert!(!feed.is_running());

        tokio::time::sleep(Duration::from_millis(5_000)).await;
        assert!(store.snapshot().price_updates.is_empty());

        feed.set_enabled(true);
        assert!(feed.is_running());
        tokio::time::sleep(Duration::from_millis(1_999)).await;
        assert!(store.snapshot().price_updates.is_empty(), "first tick is one period out");

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert!(!store.snapshot().price_updates.is_empty());

        feed.set_enabled(false);
        assert!(!feed.is_running());
        let version = store.version(crate::store::Slice::PriceUpdates);
        tokio::time::sleep(Duration::from_millis(10_000)).await;
        assert_eq!(store.version(crate::store::Slice::PriceUpdates), version);
    }

    #[tokio::test(start_paused = true)]
    async fn re_enable_does_not_replay_missed_ticks() {
        let store = Arc::new(ViewStore::new());
        let mut feed = controller(column_cache(10), store.clone());

        feed.set_enabled(true);
        feed.set_enabled(false);
        tokio::time::sleep(Duration::from_millis(20_000)).await;

        feed.set_enabled(true);
        tokio::task::yield_now().await;
        assert_eq!(store.version(crate::store::Slice::PriceUpdates), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn drop_releases_timer() {
        let store = Arc::new(ViewStore::new());
        let mut feed = controller(column_cache(10), store.clone());
        feed.set_enabled(true);
        drop(feed);

        tokio::time::sleep(Duration::from_millis(10_000)).await;
        assert_eq!(store.version(crate::store::Slice::PriceUpdates), 0);
    }
}
