//! A mounted board row: price display plus flash decay.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::trace;

use super::flash::{FlashState, FlashTracker, ViewConfig};
use crate::cache::QueryCache;
use crate::domain::{PairId, TokenPair};
use crate::store::{Slice, ViewStore};

/// What a row currently shows.
#[derive(Debug, Clone, PartialEq)]
pub struct RowSnapshot {
    pub pair_id: PairId,
    pub symbol: String,
    /// Pending update price if one exists, else the cached price.
    pub price: f64,
    pub price_change_24h: f64,
    pub flash: FlashState,
    /// Flashes started since mount.
    pub flashes: u64,
}

/// A row bound to one pair.
///
/// Mounting spawns a task that follows the store's price-update slice and the
/// row's own decay deadline, publishing a fresh [`RowSnapshot`] whenever what
/// the row shows changes. Dropping the row aborts the task, which cancels any
/// pending decay.
pub struct PairRow {
    pair_id: PairId,
    snapshot: watch::Receiver<RowSnapshot>,
    task: JoinHandle<()>,
}

struct RowTask {
    pair: TokenPair,
    cache: Arc<QueryCache>,
    store: Arc<ViewStore>,
    tracker: FlashTracker,
}

impl RowTask {
    /// Pending update price if any, else the current cached price.
    fn snapshot(&self) -> RowSnapshot {
        let cached = self.cache.pair(&self.pair.id);
        let cached_price = cached.as_ref().map_or(self.pair.price, |p| p.price);
        let price_change_24h = cached
            .as_ref()
            .map_or(self.pair.price_change_24h, |p| p.price_change_24h);
        let price = self
            .store
            .price_update(&self.pair.id)
            .map_or(cached_price, |u| u.price);

        RowSnapshot {
            pair_id: self.pair.id.clone(),
            symbol: self.pair.symbol.clone(),
            price,
            price_change_24h,
            flash: self.tracker.state(),
            flashes: self.tracker.flashes(),
        }
    }

    fn observe_store(&mut self) {
        if let Some(update) = self.store.price_update(&self.pair.id) {
            if self.tracker.observe(update.price, update.direction, Instant::now()) {
                trace!(pair_id = %self.pair.id, direction = ?update.direction, "Row flash");
            }
        }
    }

    async fn run(mut self, mut updates: watch::Receiver<u64>, tx: watch::Sender<RowSnapshot>) {
        loop {
            let deadline = self.tracker.deadline();
            tokio::select! {
                changed = updates.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    self.observe_store();
                }
                () = sleep_until(deadline), if deadline.is_some() => {
                    self.tracker.expire(Instant::now());
                }
            }
            tx.send_if_modified(|current| {
                let next = self.snapshot();
                if *current == next {
                    return false;
                }
                *current = next;
                true
            });
        }
    }
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

impl PairRow {
    /// Mount a row for `pair` as it was rendered by its column.
    ///
    /// The flash tracker starts from the cached price; an update already
    /// pending with a different price flashes immediately.
    pub fn mount(
        pair: TokenPair,
        cache: Arc<QueryCache>,
        store: Arc<ViewStore>,
        config: &ViewConfig,
    ) -> Self {
        let initial = cache.pair(&pair.id).map_or(pair.price, |p| p.price);
        let mut row = RowTask {
            tracker: FlashTracker::new(initial, config.flash_duration()),
            pair,
            cache,
            store,
        };
        // Subscribe before the first read so no update falls between the two.
        let updates = row.store.subscribe(Slice::PriceUpdates);
        row.observe_store();

        let pair_id = row.pair.id.clone();
        let (tx, snapshot) = watch::channel(row.snapshot());
        let task = tokio::spawn(row.run(updates, tx));

        Self {
            pair_id,
            snapshot,
            task,
        }
    }

    #[must_use]
    pub fn pair_id(&self) -> &PairId {
        &self.pair_id
    }

    /// What the row shows right now.
    #[must_use]
    pub fn snapshot(&self) -> RowSnapshot {
        self.snapshot.borrow().clone()
    }

    /// Receiver that changes whenever the row's snapshot does.
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<RowSnapshot> {
        self.snapshot.clone()
    }
}

impl Drop for PairRow {
    fn drop(&mut self) {
        self.task.abort();
    }
}
