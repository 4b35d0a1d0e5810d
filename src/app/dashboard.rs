//! Wires the stores, source, feed and columns into one running board.

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use super::config::Config;
use crate::cache::QueryCache;
use crate::domain::{format, Category};
use crate::error::{Result, SourceError};
use crate::feed::{FeedController, FeedRandom, PriceFeedSimulator, RngRandom};
use crate::source::{MockPairSource, PairSource};
use crate::store::ViewStore;
use crate::view::{visible_pairs, DetailView, FetchOutcome, PairColumn, PairRow};

/// Rows per column included in the periodic board report.
const REPORT_ROWS: usize = 3;

const REPORT_INTERVAL: Duration = Duration::from_secs(5);

/// The board's shared context.
///
/// Owns the single [`QueryCache`] and [`ViewStore`] of a session and hands
/// `Arc`s of them to every consumer. Dropping the dashboard stops the feed.
pub struct Dashboard {
    config: Config,
    cache: Arc<QueryCache>,
    store: Arc<ViewStore>,
    source: Arc<dyn PairSource>,
    columns: Vec<PairColumn>,
    detail: DetailView,
    feed: FeedController,
}

impl Dashboard {
    /// Build a dashboard over generated data with entropy-seeded price moves.
    pub fn new(config: Config) -> Self {
        let source = Arc::new(MockPairSource::new(config.source.clone()));
        Self::with_parts(config, source, RngRandom::from_entropy())
    }

    /// Build a dashboard over an explicit source and randomness.
    pub fn with_parts(
        config: Config,
        source: Arc<dyn PairSource>,
        random: impl FeedRandom + 'static,
    ) -> Self {
        let cache = Arc::new(QueryCache::new(config.cache.clone()));
        let store = Arc::new(ViewStore::new());

        let simulator = PriceFeedSimulator::new(
            Arc::clone(&cache),
            Arc::clone(&store),
            config.feed.clone(),
            random,
        );
        let columns = Category::COLUMNS
            .iter()
            .map(|&category| {
                PairColumn::new(
                    category,
                    Arc::clone(&source),
                    Arc::clone(&cache),
                    config.pagination.clone(),
                )
            })
            .collect();
        let detail = DetailView::new(Arc::clone(&source), Arc::clone(&cache), Arc::clone(&store));

        Self {
            feed: FeedController::new(Arc::new(simulator)),
            config,
            cache,
            store,
            source,
            columns,
            detail,
        }
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub fn cache(&self) -> &Arc<QueryCache> {
        &self.cache
    }

    #[must_use]
    pub fn store(&self) -> &Arc<ViewStore> {
        &self.store
    }

    #[must_use]
    pub fn columns(&self) -> &[PairColumn] {
        &self.columns
    }

    #[must_use]
    pub fn column(&self, category: Category) -> Option<&PairColumn> {
        self.columns.iter().find(|c| c.category() == category)
    }

    #[must_use]
    pub fn detail(&self) -> &DetailView {
        &self.detail
    }

    #[must_use]
    pub fn feed(&self) -> &FeedController {
        &self.feed
    }

    pub fn set_feed_enabled(&mut self, enabled: bool) {
        self.feed.set_enabled(enabled);
    }

    /// Load the first page of every column concurrently.
    pub async fn load_columns(&self) -> Vec<std::result::Result<FetchOutcome, SourceError>> {
        let results = join_all(self.columns.iter().map(|c| c.load_initial())).await;
        for (column, result) in self.columns.iter().zip(&results) {
            if let Err(e) = result {
                warn!(category = %column.category(), error = %e, "Initial load failed");
            }
        }
        results
    }

    /// Run the board until the surrounding task is cancelled.
    pub async fn run(config: Config) -> Result<()> {
        let mut dashboard = Self::new(config);
        info!(
            source = dashboard.source.source_name(),
            columns = dashboard.columns.len(),
            "Dashboard starting"
        );

        let loaded = dashboard.load_columns().await;
        if let Some(Err(e)) = loaded.into_iter().find(std::result::Result::is_err) {
            return Err(e.into());
        }

        let enabled = dashboard.config.feed.enabled;
        dashboard.set_feed_enabled(enabled);

        let mut report = interval(REPORT_INTERVAL);
        report.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut rows: Vec<PairRow> = Vec::new();
        loop {
            report.tick().await;
            let pruned = dashboard.cache.prune_idle();
            if pruned > 0 {
                debug!(pruned, "Cache pruned");
            }
            dashboard.log_board(&rows);
            rows = dashboard.remount_top_rows(rows);
        }
    }

    /// Mount a row for each of the top visible pairs of every column.
    ///
    /// A row from `previous` whose pair is still on top is kept, along with its
    /// flash state. Rows for pairs that dropped out are unmounted.
    fn remount_top_rows(&self, mut previous: Vec<PairRow>) -> Vec<PairRow> {
        self.columns
            .iter()
            .flat_map(|column| visible_pairs(column, &self.store).into_iter().take(REPORT_ROWS))
            .map(|pair| match previous.iter().position(|row| row.pair_id() == &pair.id) {
                Some(i) => previous.swap_remove(i),
                None => PairRow::mount(
                    pair,
                    Arc::clone(&self.cache),
                    Arc::clone(&self.store),
                    &self.config.view,
                ),
            })
            .collect()
    }

    fn log_board(&self, rows: &[PairRow]) {
        for column in &self.columns {
            info!(
                category = %column.category(),
                title = column.category().title(),
                loaded = column.pairs().len(),
                total = column.total(),
                has_more = column.has_next_page(),
                "Column"
            );
        }
        for row in rows {
            let snap = row.snapshot();
            info!(
                pair_id = %snap.pair_id,
                symbol = %snap.symbol,
                price = %format::price(snap.price),
                change_24h = %format::percentage(snap.price_change_24h),
                flash = ?snap.flash,
                flashes = snap.flashes,
                "Row"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Direction, PriceUpdate};
    use crate::store::Action;
    use crate::testkit::random::ScriptedRandom;
    use crate::testkit::source::ControlledSource;

    fn dashboard() -> Dashboard {
        let source = ControlledSource::new(100).into_arc();
        Dashboard::with_parts(Config::default(), source, ScriptedRandom::new())
    }

    #[tokio::test]
    async fn loads_three_columns() {
        let board = dashboard();
        let results = board.load_columns().await;
        assert!(results.iter().all(|r| matches!(r, Ok(FetchOutcome::Applied { added: 20 }))));

        for category in Category::COLUMNS {
            assert_eq!(board.column(category).unwrap().pairs().len(), 20);
        }
        assert!(board.column(Category::Trending).is_none());
        assert_eq!(board.cache().pairs_snapshot().len(), 60);
    }

    #[tokio::test(start_paused = true)]
    async fn feed_writes_store_after_one_interval() {
        let mut board = dashboard();
        board.load_columns().await;
        board.set_feed_enabled(true);
        assert!(board.feed().is_running());

        tokio::time::sleep(board.config().feed.interval() + Duration::from_millis(1)).await;
        // ScriptedRandom with empty queues moves `min_updates` pairs by 0.0.
        assert_eq!(board.store().snapshot().price_updates.len(), 2);

        drop(board);
    }

    #[tokio::test]
    async fn remount_keeps_rows_that_stay_on_top() {
        let board = dashboard();
        board.load_columns().await;

        let rows = board.remount_top_rows(Vec::new());
        assert_eq!(rows.len(), REPORT_ROWS * Category::COLUMNS.len());
        let id = rows[0].pair_id().clone();

        board
            .store()
            .dispatch(Action::UpdatePrice(PriceUpdate::new(id.clone(), 12_345.0, Direction::Up)));
        for _ in 0..4 {
            tokio::task::yield_now().await;
        }

        let rows = board.remount_top_rows(rows);
        assert_eq!(rows.len(), REPORT_ROWS * Category::COLUMNS.len());
        let kept = rows.iter().find(|row| row.pair_id() == &id).unwrap();
        assert_eq!(kept.snapshot().flashes, 1);
        assert_eq!(kept.snapshot().price, 12_345.0);
    }
}
