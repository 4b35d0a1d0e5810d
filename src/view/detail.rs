//! Pair detail modal.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::cache::{QueryCache, QueryData, QueryKey, QueryState};
use crate::domain::{PairId, TokenPair};
use crate::source::PairSource;
use crate::store::{Action, ViewStore};

/// What the detail modal shows.
#[derive(Debug, Clone, PartialEq)]
pub enum DetailState {
    /// Modal closed or nothing selected.
    Closed,
    /// A lookup for the selected pair is already in flight.
    Loading,
    Found(TokenPair),
    NotFound,
    Failed(String),
}

/// Opens, closes and resolves the detail modal.
pub struct DetailView {
    source: Arc<dyn PairSource>,
    cache: Arc<QueryCache>,
    store: Arc<ViewStore>,
}

impl DetailView {
    pub fn new(source: Arc<dyn PairSource>, cache: Arc<QueryCache>, store: Arc<ViewStore>) -> Self {
        Self {
            source,
            cache,
            store,
        }
    }

    pub fn open(&self, id: PairId) {
        debug!(pair_id = %id, "Opening detail");
        self.store.dispatch(Action::SelectPair(Some(id)));
        self.store.dispatch(Action::SetModalOpen(true));
    }

    pub fn close(&self) {
        self.store.dispatch(Action::SetModalOpen(false));
        self.store.dispatch(Action::SelectPair(None));
    }

    /// The pair the modal is showing, if it is open.
    fn current(&self) -> Option<PairId> {
        self.store
            .read(|s| s.modal_open.then(|| s.selected_pair.clone()).flatten())
    }

    /// Resolve the selected pair.
    ///
    /// A copy already held by any cached collection is used as is, so the
    /// modal shows the same live price as the board. Otherwise the pair is
    /// fetched once and cached under [`QueryKey::Pair`], including a
    /// not-found result.
    ///
    /// A fetch that completes after the modal closed or the selection moved
    /// is still cached, but never shown: the call returns `Closed` or
    /// resolves the new selection instead.
    pub async fn load(&self) -> DetailState {
        loop {
            let Some(id) = self.current() else {
                return DetailState::Closed;
            };
            let state = self.resolve(&id).await;
            match self.current() {
                Some(current) if current == id => return state,
                Some(current) => {
                    debug!(stale = %id, selected = %current, "Selection moved during detail fetch");
                }
                None => {
                    debug!(pair_id = %id, "Detail closed during fetch");
                    return DetailState::Closed;
                }
            }
        }
    }

    async fn resolve(&self, id: &PairId) -> DetailState {
        if let Some(pair) = self.cache.pair(id) {
            return DetailState::Found(pair);
        }

        let key = QueryKey::Pair(id.clone());
        match self.cache.get(&key) {
            QueryState::Ready {
                data: QueryData::Pair(None),
                ..
            } => return DetailState::NotFound,
            QueryState::Loading => return DetailState::Loading,
            _ => {}
        }
        if !self.cache.begin_fetch(&key) {
            return DetailState::Loading;
        }

        match self.source.fetch_one(id).await {
            Ok(Some(pair)) => {
                self.cache.complete_fetch(&key, QueryData::Pair(Some(pair.clone())));
                DetailState::Found(pair)
            }
            Ok(None) => {
                debug!(pair_id = %id, "Pair not found");
                self.cache.complete_fetch(&key, QueryData::Pair(None));
                DetailState::NotFound
            }
            Err(e) => {
                warn!(pair_id = %id, error = %e, "Detail fetch failed");
                self.cache.fail_fetch(&key, e.to_string());
                DetailState::Failed(e.to_string())
            }
        }
    }
}
