//! The view store: one dispatch point, per-slice subscriptions.

use parking_lot::RwLock;
use tokio::sync::watch;
use tracing::trace;

use crate::domain::{Category, PairFilters, PairId, PriceUpdate, SortConfig};

use super::action::{Action, Slice};
use super::state::{reduce, ViewState};

/// Process-wide view state, constructed once and shared by reference.
///
/// Consumers never mutate state directly: every write goes through
/// [`dispatch`](Self::dispatch), which applies one action under the write lock
/// and then bumps the version of the single slice it changed. Subscribers of
/// other slices are not woken.
pub struct ViewStore {
    state: RwLock<ViewState>,
    versions: Vec<watch::Sender<u64>>,
}

impl ViewStore {
    #[must_use]
    pub fn new() -> Self {
        Self::from_state(ViewState::default())
    }

    /// Create a store seeded with `state`.
    #[must_use]
    pub fn from_state(state: ViewState) -> Self {
        Self {
            state: RwLock::new(state),
            versions: Slice::ALL.iter().map(|_| watch::channel(0).0).collect(),
        }
    }

    /// Apply an action. Returns whether any state changed.
    pub fn dispatch(&self, action: Action) -> bool {
        let changed = {
            let mut state = self.state.write();
            reduce(&mut state, action)
        };
        match changed {
            Some(slice) => {
                trace!(?slice, "View slice changed");
                self.versions[slice.index()].send_modify(|v| *v += 1);
                true
            }
            None => false,
        }
    }

    /// Subscribe to changes of one slice.
    ///
    /// The receiver yields a version counter; only `changed()` matters.
    #[must_use]
    pub fn subscribe(&self, slice: Slice) -> watch::Receiver<u64> {
        self.versions[slice.index()].subscribe()
    }

    /// Current version of a slice.
    #[must_use]
    pub fn version(&self, slice: Slice) -> u64 {
        *self.versions[slice.index()].borrow()
    }

    /// Read the state under the read lock.
    pub fn read<R>(&self, f: impl FnOnce(&ViewState) -> R) -> R {
        f(&self.state.read())
    }

    /// Full snapshot of the state.
    #[must_use]
    pub fn snapshot(&self) -> ViewState {
        self.state.read().clone()
    }

    #[must_use]
    pub fn price_update(&self, id: &PairId) -> Option<PriceUpdate> {
        self.state.read().price_updates.get(id).cloned()
    }

    #[must_use]
    pub fn selected_pair(&self) -> Option<PairId> {
        self.state.read().selected_pair.clone()
    }

    #[must_use]
    pub fn sort(&self) -> SortConfig {
        self.state.read().sort
    }

    #[must_use]
    pub fn filters(&self) -> PairFilters {
        self.state.read().filters.clone()
    }

    #[must_use]
    pub fn active_tab(&self) -> Category {
        self.state.read().active_tab
    }

    #[must_use]
    pub fn modal_open(&self) -> bool {
        self.state.read().modal_open
    }

    #[must_use]
    pub fn filter_panel_open(&self) -> bool {
        self.state.read().filter_panel_open
    }
}

impl Default for ViewStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Direction, SortField};

    #[test]
    fn dispatch_reports_change() {
        let store = ViewStore::new();
        assert!(store.dispatch(Action::SelectPair(Some(PairId::new("a")))));
        assert!(!store.dispatch(Action::SelectPair(Some(PairId::new("a")))));
        assert_eq!(store.selected_pair(), Some(PairId::new("a")));
    }

    #[test]
    fn writes_only_bump_their_slice() {
        let store = ViewStore::new();
        let sort_rx = store.subscribe(Slice::Sort);
        let mut prices_rx = store.subscribe(Slice::PriceUpdates);

        store.dispatch(Action::UpdatePrice(PriceUpdate::new(
            PairId::new("a"),
            1.5,
            Direction::Up,
        )));

        assert!(prices_rx.has_changed().unwrap());
        assert!(!sort_rx.has_changed().unwrap());
        prices_rx.borrow_and_update();

        store.dispatch(Action::SetSort(SortConfig::default().clicked(SortField::Price)));
        assert!(sort_rx.has_changed().unwrap());
        assert!(!prices_rx.has_changed().unwrap());
    }

    #[test]
    fn no_op_dispatch_notifies_nobody() {
        let store = ViewStore::new();
        let rx = store.subscribe(Slice::Modal);
        assert!(!store.dispatch(Action::SetModalOpen(false)));
        assert!(!rx.has_changed().unwrap());
        assert_eq!(store.version(Slice::Modal), 0);
    }

    #[test]
    fn stores_are_isolated() {
        let a = ViewStore::new();
        let b = ViewStore::new();
        a.dispatch(Action::ToggleModal);
        assert!(a.modal_open());
        assert!(!b.modal_open());
    }

    #[tokio::test]
    async fn subscriber_wakes_on_change() {
        let store = std::sync::Arc::new(ViewStore::new());
        let mut rx = store.subscribe(Slice::Filters);

        let writer = store.clone();
        tokio::spawn(async move {
            writer.dispatch(Action::SetFilters(PairFilters {
                search: Some("owl".into()),
                ..Default::default()
            }));
        });

        rx.changed().await.unwrap();
        assert_eq!(store.filters().search.as_deref(), Some("owl"));
    }
}
