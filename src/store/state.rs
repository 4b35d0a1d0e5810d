//! View state and its reducer.

use std::collections::HashMap;

use crate::domain::{Category, PairFilters, PairId, PriceUpdate, SortConfig};

use super::action::{Action, Slice};

/// Ephemeral UI state shared by every board consumer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    /// Latest update per pair; at most one per id.
    pub price_updates: HashMap<PairId, PriceUpdate>,
    pub selected_pair: Option<PairId>,
    pub sort: SortConfig,
    pub filters: PairFilters,
    pub active_tab: Category,
    pub modal_open: bool,
    pub filter_panel_open: bool,
}

/// Apply `action` to `state`.
///
/// Returns the slice that changed, or `None` when the action left the state
/// as it was.
pub fn reduce(state: &mut ViewState, action: Action) -> Option<Slice> {
    let slice = action.slice();
    let changed = match action {
        Action::UpdatePrice(update) => {
            state.price_updates.insert(update.pair_id.clone(), update);
            true
        }
        Action::ClearPriceUpdate(id) => state.price_updates.remove(&id).is_some(),
        Action::SelectPair(id) => replace(&mut state.selected_pair, id),
        Action::SetSort(sort) => replace(&mut state.sort, sort),
        Action::ToggleSortDirection => {
            state.sort.direction = state.sort.direction.flipped();
            true
        }
        Action::SetFilters(filters) => {
            let mut merged = state.filters.clone();
            merged.merge(filters);
            replace(&mut state.filters, merged)
        }
        Action::ClearFilters => replace(&mut state.filters, PairFilters::default()),
        Action::SetActiveTab(tab) => replace(&mut state.active_tab, tab),
        Action::ToggleModal => {
            state.modal_open = !state.modal_open;
            true
        }
        Action::SetModalOpen(open) => replace(&mut state.modal_open, open),
        Action::ToggleFilterPanel => {
            state.filter_panel_open = !state.filter_panel_open;
            true
        }
    };
    changed.then_some(slice)
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}
