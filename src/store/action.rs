//! Actions accepted by the view store and the slices they touch.

use crate::domain::{Category, PairFilters, PairId, PriceUpdate, SortConfig};

/// Independently subscribable field group of [`ViewState`](super::ViewState).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slice {
    PriceUpdates,
    Selection,
    Sort,
    Filters,
    ActiveTab,
    Modal,
    FilterPanel,
}

impl Slice {
    pub const ALL: [Slice; 7] = [
        Slice::PriceUpdates,
        Slice::Selection,
        Slice::Sort,
        Slice::Filters,
        Slice::ActiveTab,
        Slice::Modal,
        Slice::FilterPanel,
    ];

    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

/// A single state transition. Each action replaces exactly one slice.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Store the latest update for a pair, replacing any earlier one.
    UpdatePrice(PriceUpdate),
    ClearPriceUpdate(PairId),
    SelectPair(Option<PairId>),
    SetSort(SortConfig),
    ToggleSortDirection,
    /// Merge the set fields into the current filters.
    SetFilters(PairFilters),
    ClearFilters,
    SetActiveTab(Category),
    ToggleModal,
    SetModalOpen(bool),
    ToggleFilterPanel,
}

impl Action {
    /// The slice this action writes.
    #[must_use]
    pub fn slice(&self) -> Slice {
        match self {
            Action::UpdatePrice(_) | Action::ClearPriceUpdate(_) => Slice::PriceUpdates,
            Action::SelectPair(_) => Slice::Selection,
            Action::SetSort(_) | Action::ToggleSortDirection => Slice::Sort,
            Action::SetFilters(_) | Action::ClearFilters => Slice::Filters,
            Action::SetActiveTab(_) => Slice::ActiveTab,
            Action::ToggleModal | Action::SetModalOpen(_) => Slice::Modal,
            Action::ToggleFilterPanel => Slice::FilterPanel,
        }
    }
}
