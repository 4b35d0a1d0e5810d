//! Board-level helpers shared by every column.

use crate::domain::{arrange, SortField, TokenPair};
use crate::store::{Action, ViewStore};

use super::column::PairColumn;

/// Handle a click on a sortable column header.
///
/// Clicking the current field while descending flips it to ascending; any
/// other click selects `field` descending.
pub fn click_header(store: &ViewStore, field: SortField) -> bool {
    let next = store.sort().clicked(field);
    store.dispatch(Action::SetSort(next))
}

/// A column's loaded pairs after the store's filters and sort.
#[must_use]
pub fn visible_pairs(column: &PairColumn, store: &ViewStore) -> Vec<TokenPair> {
    let (filters, sort) = store.read(|s| (s.filters.clone(), s.sort));
    arrange(&column.pairs(), &filters, &sort)
}
