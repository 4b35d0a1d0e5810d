//! Pair filters and the filter-then-sort listing pipeline.

use serde::{Deserialize, Serialize};

use super::{Category, SortConfig, TokenPair};

/// Optional constraints applied to a listing. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PairFilters {
    pub category: Option<Category>,
    pub min_market_cap: Option<f64>,
    pub max_market_cap: Option<f64>,
    pub min_volume: Option<f64>,
    /// Case-insensitive match against symbol or name.
    pub search: Option<String>,
}

impl PairFilters {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Overlay the fields set in `other` onto `self`.
    pub fn merge(&mut self, other: PairFilters) {
        if other.category.is_some() {
            self.category = other.category;
        }
        if other.min_market_cap.is_some() {
            self.min_market_cap = other.min_market_cap;
        }
        if other.max_market_cap.is_some() {
            self.max_market_cap = other.max_market_cap;
        }
        if other.min_volume.is_some() {
            self.min_volume = other.min_volume;
        }
        if other.search.is_some() {
            self.search = other.search;
        }
    }

    #[must_use]
    pub fn matches(&self, pair: &TokenPair) -> bool {
        if self.category.is_some_and(|c| c != pair.category) {
            return false;
        }
        if self.min_market_cap.is_some_and(|min| pair.market_cap < min) {
            return false;
        }
        if self.max_market_cap.is_some_and(|max| pair.market_cap > max) {
            return false;
        }
        if self.min_volume.is_some_and(|min| pair.volume_24h < min) {
            return false;
        }
        match self.search.as_deref().map(str::trim) {
            Some(needle) if !needle.is_empty() => {
                let needle = needle.to_lowercase();
                pair.symbol.to_lowercase().contains(&needle)
                    || pair.name.to_lowercase().contains(&needle)
            }
            _ => true,
        }
    }
}

/// Filter `pairs` and sort the survivors.
#[must_use]
pub fn arrange(pairs: &[TokenPair], filters: &PairFilters, sort: &SortConfig) -> Vec<TokenPair> {
    let mut visible: Vec<TokenPair> = pairs.iter().filter(|p| filters.matches(p)).cloned().collect();
    sort.sort(&mut visible);
    visible
}
