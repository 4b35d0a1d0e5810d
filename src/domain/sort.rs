//! Sort configuration for pair listings.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::TokenPair;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    MarketCap,
    Volume24h,
    Liquidity,
    Age,
    Price,
    PriceChange24h,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    #[must_use]
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortConfig {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            field: SortField::MarketCap,
            direction: SortDirection::Desc,
        }
    }
}

impl SortConfig {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Config after a click on the `field` column header.
    ///
    /// Clicking the active column while descending switches to ascending;
    /// any other click sorts `field` descending.
    #[must_use]
    pub fn clicked(&self, field: SortField) -> Self {
        let direction = if self.field == field && self.direction == SortDirection::Desc {
            SortDirection::Asc
        } else {
            SortDirection::Desc
        };
        Self { field, direction }
    }

    fn key(&self, pair: &TokenPair) -> Option<f64> {
        match self.field {
            SortField::MarketCap => Some(pair.market_cap),
            SortField::Volume24h => Some(pair.volume_24h),
            SortField::Liquidity => Some(pair.liquidity),
            SortField::Price => Some(pair.price),
            SortField::PriceChange24h => Some(pair.price_change_24h),
            // Ages are display strings; sorting by them keeps incoming order.
            SortField::Age => None,
        }
    }

    /// Compare two pairs under this config.
    #[must_use]
    pub fn compare(&self, a: &TokenPair, b: &TokenPair) -> Ordering {
        let (Some(a), Some(b)) = (self.key(a), self.key(b)) else {
            return Ordering::Equal;
        };
        match self.direction {
            SortDirection::Asc => a.total_cmp(&b),
            SortDirection::Desc => b.total_cmp(&a),
        }
    }

    /// Stable in-place sort.
    pub fn sort(&self, pairs: &mut [TokenPair]) {
        pairs.sort_by(|a, b| self.compare(a, b));
    }
}
