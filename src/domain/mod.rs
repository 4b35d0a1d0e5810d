//! Board domain types: pairs, price moves, sorting and filtering.

mod filter;
mod ids;
mod pair;
mod price;
mod sort;

pub mod format;

pub use filter::{arrange, PairFilters};
pub use ids::PairId;
pub use pair::{Badge, BadgeKind, Category, PairLinks, TokenPair, Txns};
pub use price::{Direction, PriceMove, PriceUpdate};
pub use sort::{SortConfig, SortDirection, SortField};
