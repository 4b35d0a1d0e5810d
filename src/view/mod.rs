//! Board consumers of the two stores.
//!
//! - [`PairColumn`]: paginated category listing backed by the query cache.
//! - [`PairRow`]: one mounted row with its flash decay task.
//! - [`DetailView`]: the pair detail modal.

mod board;
mod column;
mod detail;
mod flash;
mod row;

pub use board::{click_header, visible_pairs};
pub use column::{FetchOutcome, PairColumn, PaginationConfig, ScrollMetrics};
pub use detail::{DetailState, DetailView};
pub use flash::{FlashState, FlashTracker, ViewConfig};
pub use row::{PairRow, RowSnapshot};
