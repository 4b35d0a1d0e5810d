//! View-state store.
//!
//! Holds the ephemeral state every board consumer reads: latest price update
//! per pair, selection, sort and filter configuration, and panel visibility.
//! All writes go through [`ViewStore::dispatch`].

mod action;
mod state;
mod view_store;

pub use action::{Action, Slice};
pub use state::{reduce, ViewState};
pub use view_store::ViewStore;
