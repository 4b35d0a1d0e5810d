//! Pairpulse - a live token pair board over a simulated price feed.
//!
//! Pair data is fetched page by page into a key-addressed query cache, while
//! ephemeral UI state lives in a reducer-driven view store. A periodic feed
//! simulator moves prices by writing both stores in the same synchronous
//! tick, and rows highlight each change briefly before decaying back to idle.
//!
//! # Modules
//!
//! - [`domain`] - Pairs, categories, price moves, sorting, filtering, formatting
//! - [`source`] - The asynchronous [`PairSource`](source::PairSource) boundary and generated data
//! - [`cache`] - Query cache of fetched collections with point updates
//! - [`store`] - View store with per-slice change subscriptions
//! - [`feed`] - Price feed simulator and its interval controller
//! - [`view`] - Paginated columns, flashing rows and the detail modal
//! - [`app`] - Configuration, logging and the dashboard context
//! - [`error`] - Error types for the crate
//!
//! # Features
//!
//! - `testkit` - Expose scripted randomness, a controllable source and
//!   builders for integration tests

pub mod app;
pub mod cache;
pub mod domain;
pub mod error;
pub mod feed;
pub mod source;
pub mod store;
pub mod view;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;

pub use error::{Error, Result};
