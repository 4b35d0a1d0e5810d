//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`random`]: `ScriptedRandom`, a [`FeedRandom`](crate::feed::FeedRandom)
//!   that replays queued draws.
//! - [`source`]: `ControlledSource`, a [`PairSource`](crate::source::PairSource)
//!   with a release gate, injected failures and request recording.
//! - [`domain`]: builders for pairs, pages and pre-filled caches.

pub mod domain;
pub mod random;
pub mod source;
