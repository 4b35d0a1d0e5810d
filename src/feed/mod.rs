//! Simulated live price feed.
//!
//! - [`PriceFeedSimulator`]: one synchronous tick writing the query cache and
//!   the view store from the same computed moves.
//! - [`FeedController`]: the interval task that drives ticks while enabled.
//! - [`FeedRandom`]: injectable randomness.

mod controller;
mod random;
mod simulator;

pub use controller::FeedController;
pub use random::{sample_indices, FeedRandom, RngRandom};
pub use simulator::{FeedConfig, PriceFeedSimulator, TickReport};
