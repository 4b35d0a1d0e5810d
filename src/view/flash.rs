//! Per-row flash state machine.

use std::time::Duration;

use serde::Deserialize;
use tokio::time::Instant;

use crate::domain::Direction;

/// Row presentation settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ViewConfig {
    /// How long a row stays highlighted after a price change.
    #[serde(default = "default_flash_duration_ms")]
    pub flash_duration_ms: u64,
}

const fn default_flash_duration_ms() -> u64 {
    700
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            flash_duration_ms: default_flash_duration_ms(),
        }
    }
}

impl ViewConfig {
    #[must_use]
    pub fn flash_duration(&self) -> Duration {
        Duration::from_millis(self.flash_duration_ms)
    }
}

/// Visual state of a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlashState {
    #[default]
    Idle,
    Flashing(Direction),
}

impl FlashState {
    #[must_use]
    pub fn is_flashing(&self) -> bool {
        matches!(self, FlashState::Flashing(_))
    }
}

/// `Idle → Flashing(direction) → Idle`, driven by observed prices and a
/// decay deadline.
///
/// Callers supply the clock.
#[derive(Debug, Clone)]
pub struct FlashTracker {
    last_price: f64,
    state: FlashState,
    deadline: Option<Instant>,
    duration: Duration,
    flashes: u64,
}

impl FlashTracker {
    /// Start idle, treating `initial_price` as already seen.
    #[must_use]
    pub fn new(initial_price: f64, duration: Duration) -> Self {
        Self {
            last_price: initial_price,
            state: FlashState::Idle,
            deadline: None,
            duration,
            flashes: 0,
        }
    }

    /// Observe a price update. Returns whether a flash started.
    ///
    /// A price equal to the last one observed is ignored. A distinct price
    /// while already flashing restarts the deadline and takes the new
    /// direction.
    pub fn observe(&mut self, price: f64, direction: Direction, now: Instant) -> bool {
        if price == self.last_price {
            return false;
        }
        self.last_price = price;
        self.state = FlashState::Flashing(direction);
        self.deadline = Some(now + self.duration);
        self.flashes += 1;
        true
    }

    /// Return to idle if the deadline has passed. Returns whether the state
    /// changed.
    pub fn expire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.state = FlashState::Idle;
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    #[must_use]
    pub fn state(&self) -> FlashState {
        self.state
    }

    /// When the current flash decays, if flashing.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    #[must_use]
    pub fn last_price(&self) -> f64 {
        self.last_price
    }

    /// Flashes started since creation.
    #[must_use]
    pub fn flashes(&self) -> u64 {
        self.flashes
    }
}
