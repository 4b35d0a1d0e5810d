//! Price updates and the arithmetic of a simulated move.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{PairId, TokenPair};

/// Sign of a price change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Neutral,
}

impl Direction {
    /// Direction of a fractional change. Exactly zero is neutral.
    #[must_use]
    pub fn from_change(change: f64) -> Self {
        if change > 0.0 {
            Direction::Up
        } else if change < 0.0 {
            Direction::Down
        } else {
            Direction::Neutral
        }
    }
}

/// Latest simulated price for a pair, as held by the view store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceUpdate {
    pub pair_id: PairId,
    pub price: f64,
    pub direction: Direction,
    /// Creation time; ordering and debugging only.
    pub timestamp: DateTime<Utc>,
}

impl PriceUpdate {
    pub fn new(pair_id: PairId, price: f64, direction: Direction) -> Self {
        Self {
            pair_id,
            price,
            direction,
            timestamp: Utc::now(),
        }
    }
}

/// One pair's move within a tick.
///
/// Both stores are written from the same `PriceMove`, which is what keeps
/// their prices identical after the tick.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceMove {
    pub pair_id: PairId,
    /// Fractional change, e.g. `0.03` for +3%.
    pub change: f64,
    pub old_price: f64,
    pub new_price: f64,
    pub new_change_24h: f64,
    pub direction: Direction,
}

impl PriceMove {
    /// Apply a fractional `change` to `pair`.
    ///
    /// The 24h change accumulates additively (`+ change * 100`) rather than
    /// being recomputed from a baseline, so it drifts over long sessions.
    #[must_use]
    pub fn compute(pair: &TokenPair, change: f64) -> Self {
        Self {
            pair_id: pair.id.clone(),
            change,
            old_price: pair.price,
            new_price: pair.price * (1.0 + change),
            new_change_24h: pair.price_change_24h + change * 100.0,
            direction: Direction::from_change(change),
        }
    }

    /// The view-store event for this move.
    #[must_use]
    pub fn to_update(&self) -> PriceUpdate {
        PriceUpdate::new(self.pair_id.clone(), self.new_price, self.direction)
    }

    /// Write the move into a cached copy of the pair.
    pub fn apply_to(&self, pair: &mut TokenPair) {
        pair.price = self.new_price;
        pair.price_change_24h = self.new_change_24h;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Category;

    fn pair(price: f64, change_24h: f64) -> TokenPair {
        let mut pair = TokenPair::new("token-1", "NEB", Category::New, price);
        pair.price_change_24h = change_24h;
        pair
    }

    #[test]
    fn direction_from_change_sign() {
        assert_eq!(Direction::from_change(0.01), Direction::Up);
        assert_eq!(Direction::from_change(-0.01), Direction::Down);
        assert_eq!(Direction::from_change(0.0), Direction::Neutral);
        assert_eq!(Direction::from_change(-0.0), Direction::Neutral);
    }

    #[test]
    fn compute_applies_change() {
        let mv = PriceMove::compute(&pair(10.0, 12.5), 0.04);
        assert!((mv.new_price - 10.4).abs() < 1e-12);
        assert!((mv.new_change_24h - 16.5).abs() < 1e-12);
        assert_eq!(mv.direction, Direction::Up);
        assert_eq!(mv.old_price, 10.0);
    }

    #[test]
    fn compute_accumulates_24h_additively() {
        let mut p = pair(2.0, -3.0);
        for _ in 0..3 {
            let mv = PriceMove::compute(&p, -0.02);
            mv.apply_to(&mut p);
        }
        assert!((p.price_change_24h - (-9.0)).abs() < 1e-9);
        assert!((p.price - 2.0 * 0.98f64.powi(3)).abs() < 1e-12);
    }

    #[test]
    fn update_carries_same_price_as_cache_write() {
        let mut p = pair(5.0, 0.0);
        let mv = PriceMove::compute(&p, -0.05);
        mv.apply_to(&mut p);
        let update = mv.to_update();
        assert_eq!(update.price, p.price);
        assert_eq!(update.direction, Direction::Down);
        assert_eq!(update.pair_id, p.id);
    }
}
