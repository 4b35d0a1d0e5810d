//! Scripted randomness for feed tests.

use std::collections::VecDeque;

use crate::feed::FeedRandom;

/// A [`FeedRandom`] that replays queued values.
///
/// Each draw pops the next value from its queue. Exhausted queues fall back
/// to the smallest legal draw: `min` for counts, `0` for indices and `0.0`
/// for changes. Queued values are clamped into the requested range.
#[derive(Debug, Default, Clone)]
pub struct ScriptedRandom {
    counts: VecDeque<usize>,
    indices: VecDeque<usize>,
    changes: VecDeque<f64>,
}

impl ScriptedRandom {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_counts(mut self, counts: impl IntoIterator<Item = usize>) -> Self {
        self.counts.extend(counts);
        self
    }

    pub fn with_indices(mut self, indices: impl IntoIterator<Item = usize>) -> Self {
        self.indices.extend(indices);
        self
    }

    pub fn with_changes(mut self, changes: impl IntoIterator<Item = f64>) -> Self {
        self.changes.extend(changes);
        self
    }
}

impl FeedRandom for ScriptedRandom {
    fn count_between(&mut self, min: usize, max: usize) -> usize {
        self.counts.pop_front().map_or(min, |c| c.clamp(min, max))
    }

    fn index_below(&mut self, len: usize) -> usize {
        self.indices.pop_front().map_or(0, |i| i.min(len - 1))
    }

    fn change_within(&mut self, max: f64) -> f64 {
        self.changes.pop_front().map_or(0.0, |c| c.clamp(-max, max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replays_then_falls_back() {
        let mut random = ScriptedRandom::new()
            .with_counts([4, 9])
            .with_indices([3])
            .with_changes([0.5]);

        assert_eq!(random.count_between(2, 5), 4);
        assert_eq!(random.count_between(2, 5), 5, "clamped to max");
        assert_eq!(random.count_between(2, 5), 2);

        assert_eq!(random.index_below(2), 1, "clamped below len");
        assert_eq!(random.index_below(2), 0);

        assert_eq!(random.change_within(0.05), 0.05);
        assert_eq!(random.change_within(0.05), 0.0);
    }
}
