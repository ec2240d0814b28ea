use std::error::Error;
use std::fmt;

use rand::Rng;
use tracing::{info, warn};

use crate::column::MAX_NUMBER;

/// Total number of balls in a lottery session.
pub const POOL_SIZE: usize = MAX_NUMBER as usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawError {
    /// Every number has already been drawn.
    ExhaustedPool,
    /// A delayed draw is still in flight.
    DrawPending,
}

impl fmt::Display for DrawError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrawError::ExhaustedPool => write!(f, "all {POOL_SIZE} numbers have been drawn"),
            DrawError::DrawPending => write!(f, "a draw is already in progress"),
        }
    }
}

impl Error for DrawError {}

/// How the drawn history is presented. Never affects the stored order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistoryOrder {
    /// Most recent first.
    #[default]
    Latest,
    /// Ascending numeric order.
    Ascending,
}

/// Lottery state: the numbers still in the pool and the draw order so far.
///
/// `pool` and `history` always partition `1..=75`.
#[derive(Debug, Clone)]
pub struct DrawEngine {
    pool: Vec<u8>,
    history: Vec<u8>,
}

impl Default for DrawEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawEngine {
    pub fn new() -> Self {
        DrawEngine {
            pool: (1..=MAX_NUMBER).collect(),
            history: Vec::with_capacity(POOL_SIZE),
        }
    }

    /// Draws one number uniformly from whatever is left in the pool.
    pub fn draw_next<R: Rng>(&mut self, rng: &mut R) -> Result<u8, DrawError> {
        if self.pool.is_empty() {
            warn!(drawn = self.history.len(), "draw refused: pool exhausted");
            return Err(DrawError::ExhaustedPool);
        }
        let index = rng.random_range(0..self.pool.len());
        let number = self.pool.swap_remove(index);
        self.history.push(number);
        info!(number, drawn = self.history.len(), "number drawn");
        Ok(number)
    }

    /// Puts every number back into the pool.
    pub fn reset_history(&mut self) {
        self.pool = (1..=MAX_NUMBER).collect();
        self.history.clear();
        info!("draw history reset");
    }

    /// Numbers in the order they were drawn.
    pub fn history(&self) -> &[u8] {
        &self.history
    }

    /// Numbers not drawn yet, in no particular order.
    pub fn pool(&self) -> &[u8] {
        &self.pool
    }

    pub fn remaining(&self) -> usize {
        self.pool.len()
    }

    pub fn is_exhausted(&self) -> bool {
        self.pool.is_empty()
    }

    /// The most recent draw.
    pub fn current(&self) -> Option<u8> {
        self.history.last().copied()
    }

    pub fn history_view(&self, order: HistoryOrder) -> Vec<u8> {
        let mut view = self.history.clone();
        match order {
            HistoryOrder::Latest => view.reverse(),
            HistoryOrder::Ascending => view.sort_unstable(),
        }
        view
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    #[test]
    fn draws_partition_the_pool() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut engine = DrawEngine::new();
        for k in 1..=POOL_SIZE {
            engine.draw_next(&mut rng).expect("pool not empty");
            let drawn: HashSet<u8> = engine.history().iter().copied().collect();
            assert_eq!(engine.history().len(), k);
            assert_eq!(drawn.len(), k, "history has duplicates");
            assert_eq!(engine.remaining(), POOL_SIZE - k);
            assert!(engine.pool().iter().all(|n| !drawn.contains(n)));
        }
        assert!(engine.is_exhausted());
    }

    #[test]
    fn seventy_sixth_draw_is_refused() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut engine = DrawEngine::new();
        for _ in 0..POOL_SIZE {
            engine.draw_next(&mut rng).unwrap();
        }
        let history = engine.history().to_vec();
        assert_eq!(engine.draw_next(&mut rng), Err(DrawError::ExhaustedPool));
        assert_eq!(engine.history(), history.as_slice());

        let mut sorted = history;
        sorted.sort_unstable();
        assert_eq!(sorted, (1..=75).collect::<Vec<u8>>());
    }

    #[test]
    fn reset_restores_full_pool() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut engine = DrawEngine::new();
        for _ in 0..10 {
            engine.draw_next(&mut rng).unwrap();
        }
        engine.reset_history();
        assert!(engine.history().is_empty());
        assert_eq!(engine.remaining(), POOL_SIZE);
        assert_eq!(engine.current(), None);
    }

    #[test]
    fn same_seed_same_draw_order() {
        let run = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut engine = DrawEngine::new();
            (0..20).map(|_| engine.draw_next(&mut rng).unwrap()).collect::<Vec<_>>()
        };
        assert_eq!(run(11), run(11));
    }

    #[test]
    fn history_views_leave_draw_order_alone() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut engine = DrawEngine::new();
        for _ in 0..8 {
            engine.draw_next(&mut rng).unwrap();
        }
        let original = engine.history().to_vec();

        let latest = engine.history_view(HistoryOrder::Latest);
        assert_eq!(latest.first().copied(), engine.current());
        assert_eq!(latest.iter().rev().copied().collect::<Vec<_>>(), original);

        let ascending = engine.history_view(HistoryOrder::Ascending);
        assert!(ascending.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(engine.history(), original.as_slice());
    }

    #[test]
    fn every_number_can_come_first() {
        // 75 * 40 trials; each number should show up as the first draw.
        let mut rng = StdRng::seed_from_u64(99);
        let mut seen = HashSet::new();
        for _ in 0..POOL_SIZE * 40 {
            let mut engine = DrawEngine::new();
            seen.insert(engine.draw_next(&mut rng).unwrap());
        }
        assert_eq!(seen.len(), POOL_SIZE);
    }
}
