use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use tracing::warn;

use crate::draw::{DrawEngine, DrawError, HistoryOrder};

/// Wraps a [`DrawEngine`] with the cosmetic draw delay.
///
/// A draw is started with [`Lottery::begin_draw`] and resolved by polling
/// once the delay has elapsed. Only one draw may be pending at a time.
pub struct Lottery {
    engine: DrawEngine,
    rng: StdRng,
    delay: Duration,
    pending: Option<Instant>,
    order: HistoryOrder,
}

impl Lottery {
    pub fn new(rng: StdRng, delay: Duration) -> Self {
        Lottery {
            engine: DrawEngine::new(),
            rng,
            delay,
            pending: None,
            order: HistoryOrder::default(),
        }
    }

    /// Starts a draw and returns the instant it becomes ready.
    pub fn begin_draw(&mut self, now: Instant) -> Result<Instant, DrawError> {
        if self.pending.is_some() {
            warn!("draw refused: another draw is pending");
            return Err(DrawError::DrawPending);
        }
        if self.engine.is_exhausted() {
            warn!("draw refused: pool exhausted");
            return Err(DrawError::ExhaustedPool);
        }
        let ready_at = now + self.delay;
        self.pending = Some(ready_at);
        Ok(ready_at)
    }

    /// Completes the pending draw if its delay has elapsed.
    ///
    /// Returns `None` while nothing is pending or the delay is still running.
    pub fn poll(&mut self, now: Instant) -> Option<Result<u8, DrawError>> {
        let ready_at = self.pending?;
        if now < ready_at {
            return None;
        }
        self.pending = None;
        Some(self.engine.draw_next(&mut self.rng))
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Clears the history. A pending draw still resolves, against the full pool.
    pub fn reset(&mut self) {
        self.engine.reset_history();
    }

    pub fn engine(&self) -> &DrawEngine {
        &self.engine
    }

    pub fn order(&self) -> HistoryOrder {
        self.order
    }

    pub fn set_order(&mut self, order: HistoryOrder) {
        self.order = order;
    }

    pub fn sorted_history(&self) -> Vec<u8> {
        self.engine.history_view(self.order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::POOL_SIZE;
    use rand::SeedableRng;

    fn lottery(delay_ms: u64) -> Lottery {
        Lottery::new(StdRng::seed_from_u64(42), Duration::from_millis(delay_ms))
    }

    #[test]
    fn draw_resolves_only_after_delay() {
        let mut lottery = lottery(1000);
        let start = Instant::now();
        let ready_at = lottery.begin_draw(start).unwrap();
        assert_eq!(ready_at, start + Duration::from_millis(1000));

        assert!(lottery.poll(start + Duration::from_millis(999)).is_none());
        assert!(lottery.is_pending());
        assert!(lottery.engine().history().is_empty());

        let number = lottery.poll(ready_at).unwrap().unwrap();
        assert!(!lottery.is_pending());
        assert_eq!(lottery.engine().current(), Some(number));
    }

    #[test]
    fn second_draw_while_pending_is_refused() {
        let mut lottery = lottery(500);
        let start = Instant::now();
        lottery.begin_draw(start).unwrap();
        assert_eq!(lottery.begin_draw(start), Err(DrawError::DrawPending));

        lottery.poll(start + Duration::from_millis(500)).unwrap().unwrap();
        assert_eq!(lottery.engine().history().len(), 1);
    }

    #[test]
    fn poll_without_pending_draw_is_idle() {
        let mut lottery = lottery(0);
        assert!(lottery.poll(Instant::now()).is_none());
    }

    #[test]
    fn exhausted_lottery_refuses_to_start() {
        let mut lottery = lottery(0);
        let now = Instant::now();
        for _ in 0..POOL_SIZE {
            lottery.begin_draw(now).unwrap();
            lottery.poll(now).unwrap().unwrap();
        }
        assert_eq!(lottery.begin_draw(now), Err(DrawError::ExhaustedPool));
        assert!(!lottery.is_pending());
    }

    #[test]
    fn reset_keeps_sort_order() {
        let mut lottery = lottery(0);
        let now = Instant::now();
        lottery.set_order(HistoryOrder::Ascending);
        for _ in 0..3 {
            lottery.begin_draw(now).unwrap();
            lottery.poll(now);
        }
        lottery.reset();
        assert!(lottery.sorted_history().is_empty());
        assert_eq!(lottery.order(), HistoryOrder::Ascending);
    }
}
