use crate::utils::{compute_pool_index, derive_sample_seed};

/// Repeating task that drives the rolling animation.
///
/// The ticker owns no thread or timer of its own. The caller feeds it the
/// current time of its event loop through `poll`, and it reports how many
/// intervals have elapsed since the last due point.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RollingTicker {
    interval: u64,
    /// `Some` while armed.
    next_due: Option<u64>,
}

impl RollingTicker {
    pub fn new(interval: u64) -> Self {
        Self {
            interval: interval.max(1),
            next_due: None,
        }
    }

    pub fn interval(&self) -> u64 {
        self.interval
    }

    pub fn is_running(&self) -> bool {
        self.next_due.is_some()
    }

    /// Arms the ticker. Returns `false` without touching the schedule if it
    /// was already armed.
    pub fn start(&mut self, now: u64) -> bool {
        if self.is_running() {
            return false;
        }
        self.next_due = Some(now.saturating_add(self.interval));
        true
    }

    /// Disarms the ticker. Safe to call any number of times; returns whether
    /// it was armed.
    pub fn cancel(&mut self) -> bool {
        self.next_due.take().is_some()
    }

    /// Number of ticks that fell due up to `now`. Missed ticks are collapsed
    /// into the count and the next due point is moved past `now`.
    pub fn poll(&mut self, now: u64) -> u64 {
        let Some(due) = self.next_due else {
            return 0;
        };
        if now < due {
            return 0;
        }
        let fired = (now - due) / self.interval + 1;
        self.next_due = Some(due.saturating_add(fired.saturating_mul(self.interval)));
        fired
    }
}

/// Uniform sampler over the remaining pool.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DrawSampler {
    seed: [u8; 32],
    counter: u64,
}

impl DrawSampler {
    pub fn new(seed: [u8; 32]) -> Self {
        Self { seed, counter: 0 }
    }

    /// Picks an index into a pool of `len` entries, or `None` if it is empty.
    pub fn next_index(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        let random_bytes = derive_sample_seed(&self.seed, self.counter);
        self.counter = self.counter.wrapping_add(1);
        Some(compute_pool_index(&random_bytes, len))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticker_fires_on_interval() {
        let mut ticker = RollingTicker::new(50);
        assert_eq!(ticker.poll(1_000), 0);

        assert!(ticker.start(100));
        assert_eq!(ticker.poll(149), 0);
        assert_eq!(ticker.poll(150), 1);
        assert_eq!(ticker.poll(160), 0);
        // 200, 250 and 300 all fell due
        assert_eq!(ticker.poll(300), 3);
        assert_eq!(ticker.poll(349), 0);
    }

    #[test]
    fn test_ticker_double_start_keeps_schedule() {
        let mut ticker = RollingTicker::new(50);
        assert!(ticker.start(0));
        assert!(!ticker.start(40));
        assert_eq!(ticker.poll(50), 1);
    }

    #[test]
    fn test_ticker_cancel_is_idempotent() {
        let mut ticker = RollingTicker::new(50);
        assert!(!ticker.cancel());

        ticker.start(0);
        assert!(ticker.cancel());
        assert!(!ticker.cancel());
        assert!(!ticker.is_running());
        assert_eq!(ticker.poll(500), 0);
    }

    #[test]
    fn test_sampler_is_reproducible() {
        let mut a = DrawSampler::new([9u8; 32]);
        let mut b = DrawSampler::new([9u8; 32]);
        let from_a: Vec<_> = (0..20).map(|_| a.next_index(7)).collect();
        let from_b: Vec<_> = (0..20).map(|_| b.next_index(7)).collect();
        assert_eq!(from_a, from_b);
        assert!(from_a.iter().all(|i| matches!(i, Some(i) if *i < 7)));
    }

    #[test]
    fn test_sampler_empty_pool() {
        let mut sampler = DrawSampler::new([0u8; 32]);
        assert_eq!(sampler.next_index(0), None);
    }
}
