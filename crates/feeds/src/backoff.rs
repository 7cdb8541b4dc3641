//! Reconnection retry schedule.

use std::time::Duration;

/// What to do after a recorded connection failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Attempt to reconnect after this delay.
    RetryAfter(Duration),
    /// The retry budget is exhausted; fall back to the synthetic generator.
    GiveUp,
}

/// Counts consecutive connection failures and produces capped exponential
/// backoff delays.
///
/// The counter resets on a successful connection and is never persisted;
/// each controller instance starts fresh.
#[derive(Debug, Clone)]
pub struct RetrySchedule {
    attempts: u32,
    max_attempts: u32,
    base: Duration,
    cap: Duration,
}

impl RetrySchedule {
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;
    pub const DEFAULT_BASE: Duration = Duration::from_secs(1);
    pub const DEFAULT_CAP: Duration = Duration::from_secs(30);

    pub fn new(max_attempts: u32, base: Duration, cap: Duration) -> Self {
        Self {
            attempts: 0,
            max_attempts,
            base,
            cap,
        }
    }

    /// Delay for failure number `n` (0-based): `min(cap, base * 2^n)`.
    pub fn delay_for(&self, n: u32) -> Duration {
        let factor = 1u32.checked_shl(n).unwrap_or(u32::MAX);
        self.base.saturating_mul(factor).min(self.cap)
    }

    /// Record one failure; returns the backoff delay for it, or `GiveUp`
    /// once the budget is exhausted.
    pub fn record_failure(&mut self) -> RetryDecision {
        let n = self.attempts;
        self.attempts += 1;
        if self.attempts >= self.max_attempts {
            RetryDecision::GiveUp
        } else {
            RetryDecision::RetryAfter(self.delay_for(n))
        }
    }

    /// Reset after a successful connection.
    pub fn reset(&mut self) {
        self.attempts = 0;
    }

    /// Consecutive failures since the last success.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }
}

impl Default for RetrySchedule {
    fn default() -> Self {
        Self::new(
            Self::DEFAULT_MAX_ATTEMPTS,
            Self::DEFAULT_BASE,
            Self::DEFAULT_CAP,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_delay_schedule_monotonic_and_capped() {
        let schedule = RetrySchedule::default();

        let mut previous = Duration::ZERO;
        for n in 0..10 {
            let delay = schedule.delay_for(n);
            let expected_ms = (1000u64 << n).min(30_000);
            assert_eq!(delay, Duration::from_millis(expected_ms), "failure {n}");
            assert!(delay >= previous);
            previous = delay;
        }

        // Spelled out for failures 0..4.
        assert_eq!(schedule.delay_for(0), Duration::from_secs(1));
        assert_eq!(schedule.delay_for(1), Duration::from_secs(2));
        assert_eq!(schedule.delay_for(2), Duration::from_secs(4));
        assert_eq!(schedule.delay_for(3), Duration::from_secs(8));
        assert_eq!(schedule.delay_for(4), Duration::from_secs(16));
    }

    #[test]
    fn test_delay_never_overflows() {
        let schedule = RetrySchedule::default();
        assert_eq!(schedule.delay_for(63), Duration::from_secs(30));
        assert_eq!(schedule.delay_for(u32::MAX), Duration::from_secs(30));
    }

    #[test]
    fn test_gives_up_after_max_attempts_exactly_once() {
        let mut schedule = RetrySchedule::default();

        for n in 0..4 {
            match schedule.record_failure() {
                RetryDecision::RetryAfter(delay) => {
                    assert_eq!(delay, Duration::from_millis(1000 << n));
                }
                RetryDecision::GiveUp => panic!("gave up early at failure {n}"),
            }
        }

        // Fifth consecutive failure exhausts the budget.
        assert_eq!(schedule.record_failure(), RetryDecision::GiveUp);
        assert_eq!(schedule.attempts(), 5);
    }

    #[test]
    fn test_reset_on_success() {
        let mut schedule = RetrySchedule::default();
        schedule.record_failure();
        schedule.record_failure();
        assert_eq!(schedule.attempts(), 2);

        schedule.reset();
        assert_eq!(schedule.attempts(), 0);
        assert_eq!(
            schedule.record_failure(),
            RetryDecision::RetryAfter(Duration::from_secs(1))
        );
    }
}
