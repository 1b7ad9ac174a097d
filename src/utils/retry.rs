// Linear retry schedule for the provider race
// Author: kelexine (https://github.com/kelexine)

use backoff::backoff::Backoff;
use std::time::Duration;

/// Linear backoff: after failed attempt `n` wait `n * base` before the next one.
///
/// With three attempts and a 2s base the waits are 2s then 4s, and the
/// schedule yields `None` once the final attempt has been spent.
#[derive(Debug, Clone)]
pub struct LinearBackoff {
    base: Duration,
    max_attempts: u32,
    completed: u32,
}

impl LinearBackoff {
    pub fn new(base: Duration, max_attempts: u32) -> Self {
        Self {
            base,
            max_attempts,
            completed: 0,
        }
    }

    /// Number of failed attempts recorded so far.
    pub fn attempts(&self) -> u32 {
        self.completed
    }
}

impl Backoff for LinearBackoff {
    fn reset(&mut self) {
        self.completed = 0;
    }

    fn next_backoff(&mut self) -> Option<Duration> {
        self.completed += 1;
        if self.completed >= self.max_attempts {
            return None;
        }
        Some(self.base.saturating_mul(self.completed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_schedule() {
        let mut backoff = LinearBackoff::new(Duration::from_millis(2000), 3);
        assert_eq!(backoff.next_backoff(), Some(Duration::from_millis(2000)));
        assert_eq!(backoff.next_backoff(), Some(Duration::from_millis(4000)));
        assert_eq!(backoff.next_backoff(), None);
        assert_eq!(backoff.attempts(), 3);
    }

    #[test]
    fn test_single_attempt_never_waits() {
        let mut backoff = LinearBackoff::new(Duration::from_secs(2), 1);
        assert_eq!(backoff.next_backoff(), None);
    }

    #[test]
    fn test_reset() {
        let mut backoff = LinearBackoff::new(Duration::from_secs(1), 3);
        backoff.next_backoff();
        backoff.next_backoff();
        backoff.reset();
        assert_eq!(backoff.next_backoff(), Some(Duration::from_secs(1)));
    }

    #[test]
    fn test_huge_base_saturates() {
        let mut backoff = LinearBackoff::new(Duration::MAX, 3);
        assert_eq!(backoff.next_backoff(), Some(Duration::MAX));
        assert_eq!(backoff.next_backoff(), Some(Duration::MAX));
        assert_eq!(backoff.next_backoff(), None);
    }
}
