//! Generation rate limiting.

use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Default minimum interval between admitted generation calls.
pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_secs(5);

/// Minimum-interval limiter for expensive generation calls.
///
/// An owned, lock-guarded value injected into the pipeline, so tests
/// construct isolated instances. Check-and-record is a single atomic
/// step under the mutex: two callers can never both be admitted inside
/// one interval.
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    last: Mutex<Option<Instant>>,
}

impl RateLimiter {
    /// Create a limiter with the given minimum interval.
    #[must_use]
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last: Mutex::new(None),
        }
    }

    /// Admit a call at the current time.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn admit(&self) -> bool {
        self.admit_at(Instant::now())
    }

    /// Admit a call at `now`, recording it as the new last-call time on
    /// success. State is unchanged on rejection.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn admit_at(&self, now: Instant) -> bool {
        let mut last = self.last.lock().unwrap();
        match *last {
            Some(prev) if now.duration_since(prev) < self.min_interval => false,
            _ => {
                *last = Some(now);
                true
            }
        }
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_call_admitted() {
        let limiter = RateLimiter::default();
        assert!(limiter.admit_at(Instant::now()));
    }

    #[test]
    fn test_call_inside_interval_rejected() {
        let limiter = RateLimiter::new(Duration::from_secs(5));
        let t = Instant::now();

        assert!(limiter.admit_at(t));
        assert!(!limiter.admit_at(t + Duration::from_secs(2)));
        assert!(limiter.admit_at(t + Duration::from_secs(6)));
    }

    #[test]
    fn test_rejection_leaves_state_unchanged() {
        let limiter = RateLimiter::new(Duration::from_secs(5));
        let t = Instant::now();

        assert!(limiter.admit_at(t));
        assert!(!limiter.admit_at(t + Duration::from_secs(2)));
        // Interval still measured from t, not from the rejected call.
        assert!(limiter.admit_at(t + Duration::from_secs(5)));
    }

    #[test]
    fn test_interval_measured_from_last_admission() {
        let limiter = RateLimiter::new(Duration::from_secs(5));
        let t = Instant::now();

        assert!(limiter.admit_at(t));
        assert!(limiter.admit_at(t + Duration::from_secs(5)));
        assert!(!limiter.admit_at(t + Duration::from_secs(9)));
        assert!(limiter.admit_at(t + Duration::from_secs(10)));
    }
}
