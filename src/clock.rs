//! Time source used by stores to stamp and expire invitations.

use std::sync::{Arc, RwLock};

use chrono::{DateTime, Duration, Utc};

/// Source of the current time.
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time via [`Utc::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same instant, so a test can hand one clone to a store and
/// keep another to advance time.
///
/// ```rust
/// use chrono::{Duration, TimeZone, Utc};
/// use rosterly::{Clock, ManualClock};
///
/// let start = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
/// let clock = ManualClock::new(start);
/// clock.advance(Duration::hours(1));
/// assert_eq!(clock.now(), start + Duration::hours(1));
/// ```
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<RwLock<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(RwLock::new(start)),
        }
    }

    /// Moves the clock to `instant`.
    pub fn set(&self, instant: DateTime<Utc>) {
        let mut now = self.now.write().unwrap_or_else(|e| e.into_inner());
        *now = instant;
    }

    /// Moves the clock forward by `by`.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.write().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.read().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_manual_clock_shared_between_clones() {
        let start = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let clock = ManualClock::new(start);
        let handle = clock.clone();

        handle.advance(Duration::days(8));
        assert_eq!(clock.now(), start + Duration::days(8));

        handle.set(start);
        assert_eq!(clock.now(), start);
    }

    #[test]
    fn test_system_clock_moves_forward() {
        let clock = SystemClock;
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
