//! Time source for time-based constraints

use chrono::{DateTime, Utc};

/// Supplies the current instant
pub trait Clock: Send + Sync {
    /// Current time
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[inline]
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock stuck at a fixed instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrozenClock {
    now: DateTime<Utc>,
}

impl FrozenClock {
    /// Clock that always reports `now`
    #[must_use]
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now }
    }

    /// Clock frozen at the current wall-clock time
    #[must_use]
    pub fn from_utc() -> Self {
        Self::new(Utc::now())
    }
}

impl Clock for FrozenClock {
    #[inline]
    fn now(&self) -> DateTime<Utc> {
        self.now
    }
}
