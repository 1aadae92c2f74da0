//! Time sources for playback.
//!
//! The playback engine never reads a clock itself. Callers sample a [`Clock`]
//! and pass the resulting [`Millis`] into every operation, which keeps the
//! engine deterministic and lets tests drive it with a [`ManualClock`].

use std::cell::Cell;
use std::fmt;
use std::ops::{Add, Sub};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// Milliseconds since an arbitrary origin chosen by the clock.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Millis(pub u64);

impl Millis {
    pub const ZERO: Millis = Millis(0);

    pub fn as_duration(self) -> Duration {
        Duration::from_millis(self.0)
    }

    /// Time remaining until `deadline`, zero if it has already passed.
    pub fn until(self, deadline: Millis) -> Millis {
        Millis(deadline.0.saturating_sub(self.0))
    }
}

impl Add<u64> for Millis {
    type Output = Millis;

    fn add(self, rhs: u64) -> Millis {
        Millis(self.0.saturating_add(rhs))
    }
}

impl Add<Millis> for Millis {
    type Output = Millis;

    fn add(self, rhs: Millis) -> Millis {
        Millis(self.0.saturating_add(rhs.0))
    }
}

impl Sub<Millis> for Millis {
    type Output = Millis;

    fn sub(self, rhs: Millis) -> Millis {
        Millis(self.0.saturating_sub(rhs.0))
    }
}

impl fmt::Display for Millis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

/// A monotonic millisecond clock.
pub trait Clock {
    fn now(&self) -> Millis;
}

/// Wall clock backed by [`Instant`], origin at construction.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    /// Converts a clock reading back into an `Instant` (used for poll timeouts).
    pub fn instant_at(&self, at: Millis) -> Instant {
        self.origin + at.as_duration()
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Millis {
        Millis(self.origin.elapsed().as_millis() as u64)
    }
}

/// Fake clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<u64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, ms: u64) -> Millis {
        self.now.set(self.now.get().saturating_add(ms));
        self.now()
    }

    /// Moves the clock forward to `at`. Never moves it backwards.
    pub fn set(&self, at: Millis) {
        self.now.set(self.now.get().max(at.0));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Millis {
        Millis(self.now.get())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_advances() {
        let clock = ManualClock::new();
        assert_eq!(clock.now(), Millis::ZERO);
        clock.advance(60);
        clock.advance(40);
        assert_eq!(clock.now(), Millis(100));
    }

    #[test]
    fn test_manual_clock_set_is_monotonic() {
        let clock = ManualClock::new();
        clock.set(Millis(500));
        clock.set(Millis(200));
        assert_eq!(clock.now(), Millis(500));
    }

    #[test]
    fn test_until_saturates() {
        assert_eq!(Millis(100).until(Millis(40)), Millis::ZERO);
        assert_eq!(Millis(40).until(Millis(100)), Millis(60));
    }
}
