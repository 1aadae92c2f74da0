//! Single-slot timer handles.
//!
//! Each playback controller (and each autoplay loop) owns exactly one
//! [`Timer`]: the next wake-up. Arming replaces whatever was pending, and
//! cancelling is idempotent. A cancelled arming can never fire, which is the
//! whole leak story: there is no other place a callback could hide.

use crate::clock::Millis;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(pub u64);

#[derive(Debug, Default)]
pub struct TimerSeq {
    next: u64,
}

impl TimerSeq {
    pub fn next_id(&mut self) -> TimerId {
        let id = TimerId(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }
}

#[derive(Debug, Clone)]
struct Armed<A> {
    id: TimerId,
    due: Millis,
    action: A,
}

/// A fired wake-up: the deadline it was scheduled for and its payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fired<A> {
    pub id: TimerId,
    pub due: Millis,
    pub action: A,
}

#[derive(Debug)]
pub struct Timer<A> {
    seq: TimerSeq,
    armed: Option<Armed<A>>,
}

impl<A> Default for Timer<A> {
    fn default() -> Self {
        Self {
            seq: TimerSeq::default(),
            armed: None,
        }
    }
}

impl<A> Timer<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `action` at `due`, dropping any pending arming.
    pub fn arm(&mut self, due: Millis, action: A) -> TimerId {
        let id = self.seq.next_id();
        self.armed = Some(Armed { id, due, action });
        id
    }

    /// Clears the pending wake-up. Returns `true` if one was pending.
    pub fn cancel(&mut self) -> bool {
        self.armed.take().is_some()
    }

    /// Clears the pending wake-up only if it is still the arming `id`.
    pub fn cancel_id(&mut self, id: TimerId) -> bool {
        if self.armed.as_ref().is_some_and(|armed| armed.id == id) {
            self.armed = None;
            true
        } else {
            false
        }
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    pub fn deadline(&self) -> Option<Millis> {
        self.armed.as_ref().map(|armed| armed.due)
    }

    /// Takes the pending wake-up if its deadline is at or before `now`.
    pub fn fire_due(&mut self, now: Millis) -> Option<Fired<A>> {
        if self.armed.as_ref().is_some_and(|armed| armed.due <= now) {
            self.armed.take().map(|armed| Fired {
                id: armed.id,
                due: armed.due,
                action: armed.action,
            })
        } else {
            None
        }
    }

    /// Disarms and returns the time that was left before the deadline.
    pub fn suspend(&mut self, now: Millis) -> Option<(Millis, A)> {
        self.armed
            .take()
            .map(|armed| (now.until(armed.due), armed.action))
    }
}
