use super::{Controller, Phase, PlaybackEvent, StageAdvance};
use crate::clock::Millis;
use crate::timer::Timer;

/// Moves a controller to the next stage on a fixed interval, whether or not
/// typing has finished.
///
/// While attached the controller is switched to [`StageAdvance::External`] so
/// the two never race to change stage.
#[derive(Debug)]
pub struct Autoplay {
    interval_ms: u64,
    timer: Timer<()>,
    /// Time left on the interval when paused.
    held: Option<Millis>,
}

impl Autoplay {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms: interval_ms.max(1),
            timer: Timer::new(),
            held: None,
        }
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    /// Armed or paused.
    pub fn is_active(&self) -> bool {
        self.timer.is_armed() || self.held.is_some()
    }

    pub fn is_paused(&self) -> bool {
        self.held.is_some()
    }

    pub fn deadline(&self) -> Option<Millis> {
        self.timer.deadline()
    }

    /// Attaches to `controller` and arms the first interval.
    ///
    /// An idle or finished controller is started from stage 0; a paused one
    /// is resumed.
    pub fn start(&mut self, now: Millis, controller: &mut Controller) -> Vec<PlaybackEvent> {
        let mut events = controller.set_stage_advance(StageAdvance::External, now);
        match controller.phase() {
            Phase::Idle | Phase::Complete => events.extend(controller.start(now)),
            _ if !controller.is_playing() => events.extend(controller.resume(now)),
            _ => {}
        }
        self.held = None;
        self.timer.arm(now + self.interval_ms, ());
        tracing::debug!(
            target: "unveil::playback",
            interval_ms = self.interval_ms,
            "autoplay started"
        );
        events
    }

    /// Suspends the interval. Returns `false` if nothing was armed.
    pub fn pause(&mut self, now: Millis) -> bool {
        match self.timer.suspend(now) {
            Some((left, ())) => {
                self.held = Some(left);
                true
            }
            None => false,
        }
    }

    /// Re-arms a paused interval with the time it had left.
    pub fn resume(&mut self, now: Millis) -> bool {
        match self.held.take() {
            Some(left) => {
                self.timer.arm(now + left, ());
                true
            }
            None => false,
        }
    }

    /// Disarms and hands stage changes back to the controller.
    pub fn cancel(&mut self, now: Millis, controller: &mut Controller) -> Vec<PlaybackEvent> {
        let was_active = self.timer.cancel() | self.held.take().is_some();
        if was_active {
            tracing::debug!(target: "unveil::playback", "autoplay cancelled");
        }
        controller.set_stage_advance(StageAdvance::Natural, now)
    }

    /// Fires every interval due at or before `now`.
    ///
    /// The controller is first brought up to each interval's deadline so both
    /// timers are replayed in order. A fire that finds the controller
    /// complete or stopped is swallowed and disarms autoplay.
    pub fn tick(&mut self, now: Millis, controller: &mut Controller) -> Vec<PlaybackEvent> {
        let mut events = Vec::new();
        while let Some(fired) = self.timer.fire_due(now) {
            events.extend(controller.tick(fired.due));

            if controller.phase() == Phase::Complete || !controller.is_playing() {
                tracing::debug!(
                    target: "unveil::playback",
                    at = %fired.due,
                    "autoplay fire swallowed"
                );
                events.extend(controller.set_stage_advance(StageAdvance::Natural, fired.due));
                break;
            }

            let on_last = controller.state().stage_index + 1 >= controller.script().stage_count();
            events.extend(controller.advance_stage(fired.due));
            if on_last {
                events.extend(controller.set_stage_advance(StageAdvance::Natural, fired.due));
                break;
            }
            self.timer.arm(fired.due + self.interval_ms, ());
        }
        events
    }
}
