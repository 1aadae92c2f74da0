use super::{Autoplay, Controller, PlaybackError, PlaybackEvent, PlaybackState};
use crate::clock::Millis;
use crate::script::Script;

/// A controller plus its optional autoplay loop, driven as one unit.
///
/// This is what front-ends hold: user intents map onto these methods and the
/// front-end only has to call [`Session::tick`] at [`Session::next_deadline`].
#[derive(Debug)]
pub struct Session {
    controller: Controller,
    autoplay: Autoplay,
    /// Attach autoplay whenever playback starts.
    autoplay_wanted: bool,
}

impl Session {
    pub fn new(script: Script, autoplay_interval_ms: u64) -> Self {
        Self {
            controller: Controller::new(script),
            autoplay: Autoplay::new(autoplay_interval_ms),
            autoplay_wanted: false,
        }
    }

    #[must_use]
    pub fn with_autoplay(mut self, wanted: bool) -> Self {
        self.autoplay_wanted = wanted;
        self
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    pub fn script(&self) -> &Script {
        self.controller.script()
    }

    pub fn state(&self) -> &PlaybackState {
        self.controller.state()
    }

    pub fn autoplay_wanted(&self) -> bool {
        self.autoplay_wanted
    }

    pub fn autoplay_active(&self) -> bool {
        self.autoplay.is_active()
    }

    /// Earliest pending wake-up of either timer.
    pub fn next_deadline(&self) -> Option<Millis> {
        match (self.controller.next_deadline(), self.autoplay.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// True when any wake-up is armed or suspended.
    pub fn has_pending_wakeup(&self) -> bool {
        self.controller.has_pending_wakeup() || self.autoplay.is_active()
    }

    pub fn start(&mut self, now: Millis) -> Vec<PlaybackEvent> {
        if self.controller.is_playing() {
            return Vec::new();
        }
        let mut events = self.autoplay.cancel(now, &mut self.controller);
        events.extend(self.controller.start(now));
        if self.autoplay_wanted {
            events.extend(self.autoplay.start(now, &mut self.controller));
        }
        events
    }

    pub fn pause(&mut self, now: Millis) -> Vec<PlaybackEvent> {
        self.autoplay.pause(now);
        self.controller.pause(now)
    }

    pub fn resume(&mut self, now: Millis) -> Vec<PlaybackEvent> {
        let events = self.controller.resume(now);
        self.autoplay.resume(now);
        events
    }

    /// Start, pause or resume, whichever fits the current state.
    pub fn play_pause(&mut self, now: Millis) -> Vec<PlaybackEvent> {
        if self.controller.is_playing() {
            self.pause(now)
        } else if self.controller.is_paused() {
            self.resume(now)
        } else {
            self.start(now)
        }
    }

    /// Cancels both timers and returns to idle.
    pub fn reset(&mut self, now: Millis) -> Vec<PlaybackEvent> {
        let mut events = self.controller.reset();
        events.extend(self.autoplay.cancel(now, &mut self.controller));
        events
    }

    /// Manual stage selection. Detaches autoplay.
    ///
    /// # Errors
    /// Returns `StageOutOfRange` when `index` is not a stage.
    pub fn jump_to_stage(
        &mut self,
        index: usize,
        now: Millis,
    ) -> Result<Vec<PlaybackEvent>, PlaybackError> {
        self.autoplay_wanted = false;
        let mut events = self.autoplay.cancel(now, &mut self.controller);
        events.extend(self.controller.jump_to_stage(index)?);
        Ok(events)
    }

    pub fn next_stage(&mut self, now: Millis) -> Result<Vec<PlaybackEvent>, PlaybackError> {
        let state = self.controller.state();
        let last = self.script().stage_count() - 1;
        let target = if state.is_idle() {
            0
        } else {
            (state.stage_index + 1).min(last)
        };
        self.jump_to_stage(target, now)
    }

    pub fn previous_stage(&mut self, now: Millis) -> Result<Vec<PlaybackEvent>, PlaybackError> {
        let target = self.controller.state().stage_index.saturating_sub(1);
        self.jump_to_stage(target, now)
    }

    /// Turns autoplay on or off, attaching or detaching it immediately.
    pub fn toggle_autoplay(&mut self, now: Millis) -> Vec<PlaybackEvent> {
        self.autoplay_wanted = !self.autoplay_wanted;
        if self.autoplay_wanted {
            self.autoplay.start(now, &mut self.controller)
        } else {
            self.autoplay.cancel(now, &mut self.controller)
        }
    }

    /// Fires everything due at or before `now`, interleaving both timers in
    /// deadline order. Autoplay is detached once playback completes so no
    /// wake-up outlives the run.
    pub fn tick(&mut self, now: Millis) -> Vec<PlaybackEvent> {
        let mut events = self.autoplay.tick(now, &mut self.controller);
        events.extend(self.controller.tick(now));
        if self.controller.state().is_complete() && self.autoplay.is_active() {
            events.extend(self.autoplay.cancel(now, &mut self.controller));
        }
        events
    }
}
