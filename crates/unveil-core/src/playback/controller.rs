use std::mem;

use super::{Phase, PlaybackError, PlaybackEvent, PlaybackState, StageAdvance};
use crate::clock::Millis;
use crate::script::{Line, Script};
use crate::timer::Timer;
use crate::typewriter::Typewriter;

/// What the single pending wake-up will do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Wake {
    /// Reveal the next character of the current line.
    Reveal,
    /// The current line's pause is over.
    PauseElapsed,
}

/// Drives one script through its stages.
///
/// The controller owns exactly one [`Timer`]. Every operation takes the
/// current time; nothing happens between calls. Overdue wake-ups are replayed
/// in deadline order by [`Controller::tick`], each scheduling its successor
/// from its own deadline, so the trajectory does not depend on how often the
/// caller ticks.
#[derive(Debug)]
pub struct Controller {
    script: Script,
    state: PlaybackState,
    writer: Typewriter,
    timer: Timer<Wake>,
    /// Wake-up suspended by `pause`, with the time it had left.
    held: Option<(Millis, Wake)>,
    advance: StageAdvance,
    outbox: Vec<PlaybackEvent>,
}

impl Controller {
    pub fn new(script: Script) -> Self {
        let writer = writer_for(&script, 0, 0);
        Self {
            script,
            state: PlaybackState::default(),
            writer,
            timer: Timer::new(),
            held: None,
            advance: StageAdvance::Natural,
            outbox: Vec::new(),
        }
    }

    pub fn script(&self) -> &Script {
        &self.script
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn is_playing(&self) -> bool {
        self.state.is_playing
    }

    pub fn stage_advance(&self) -> StageAdvance {
        self.advance
    }

    /// The line under the cursor.
    pub fn current_line(&self) -> Option<&Line> {
        self.script.line(self.state.stage_index, self.state.line_index)
    }

    /// Deadline of the pending wake-up, if any.
    pub fn next_deadline(&self) -> Option<Millis> {
        self.timer.deadline()
    }

    pub fn has_pending_wakeup(&self) -> bool {
        self.timer.is_armed()
    }

    /// Paused by the user (as opposed to idle, complete or held).
    pub fn is_paused(&self) -> bool {
        !self.state.is_playing
            && matches!(self.state.phase, Phase::TypingLine | Phase::LinePaused)
    }

    /// Playing but parked at the end of a stage, waiting for autoplay.
    pub fn is_holding(&self) -> bool {
        self.state.is_playing
            && self.advance == StageAdvance::External
            && self.state.phase == Phase::LinePaused
            && !self.timer.is_armed()
            && self.state.is_stage_complete(self.state.stage_index)
    }

    /// Starts from the first line of stage 0.
    ///
    /// A no-op while already playing; from any other state it restarts.
    pub fn start(&mut self, now: Millis) -> Vec<PlaybackEvent> {
        if self.state.is_playing {
            tracing::trace!(target: "unveil::playback", "start ignored, already playing");
            return Vec::new();
        }
        self.clear_timers();
        self.state = PlaybackState {
            is_playing: true,
            ..PlaybackState::default()
        };
        tracing::debug!(target: "unveil::playback", script = %self.script.id, at = %now, "started");
        self.emit(PlaybackEvent::Started);
        self.enter_stage(0);
        self.begin_line(0, now);
        self.drain()
    }

    /// Suspends the pending wake-up, remembering how long it had left.
    pub fn pause(&mut self, now: Millis) -> Vec<PlaybackEvent> {
        if !self.state.is_playing || self.is_terminal() {
            return Vec::new();
        }
        self.held = self.timer.suspend(now);
        self.state.is_playing = false;
        tracing::debug!(
            target: "unveil::playback",
            stage = self.state.stage_index,
            line = self.state.line_index,
            remaining = ?self.held.map(|(left, _)| left),
            "paused"
        );
        self.emit(PlaybackEvent::Paused);
        self.drain()
    }

    /// Continues a paused or jumped-to playback.
    ///
    /// A suspended wake-up is re-armed with its remaining time. A stage shown
    /// by `jump_to_stage` continues with the next stage.
    pub fn resume(&mut self, now: Millis) -> Vec<PlaybackEvent> {
        if self.state.is_playing || self.is_terminal() {
            return Vec::new();
        }
        self.state.is_playing = true;
        self.emit(PlaybackEvent::Resumed);
        match self.held.take() {
            Some((left, wake)) => {
                self.timer.arm(now + left, wake);
            }
            None if self.is_holding() => {}
            None => {
                self.timer.arm(now, Wake::PauseElapsed);
            }
        }
        tracing::debug!(target: "unveil::playback", stage = self.state.stage_index, "resumed");
        self.drain()
    }

    /// Shows stage `index` fully typed and stops.
    ///
    /// Stages before `index` count as completed. Any in-flight typing is
    /// dropped without being finished.
    ///
    /// # Errors
    /// Returns `StageOutOfRange` when `index` is not a stage.
    pub fn jump_to_stage(&mut self, index: usize) -> Result<Vec<PlaybackEvent>, PlaybackError> {
        self.check_stage(index)?;
        self.clear_timers();
        let last = self.last_line_of(index);
        self.state.is_playing = false;
        self.state.stage_index = index;
        self.state.line_index = last;
        self.state.completed_stages = (0..index).collect();
        self.writer = writer_for(&self.script, index, last);
        self.writer.finish();
        self.sync_prefix();
        self.state.phase = Phase::LinePaused;
        tracing::debug!(target: "unveil::playback", stage = index, "jumped");
        self.emit(PlaybackEvent::Jumped { stage: index });
        Ok(self.drain())
    }

    /// Types stage `index` from its first line, playing.
    ///
    /// # Errors
    /// Returns `StageOutOfRange` when `index` is not a stage.
    pub fn play_stage(
        &mut self,
        index: usize,
        now: Millis,
    ) -> Result<Vec<PlaybackEvent>, PlaybackError> {
        self.check_stage(index)?;
        self.clear_timers();
        self.state.is_playing = true;
        self.state.completed_stages = (0..index).collect();
        self.enter_stage(index);
        self.begin_line(0, now);
        Ok(self.drain())
    }

    /// Marks the current stage complete and moves on regardless of typing.
    ///
    /// On the last stage this completes the playback.
    pub fn advance_stage(&mut self, now: Millis) -> Vec<PlaybackEvent> {
        if self.state.phase == Phase::Complete {
            return Vec::new();
        }
        let stage = self.state.stage_index;
        self.mark_complete(stage);
        if stage + 1 < self.script.stage_count() {
            self.clear_timers();
            self.state.is_playing = true;
            self.enter_stage(stage + 1);
            self.begin_line(0, now);
        } else {
            self.show_stage_typed(stage);
            self.finish();
        }
        self.drain()
    }

    /// Cancels every pending wake-up and returns to the initial state.
    pub fn reset(&mut self) -> Vec<PlaybackEvent> {
        let had_timer = self.clear_timers();
        self.state = PlaybackState::default();
        self.writer = writer_for(&self.script, 0, 0);
        tracing::debug!(target: "unveil::playback", cancelled = had_timer, "reset");
        self.emit(PlaybackEvent::Reset);
        self.drain()
    }

    /// Switches who drives stage changes.
    ///
    /// Switching back to `Natural` while holding continues immediately.
    pub fn set_stage_advance(&mut self, advance: StageAdvance, now: Millis) -> Vec<PlaybackEvent> {
        let was_holding = self.is_holding();
        self.advance = advance;
        if was_holding && advance == StageAdvance::Natural {
            self.timer.arm(now, Wake::PauseElapsed);
            return self.tick(now);
        }
        self.drain()
    }

    /// Fires every wake-up due at or before `now`, oldest first.
    pub fn tick(&mut self, now: Millis) -> Vec<PlaybackEvent> {
        while let Some(fired) = self.timer.fire_due(now) {
            debug_assert!(self.state.is_playing, "wake-up fired while not playing");
            match fired.action {
                Wake::Reveal => self.reveal(fired.due),
                Wake::PauseElapsed => self.advance_line(fired.due),
            }
        }
        self.drain()
    }

    fn reveal(&mut self, at: Millis) {
        if self.writer.reveal_next().is_none() {
            self.line_typed(at);
            return;
        }
        self.sync_prefix();
        self.emit(PlaybackEvent::CharRevealed {
            stage: self.state.stage_index,
            line: self.state.line_index,
            char_index: self.state.char_index,
        });
        if self.writer.is_done() {
            self.line_typed(at);
        } else {
            self.timer.arm(at + self.writer.speed_ms(), Wake::Reveal);
        }
    }

    fn line_typed(&mut self, at: Millis) {
        self.state.phase = Phase::LinePaused;
        let pause = self.current_line().map_or(0, |l| l.pause_after_ms);
        self.emit(PlaybackEvent::LineTyped {
            stage: self.state.stage_index,
            line: self.state.line_index,
        });
        self.timer.arm(at + pause, Wake::PauseElapsed);
    }

    fn advance_line(&mut self, at: Millis) {
        let stage = self.state.stage_index;
        let next_line = self.state.line_index + 1;
        if next_line < self.line_count(stage) {
            self.begin_line(next_line, at);
            return;
        }

        self.state.phase = Phase::StageTransition;
        self.mark_complete(stage);
        if stage + 1 >= self.script.stage_count() {
            self.finish();
            return;
        }
        match self.advance {
            StageAdvance::Natural => {
                self.enter_stage(stage + 1);
                self.begin_line(0, at);
            }
            StageAdvance::External => {
                self.state.phase = Phase::LinePaused;
                tracing::debug!(target: "unveil::playback", stage, "holding for autoplay");
            }
        }
    }

    fn enter_stage(&mut self, stage: usize) {
        self.state.stage_index = stage;
        self.state.line_index = 0;
        tracing::debug!(
            target: "unveil::playback",
            stage,
            name = self.script.stage(stage).map_or("", |s| s.name.as_str()),
            "stage entered"
        );
        self.emit(PlaybackEvent::StageEntered { stage });
    }

    fn begin_line(&mut self, line: usize, at: Millis) {
        let stage = self.state.stage_index;
        self.state.line_index = line;
        self.writer = writer_for(&self.script, stage, line);
        self.sync_prefix();
        self.state.phase = Phase::TypingLine;
        self.emit(PlaybackEvent::LineStarted { stage, line });
        if self.writer.is_empty() {
            self.line_typed(at);
        } else {
            self.timer.arm(at + self.writer.speed_ms(), Wake::Reveal);
        }
    }

    fn mark_complete(&mut self, stage: usize) {
        if self.state.completed_stages.insert(stage) {
            tracing::debug!(target: "unveil::playback", stage, "stage completed");
            self.emit(PlaybackEvent::StageCompleted { stage });
        }
    }

    fn show_stage_typed(&mut self, stage: usize) {
        let last = self.last_line_of(stage);
        self.state.stage_index = stage;
        self.state.line_index = last;
        self.writer = writer_for(&self.script, stage, last);
        self.writer.finish();
        self.sync_prefix();
    }

    fn finish(&mut self) {
        self.clear_timers();
        self.state.phase = Phase::Complete;
        self.state.is_playing = false;
        tracing::info!(
            target: "unveil::playback",
            script = %self.script.id,
            stages = self.state.completed_stages.len(),
            "playback complete"
        );
        self.emit(PlaybackEvent::Completed);
    }

    /// Drops the pending and any suspended wake-up. Returns whether one existed.
    fn clear_timers(&mut self) -> bool {
        let held = self.held.take().is_some();
        self.timer.cancel() || held
    }

    fn sync_prefix(&mut self) {
        self.state.char_index = self.writer.revealed();
        self.state.typed_prefix.clear();
        self.state.typed_prefix.push_str(self.writer.prefix());
    }

    fn is_terminal(&self) -> bool {
        matches!(self.state.phase, Phase::Idle | Phase::Complete)
    }

    fn check_stage(&self, index: usize) -> Result<(), PlaybackError> {
        let count = self.script.stage_count();
        if index < count {
            Ok(())
        } else {
            Err(PlaybackError::StageOutOfRange { index, count })
        }
    }

    fn line_count(&self, stage: usize) -> usize {
        self.script.stage(stage).map_or(0, |s| s.lines.len())
    }

    fn last_line_of(&self, stage: usize) -> usize {
        self.line_count(stage).saturating_sub(1)
    }

    fn emit(&mut self, event: PlaybackEvent) {
        self.outbox.push(event);
    }

    fn drain(&mut self) -> Vec<PlaybackEvent> {
        mem::take(&mut self.outbox)
    }
}

fn writer_for(script: &Script, stage: usize, line: usize) -> Typewriter {
    script.line(stage, line).map_or_else(
        || Typewriter::new("", 1),
        |l| Typewriter::new(l.text.clone(), l.typing_delay_ms),
    )
}
