use std::collections::BTreeSet;

use serde::Serialize;

/// Where the controller is in the stage/line cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Idle,
    /// Revealing the current line one character at a time.
    TypingLine,
    /// Current line fully shown; waiting out its pause.
    LinePaused,
    /// Between the last line of a stage and the next stage. Never observed
    /// from outside a single operation.
    StageTransition,
    /// Every stage played. Only `reset` leaves this state.
    Complete,
}

impl Phase {
    pub fn label(self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::TypingLine => "typing",
            Phase::LinePaused => "paused on line",
            Phase::StageTransition => "next stage",
            Phase::Complete => "complete",
        }
    }
}

/// Who moves playback from the end of one stage to the start of the next.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StageAdvance {
    /// The controller continues as soon as the last pause elapses.
    #[default]
    Natural,
    /// The controller holds at the end of each stage; autoplay drives it on.
    External,
}

/// Renderable snapshot of a playback.
///
/// `typed_prefix` is always the first `char_index` grapheme clusters of the
/// current line, and `is_playing == false` means nothing is scheduled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaybackState {
    pub stage_index: usize,
    pub line_index: usize,
    pub char_index: usize,
    pub is_playing: bool,
    pub completed_stages: BTreeSet<usize>,
    pub typed_prefix: String,
    pub phase: Phase,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            stage_index: 0,
            line_index: 0,
            char_index: 0,
            is_playing: false,
            completed_stages: BTreeSet::new(),
            typed_prefix: String::new(),
            phase: Phase::Idle,
        }
    }
}

impl PlaybackState {
    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Complete
    }

    pub fn is_idle(&self) -> bool {
        self.phase == Phase::Idle
    }

    /// Position as a lexicographically ordered tuple.
    pub fn position(&self) -> (usize, usize, usize) {
        (self.stage_index, self.line_index, self.char_index)
    }

    pub fn is_stage_complete(&self, stage: usize) -> bool {
        self.completed_stages.contains(&stage)
    }
}
