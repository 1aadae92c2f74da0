//! Pure mapping from playback state to what a viewer should see.
//!
//! [`view`] borrows the script and state and builds a [`PlaybackView`]; it
//! never touches the controller. Colours are not decided here: every line
//! carries its [`LineKind`] and front-ends style it with an exhaustive match.

use serde::Serialize;

use crate::playback::{Phase, PlaybackState};
use crate::script::{LineKind, Metric, Script};
use crate::typewriter::grapheme_count;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChipStatus {
    Current,
    Completed,
    Pending,
}

/// One stage selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageChip {
    pub index: usize,
    pub name: String,
    pub icon: String,
    pub status: ChipStatus,
}

/// A line that has finished typing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryLine {
    pub stage: usize,
    pub text: String,
    pub kind: LineKind,
    pub tooltip: Option<String>,
}

/// The line under the cursor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActiveLine {
    pub typed: String,
    pub kind: LineKind,
    /// Show a caret after `typed` (only while characters are still coming).
    pub caret: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaybackView {
    pub title: String,
    pub subtitle: Option<String>,
    pub chips: Vec<StageChip>,
    pub history: Vec<HistoryLine>,
    pub active: Option<ActiveLine>,
    pub tooltip: Option<String>,
    /// Summary of the current stage once it has been fully shown.
    pub summary: Option<String>,
    /// Overall progress in `[0, 1]`.
    pub progress: f64,
    pub counter: String,
    pub phase: Phase,
    pub is_complete: bool,
    /// The script's figures, revealed once playback completes.
    pub results: Vec<Metric>,
}

impl PlaybackView {
    /// Progress as a whole percentage.
    pub fn percent(&self) -> u16 {
        (self.progress * 100.0).round().clamp(0.0, 100.0) as u16
    }
}

pub fn view(script: &Script, state: &PlaybackState) -> PlaybackView {
    let is_complete = state.is_complete();
    let stage_count = script.stage_count();

    let chips = script
        .stages()
        .iter()
        .enumerate()
        .map(|(index, stage)| StageChip {
            index,
            name: stage.name.clone(),
            icon: stage.icon.clone(),
            status: chip_status(state, index),
        })
        .collect();

    let visible_history = if is_complete {
        script.line_count()
    } else if state.is_idle() {
        0
    } else {
        lines_before(script, state.stage_index) + state.line_index
    };
    let history = script
        .stages()
        .iter()
        .enumerate()
        .flat_map(|(stage, s)| {
            s.lines.iter().map(move |line| HistoryLine {
                stage,
                text: line.text.clone(),
                kind: line.kind,
                tooltip: line.tooltip.clone(),
            })
        })
        .take(visible_history)
        .collect();

    let current = script.line(state.stage_index, state.line_index);
    let active = match (state.phase, current) {
        (Phase::TypingLine | Phase::LinePaused | Phase::StageTransition, Some(line)) => {
            Some(ActiveLine {
                typed: state.typed_prefix.clone(),
                kind: line.kind,
                caret: state.phase == Phase::TypingLine,
            })
        }
        _ => None,
    };

    let tooltip = match (state.phase, current) {
        (Phase::LinePaused, Some(line)) => line.tooltip.clone(),
        _ => None,
    };

    let summary = script
        .stage(state.stage_index)
        .filter(|_| is_complete || state.is_stage_complete(state.stage_index))
        .and_then(|s| s.summary.clone());

    PlaybackView {
        title: script.title.clone(),
        subtitle: script.subtitle.clone(),
        chips,
        history,
        active,
        tooltip,
        summary,
        progress: progress(script, state),
        counter: format!("Stage {}/{}", state.stage_index + 1, stage_count),
        phase: state.phase,
        is_complete,
        results: if is_complete {
            script.results.clone()
        } else {
            Vec::new()
        },
    }
}

fn chip_status(state: &PlaybackState, index: usize) -> ChipStatus {
    if state.is_complete() {
        ChipStatus::Completed
    } else if index == state.stage_index && !state.is_idle() {
        ChipStatus::Current
    } else if state.is_stage_complete(index) {
        ChipStatus::Completed
    } else {
        ChipStatus::Pending
    }
}

fn lines_before(script: &Script, stage: usize) -> usize {
    script.stages().iter().take(stage).map(|s| s.lines.len()).sum()
}

/// `(stage_index + fraction of the current stage) / stage_count`.
fn progress(script: &Script, state: &PlaybackState) -> f64 {
    match state.phase {
        Phase::Idle => return 0.0,
        Phase::Complete => return 1.0,
        _ => {}
    }
    let Some(stage) = script.stage(state.stage_index) else {
        return 0.0;
    };
    let line_fraction = script
        .line(state.stage_index, state.line_index)
        .map_or(0.0, |line| match grapheme_count(&line.text) {
            0 => 1.0,
            len => state.char_index as f64 / len as f64,
        });
    let stage_fraction = (state.line_index as f64 + line_fraction) / stage.lines.len() as f64;
    ((state.stage_index as f64 + stage_fraction) / script.stage_count() as f64).clamp(0.0, 1.0)
}
