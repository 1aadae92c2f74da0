//! Script / stage tables.
//!
//! A [`Script`] is immutable once built: an ordered list of [`Stage`]s, each
//! an ordered, non-empty list of [`Line`]s with resolved timings. Scripts come
//! from TOML/YAML files (see [`file`]) or the built-in catalog.

mod catalog;
mod error;
pub mod file;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use catalog::{Catalog, ScriptSource, ScriptWarning};
pub use error::ScriptError;
pub use file::ScriptFile;

use crate::typewriter::grapheme_count;

/// Display class of a line. Closed set; styling matches on it exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineKind {
    Command,
    Success,
    Info,
    Warning,
    Result,
}

impl LineKind {
    /// Classifies authored text by its leading marker.
    ///
    /// Only used while loading files that omit `kind`.
    pub fn infer(text: &str) -> Self {
        let trimmed = text.trim_start();
        if trimmed.starts_with('$') {
            LineKind::Command
        } else if trimmed.starts_with('✓') {
            LineKind::Success
        } else if trimmed.starts_with('⚠') || trimmed.starts_with('✗') {
            LineKind::Warning
        } else if trimmed.starts_with('🎯') {
            LineKind::Result
        } else {
            LineKind::Info
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LineKind::Command => "command",
            LineKind::Success => "success",
            LineKind::Info => "info",
            LineKind::Warning => "warning",
            LineKind::Result => "result",
        }
    }
}

/// Named per-character delay presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimingProfile {
    /// Terminal-style pipelines.
    #[default]
    Terminal,
    /// Evolution panels (descriptive copy).
    Evolution,
    /// Tight inline reveals.
    Compact,
}

impl TimingProfile {
    pub fn all() -> &'static [TimingProfile] {
        &[
            TimingProfile::Terminal,
            TimingProfile::Evolution,
            TimingProfile::Compact,
        ]
    }

    pub fn name(self) -> &'static str {
        match self {
            TimingProfile::Terminal => "terminal",
            TimingProfile::Evolution => "evolution",
            TimingProfile::Compact => "compact",
        }
    }
}

impl fmt::Display for TimingProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TimingProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TimingProfile::all()
            .iter()
            .copied()
            .find(|p| p.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!("Unknown timing profile '{s}'. Use terminal, evolution or compact")
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Line {
    pub text: String,
    pub kind: LineKind,
    pub tooltip: Option<String>,
    pub typing_delay_ms: u64,
    pub pause_after_ms: u64,
}

impl Line {
    pub fn char_count(&self) -> usize {
        grapheme_count(&self.text)
    }

    /// Typing time plus the trailing pause. Saturates instead of overflowing.
    pub fn duration_ms(&self) -> u64 {
        (self.char_count() as u64)
            .saturating_mul(self.typing_delay_ms)
            .saturating_add(self.pause_after_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stage {
    pub name: String,
    pub icon: String,
    pub summary: Option<String>,
    pub lines: Vec<Line>,
}

impl Stage {
    pub fn duration_ms(&self) -> u64 {
        self.lines
            .iter()
            .map(Line::duration_ms)
            .fold(0, u64::saturating_add)
    }
}

/// One figure shown once playback completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metric {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Script {
    pub id: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub timing: TimingProfile,
    stages: Vec<Stage>,
    /// Exposed by the render adapter after the last stage.
    pub results: Vec<Metric>,
}

impl Script {
    /// Builds a validated script.
    ///
    /// # Errors
    /// Returns a [`ScriptError`] naming the first offending stage or line.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        timing: TimingProfile,
        stages: Vec<Stage>,
    ) -> Result<Self, ScriptError> {
        let script = Self {
            id: id.into(),
            title: title.into(),
            subtitle: None,
            timing,
            stages,
            results: Vec::new(),
        };
        script.validate()?;
        Ok(script)
    }

    #[must_use]
    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    #[must_use]
    pub fn with_results(mut self, results: Vec<Metric>) -> Self {
        self.results = results;
        self
    }

    fn validate(&self) -> Result<(), ScriptError> {
        if self.id.trim().is_empty() {
            return Err(ScriptError::MissingId);
        }
        if self.stages.is_empty() {
            return Err(ScriptError::NoStages {
                id: self.id.clone(),
            });
        }
        for (stage_idx, stage) in self.stages.iter().enumerate() {
            if stage.name.trim().is_empty() {
                return Err(ScriptError::UnnamedStage {
                    id: self.id.clone(),
                    stage: stage_idx,
                });
            }
            if stage.lines.is_empty() {
                return Err(ScriptError::EmptyStage {
                    id: self.id.clone(),
                    stage: stage_idx,
                });
            }
            if let Some(line_idx) = stage.lines.iter().position(|l| l.typing_delay_ms == 0) {
                return Err(ScriptError::ZeroTypingDelay {
                    id: self.id.clone(),
                    stage: stage_idx,
                    line: line_idx,
                });
            }
        }
        Ok(())
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Number of stages, always at least one.
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    pub fn stage(&self, index: usize) -> Option<&Stage> {
        self.stages.get(index)
    }

    pub fn line(&self, stage: usize, line: usize) -> Option<&Line> {
        self.stages.get(stage).and_then(|s| s.lines.get(line))
    }

    pub fn line_count(&self) -> usize {
        self.stages.iter().map(|s| s.lines.len()).sum()
    }

    /// Length of an uninterrupted natural playback.
    pub fn total_duration_ms(&self) -> u64 {
        self.stages
            .iter()
            .map(Stage::duration_ms)
            .fold(0, u64::saturating_add)
    }
}
