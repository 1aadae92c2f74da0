//! Viewer preferences.
//!
//! [`Preferences`] is a plain value handed down through the UI. The colour
//! [`Mode`] is remembered in ${UNVEIL_HOME}/prefs.toml for 30 days; the
//! [`Persona`] lasts one session.

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::config::{Config, paths};

/// How long a saved mode is honoured.
pub const MODE_TTL_DAYS: i64 = 30;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Light,
    #[default]
    Dark,
}

impl Mode {
    pub fn name(self) -> &'static str {
        match self {
            Mode::Light => "light",
            Mode::Dark => "dark",
        }
    }

    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Mode::Light => Mode::Dark,
            Mode::Dark => Mode::Light,
        }
    }

    /// Toast shown after switching.
    pub fn announcement(self) -> &'static str {
        match self {
            Mode::Light => "☀ Light mode",
            Mode::Dark => "☾ Dark mode",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Mode::Light),
            "dark" => Ok(Mode::Dark),
            other => Err(format!("Unknown mode '{other}'. Use light or dark")),
        }
    }
}

/// Which voice the console answers in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Persona {
    #[default]
    Professional,
    Truth,
}

impl Persona {
    pub fn label(self) -> &'static str {
        match self {
            Persona::Professional => "professional",
            Persona::Truth => "truth",
        }
    }

    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Persona::Professional => Persona::Truth,
            Persona::Truth => Persona::Professional,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Preferences {
    pub mode: Mode,
    pub persona: Persona,
}

impl Preferences {
    #[must_use]
    pub fn with_mode(self, mode: Mode) -> Self {
        Self { mode, ..self }
    }

    #[must_use]
    pub fn with_persona(self, persona: Persona) -> Self {
        Self { persona, ..self }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct PrefsFile {
    mode: String,
    saved_at: String,
}

/// Reads the saved mode from the default prefs path.
pub fn load_mode() -> Result<Mode> {
    load_mode_from(&paths::prefs_path(), Utc::now())
}

/// Reads the saved mode, falling back to the default when the file is
/// missing, unreadable as prefs, older than [`MODE_TTL_DAYS`] or names an
/// unknown mode.
///
/// # Errors
/// Returns an error only if an existing file cannot be read.
pub fn load_mode_from(path: &Path, now: DateTime<Utc>) -> Result<Mode> {
    if !path.exists() {
        return Ok(Mode::default());
    }
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read preferences from {}", path.display()))?;

    let saved: PrefsFile = match toml::from_str(&contents) {
        Ok(saved) => saved,
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "ignoring malformed preferences");
            return Ok(Mode::default());
        }
    };

    let Ok(saved_at) = DateTime::parse_from_rfc3339(&saved.saved_at) else {
        return Ok(Mode::default());
    };
    if now.signed_duration_since(saved_at.with_timezone(&Utc)) >= Duration::days(MODE_TTL_DAYS) {
        tracing::debug!(saved_at = %saved.saved_at, "saved mode expired");
        return Ok(Mode::default());
    }
    Ok(saved.mode.parse().unwrap_or_default())
}

pub fn save_mode(mode: Mode) -> Result<()> {
    save_mode_to(&paths::prefs_path(), mode, Utc::now())
}

/// Writes `mode` with a fresh timestamp.
pub fn save_mode_to(path: &Path, mode: Mode, now: DateTime<Utc>) -> Result<()> {
    let file = PrefsFile {
        mode: mode.name().to_string(),
        saved_at: now.to_rfc3339(),
    };
    let contents = toml::to_string(&file).context("Failed to serialize preferences")?;
    Config::write_config(path, &contents)
}
