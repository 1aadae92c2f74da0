//! Configuration management for unveil.
//!
//! Loads configuration from ${UNVEIL_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::script::TimingProfile;

/// Returns the default config template with comments.
///
/// Embedded from default_config.toml at compile time. Regenerate it with
/// `cargo xtask update-default-config` after changing a default below.
fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}

/// Merges user config values into the default template.
///
/// New comments and sections from the template are always present while the
/// user's customized values win.
fn merge_with_template(user_config: &str) -> Result<String> {
    use toml_edit::DocumentMut;

    let mut doc: DocumentMut = default_config_template()
        .parse()
        .context("Failed to parse default config template")?;
    let user_doc: DocumentMut = user_config.parse().context("Failed to parse user config")?;

    merge_items(doc.as_table_mut(), user_doc.as_table());

    Ok(doc.to_string())
}

/// Recursively overlays `source` onto `target`, keeping target's decor.
fn merge_items(target: &mut toml_edit::Table, source: &toml_edit::Table) {
    use toml_edit::Item;

    for (key, value) in source.iter() {
        match value {
            Item::Value(v) => {
                target[key] = Item::Value(v.clone());
            }
            Item::Table(src_table) => {
                if let Some(Item::Table(target_table)) = target.get_mut(key) {
                    merge_items(target_table, src_table);
                } else {
                    target[key] = Item::Table(src_table.clone());
                }
            }
            Item::ArrayOfTables(src_arr) => {
                target[key] = Item::ArrayOfTables(src_arr.clone());
            }
            Item::None => {}
        }
    }
}

pub mod paths {
    //! Path resolution for unveil configuration and data directories.
    //!
    //! UNVEIL_HOME resolution order:
    //! 1. UNVEIL_HOME environment variable (if set)
    //! 2. ~/.config/unveil (default)

    use std::path::PathBuf;

    /// Returns the unveil home directory.
    pub fn unveil_home() -> PathBuf {
        if let Ok(home) = std::env::var("UNVEIL_HOME")
            && !home.trim().is_empty()
        {
            return PathBuf::from(home);
        }

        dirs::home_dir()
            .map(|h| h.join(".config").join("unveil"))
            .unwrap_or_else(|| PathBuf::from(".unveil"))
    }

    pub fn config_path() -> PathBuf {
        unveil_home().join("config.toml")
    }

    pub fn prefs_path() -> PathBuf {
        unveil_home().join("prefs.toml")
    }

    /// Default location for user scripts.
    pub fn scripts_dir() -> PathBuf {
        unveil_home().join("scripts")
    }

    /// Default location for log files.
    pub fn logs_dir() -> PathBuf {
        unveil_home().join("logs")
    }
}

/// Expands a leading `~/` against the user's home directory.
fn expand_home(raw: &str) -> PathBuf {
    match raw.strip_prefix("~/") {
        Some(rest) => dirs::home_dir()
            .map(|h| h.join(rest))
            .unwrap_or_else(|| PathBuf::from(raw)),
        None => PathBuf::from(raw),
    }
}

/// Typing and autoplay cadence.
///
/// Different widgets historically typed at different speeds; each speed is a
/// named profile instead of a single constant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Per-character delay for terminal pipelines.
    pub terminal_char_ms: u64,
    /// Per-character delay for evolution panels.
    pub evolution_char_ms: u64,
    /// Per-character delay for compact reveals.
    pub compact_char_ms: u64,
    /// Time each stage gets before autoplay moves on.
    pub autoplay_interval_ms: u64,
}

impl TimingConfig {
    const DEFAULT_TERMINAL_CHAR_MS: u64 = 60;
    const DEFAULT_EVOLUTION_CHAR_MS: u64 = 30;
    const DEFAULT_COMPACT_CHAR_MS: u64 = 25;
    const DEFAULT_AUTOPLAY_INTERVAL_MS: u64 = 4000;

    /// Per-character delay for `profile`. Never zero.
    pub fn char_delay_ms(&self, profile: TimingProfile) -> u64 {
        let ms = match profile {
            TimingProfile::Terminal => self.terminal_char_ms,
            TimingProfile::Evolution => self.evolution_char_ms,
            TimingProfile::Compact => self.compact_char_ms,
        };
        ms.max(1)
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            terminal_char_ms: Self::DEFAULT_TERMINAL_CHAR_MS,
            evolution_char_ms: Self::DEFAULT_EVOLUTION_CHAR_MS,
            compact_char_ms: Self::DEFAULT_COMPACT_CHAR_MS,
            autoplay_interval_ms: Self::DEFAULT_AUTOPLAY_INTERVAL_MS,
        }
    }
}

/// Full-screen player settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Upper bound between redraws when no playback deadline is pending.
    pub frame_ms: u64,
    /// Show line tooltips: under finished lines and while playback pauses on one.
    pub show_tooltips: bool,
    /// Start with autoplay attached.
    pub autoplay: bool,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            frame_ms: 250,
            show_tooltips: true,
            autoplay: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when UNVEIL_LOG is unset.
    pub level: String,
    /// Log directory for the full-screen player (defaults to ${UNVEIL_HOME}/logs).
    pub directory: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
        }
    }
}

impl LoggingConfig {
    pub fn directory(&self) -> PathBuf {
        self.directory
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .map_or_else(paths::logs_dir, expand_home)
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Script played when none is named on the command line.
    pub default_script: String,

    /// Directory scanned for user scripts (defaults to ${UNVEIL_HOME}/scripts).
    pub scripts_dir: Option<String>,

    pub timing: TimingConfig,

    pub player: PlayerConfig,

    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_script: Self::DEFAULT_SCRIPT.to_string(),
            scripts_dir: None,
            timing: TimingConfig::default(),
            player: PlayerConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    const DEFAULT_SCRIPT: &str = "kopitiam-intel";

    /// Loads configuration from the default config path.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if the file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    pub fn scripts_dir(&self) -> PathBuf {
        self.scripts_dir
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .map_or_else(paths::scripts_dir, expand_home)
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.player.frame_ms.clamp(16, 1000))
    }

    /// Creates a default config file at the given path.
    /// Returns an error if the file already exists.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        Self::write_config(path, default_config_template())
    }

    /// Rewrites an existing config on top of the latest template.
    ///
    /// User values survive; comments and sections added to the template since
    /// the file was written appear.
    pub fn upgrade(path: &Path) -> Result<()> {
        let user_config = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        let merged = merge_with_template(&user_config)?;
        Self::write_config(path, &merged)
    }

    /// Generates a fresh config TOML from Rust defaults.
    ///
    /// Uses the embedded template for structure and comments and merges the
    /// values of `Config::default()` into it. Used by
    /// `xtask update-default-config`.
    pub fn generate() -> Result<String> {
        use toml_edit::DocumentMut;

        let generated_toml = toml::to_string(&Config::default())
            .context("Failed to serialize default config to TOML")?;

        let mut doc: DocumentMut = default_config_template()
            .parse()
            .context("Failed to parse default config template")?;
        let generated_doc: DocumentMut = generated_toml
            .parse()
            .context("Failed to parse generated config")?;

        merge_items(doc.as_table_mut(), generated_doc.as_table());

        Ok(doc.to_string())
    }

    /// Writes config content to a file, creating parent directories as needed.
    /// Uses atomic write (temp file + rename) to prevent corruption.
    pub(crate) fn write_config(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let tmp_path = path.with_extension("toml.tmp");
        fs::write(&tmp_path, content)
            .with_context(|| format!("Failed to write config to {}", tmp_path.display()))?;
        fs::rename(&tmp_path, path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                path.display()
            )
        })?;

        Ok(())
    }
}
