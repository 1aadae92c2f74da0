//! On-disk script format.
//!
//! ```toml
//! id = "kopitiam-intel"
//! title = "LAYER 1: Kopitiam Intel"
//! timing = "terminal"
//!
//! [[stages]]
//! name = "Detect moment"
//! icon = "📅"
//!
//! [[stages.lines]]
//! text = "$ culture_code.detect_moment()"
//! tooltip = "Scanning cultural calendar"
//! pause_after_ms = 500
//!
//! [[results]]
//! label = "Predicted ROI"
//! value = "340%"
//! ```
//!
//! `kind` is inferred from the text when omitted; `typing_delay_ms` falls back
//! to the script's timing profile. `results` are optional.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{Line, LineKind, Metric, Script, ScriptError, Stage, TimingProfile};
use crate::config::TimingConfig;

/// Serialized script, before timings are resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptFile {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub timing: TimingProfile,
    #[serde(default)]
    pub stages: Vec<StageFile>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub results: Vec<Metric>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageFile {
    pub name: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default)]
    pub lines: Vec<LineFile>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineFile {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<LineKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typing_delay_ms: Option<u64>,
    #[serde(default)]
    pub pause_after_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Toml,
    Yaml,
}

impl Format {
    /// Picks the format from a file extension.
    ///
    /// # Errors
    /// Returns `UnsupportedFormat` for anything but `.toml`, `.yaml` or `.yml`.
    pub fn from_path(path: &Path) -> Result<Self, ScriptError> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Ok(Format::Toml),
            Some("yaml" | "yml") => Ok(Format::Yaml),
            _ => Err(ScriptError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

impl ScriptFile {
    /// Parses a script document.
    ///
    /// # Errors
    /// Returns `Parse` with the deserializer's message.
    pub fn parse(contents: &str, format: Format, origin: &str) -> Result<Self, ScriptError> {
        let parsed = match format {
            Format::Toml => toml::from_str(contents).map_err(|e| e.to_string()),
            Format::Yaml => serde_yaml::from_str(contents).map_err(|e| e.to_string()),
        };
        parsed.map_err(|message| ScriptError::Parse {
            origin: origin.to_string(),
            message,
        })
    }

    /// Reads and parses a script file.
    ///
    /// # Errors
    /// Returns an error if the extension is unsupported, the file cannot be
    /// read, or it does not parse.
    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        let format = Format::from_path(path)?;
        let contents = fs::read_to_string(path).map_err(|source| ScriptError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents, format, &path.display().to_string())
    }

    /// Resolves timings and validates into an immutable [`Script`].
    ///
    /// `profile` overrides the file's own timing profile when set.
    ///
    /// # Errors
    /// Returns the first validation failure.
    pub fn resolve(
        &self,
        timing: &TimingConfig,
        profile: Option<TimingProfile>,
    ) -> Result<Script, ScriptError> {
        let profile = profile.unwrap_or(self.timing);
        let default_delay = timing.char_delay_ms(profile);
        let stages = self
            .stages
            .iter()
            .map(|stage| Stage {
                name: stage.name.clone(),
                icon: stage.icon.clone(),
                summary: stage.summary.clone(),
                lines: stage
                    .lines
                    .iter()
                    .map(|line| Line {
                        text: line.text.clone(),
                        kind: line.kind.unwrap_or_else(|| LineKind::infer(&line.text)),
                        tooltip: line.tooltip.clone().filter(|t| !t.trim().is_empty()),
                        typing_delay_ms: line.typing_delay_ms.unwrap_or(default_delay),
                        pause_after_ms: line.pause_after_ms,
                    })
                    .collect(),
            })
            .collect();

        let script = Script::new(self.id.clone(), self.title.clone(), profile, stages)?
            .with_results(self.results.clone());
        Ok(match &self.subtitle {
            Some(subtitle) => script.with_subtitle(subtitle.clone()),
            None => script,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOML_SCRIPT: &str = r#"
id = "tiny"
title = "Tiny"

[[stages]]
name = "Boot"
icon = "⚡"

[[stages.lines]]
text = "$ boot()"
tooltip = "Starting up"
pause_after_ms = 500

[[stages.lines]]
text = "✓ ready"
typing_delay_ms = 10
"#;

    const YAML_SCRIPT: &str = r"
id: tiny-yaml
title: Tiny YAML
timing: compact
stages:
  - name: Boot
    lines:
      - text: 'hello'
        kind: warning
";

    #[test]
    fn test_parse_toml_and_resolve_defaults() {
        let file = ScriptFile::parse(TOML_SCRIPT, Format::Toml, "inline").unwrap();
        let script = file.resolve(&TimingConfig::default(), None).unwrap();
        let first = script.line(0, 0).unwrap();
        assert_eq!(first.kind, LineKind::Command);
        assert_eq!(first.typing_delay_ms, 60);
        assert_eq!(first.tooltip.as_deref(), Some("Starting up"));
        let second = script.line(0, 1).unwrap();
        assert_eq!(second.kind, LineKind::Success);
        assert_eq!(second.typing_delay_ms, 10);
        assert_eq!(second.pause_after_ms, 0);
    }

    #[test]
    fn test_parse_yaml_with_explicit_kind() {
        let file = ScriptFile::parse(YAML_SCRIPT, Format::Yaml, "inline").unwrap();
        let script = file.resolve(&TimingConfig::default(), None).unwrap();
        assert_eq!(script.timing, TimingProfile::Compact);
        let line = script.line(0, 0).unwrap();
        assert_eq!(line.kind, LineKind::Warning);
        assert_eq!(line.typing_delay_ms, 25);
    }

    #[test]
    fn test_profile_override_changes_default_delay() {
        let file = ScriptFile::parse(TOML_SCRIPT, Format::Toml, "inline").unwrap();
        let script = file
            .resolve(&TimingConfig::default(), Some(TimingProfile::Evolution))
            .unwrap();
        assert_eq!(script.line(0, 0).unwrap().typing_delay_ms, 30);
        // Explicit per-line delays still win.
        assert_eq!(script.line(0, 1).unwrap().typing_delay_ms, 10);
    }

    #[test]
    fn test_results_carry_into_script() {
        let contents = format!("{TOML_SCRIPT}\n[[results]]\nlabel = \"ROI\"\nvalue = \"340%\"\n");
        let file = ScriptFile::parse(&contents, Format::Toml, "inline").unwrap();
        let script = file.resolve(&TimingConfig::default(), None).unwrap();
        assert_eq!(
            script.results,
            [Metric {
                label: "ROI".to_string(),
                value: "340%".to_string(),
            }]
        );

        let bare = ScriptFile::parse(YAML_SCRIPT, Format::Yaml, "inline").unwrap();
        assert!(bare.resolve(&TimingConfig::default(), None).unwrap().results.is_empty());
    }

    #[test]
    fn test_parse_error_names_origin() {
        let err = ScriptFile::parse("id = ", Format::Toml, "broken.toml").unwrap_err();
        assert!(err.to_string().contains("broken.toml"));
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(Format::from_path(Path::new("a.yml")).unwrap(), Format::Yaml);
        assert!(matches!(
            Format::from_path(Path::new("a.json")),
            Err(ScriptError::UnsupportedFormat(_))
        ));
    }
}
