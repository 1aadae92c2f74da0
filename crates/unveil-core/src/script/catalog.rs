use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use super::file::Format;
use super::{Script, ScriptError, ScriptFile, TimingProfile};
use crate::config::TimingConfig;

/// Scripts compiled into the binary, in display order.
const BUILTIN: &[(&str, &str)] = &[
    (
        "kopitiam-intel.toml",
        include_str!("../../scripts/kopitiam-intel.toml"),
    ),
    (
        "mamak-workshop.toml",
        include_str!("../../scripts/mamak-workshop.toml"),
    ),
    (
        "makcik-approval.toml",
        include_str!("../../scripts/makcik-approval.toml"),
    ),
    (
        "kopitiam-evolution.toml",
        include_str!("../../scripts/kopitiam-evolution.toml"),
    ),
];

/// Where a catalog entry came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptSource {
    Builtin,
    File(PathBuf),
}

impl fmt::Display for ScriptSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptSource::Builtin => f.write_str("builtin"),
            ScriptSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// A user script that was skipped while loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptWarning {
    pub path: PathBuf,
    pub message: String,
}

impl fmt::Display for ScriptWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.message)
    }
}

#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub file: ScriptFile,
    pub source: ScriptSource,
}

/// Built-in scripts plus user scripts from a directory.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    warnings: Vec<ScriptWarning>,
}

impl Catalog {
    /// The embedded scripts only.
    ///
    /// # Errors
    /// Returns an error if an embedded script fails to parse.
    pub fn builtin() -> Result<Self, ScriptError> {
        let entries = BUILTIN
            .iter()
            .map(|(name, contents)| {
                ScriptFile::parse(contents, Format::Toml, name).map(|file| CatalogEntry {
                    file,
                    source: ScriptSource::Builtin,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            entries,
            warnings: Vec::new(),
        })
    }

    /// Built-ins overlaid with every script in `scripts_dir` (if given).
    ///
    /// A user script whose id matches a built-in replaces it. User scripts that
    /// cannot be read, parsed or validated are skipped and reported through
    /// [`Catalog::warnings`]; so is a second user script reusing an id.
    ///
    /// # Errors
    /// Returns an error only if an embedded script is broken.
    pub fn load(scripts_dir: Option<&Path>) -> Result<Self, ScriptError> {
        let mut catalog = Self::builtin()?;
        let Some(dir) = scripts_dir else {
            return Ok(catalog);
        };
        if !dir.is_dir() {
            tracing::debug!(dir = %dir.display(), "scripts directory missing, using built-ins");
            return Ok(catalog);
        }

        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                catalog.warn(dir, format!("Failed to read scripts directory: {e}"));
                return Ok(catalog);
            }
        };
        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file() && Format::from_path(path).is_ok())
            .collect();
        paths.sort();

        // Timing cannot invalidate a script (delays are clamped to >= 1), so
        // the defaults validate structure for every configuration.
        let timing = TimingConfig::default();
        let mut seen = HashSet::new();
        for path in paths {
            let file = match ScriptFile::load(&path) {
                Ok(file) => file,
                Err(err) => {
                    catalog.warn(&path, err.to_string());
                    continue;
                }
            };
            if let Err(err) = file.resolve(&timing, None) {
                catalog.warn(&path, err.to_string());
                continue;
            }
            if !seen.insert(file.id.clone()) {
                catalog.warn(&path, ScriptError::DuplicateId(file.id).to_string());
                continue;
            }
            tracing::debug!(id = %file.id, path = %path.display(), "loaded user script");
            catalog.insert(CatalogEntry {
                file,
                source: ScriptSource::File(path),
            });
        }
        Ok(catalog)
    }

    fn warn(&mut self, path: &Path, message: String) {
        tracing::warn!(path = %path.display(), %message, "skipping script");
        self.warnings.push(ScriptWarning {
            path: path.to_path_buf(),
            message,
        });
    }

    /// Problems found while loading user scripts.
    pub fn warnings(&self) -> &[ScriptWarning] {
        &self.warnings
    }

    fn insert(&mut self, entry: CatalogEntry) {
        match self
            .entries
            .iter_mut()
            .find(|existing| existing.file.id == entry.file.id)
        {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.file.id.as_str())
    }

    pub fn get(&self, id: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.file.id == id)
    }

    /// Looks up `id` and resolves it into a playable [`Script`].
    ///
    /// # Errors
    /// Returns `UnknownScript` or the script's validation error.
    pub fn resolve(
        &self,
        id: &str,
        timing: &TimingConfig,
        profile: Option<TimingProfile>,
    ) -> Result<Script, ScriptError> {
        self.get(id)
            .ok_or_else(|| ScriptError::UnknownScript(id.to_string()))?
            .file
            .resolve(timing, profile)
    }
}
