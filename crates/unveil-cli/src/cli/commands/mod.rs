//! CLI command handlers.

pub mod ask;
pub mod config;
pub mod mode;
pub mod play;
pub mod run;
pub mod scripts;

use anyhow::{Context, Result};
use unveil_core::config::Config;
use unveil_core::script::{Catalog, Script, ScriptFile};

use super::SourceArgs;

/// Loads the catalog, including user scripts from the configured directory.
pub(crate) fn load_catalog(config: &Config) -> Result<Catalog> {
    let dir = config.scripts_dir();
    Catalog::load(Some(&dir)).with_context(|| format!("load scripts from {}", dir.display()))
}

/// Picks the script named by `--file`, `--script` or the config default.
pub(crate) fn resolve_script(source: &SourceArgs, config: &Config) -> Result<Script> {
    if let Some(path) = &source.file {
        let file = ScriptFile::load(path)?;
        return file
            .resolve(&config.timing, source.profile)
            .with_context(|| format!("validate {}", path.display()));
    }
    let id = source.script.as_deref().unwrap_or(&config.default_script);
    let script = load_catalog(config)?.resolve(id, &config.timing, source.profile)?;
    Ok(script)
}
