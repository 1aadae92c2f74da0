use anyhow::Result;
use unveil_core::config::Config;
use unveil_core::prefs::{self, Preferences};

use super::resolve_script;
use crate::cli::SourceArgs;
use crate::modes;

pub fn run(source: &SourceArgs, config: &Config) -> Result<()> {
    let script = resolve_script(source, config)?;
    let mode = prefs::load_mode().unwrap_or_else(|err| {
        tracing::warn!(error = %format!("{err:#}"), "ignoring unreadable prefs");
        Preferences::default().mode
    });
    let autoplay = source.autoplay || config.player.autoplay;
    modes::run_player(
        script,
        config,
        Preferences::default().with_mode(mode),
        autoplay,
    )
}
