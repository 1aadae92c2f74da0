//! Full-screen terminal player for unveil scripts.

pub mod effects;
pub mod events;
pub mod overlays;
pub mod render;
pub mod runtime;
pub mod state;
pub mod terminal;
pub mod text;
pub mod theme;
pub mod update;

use std::io::{IsTerminal, stdout};

use anyhow::Result;
pub use runtime::PlayerRuntime;
use unveil_core::config::Config;
use unveil_core::prefs::Preferences;
use unveil_core::script::Script;

/// Plays `script` full-screen until the user quits.
///
/// # Errors
/// Returns an error when stdout is not a terminal or the terminal fails.
pub fn run_player(
    script: Script,
    config: &Config,
    prefs: Preferences,
    autoplay: bool,
) -> Result<()> {
    if !stdout().is_terminal() {
        anyhow::bail!(
            "The player needs a terminal.\n\
             Use `unveil run` for headless playback."
        );
    }

    tracing::info!(script = %script.id, autoplay, "player starting");
    let mut runtime = PlayerRuntime::new(script, config, prefs, autoplay)?;
    let result = runtime.run();
    drop(runtime);
    tracing::info!("player closed");
    result
}
