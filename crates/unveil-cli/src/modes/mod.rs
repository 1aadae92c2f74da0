//! Playback front-ends.
//!
//! - `headless`: prints lines to stdout as they finish typing
//! - `player`: full-screen terminal player (optional feature)

pub mod headless;

#[cfg(feature = "tui")]
pub use unveil_tui::run_player;

#[cfg(not(feature = "tui"))]
pub fn run_player(
    _script: unveil_core::script::Script,
    _config: &unveil_core::config::Config,
    _prefs: unveil_core::prefs::Preferences,
    _autoplay: bool,
) -> anyhow::Result<()> {
    anyhow::bail!("The player is disabled in this build (feature \"tui\"). Use `unveil run`.");
}
