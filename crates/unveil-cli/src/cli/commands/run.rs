use anyhow::Result;
use unveil_core::config::Config;
use unveil_core::playback::Session;

use super::resolve_script;
use crate::cli::SourceArgs;
use crate::modes::headless::{self, RunOptions};

pub async fn run(source: &SourceArgs, config: &Config, instant: bool, json: bool) -> Result<()> {
    let script = resolve_script(source, config)?;
    let session = Session::new(script, config.timing.autoplay_interval_ms)
        .with_autoplay(source.autoplay || config.player.autoplay);
    headless::run(session, RunOptions { instant, json }).await
}
