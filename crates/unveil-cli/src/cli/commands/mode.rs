//! `unveil mode`: show or persist the colour mode.

use anyhow::{Context, Result};
use unveil_core::prefs::{self, Mode};

pub fn run(mode: Option<Mode>) -> Result<()> {
    match mode {
        None => {
            let current = prefs::load_mode().context("read saved mode")?;
            println!("{current}");
        }
        Some(mode) => {
            prefs::save_mode(mode).context("save mode")?;
            println!("{}", mode.announcement());
        }
    }
    Ok(())
}
