//! Config command handlers.

use anyhow::{Context, Result};
use unveil_core::config;

pub fn path() {
    println!("{}", config::paths::config_path().display());
}

pub fn init() -> Result<()> {
    let config_path = config::paths::config_path();
    config::Config::init(&config_path)
        .with_context(|| format!("init config at {}", config_path.display()))?;
    println!("Created config at {}", config_path.display());
    Ok(())
}

pub fn upgrade() -> Result<()> {
    let config_path = config::paths::config_path();
    if !config_path.exists() {
        anyhow::bail!(
            "No config at {}. Run `unveil config init` first.",
            config_path.display()
        );
    }
    config::Config::upgrade(&config_path)
        .with_context(|| format!("upgrade config at {}", config_path.display()))?;
    println!("Upgraded config at {}", config_path.display());
    Ok(())
}

pub fn generate() -> Result<()> {
    let toml = config::Config::generate()?;
    print!("{toml}");
    Ok(())
}
