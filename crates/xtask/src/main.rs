use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "xtask", about = "unveil maintainer tasks")]
struct Cli {
    #[command(subcommand)]
    command: Option<CommandName>,
}

#[derive(Debug, Default, Subcommand)]
enum CommandName {
    /// Update default_config.toml by running `unveil config generate`.
    #[default]
    UpdateDefaultConfig,
    /// Run `unveil scripts validate` on every built-in script.
    CheckScripts,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or_default() {
        CommandName::UpdateDefaultConfig => update_default_config(),
        CommandName::CheckScripts => check_scripts(),
    }
}

fn update_default_config() -> Result<()> {
    let root = project_root()?;
    let dest = core_dir(&root).join("default_config.toml");

    let output = unveil(&root, &["config", "generate"])
        .output()
        .context("run `cargo run -p unveil -- config generate`")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("config generate failed: {stderr}");
    }

    fs::write(&dest, &output.stdout)
        .with_context(|| format!("write config to {}", dest.display()))?;

    println!("Updated {}", dest.display());
    Ok(())
}

fn check_scripts() -> Result<()> {
    let root = project_root()?;
    let dir = core_dir(&root).join("scripts");

    let mut paths = fs::read_dir(&dir)
        .with_context(|| format!("read {}", dir.display()))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()?;
    paths.sort();

    let mut failed = 0;
    for path in &paths {
        let status = unveil(&root, &["scripts", "validate"])
            .arg(path)
            .status()
            .with_context(|| format!("validate {}", path.display()))?;
        if !status.success() {
            failed += 1;
        }
    }

    if failed > 0 {
        bail!("{failed} of {} scripts failed validation", paths.len());
    }
    println!("{} scripts ok", paths.len());
    Ok(())
}

fn unveil(root: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::new("cargo");
    cmd.current_dir(root)
        .args(["run", "--quiet", "-p", "unveil", "--"])
        .args(args);
    cmd
}

fn core_dir(root: &Path) -> PathBuf {
    root.join("crates").join("unveil-core")
}

fn project_root() -> Result<PathBuf> {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let root = manifest_dir
        .ancestors()
        .nth(2)
        .context("locate workspace root from CARGO_MANIFEST_DIR")?;
    Ok(root.to_path_buf())
}
