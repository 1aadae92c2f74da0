//! `unveil scripts` handlers.

use std::path::Path;

use anyhow::{Context, Result};
use unveil_core::config::Config;
use unveil_core::script::{Script, ScriptFile};

use super::load_catalog;

pub fn list(config: &Config) -> Result<()> {
    let catalog = load_catalog(config)?;
    for entry in catalog.entries() {
        let script = entry
            .file
            .resolve(&config.timing, None)
            .with_context(|| format!("validate script '{}'", entry.file.id))?;
        println!(
            "{:<22} {:>2} stages  {:>6}  {:<9}  {}  [{}]",
            script.id,
            script.stage_count(),
            format_duration(script.total_duration_ms()),
            script.timing.name(),
            script.title,
            entry.source
        );
    }
    for warning in catalog.warnings() {
        eprintln!("Warning: skipped {warning}");
    }
    Ok(())
}

pub fn show(id: &str, config: &Config) -> Result<()> {
    let script = load_catalog(config)?.resolve(id, &config.timing, None)?;
    print_script(&script);
    Ok(())
}

pub fn validate(path: &Path, config: &Config) -> Result<()> {
    let file = ScriptFile::load(path)?;
    let script = file
        .resolve(&config.timing, None)
        .with_context(|| format!("validate {}", path.display()))?;
    println!(
        "{} is valid: '{}' with {} stages, {} lines, {}",
        path.display(),
        script.id,
        script.stage_count(),
        script.line_count(),
        format_duration(script.total_duration_ms())
    );
    Ok(())
}

fn print_script(script: &Script) {
    println!("{} ({})", script.title, script.id);
    if let Some(subtitle) = &script.subtitle {
        println!("{subtitle}");
    }
    println!(
        "profile {}, {} natural playback",
        script.timing,
        format_duration(script.total_duration_ms())
    );
    for (index, stage) in script.stages().iter().enumerate() {
        println!();
        println!("{}. {} {}", index + 1, stage.icon, stage.name);
        for line in &stage.lines {
            println!("   [{:<7}] {}", line.kind.label(), line.text);
        }
        if let Some(summary) = &stage.summary {
            println!("   » {summary}");
        }
    }
    if !script.results.is_empty() {
        println!();
        println!("Results");
        for metric in &script.results {
            println!("   {}: {}", metric.label, metric.value);
        }
    }
}

fn format_duration(ms: u64) -> String {
    format!("{}.{}s", ms / 1000, (ms % 1000) / 100)
}
