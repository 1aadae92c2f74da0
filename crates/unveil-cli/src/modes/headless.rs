//! Headless playback to stdout.
//!
//! Real-time runs sleep until each deadline on the tokio timer and race the
//! sleep against Ctrl+C. Instant runs drive a `ManualClock` straight from one
//! deadline to the next, producing the identical line sequence.

use std::io::{self, Write};

use anyhow::{Context, Result};
use serde::Serialize;
use tokio::time::{Instant, sleep_until};
use unveil_core::clock::{Clock, ManualClock, SystemClock};
use unveil_core::interrupt::{self, InterruptedError};
use unveil_core::playback::{PlaybackEvent, PlaybackState, Session};
use unveil_core::script::{Metric, Script};

#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    pub instant: bool,
    pub json: bool,
}

/// Final state printed by `--json`, plus the results once complete.
#[derive(Debug, Serialize)]
struct RunReport<'a> {
    #[serde(flatten)]
    state: &'a PlaybackState,
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    results: &'a [Metric],
}

impl<'a> RunReport<'a> {
    fn new(session: &'a Session) -> Self {
        let state = session.state();
        let results: &[Metric] = if state.is_complete() {
            &session.script().results
        } else {
            &[]
        };
        Self { state, results }
    }
}

pub async fn run(mut session: Session, options: RunOptions) -> Result<()> {
    let mut stdout = io::stdout();
    let mut sink: Box<dyn Write> = if options.json {
        Box::new(io::sink())
    } else {
        Box::new(stdout.lock())
    };

    if options.instant {
        play_instant(&mut session, &mut sink)?;
    } else {
        play_realtime(&mut session, &mut sink).await?;
    }
    drop(sink);

    if options.json {
        let json = serde_json::to_string_pretty(&RunReport::new(&session)).context("encode state")?;
        writeln!(stdout, "{json}")?;
    }
    Ok(())
}

/// Jumps a fake clock from deadline to deadline until nothing is pending.
pub fn play_instant(session: &mut Session, out: &mut dyn Write) -> Result<()> {
    let clock = ManualClock::new();
    let events = session.start(clock.now());
    write_events(session.script(), &events, out)?;

    while let Some(deadline) = session.next_deadline() {
        if let Err(err) = interrupt::check() {
            session.reset(clock.now());
            return Err(err.into());
        }
        clock.set(deadline);
        let events = session.tick(clock.now());
        write_events(session.script(), &events, out)?;
    }
    tracing::debug!(elapsed = %clock.now(), "instant run finished");
    Ok(())
}

async fn play_realtime(session: &mut Session, out: &mut dyn Write) -> Result<()> {
    let clock = SystemClock::new();
    let events = session.start(clock.now());
    write_events(session.script(), &events, out)?;

    while let Some(deadline) = session.next_deadline() {
        let wake = Instant::from_std(clock.instant_at(deadline));
        tokio::select! {
            biased;
            () = interrupt::wait_for_interrupt() => {
                // Cancel before anything else can fire.
                session.reset(clock.now());
                return Err(InterruptedError.into());
            }
            () = sleep_until(wake) => {}
        }
        let events = session.tick(clock.now());
        write_events(session.script(), &events, out)?;
        out.flush()?;
    }
    Ok(())
}

/// Prints the events a reader cares about: stage headers, finished lines,
/// stage summaries, the end and the results that follow it.
pub fn write_events(script: &Script, events: &[PlaybackEvent], out: &mut dyn Write) -> Result<()> {
    for event in events {
        match *event {
            PlaybackEvent::StageEntered { stage } => {
                if let Some(s) = script.stage(stage) {
                    if stage > 0 {
                        writeln!(out)?;
                    }
                    writeln!(out, "▸ {} {}", s.icon, s.name)?;
                }
            }
            PlaybackEvent::LineTyped { stage, line } => {
                if let Some(l) = script.line(stage, line) {
                    writeln!(out, "  {}", l.text)?;
                }
            }
            PlaybackEvent::StageCompleted { stage } => {
                if let Some(summary) = script.stage(stage).and_then(|s| s.summary.as_deref()) {
                    writeln!(out, "  » {summary}")?;
                }
            }
            PlaybackEvent::Completed => {
                writeln!(out)?;
                writeln!(out, "✓ {} complete", script.title)?;
                let width = script
                    .results
                    .iter()
                    .map(|m| m.label.chars().count())
                    .max()
                    .unwrap_or_default();
                for metric in &script.results {
                    writeln!(out, "  {:<width$}  {}", metric.label, metric.value)?;
                }
            }
            _ => {}
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use unveil_core::clock::Millis;
    use unveil_core::config::TimingConfig;
    use unveil_core::script::Catalog;

    use super::*;

    fn session(id: &str, autoplay: bool) -> Session {
        let script = Catalog::builtin()
            .unwrap()
            .resolve(id, &TimingConfig::default(), None)
            .unwrap();
        Session::new(script, 4000).with_autoplay(autoplay)
    }

    /// Timestamp of the last wake-up an instant run reaches.
    fn instant_length(session: &mut Session) -> Millis {
        let mut last = Millis::ZERO;
        session.start(Millis::ZERO);
        while let Some(deadline) = session.next_deadline() {
            last = deadline;
            session.tick(deadline);
        }
        last
    }

    #[test]
    fn test_instant_run_prints_every_line() {
        let mut session = session("kopitiam-intel", false);
        let mut out = Vec::new();
        play_instant(&mut session, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let script = session.script();
        for stage in script.stages() {
            assert!(text.contains(&stage.name), "{}", stage.name);
            for line in &stage.lines {
                assert!(text.contains(&line.text), "{}", line.text);
            }
        }
        assert!(text.contains(&format!("\n✓ {} complete\n", script.title)));
        assert!(text.ends_with("  Predicted ROI  340%\n"));
        assert!(session.state().is_complete());
        assert!(!session.has_pending_wakeup());
    }

    #[test]
    fn test_script_without_results_ends_on_complete_line() {
        let mut session = session("kopitiam-evolution", false);
        let mut out = Vec::new();
        play_instant(&mut session, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.ends_with(&format!("✓ {} complete\n", session.script().title)));
    }

    #[test]
    fn test_report_includes_results_only_when_complete() {
        let mut session = session("makcik-approval", false);
        let json = serde_json::to_value(RunReport::new(&session)).unwrap();
        assert_eq!(json["phase"], "idle");
        assert!(json.get("results").is_none());

        play_instant(&mut session, &mut io::sink()).unwrap();
        let json = serde_json::to_value(RunReport::new(&session)).unwrap();
        assert_eq!(json["phase"], "complete");
        assert_eq!(json["results"][0]["label"], "Halal");
        assert_eq!(json["results"][0]["value"], "PASSED");
    }

    #[test]
    fn test_instant_run_matches_natural_duration() {
        let mut session = session("mamak-workshop", false);
        let total = session.script().total_duration_ms();
        assert_eq!(instant_length(&mut session), Millis(total));
    }

    #[test]
    fn test_instant_autoplay_reaches_the_end() {
        let mut session = session("kopitiam-evolution", true);
        let mut out = Vec::new();
        play_instant(&mut session, &mut out).unwrap();
        assert!(session.state().is_complete());
        let stages = session.script().stage_count();
        assert_eq!(session.state().completed_stages.len(), stages);
        assert_eq!(session.next_deadline(), None);
    }
}
