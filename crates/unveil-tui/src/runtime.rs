//! Player runtime: owns the terminal, runs the event loop, executes effects.
//!
//! All side effects happen here. Each loop iteration samples the clock once,
//! feeds it to the reducer as a `Tick`, then feeds any terminal input.

use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event;
use unveil_core::clock::{Clock, SystemClock};
use unveil_core::config::Config;
use unveil_core::interrupt;
use unveil_core::prefs::{self, Preferences};
use unveil_core::script::Script;

use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::state::AppState;
use crate::terminal::{self, PlayerTerminal};
use crate::{render, update};

pub struct PlayerRuntime {
    terminal: PlayerTerminal,
    pub state: AppState,
    clock: SystemClock,
    /// Longest the loop sleeps while nothing is scheduled.
    frame: Duration,
}

impl PlayerRuntime {
    /// Enters the alternate screen and builds the initial state.
    ///
    /// # Errors
    /// Returns an error if the terminal cannot be set up.
    pub fn new(
        script: Script,
        config: &Config,
        prefs: Preferences,
        autoplay: bool,
    ) -> Result<Self> {
        terminal::install_panic_hook();
        interrupt::set_restore_hook(|| {
            let _ = terminal::restore_terminal();
        });
        interrupt::reset();

        let terminal = terminal::setup_terminal().context("Failed to setup terminal")?;
        Ok(Self {
            terminal,
            state: AppState::new(script, config, prefs, autoplay),
            clock: SystemClock::new(),
            frame: config.frame_interval(),
        })
    }

    /// Runs until the user quits or Ctrl+C arrives.
    ///
    /// # Errors
    /// Returns an error if drawing or reading terminal input fails.
    pub fn run(&mut self) -> Result<()> {
        let result = self.event_loop();
        // Whatever ended the loop, no wake-up survives it.
        let now = self.clock.now();
        self.state.tui.session.reset(now);
        result
    }

    fn event_loop(&mut self) -> Result<()> {
        while !self.state.tui.should_quit {
            if interrupt::is_interrupted() {
                tracing::info!("interrupted, leaving player");
                self.state.tui.should_quit = true;
                break;
            }

            for event in self.collect_events()? {
                let effects = update::update(&mut self.state, event);
                self.execute_effects(effects);
            }

            if self.state.tui.dirty {
                self.terminal.draw(|frame| render::render(&self.state, frame))?;
                self.state.tui.dirty = false;
            }
        }
        Ok(())
    }

    /// Waits for input or the next scheduled wake-up, whichever is first.
    fn collect_events(&mut self) -> Result<Vec<UiEvent>> {
        let now = self.clock.now();
        let timeout = self
            .state
            .tui
            .next_wakeup()
            .map_or(self.frame, |at| now.until(at).as_duration().min(self.frame));

        let mut terminal_events = Vec::new();
        if event::poll(timeout)? {
            terminal_events.push(UiEvent::Terminal(event::read()?));
            while event::poll(Duration::ZERO)? {
                terminal_events.push(UiEvent::Terminal(event::read()?));
            }
        }

        let mut events = vec![UiEvent::Tick {
            now: self.clock.now(),
        }];
        events.extend(terminal_events);
        Ok(events)
    }

    fn execute_effects(&mut self, effects: Vec<UiEffect>) {
        for effect in effects {
            self.execute_effect(effect);
        }
    }

    fn execute_effect(&mut self, effect: UiEffect) {
        match effect {
            UiEffect::Quit => {
                self.state.tui.should_quit = true;
            }
            UiEffect::PersistMode { mode } => {
                if let Err(err) = prefs::save_mode(mode) {
                    tracing::warn!(error = %format!("{err:#}"), "failed to save mode");
                    self.state.tui.show_toast("Could not save mode");
                }
            }
        }
    }
}

impl Drop for PlayerRuntime {
    fn drop(&mut self) {
        let _ = terminal::restore_terminal();
    }
}
