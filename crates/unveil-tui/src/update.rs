//! Reducer.
//!
//! `update(app, event)` is the only place player state changes. It never
//! reads a clock or touches the terminal; time arrives in `UiEvent::Tick`
//! and side effects leave as [`UiEffect`]s.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use unveil_core::clock::Millis;
use unveil_core::playback::{PlaybackError, PlaybackEvent};

use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::overlays::{ConsoleState, Overlay};
use crate::state::{AppState, TuiState};

pub fn update(app: &mut AppState, event: UiEvent) -> Vec<UiEffect> {
    match event {
        UiEvent::Tick { now } => {
            handle_tick(&mut app.tui, now);
            vec![]
        }
        UiEvent::Terminal(event) => handle_terminal_event(app, event),
    }
}

fn handle_tick(tui: &mut TuiState, now: Millis) {
    tui.now = tui.now.max(now);
    let events = tui.session.tick(tui.now);
    note_events(tui, &events);
    if tui.toast.as_ref().is_some_and(|t| t.until <= tui.now) {
        tui.toast = None;
        tui.dirty = true;
    }
}

fn handle_terminal_event(app: &mut AppState, event: Event) -> Vec<UiEffect> {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => handle_key(app, key),
        Event::Paste(text) => {
            if let Some(overlay) = app.overlay.as_mut() {
                overlay.handle_paste(&text);
                app.tui.dirty = true;
            }
            vec![]
        }
        Event::Resize(_, _) => {
            app.tui.dirty = true;
            vec![]
        }
        _ => vec![],
    }
}

fn handle_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    app.tui.dirty = true;

    if let Some(overlay) = app.overlay.as_mut() {
        let update = overlay.handle_key(app.tui.prefs.persona, key);
        if let Some(persona) = update.persona {
            app.tui.prefs = app.tui.prefs.with_persona(persona);
            tracing::info!(persona = persona.label(), "persona switched");
        }
        if update.close {
            app.overlay = None;
        }
        return vec![];
    }

    let tui = &mut app.tui;
    let now = tui.now;
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('c') if ctrl => quit(tui),
        KeyCode::Char('q') | KeyCode::Esc => quit(tui),
        KeyCode::Enter | KeyCode::Char(' ') => {
            let events = if tui.session.controller().is_paused() {
                tui.session.resume(now)
            } else {
                tui.session.start(now)
            };
            note_events(tui, &events);
            vec![]
        }
        KeyCode::Char('p') => {
            if tui.session.controller().is_playing() || tui.session.controller().is_paused() {
                let events = tui.session.play_pause(now);
                note_events(tui, &events);
            }
            vec![]
        }
        KeyCode::Char('r') => {
            let events = tui.session.reset(now);
            note_events(tui, &events);
            vec![]
        }
        KeyCode::Char(digit @ '1'..='9') => {
            let index = digit as usize - '1' as usize;
            let result = tui.session.jump_to_stage(index, now);
            note_result(tui, result);
            vec![]
        }
        KeyCode::Left => {
            let result = tui.session.previous_stage(now);
            note_result(tui, result);
            vec![]
        }
        KeyCode::Right => {
            let result = tui.session.next_stage(now);
            note_result(tui, result);
            vec![]
        }
        KeyCode::Char('a') => {
            let events = tui.session.toggle_autoplay(now);
            note_events(tui, &events);
            let label = if tui.session.autoplay_wanted() {
                "Autoplay on"
            } else {
                "Autoplay off"
            };
            tui.show_toast(label);
            vec![]
        }
        KeyCode::Char('m') => {
            let mode = tui.prefs.mode.toggled();
            tui.prefs = tui.prefs.with_mode(mode);
            tui.show_toast(mode.announcement());
            vec![UiEffect::PersistMode { mode }]
        }
        KeyCode::Char(':') => {
            app.overlay = Some(Overlay::Console(ConsoleState::open()));
            vec![]
        }
        _ => vec![],
    }
}

/// Cancels every pending wake-up before leaving so nothing outlives the view.
fn quit(tui: &mut TuiState) -> Vec<UiEffect> {
    let now = tui.now;
    tui.session.reset(now);
    tui.should_quit = true;
    vec![UiEffect::Quit]
}

fn note_result(tui: &mut TuiState, result: Result<Vec<PlaybackEvent>, PlaybackError>) {
    match result {
        Ok(events) => note_events(tui, &events),
        Err(err) => tui.show_toast(err.to_string()),
    }
}

fn note_events(tui: &mut TuiState, events: &[PlaybackEvent]) {
    if events.iter().any(PlaybackEvent::is_visible) {
        tui.dirty = true;
    }
    if events.contains(&PlaybackEvent::Completed) {
        tui.show_toast("✓ Playback complete");
    }
}

#[cfg(test)]
mod tests {
    use unveil_core::config::Config;
    use unveil_core::playback::Phase;
    use unveil_core::prefs::{Mode, Persona, Preferences};
    use unveil_core::script::{Line, LineKind, Script, Stage, TimingProfile};

    use super::*;

    fn line(text: &str) -> Line {
        Line {
            text: text.to_string(),
            kind: LineKind::infer(text),
            tooltip: None,
            typing_delay_ms: 10,
            pause_after_ms: 100,
        }
    }

    fn script() -> Script {
        let stages = (0..3)
            .map(|i| Stage {
                name: format!("Stage {i}"),
                icon: "•".to_string(),
                summary: None,
                lines: vec![line("$ go"), line("✓ done")],
            })
            .collect();
        Script::new("demo", "Demo", TimingProfile::Terminal, stages).unwrap()
    }

    fn app() -> AppState {
        AppState::new(script(), &Config::default(), Preferences::default(), false)
    }

    fn press(app: &mut AppState, code: KeyCode) -> Vec<UiEffect> {
        update(
            app,
            UiEvent::Terminal(Event::Key(KeyEvent::new(code, KeyModifiers::NONE))),
        )
    }

    fn tick(app: &mut AppState, ms: u64) {
        update(app, UiEvent::Tick { now: Millis(ms) });
    }

    fn type_console(app: &mut AppState, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
        press(app, KeyCode::Enter);
    }

    #[test]
    fn test_enter_starts_and_ticks_type() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        assert!(app.tui.session.controller().is_playing());
        tick(&mut app, 20);
        assert_eq!(app.tui.session.state().typed_prefix, "$ ");
    }

    #[test]
    fn test_p_pauses_and_enter_resumes() {
        let mut app = app();
        press(&mut app, KeyCode::Char(' '));
        tick(&mut app, 15);
        press(&mut app, KeyCode::Char('p'));
        assert!(app.tui.session.controller().is_paused());
        assert_eq!(app.tui.session.next_deadline(), None);

        tick(&mut app, 500);
        assert_eq!(app.tui.session.state().typed_prefix, "$");

        press(&mut app, KeyCode::Enter);
        assert!(app.tui.session.controller().is_playing());
    }

    #[test]
    fn test_p_before_start_does_nothing() {
        let mut app = app();
        press(&mut app, KeyCode::Char('p'));
        assert!(app.tui.session.state().is_idle());
    }

    #[test]
    fn test_digit_jumps_and_bad_digit_toasts() {
        let mut app = app();
        press(&mut app, KeyCode::Char('2'));
        assert_eq!(app.tui.session.state().stage_index, 1);
        assert_eq!(app.tui.session.state().completed_stages.len(), 1);

        press(&mut app, KeyCode::Char('9'));
        assert_eq!(app.tui.session.state().stage_index, 1);
        let toast = app.tui.toast.clone().unwrap();
        assert!(toast.text.contains("stage 9 does not exist"));

        tick(&mut app, 2500);
        assert_eq!(app.tui.toast, None);
    }

    #[test]
    fn test_arrows_step_through_stages() {
        let mut app = app();
        press(&mut app, KeyCode::Right);
        assert_eq!(app.tui.session.state().stage_index, 0);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.tui.session.state().stage_index, 2);
        press(&mut app, KeyCode::Left);
        assert_eq!(app.tui.session.state().stage_index, 1);
    }

    #[test]
    fn test_reset_returns_to_idle() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        tick(&mut app, 200);
        press(&mut app, KeyCode::Char('r'));
        assert_eq!(app.tui.session.state().phase, Phase::Idle);
        assert!(!app.tui.session.has_pending_wakeup());
    }

    #[test]
    fn test_quit_cancels_pending_wakeups() {
        let mut app = app();
        press(&mut app, KeyCode::Char('a'));
        press(&mut app, KeyCode::Enter);
        assert!(app.tui.session.has_pending_wakeup());

        let effects = press(&mut app, KeyCode::Char('q'));
        assert_eq!(effects, vec![UiEffect::Quit]);
        assert!(app.tui.should_quit);
        assert!(!app.tui.session.has_pending_wakeup());
    }

    #[test]
    fn test_mode_toggle_persists() {
        let mut app = app();
        let effects = press(&mut app, KeyCode::Char('m'));
        assert_eq!(app.tui.prefs.mode, Mode::Light);
        assert_eq!(effects, vec![UiEffect::PersistMode { mode: Mode::Light }]);
    }

    #[test]
    fn test_autoplay_toggle_attaches() {
        let mut app = app();
        press(&mut app, KeyCode::Char('a'));
        assert!(app.tui.session.autoplay_wanted());
        assert!(app.tui.session.autoplay_active());
        press(&mut app, KeyCode::Char('a'));
        assert!(!app.tui.session.autoplay_active());
    }

    #[test]
    fn test_console_captures_keys_and_switches_persona() {
        let mut app = app();
        press(&mut app, KeyCode::Char(':'));
        assert!(app.overlay.is_some());

        // 'q' goes to the console, it does not quit.
        type_console(&mut app, "mantap");
        assert!(!app.tui.should_quit);
        assert_eq!(app.tui.prefs.persona, Persona::Truth);

        press(&mut app, KeyCode::Esc);
        assert!(app.overlay.is_none());
        assert!(!app.tui.should_quit);
    }

    #[test]
    fn test_completion_shows_toast() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        tick(&mut app, 10_000);
        assert!(app.tui.session.state().is_complete());
        assert_eq!(app.tui.toast.as_ref().unwrap().text, "✓ Playback complete");
    }
}
