use std::collections::BTreeSet;

use super::*;
use crate::clock::{Clock, ManualClock, Millis};
use crate::config::TimingConfig;
use crate::script::{Catalog, Line, LineKind, Script, Stage, TimingProfile};
use crate::typewriter::grapheme_prefix;

fn script(stages: &[(&str, &[(&str, u64, u64)])]) -> Script {
    let stages = stages
        .iter()
        .map(|(name, lines)| Stage {
            name: (*name).to_string(),
            icon: String::new(),
            summary: None,
            lines: lines
                .iter()
                .map(|(text, typing, pause)| Line {
                    text: (*text).to_string(),
                    kind: LineKind::infer(text),
                    tooltip: None,
                    typing_delay_ms: *typing,
                    pause_after_ms: *pause,
                })
                .collect(),
        })
        .collect();
    Script::new("test", "Test", TimingProfile::Terminal, stages).unwrap()
}

/// Two stages: `$ init()` (60ms/char, 500ms pause) then `✓ done` (60ms/char, 300ms pause).
fn two_stage() -> Script {
    script(&[
        ("init", &[("$ init()", 60, 500)]),
        ("done", &[("✓ done", 60, 300)]),
    ])
}

fn long_stages(count: usize) -> Script {
    let text = "x".repeat(100);
    let stages: Vec<(String, Vec<(String, u64, u64)>)> = (0..count)
        .map(|i| (format!("stage {i}"), vec![(text.clone(), 60, 0)]))
        .collect();
    let borrowed: Vec<(&str, Vec<(&str, u64, u64)>)> = stages
        .iter()
        .map(|(name, lines)| {
            (
                name.as_str(),
                lines.iter().map(|(t, a, b)| (t.as_str(), *a, *b)).collect(),
            )
        })
        .collect();
    let refs: Vec<(&str, &[(&str, u64, u64)])> = borrowed
        .iter()
        .map(|(name, lines)| (*name, lines.as_slice()))
        .collect();
    script(&refs)
}

fn assert_prefix_invariant(controller: &Controller) {
    let state = controller.state();
    let line = controller.current_line().unwrap();
    assert_eq!(
        state.typed_prefix,
        grapheme_prefix(&line.text, state.char_index),
        "prefix out of sync at {:?}",
        state.position()
    );
    if !state.is_playing {
        assert!(!controller.has_pending_wakeup(), "timer armed while stopped");
    }
}

#[test]
fn test_scenario_completes_after_total_duration() {
    let script = two_stage();
    assert_eq!(script.total_duration_ms(), 1640);

    let clock = ManualClock::new();
    let mut controller = Controller::new(script);
    let events = controller.start(clock.now());
    assert_eq!(
        events,
        vec![
            PlaybackEvent::Started,
            PlaybackEvent::StageEntered { stage: 0 },
            PlaybackEvent::LineStarted { stage: 0, line: 0 },
        ]
    );

    controller.tick(clock.advance(1639));
    assert_eq!(controller.phase(), Phase::LinePaused);
    assert!(controller.is_playing());

    let events = controller.tick(clock.advance(1));
    assert_eq!(events.last(), Some(&PlaybackEvent::Completed));
    let state = controller.state();
    assert_eq!(state.phase, Phase::Complete);
    assert!(!state.is_playing);
    assert_eq!(state.completed_stages, BTreeSet::from([0, 1]));
    assert_eq!(state.typed_prefix, "✓ done");
    assert!(!controller.has_pending_wakeup());
}

#[test]
fn test_stage_timeline() {
    let mut controller = Controller::new(two_stage());
    controller.start(Millis(0));

    controller.tick(Millis(480));
    assert_eq!(controller.state().typed_prefix, "$ init()");
    assert_eq!(controller.phase(), Phase::LinePaused);
    assert_eq!(controller.next_deadline(), Some(Millis(980)));

    let events = controller.tick(Millis(980));
    assert_eq!(
        events,
        vec![
            PlaybackEvent::StageCompleted { stage: 0 },
            PlaybackEvent::StageEntered { stage: 1 },
            PlaybackEvent::LineStarted { stage: 1, line: 0 },
        ]
    );
    assert_eq!(controller.next_deadline(), Some(Millis(1040)));
}

#[test]
fn test_one_large_tick_equals_many_small_ticks() {
    let mut coarse = Controller::new(two_stage());
    let mut fine = Controller::new(two_stage());
    let mut coarse_events = coarse.start(Millis(0));
    let mut fine_events = fine.start(Millis(0));

    coarse_events.extend(coarse.tick(Millis(5_000)));
    for t in 1..=5_000 {
        fine_events.extend(fine.tick(Millis(t)));
    }

    assert_eq!(coarse_events, fine_events);
    assert_eq!(coarse.state(), fine.state());
}

#[test]
fn test_reset_mid_typing_returns_to_idle() {
    let mut controller = Controller::new(two_stage());
    controller.start(Millis(0));
    controller.tick(Millis(200));
    assert_eq!(controller.state().typed_prefix, "$ i");

    assert_eq!(controller.reset(), vec![PlaybackEvent::Reset]);
    let state = controller.state().clone();
    assert_eq!(state.position(), (0, 0, 0));
    assert!(!state.is_playing);
    assert_eq!(state.phase, Phase::Idle);
    assert!(!controller.has_pending_wakeup());

    // Deadlines that were pending before the reset must not fire.
    assert!(controller.tick(Millis(10_000)).is_empty());
    assert_eq!(controller.state(), &state);
}

#[test]
fn test_reset_is_idempotent() {
    let mut controller = Controller::new(two_stage());
    controller.start(Millis(0));
    controller.reset();
    controller.reset();
    assert_eq!(controller.state(), &PlaybackState::default());
}

#[test]
fn test_progress_is_monotonic_and_prefix_consistent() {
    let catalog = Catalog::builtin().unwrap();
    let timing = TimingConfig::default();
    for id in ["kopitiam-intel", "kopitiam-evolution"] {
        let script = catalog.resolve(id, &timing, None).unwrap();
        let total = script.total_duration_ms();
        let mut controller = Controller::new(script);
        controller.start(Millis(0));

        let mut last = controller.state().position();
        let mut t = 0;
        while controller.is_playing() {
            t += 7;
            controller.tick(Millis(t));
            assert_prefix_invariant(&controller);
            let position = controller.state().position();
            assert!(position >= last, "{id}: {last:?} -> {position:?} at {t}ms");
            last = position;
        }
        assert!(controller.state().is_complete());
        assert!(t >= total && t < total + 7, "{id} finished at {t}ms, expected {total}ms");
    }
}

#[test]
fn test_start_twice_is_noop() {
    let mut once = Controller::new(two_stage());
    let mut twice = Controller::new(two_stage());
    once.start(Millis(0));
    twice.start(Millis(0));
    assert!(twice.start(Millis(0)).is_empty());

    for t in (0..=1_700).step_by(20) {
        assert_eq!(once.tick(Millis(t)), twice.tick(Millis(t)));
        assert_eq!(once.state(), twice.state());
    }
}

#[test]
fn test_jump_shows_stage_typed_and_stops() {
    let script = script(&[
        ("a", &[("$ one", 60, 0)]),
        ("b", &[("$ two", 60, 0), ("✓ two done", 60, 0)]),
        ("c", &[("🎯 three", 60, 0)]),
    ]);
    let mut controller = Controller::new(script);
    controller.start(Millis(0));
    controller.tick(Millis(100));

    let events = controller.jump_to_stage(1).unwrap();
    assert_eq!(events, vec![PlaybackEvent::Jumped { stage: 1 }]);
    let state = controller.state();
    assert_eq!(state.stage_index, 1);
    assert_eq!(state.line_index, 1);
    assert_eq!(state.typed_prefix, "✓ two done");
    assert_eq!(state.phase, Phase::LinePaused);
    assert!(state.completed_stages.is_superset(&BTreeSet::from([0])));
    assert!(!state.is_playing);
    assert!(!controller.has_pending_wakeup());

    // Nothing left over from the interrupted typing.
    assert!(controller.tick(Millis(60_000)).is_empty());
}

#[test]
fn test_jump_out_of_range() {
    let mut controller = Controller::new(two_stage());
    let err = controller.jump_to_stage(2).unwrap_err();
    assert_eq!(err, PlaybackError::StageOutOfRange { index: 2, count: 2 });
    assert!(err.to_string().contains("stage 3"));
}

#[test]
fn test_play_stage_types_from_first_line() {
    let mut controller = Controller::new(two_stage());
    controller.start(Millis(0));
    controller.tick(Millis(100));

    let events = controller.play_stage(1, Millis(100)).unwrap();
    assert_eq!(
        events,
        vec![
            PlaybackEvent::StageEntered { stage: 1 },
            PlaybackEvent::LineStarted { stage: 1, line: 0 },
        ]
    );
    let state = controller.state();
    assert_eq!(state.position(), (1, 0, 0));
    assert_eq!(state.phase, Phase::TypingLine);
    assert!(state.is_playing);
    assert_eq!(state.completed_stages, BTreeSet::from([0]));

    controller.tick(Millis(160));
    assert_eq!(controller.state().typed_prefix, "✓");
    assert!(controller.play_stage(5, Millis(200)).is_err());
}

#[test]
fn test_resume_after_jump_continues_with_next_stage() {
    let mut controller = Controller::new(two_stage());
    controller.jump_to_stage(0).unwrap();
    controller.resume(Millis(50));

    let events = controller.tick(Millis(50));
    assert_eq!(events[0], PlaybackEvent::StageCompleted { stage: 0 });
    assert_eq!(controller.state().stage_index, 1);

    controller.tick(Millis(50 + 360 + 300));
    assert!(controller.state().is_complete());
}

#[test]
fn test_completion_is_terminal() {
    let mut controller = Controller::new(two_stage());
    controller.start(Millis(0));
    controller.tick(Millis(1_640));
    let done = controller.state().clone();

    assert!(controller.tick(Millis(100_000)).is_empty());
    assert!(controller.pause(Millis(100_000)).is_empty());
    assert!(controller.resume(Millis(100_000)).is_empty());
    assert!(controller.advance_stage(Millis(100_000)).is_empty());
    assert_eq!(controller.state(), &done);
}

#[test]
fn test_pause_keeps_remaining_time() {
    let mut controller = Controller::new(two_stage());
    controller.start(Millis(0));
    controller.tick(Millis(100));
    assert_eq!(controller.state().char_index, 1);

    assert_eq!(controller.pause(Millis(100)), vec![PlaybackEvent::Paused]);
    assert!(!controller.has_pending_wakeup());
    assert!(controller.is_paused());
    assert!(controller.tick(Millis(5_000)).is_empty());

    controller.resume(Millis(1_000));
    assert_eq!(controller.next_deadline(), Some(Millis(1_020)));
    controller.tick(Millis(1_020));
    assert_eq!(controller.state().typed_prefix, "$ ");
}

#[test]
fn test_empty_line_types_instantly() {
    let mut controller = Controller::new(script(&[("gap", &[("", 60, 100), ("ok", 60, 0)])]));
    let events = controller.start(Millis(0));
    assert!(events.contains(&PlaybackEvent::LineTyped { stage: 0, line: 0 }));
    assert_eq!(controller.next_deadline(), Some(Millis(100)));
    controller.tick(Millis(220));
    assert!(controller.state().is_complete());
}

#[test]
fn test_autoplay_advances_regardless_of_typing() {
    let mut session = Session::new(long_stages(3), 4_000).with_autoplay(true);
    session.start(Millis(0));
    assert_eq!(
        session.controller().stage_advance(),
        StageAdvance::External
    );

    session.tick(Millis(3_999));
    assert_eq!(session.state().stage_index, 0);

    session.tick(Millis(4_000));
    assert_eq!(session.state().stage_index, 1);
    assert_eq!(session.state().completed_stages, BTreeSet::from([0]));
    assert_eq!(session.state().phase, Phase::TypingLine);

    session.tick(Millis(8_000));
    assert_eq!(session.state().stage_index, 2);

    let events = session.tick(Millis(12_000));
    assert_eq!(events.last(), Some(&PlaybackEvent::Completed));
    assert_eq!(session.state().completed_stages, BTreeSet::from([0, 1, 2]));
    assert!(!session.has_pending_wakeup());
    assert!(session.tick(Millis(60_000)).is_empty());
}

#[test]
fn test_controller_holds_for_autoplay_between_stages() {
    let script = script(&[("a", &[("ab", 60, 0)]), ("b", &[("cd", 60, 0)])]);
    let mut session = Session::new(script, 4_000).with_autoplay(true);
    session.start(Millis(0));

    session.tick(Millis(3_999));
    let state = session.state();
    assert_eq!(state.stage_index, 0);
    assert_eq!(state.phase, Phase::LinePaused);
    assert!(state.is_playing);
    assert!(state.is_stage_complete(0));
    assert!(session.controller().is_holding());
    assert_eq!(session.next_deadline(), Some(Millis(4_000)));

    session.tick(Millis(4_000));
    assert_eq!(session.state().stage_index, 1);

    // The last stage finishes on its own; the armed interval goes with it.
    session.tick(Millis(4_120));
    assert!(session.state().is_complete());
    assert!(!session.state().is_playing);
    assert!(!session.has_pending_wakeup());
    assert_eq!(session.next_deadline(), None);
    assert!(!session.autoplay_active());
    assert_eq!(session.controller().stage_advance(), StageAdvance::Natural);
    assert!(session.tick(Millis(8_000)).is_empty());
}

#[test]
fn test_completion_inside_coarse_tick_disarms_autoplay() {
    let script = script(&[("a", &[("ab", 60, 0)]), ("b", &[("cd", 60, 0)])]);
    let mut session = Session::new(script, 4_000).with_autoplay(true);
    session.start(Millis(0));

    let events = session.tick(Millis(6_000));
    assert!(events.contains(&PlaybackEvent::Completed));
    assert!(!session.has_pending_wakeup());
    assert_eq!(session.next_deadline(), None);
}

#[test]
fn test_autoplay_large_tick_equals_small_ticks() {
    let mut coarse = Session::new(long_stages(3), 4_000).with_autoplay(true);
    let mut fine = Session::new(long_stages(3), 4_000).with_autoplay(true);
    let mut coarse_events = coarse.start(Millis(0));
    let mut fine_events = fine.start(Millis(0));

    coarse_events.extend(coarse.tick(Millis(13_000)));
    for t in (0..=13_000).step_by(10) {
        fine_events.extend(fine.tick(Millis(t)));
    }

    assert_eq!(coarse_events, fine_events);
    assert_eq!(coarse.state(), fine.state());
}

#[test]
fn test_autoplay_pause_resume_keeps_interval() {
    let mut session = Session::new(long_stages(3), 4_000).with_autoplay(true);
    session.start(Millis(0));
    session.tick(Millis(1_000));
    session.pause(Millis(1_000));
    assert!(!session.state().is_playing);
    assert!(session.tick(Millis(9_000)).is_empty());

    session.resume(Millis(5_000));
    assert!(session.state().is_playing);
    session.tick(Millis(7_999));
    assert_eq!(session.state().stage_index, 0);
    session.tick(Millis(8_000));
    assert_eq!(session.state().stage_index, 1);
}

#[test]
fn test_jump_detaches_autoplay() {
    let mut session = Session::new(long_stages(3), 4_000).with_autoplay(true);
    session.start(Millis(0));
    session.jump_to_stage(2, Millis(500)).unwrap();

    assert!(!session.autoplay_wanted());
    assert!(!session.has_pending_wakeup());
    assert!(session.tick(Millis(20_000)).is_empty());
    assert_eq!(session.state().stage_index, 2);
}

#[test]
fn test_toggle_autoplay_off_releases_hold() {
    let script = script(&[("a", &[("ab", 60, 0)]), ("b", &[("cd", 60, 0)])]);
    let mut session = Session::new(script, 4_000).with_autoplay(true);
    session.start(Millis(0));
    session.tick(Millis(500));
    assert!(session.controller().is_holding());

    let events = session.toggle_autoplay(Millis(500));
    assert!(events.contains(&PlaybackEvent::StageEntered { stage: 1 }));
    session.tick(Millis(620));
    assert!(session.state().is_complete());
}

#[test]
fn test_session_reset_cancels_both_timers() {
    let mut session = Session::new(long_stages(2), 4_000).with_autoplay(true);
    session.start(Millis(0));
    session.tick(Millis(300));
    session.reset(Millis(300));

    assert!(!session.has_pending_wakeup());
    assert_eq!(session.next_deadline(), None);
    assert!(session.tick(Millis(100_000)).is_empty());
    assert_eq!(session.state(), &PlaybackState::default());
}

#[test]
fn test_play_pause_cycles() {
    let mut session = Session::new(two_stage(), 4_000);
    session.play_pause(Millis(0));
    assert!(session.state().is_playing);
    session.play_pause(Millis(10));
    assert!(session.controller().is_paused());
    session.play_pause(Millis(20));
    assert!(session.state().is_playing);
    assert_eq!(session.next_deadline(), Some(Millis(70)));
}
