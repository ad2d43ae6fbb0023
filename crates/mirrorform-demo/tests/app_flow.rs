#![forbid(unsafe_code)]

//! Scripted sessions against the headless screen.
//!
//! Run:
//!   cargo test -p mirrorform-demo --test app_flow

use mirrorform_core::{FieldPath, FormValues};
use mirrorform_demo::{App, Button, script};
use mirrorform_runtime::{ManualClock, Scheduler, SyncConfig};

fn session(config: SyncConfig, input: &str) -> (App, ManualClock, String) {
    let (scheduler, clock) = Scheduler::manual();
    let mut app = App::new(scheduler, config);
    let mut out = Vec::new();
    let advance = clock.clone();
    script::run(&mut app, input.as_bytes(), &mut out, move |d| advance.advance(d))
        .expect("in-memory session");
    (app, clock, String::from_utf8(out).expect("utf-8 output"))
}

/// The last rendered screen in `output`.
fn last_screen(output: &str) -> &str {
    output.rsplit("> ").next().unwrap_or(output)
}

#[test]
fn typing_then_waiting_commits_one_point() {
    let (app, _clock, out) = session(
        SyncConfig::default(),
        "type a h\ntype a he\ntype a hel\nwait 50\nshow\n",
    );

    let screen = last_screen(&out);
    assert!(screen.contains("[hel]"));
    assert!(screen.contains("mirror v1: a=\"hel\""));
    assert!(screen.contains("history 2/2"));
    assert!(screen.contains("[undo]"));
    assert_eq!(app.view().history.len, 2);
}

#[test]
fn set_test_fills_every_input() {
    let (app, _clock, out) = session(SyncConfig::default(), "test\nwait 50\n");

    let view = app.view();
    for path in FieldPath::ALL {
        assert_eq!(view.field(path), Some("test"));
    }
    assert_eq!(view.mirror, FormValues::filled("test"));
    assert!(last_screen(&out).contains("[redo (disabled)]"));
}

#[test]
fn undo_redo_round_trip_through_script() {
    let (app, _clock, out) = session(
        SyncConfig::default(),
        "type b one\nwait 50\ntype b two\nwait 50\nundo\nwait 50\n",
    );

    assert_eq!(app.view().field(FieldPath::B), Some("one"));
    assert!(last_screen(&out).contains("history 2/3"));
    assert!(last_screen(&out).contains("[redo]"));
}

#[test]
fn undo_at_start_is_ignored() {
    let (app, _clock, out) = session(SyncConfig::default(), "undo\nundo\nshow\n");
    assert_eq!(app.view().history.len, 1);
    assert!(last_screen(&out).contains("[undo (disabled)]"));
    assert_eq!(app.view().mirror_version, 0);
}

#[test]
fn bad_lines_are_reported_and_skipped() {
    let (app, _clock, out) = session(
        SyncConfig::default(),
        "# comment\nfly away\ntype q x\nwait\ntype c.b ok\nwait 50\n",
    );

    assert!(out.contains("error: unknown command 'fly'"));
    assert!(out.contains("error: unknown field path 'q'"));
    assert!(out.contains("error: missing argument: milliseconds"));
    assert_eq!(app.view().mirror.c.b, "ok");
}

#[test]
fn quit_stops_before_pending_write_settles() {
    let (app, clock, out) = session(SyncConfig::default(), "type a late\nquit\nwait 50\n");

    assert!(!out.contains("> wait"));
    assert!(!app.sync().is_mounted());
    clock.advance(web_time::Duration::from_millis(100));
    app.tick();
    assert_eq!(app.view().mirror_version, 0);
    assert!(!app.click(Button::SetTest));
}

#[test]
fn configured_debounce_governs_settling() {
    let (app, _clock, out) = session(
        SyncConfig::default().with_debounce_ms(200),
        "type a slow\nwait 150\n",
    );
    let screen = last_screen(&out);
    assert!(screen.contains("mirror v0:"));
    assert!(screen.contains("(settling)"));
    // The session ended mid-window, so the write was dropped on unmount.
    assert_eq!(app.view().mirror_version, 0);
    assert!(!app.view().pending_write);
}

#[test]
fn history_cap_limits_undo_through_script() {
    let mut input = String::new();
    for i in 1..=25 {
        input.push_str(&format!("type a v{i}\nwait 50\n"));
    }
    for _ in 0..21 {
        input.push_str("undo\nwait 50\n");
    }

    let (app, _clock, _out) = session(SyncConfig::default(), &input);

    assert_eq!(app.view().field(FieldPath::A), Some("v6"));
    assert!(!app.view().history.can_undo);
}
