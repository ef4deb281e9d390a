//! End-to-end tests for the control-panel console.
//!
//! Each test wires the complete application (default configuration, real
//! engine, real change bus) and drives it through `Console::run` with a
//! scripted input. No terminal is involved.

use std::io::Cursor;

use homepanel::config::ConsoleConfig;
use homepanel::console::Console;
use homepanel_app::config::EngineConfig;
use homepanel_domain::action_log::LogTarget;
use homepanel_domain::device::{DeviceState, LightState, LockState};

fn console() -> Console {
    let settings = ConsoleConfig {
        prompt: "> ".to_string(),
        ..ConsoleConfig::default()
    };
    Console::new(&EngineConfig::default(), settings).expect("default configuration should build")
}

/// Run a script and return everything written, prompts included.
fn run(console: &mut Console, script: &str) -> String {
    let mut out = Vec::new();
    console
        .run(Cursor::new(script.to_string()), &mut out)
        .expect("in-memory I/O should not fail");
    String::from_utf8(out).expect("console output should be UTF-8")
}

// ---------------------------------------------------------------------------
// Scenario
// ---------------------------------------------------------------------------

#[test]
fn should_record_scene_after_toggle_and_party() {
    let mut console = console();
    let out = run(&mut console, "toggle light1\nscene Party\n");

    assert!(out.contains("light1: Status: ON\n"));
    assert!(out.contains("Activated Party Scene\n"));
    assert!(out.contains("  fan1: Fan speed: 2\n"));

    let engine = console.engine();
    assert_eq!(
        engine.get_device("light1").unwrap().state(),
        &DeviceState::Light(LightState::On)
    );
    assert_eq!(
        engine.get_device("door1").unwrap().state(),
        &DeviceState::Lock(LockState::Unlocked)
    );
    assert_eq!(
        engine.get_device("fan1").unwrap().state(),
        &DeviceState::Fan(2)
    );

    let log = engine.action_log();
    assert_eq!(log.len(), 5);
    let latest = log.latest().unwrap();
    assert_eq!(latest.target, LogTarget::Scene);
    assert_eq!(latest.action, "Activated Party Scene");
    assert_eq!(log.get(1).unwrap().action, "Set to ON");
}

#[test]
fn should_list_newest_entries_first() {
    let mut console = console();
    let out = run(&mut console, "toggle door1\nlog\n");

    let log_lines: Vec<&str> = out
        .lines()
        .filter(|line| line.contains(" (User)"))
        .collect();
    assert_eq!(log_lines.len(), 4);
    assert!(log_lines[0].contains("door1"));
    assert!(log_lines[0].contains("Set to UNLOCKED"));
    assert!(log_lines[3].contains("Turn ON"));
}

#[test]
fn should_filter_log_by_scene_target() {
    let mut console = console();
    let out = run(&mut console, "scene Night\nlog scene\n");

    let scene_lines: Vec<&str> = out
        .lines()
        .filter(|line| line.contains("SCENE"))
        .collect();
    assert_eq!(scene_lines.len(), 1);
    assert!(scene_lines[0].contains("Activated Night Scene"));
}

#[test]
fn should_treat_scene_filter_case_insensitively() {
    let mut console = console();
    let out = run(&mut console, "scene Away\nlog Scene\n");

    assert_eq!(out.lines().filter(|line| line.contains("SCENE")).count(), 1);
}

// ---------------------------------------------------------------------------
// Value assignment
// ---------------------------------------------------------------------------

#[test]
fn should_not_log_transient_set_by_default() {
    let mut console = console();
    let out = run(&mut console, "set thermostat1 24.5\n");

    assert!(out.contains("thermostat1: Set point: 24.5 \u{b0}C\n"));
    assert_eq!(console.engine().action_log().len(), 3);
}

#[test]
fn should_log_set_when_requested() {
    let mut console = console();
    run(&mut console, "set thermostat1 25 --log\n");

    let latest = console.engine().action_log().latest().unwrap();
    assert_eq!(latest.action, "Set to 25.0");
    assert_eq!(latest.target.to_string(), "thermostat1");
}

#[test]
fn should_render_fractional_set_point_in_full() {
    let mut console = console();
    let out = run(&mut console, "set thermostat1 22.25 --log\n");

    assert!(out.contains("thermostat1: Set point: 22.25 \u{b0}C\n"));
    let latest = console.engine().action_log().latest().unwrap();
    assert_eq!(latest.action, "Set to 22.25");
}

#[test]
fn should_reject_out_of_range_value_without_change() {
    let mut console = console();
    let out = run(&mut console, "set thermostat1 99 --log\n");

    assert!(out.contains("error: value 99 is outside the domain of thermostat1"));
    assert_eq!(
        console.engine().get_device("thermostat1").unwrap().state(),
        &DeviceState::Thermostat(22.0)
    );
    assert_eq!(console.engine().action_log().len(), 3);
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[test]
fn should_report_errors_and_keep_running() {
    let mut console = console();
    let out = run(
        &mut console,
        "toggle thermostat1\ntoggle ghost\nscene Disco\ndance\ntoggle light1\n",
    );

    assert!(out.contains("error: toggle is not supported by thermostat device thermostat1\n"));
    assert!(out.contains("error: device ghost not found\n"));
    assert!(out.contains("error: scene Disco is not registered\n"));
    assert!(out.contains("error: unknown command"));
    assert!(out.contains("light1: Status: ON\n"));
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

#[test]
fn should_list_devices_in_registration_order() {
    let mut console = console();
    let out = run(&mut console, "devices\n");

    let ids: Vec<&str> = out
        .lines()
        .filter_map(|line| line.trim_start_matches("> ").split_whitespace().next())
        .collect();
    assert_eq!(ids, ["light1", "door1", "thermostat1", "fan1"]);
}

#[test]
fn should_show_only_the_device_history() {
    let mut console = console();
    let out = run(&mut console, "toggle door1\nshow light1\n");

    assert!(out.contains("Living Room Light details\n"));
    assert!(out.contains("Tap to switch the light.\n"));
    assert_eq!(out.matches(" - Turn ").count(), 3);
    assert!(!out.contains("Set to UNLOCKED ("));
}

#[test]
fn should_print_json_with_current_state() {
    let mut console = console();
    let out = run(&mut console, "toggle light1\njson\nquit\n");

    let start = out.find('[').unwrap();
    let end = out.rfind(']').unwrap();
    let value: serde_json::Value = serde_json::from_str(&out[start..=end]).unwrap();
    assert_eq!(value[0]["state"]["kind"], "light");
    assert_eq!(value[0]["state"]["value"], "on");
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

#[test]
fn should_stop_reading_after_quit() {
    let mut console = console();
    let out = run(&mut console, "quit\ntoggle light1\n");

    assert_eq!(out, "> ");
    assert_eq!(console.engine().action_log().len(), 3);
}

#[test]
fn should_stop_at_end_of_input() {
    let mut console = console();
    let out = run(&mut console, "");
    assert_eq!(out, "> ");
}
