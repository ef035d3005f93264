//! Integration Test: Headless Core
//!
//! **Policy**: `chat-panel-core` is a library for UI surfaces. It reports
//! through `tracing` and return values, never by writing to the terminal,
//! and never installs a global subscriber (that is the binary's job).

use architectural_enforcement::{assert_clean, scan_production_code, workspace_path};

#[test]
fn test_no_console_output_in_core() {
    let dir = workspace_path("panel/core/src");
    assert!(dir.exists(), "missing {}", dir.display());

    let violations = scan_production_code(&dir, |code| {
        ["println!", "eprintln!", "print!", "eprint!", "dbg!"]
            .iter()
            .any(|mac| code.contains(mac))
    });

    assert_clean("Console output in chat-panel-core", &violations);
}

#[test]
fn test_no_subscriber_setup_in_core() {
    let dir = workspace_path("panel/core/src");

    let violations = scan_production_code(&dir, |code| code.contains("tracing_subscriber"));

    assert_clean("Subscriber setup in chat-panel-core", &violations);
}
