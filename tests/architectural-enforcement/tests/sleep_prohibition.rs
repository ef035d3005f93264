//! Integration Test: Sleep Prohibition
//!
//! **Policy**: Production code waits on channels and I/O, never on the
//! clock. The panel polls its transport; the replay tool delivers and
//! drains in lockstep.

use architectural_enforcement::{assert_clean, scan_production_code, workspace_path};

#[test]
fn test_no_sleep_in_production_code() {
    let mut violations = Vec::new();

    for dir in ["panel/core/src", "panel/replay/src"] {
        let dir = workspace_path(dir);
        assert!(dir.exists(), "missing {}", dir.display());
        violations.extend(scan_production_code(&dir, |code| {
            code.contains("::sleep(") || code.contains(".sleep(")
        }));
    }

    assert_clean("Sleep calls in production code", &violations);
}
