//! Integration Test: Sleep Prohibition
//!
//! **Policy**: Production code MUST NOT block a thread with sleep.
//! **Exceptions**: Async frame rate limiting in the TUI (`tokio::time::sleep`), test code

use architectural_enforcement::{find_violations, workspace_root};

const BLOCKING_SLEEPS: &[&str] = &["std::thread::sleep", "thread::sleep("];

fn assert_no_blocking_sleep(relative: &str) {
    let dir = workspace_root().join(relative);
    let violations = find_violations(&dir, BLOCKING_SLEEPS);

    if !violations.is_empty() {
        for violation in &violations {
            eprintln!("  {}:{}", violation.path.display(), violation.line);
        }
        panic!(
            "\nFound {} blocking sleep(s) in {relative}.\nUse tokio timers instead.",
            violations.len()
        );
    }
}

#[test]
fn test_no_blocking_sleep_in_core() {
    assert_no_blocking_sleep("concierge/core/src");
}

#[test]
fn test_no_blocking_sleep_in_tui() {
    assert_no_blocking_sleep("tui/src");
}
