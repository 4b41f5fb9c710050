//! Integration Test: UI Independence
//!
//! **Policy**: `concierge/core` is headless. It must not import a terminal
//! or UI framework, and must not block on HTTP. Surfaces depend on the core,
//! never the other way round.

use architectural_enforcement::{find_violations, rust_sources, workspace_root, Violation};

fn core_src() -> std::path::PathBuf {
    workspace_root().join("concierge").join("core").join("src")
}

fn report(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| format!("  {}:{} uses `{}`", v.path.display(), v.line, v.pattern))
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn test_core_sources_exist() {
    assert!(
        !rust_sources(&core_src()).is_empty(),
        "no sources found under {}",
        core_src().display()
    );
}

#[test]
fn test_core_has_no_ui_framework_imports() {
    let violations = find_violations(&core_src(), &["ratatui", "crossterm"]);
    assert!(
        violations.is_empty(),
        "UI framework used in the core:\n{}",
        report(&violations)
    );
}

#[test]
fn test_core_has_no_blocking_http_client() {
    let violations = find_violations(&core_src(), &["reqwest::blocking"]);
    assert!(
        violations.is_empty(),
        "blocking HTTP in the core:\n{}",
        report(&violations)
    );
}
