//! Integration Test: Sleep Prohibition
//!
//! **Policy**: The duel core MUST NOT sleep. Choreography advances only when
//! a surface polls the timeline, so every timing rule is testable with an
//! explicit clock.
//! **Exception**: the TUI frame loop in `tui/src/app.rs` waits for the next
//! frame or the next choreography deadline, whichever comes first.

use architectural_enforcement::{display_path, production_lines, rust_files};

fn is_sleep_call(code: &str) -> bool {
    code.contains("::sleep(") || code.contains(".sleep(") || code.contains("sleep_until(")
}

/// Test that the duel core never sleeps
#[test]
fn test_no_sleep_in_core() {
    let mut violations = Vec::new();
    for file in rust_files("conductor/core/src") {
        for (line, code) in production_lines(&file) {
            if is_sleep_call(&code) {
                violations.push(format!("{}:{line}: {}", display_path(&file), code.trim()));
            }
        }
    }

    if !violations.is_empty() {
        eprintln!("\nSleep calls found in the duel core:");
        for violation in &violations {
            eprintln!("  {violation}");
        }
        eprintln!("\nSchedule a cue on the Sequencer instead.");
        panic!("Found {} sleep violation(s) in duel-core", violations.len());
    }
}

/// Test that the TUI only sleeps in its frame loop
#[test]
fn test_tui_sleeps_only_for_frame_pacing() {
    let mut violations = Vec::new();
    for file in rust_files("tui/src") {
        let in_app = file.ends_with("tui/src/app.rs");
        for (line, code) in production_lines(&file) {
            if is_sleep_call(&code) && !in_app {
                violations.push(format!("{}:{line}: {}", display_path(&file), code.trim()));
            }
        }
    }

    assert!(
        violations.is_empty(),
        "Sleep outside the frame loop:\n{}",
        violations.join("\n")
    );
}

#[test]
fn test_sleep_detection() {
    assert!(is_sleep_call("tokio::time::sleep(d).await"));
    assert!(is_sleep_call("std::thread::sleep(d);"));
    assert!(!is_sleep_call("let asleep = true;"));
}
