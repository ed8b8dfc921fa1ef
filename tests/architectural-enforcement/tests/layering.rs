//! Integration Test: Core/Surface Layering
//!
//! **Policy**: `duel-core` is headless. It must not depend on or import any
//! terminal crate, and it must not reach into the TUI. Rendering concerns
//! live in `duel-tui`.

use std::fs;

use architectural_enforcement::{display_path, production_lines, rust_files, workspace_root};

const TERMINAL_CRATES: &[&str] = &["ratatui", "crossterm"];

#[test]
fn test_core_manifest_has_no_terminal_dependencies() {
    let manifest = fs::read_to_string(workspace_root().join("conductor/core/Cargo.toml"))
        .expect("core manifest readable");

    for krate in TERMINAL_CRATES.iter().chain(&["duel-tui"]) {
        let declared = manifest.lines().map(str::trim_start).any(|line| {
            line.starts_with(&format!("{krate} ")) || line.starts_with(&format!("{krate}="))
        });
        assert!(!declared, "duel-core must not depend on {krate}");
    }
}

#[test]
fn test_core_sources_do_not_import_terminal_crates() {
    let mut violations = Vec::new();
    for file in rust_files("conductor/core/src") {
        for (line, code) in production_lines(&file) {
            for krate in TERMINAL_CRATES.iter().chain(&["duel_tui"]) {
                if code.contains(&format!("{krate}::")) {
                    violations.push(format!("{}:{line}: {}", display_path(&file), code.trim()));
                }
            }
        }
    }

    assert!(
        violations.is_empty(),
        "Terminal imports in duel-core:\n{}",
        violations.join("\n")
    );
}

#[test]
fn test_tui_holds_no_duel_rules() {
    // Response tables and choreography belong to the core
    let mut violations = Vec::new();
    for file in rust_files("tui/src") {
        for (line, code) in production_lines(&file) {
            if code.contains("ResponseTable") || code.contains("choreography::") {
                violations.push(format!("{}:{line}: {}", display_path(&file), code.trim()));
            }
        }
    }

    assert!(
        violations.is_empty(),
        "Duel rules referenced from the TUI:\n{}",
        violations.join("\n")
    );
}
