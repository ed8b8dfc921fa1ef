//! Architectural Enforcement Integration Tests
//!
//! This package contains integration tests that enforce architectural principles:
//! - The duel core never sleeps; time only advances through polled deadlines
//! - The duel core has no terminal dependencies
//! - Only the TUI frame loop may sleep
//!
//! The helpers below locate workspace sources and strip comments and test
//! modules so the checks only see production code.

use std::fs;
use std::path::{Path, PathBuf};

/// Workspace root (two levels above this crate)
pub fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../..")
        .canonicalize()
        .unwrap_or_else(|_| PathBuf::from("../.."))
}

/// Every `.rs` file under `dir` (relative to the workspace root)
pub fn rust_files(dir: &str) -> Vec<PathBuf> {
    let path = workspace_root().join(dir);
    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(path)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.path().extension().and_then(|s| s.to_str()) == Some("rs"))
        .map(|e| e.into_path())
        .collect();
    files.sort();
    files
}

/// Production lines of a source file as (line number, code) pairs
///
/// Line comments are stripped and scanning stops at the first
/// `#[cfg(test)]`, which in this workspace always opens the trailing test
/// module.
pub fn production_lines(path: &Path) -> Vec<(usize, String)> {
    let Ok(content) = fs::read_to_string(path) else {
        return Vec::new();
    };
    content
        .lines()
        .enumerate()
        .take_while(|(_, line)| line.trim() != "#[cfg(test)]")
        .map(|(idx, line)| {
            let code = line.split("//").next().unwrap_or(line);
            (idx + 1, code.to_string())
        })
        .filter(|(_, code)| !code.trim().is_empty())
        .collect()
}

/// `path` relative to the workspace root, for messages
pub fn display_path(path: &Path) -> String {
    path.strip_prefix(workspace_root())
        .unwrap_or(path)
        .display()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspace_root_has_core() {
        assert!(workspace_root().join("conductor/core/Cargo.toml").exists());
    }

    #[test]
    fn test_production_lines_skip_comments_and_tests() {
        let dir = std::env::temp_dir().join("arch-enforcement-selftest");
        fs::create_dir_all(&dir).unwrap();
        let file = dir.join("sample.rs");
        fs::write(
            &file,
            "fn a() {} // sleep(\n// only a comment\n#[cfg(test)]\nfn b() { sleep(1) }\n",
        )
        .unwrap();

        let lines = production_lines(&file);
        assert_eq!(lines, vec![(1, "fn a() {} ".to_string())]);
    }
}
