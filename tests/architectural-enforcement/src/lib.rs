//! Architectural Enforcement
//!
//! Source scanners used by the integration tests in this package to keep the
//! workspace honest:
//! - The core library stays headless (no console output, no subscriber setup)
//! - No sleeping in production code
//!
//! Only production code is scanned: a file is read up to its first
//! `#[cfg(test)]` line.

use std::fs;
use std::path::{Path, PathBuf};

/// A forbidden pattern found in production code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// File containing the match
    pub path: PathBuf,
    /// 1-based line number
    pub line: usize,
    /// The offending line, trimmed
    pub text: String,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{} - {}", self.path.display(), self.line, self.text)
    }
}

/// Absolute path of a workspace-relative directory
pub fn workspace_path(relative: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../..")
        .join(relative)
}

/// Scan every `.rs` file under `dir` for lines whose code part (comments
/// stripped) matches `forbidden`
pub fn scan_production_code(dir: &Path, forbidden: impl Fn(&str) -> bool) -> Vec<Violation> {
    let mut violations = Vec::new();

    for entry in walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.path().extension().and_then(|s| s.to_str()) == Some("rs"))
    {
        let Ok(content) = fs::read_to_string(entry.path()) else {
            continue;
        };

        for (idx, line) in content.lines().enumerate() {
            if line.trim_start().starts_with("#[cfg(test)]") {
                break;
            }
            if line.trim_start().starts_with("//") {
                continue;
            }

            let code_part = line.split("//").next().unwrap_or(line);
            if forbidden(code_part) {
                violations.push(Violation {
                    path: entry.path().to_path_buf(),
                    line: idx + 1,
                    text: line.trim().to_string(),
                });
            }
        }
    }

    violations
}

/// Panic with a readable report if any violations were found
pub fn assert_clean(rule: &str, violations: &[Violation]) {
    if violations.is_empty() {
        return;
    }

    eprintln!("\n❌ {rule}\n");
    for violation in violations {
        eprintln!("  ❌ {violation}");
    }
    panic!("\nFound {} violation(s): {rule}", violations.len());
}
