//! Scanning through the system `grep`

use super::{ContentScanner, ScanOutcome, EXCLUDED_DIRS, INCLUDE_NAME};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// Runs `grep -rnw` in the repository root
pub struct GrepScanner {
    program: PathBuf,
}

impl GrepScanner {
    pub fn new() -> Self {
        Self::with_program("grep")
    }

    /// Uses a specific grep binary (or any grep-compatible tool)
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn build_command(&self, repo_root: &Path, pattern: &str) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.current_dir(repo_root)
            .arg(format!("--include=*{}*", INCLUDE_NAME))
            .arg("-rnw");
        for excluded in EXCLUDED_DIRS {
            cmd.arg(format!("--exclude-dir={}", excluded));
        }
        cmd.arg("-e").arg(pattern).arg(".");
        cmd
    }
}

impl Default for GrepScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentScanner for GrepScanner {
    fn name(&self) -> &'static str {
        "grep"
    }

    fn scan(&self, repo_root: &Path, pattern: &str) -> ScanOutcome {
        let output = match self.build_command(repo_root, pattern).output() {
            Ok(output) => output,
            Err(e) => {
                return ScanOutcome::Failed(format!(
                    "failed to run {}: {}",
                    self.program.display(),
                    e
                ))
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        debug!(
            pattern,
            status = ?output.status.code(),
            stdout_bytes = stdout.len(),
            stderr_bytes = stderr.len(),
            "grep scan finished"
        );

        if output.status.success() {
            return match stdout.lines().count() {
                0 => ScanOutcome::NoMatch,
                n => ScanOutcome::Matched(n),
            };
        }

        // Exit 1 with no output is grep's "nothing selected".
        let combined = format!("{}{}", stdout, stderr);
        if combined.trim().is_empty() {
            ScanOutcome::NoMatch
        } else {
            ScanOutcome::Failed(combined.trim().to_string())
        }
    }
}
