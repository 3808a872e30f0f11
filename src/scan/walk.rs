//! In-process scanning with the `ignore` walker

use super::{is_excluded_dir, is_included_file, ContentScanner, ScanOutcome};
use ignore::WalkBuilder;
use regex::bytes::Regex;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

const MAX_FILE_SIZE: u64 = 1024 * 1024;

/// Walks the repository and matches lines with `regex`
///
/// Files are matched as bytes, so a test file with invalid UTF-8 still
/// matches, the same as with grep.
///
/// Needs no grep on the host. `.gitignore` is not honoured, matching what
/// `grep -r` sees.
pub struct WalkScanner {
    max_file_size: u64,
}

impl WalkScanner {
    pub fn new() -> Self {
        Self {
            max_file_size: MAX_FILE_SIZE,
        }
    }

    pub fn with_max_file_size(mut self, max_file_size: u64) -> Self {
        self.max_file_size = max_file_size;
        self
    }

    fn whole_word(pattern: &str) -> Result<Regex, regex::Error> {
        Regex::new(&format!(r"\b(?:{})\b", pattern))
    }
}

impl Default for WalkScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentScanner for WalkScanner {
    fn name(&self) -> &'static str {
        "builtin"
    }

    fn scan(&self, repo_root: &Path, pattern: &str) -> ScanOutcome {
        let regex = match Self::whole_word(pattern) {
            Ok(re) => re,
            Err(e) => return ScanOutcome::Failed(format!("invalid pattern {}: {}", pattern, e)),
        };

        if !repo_root.is_dir() {
            return ScanOutcome::Failed(format!(
                "repository path is not a directory: {}",
                repo_root.display()
            ));
        }

        let root = repo_root.to_path_buf();
        let walker = WalkBuilder::new(repo_root)
            .hidden(false)
            .git_ignore(false)
            .git_global(false)
            .git_exclude(false)
            .ignore(false)
            .parents(false)
            .filter_entry(move |entry| {
                if entry.path() == root {
                    return true;
                }
                let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
                !(is_dir && is_excluded_dir(&entry.file_name().to_string_lossy()))
            })
            .build();

        let mut matched_lines = 0;
        let mut files_scanned = 0;

        for result in walker {
            let entry = match result {
                Ok(e) => e,
                Err(err) => {
                    warn!(error = %err, "Failed to read directory entry");
                    continue;
                }
            };

            if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
                continue;
            }
            if !is_included_file(&entry.file_name().to_string_lossy()) {
                continue;
            }

            let path = entry.path();
            match fs::metadata(path) {
                Ok(meta) if meta.len() <= self.max_file_size => {}
                _ => continue,
            }

            let content = match fs::read(path) {
                Ok(c) => c,
                Err(err) => {
                    debug!(path = %path.display(), error = %err, "Skipping unreadable file");
                    continue;
                }
            };

            files_scanned += 1;
            matched_lines += content
                .split(|b| *b == b'\n')
                .filter(|line| regex.is_match(line))
                .count();
        }

        debug!(
            pattern,
            files_scanned, matched_lines, "builtin scan finished"
        );

        match matched_lines {
            0 => ScanOutcome::NoMatch,
            n => ScanOutcome::Matched(n),
        }
    }
}
