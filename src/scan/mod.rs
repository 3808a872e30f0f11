//! Content scanning over a repository's test files
//!
//! Database detection asks "does any test file mention X". Every backend
//! answers over the same file set:
//!
//! - files whose name contains `test`
//! - recursively from the repository root
//! - skipping `vendor/` and generated `gen-*` directories
//! - whole-word matches only
//!
//! A backend never fails hard. A missing tool or an unreadable tree becomes
//! [`ScanOutcome::Failed`], which callers treat the same as no match.

mod grep;
mod mock;
mod walk;

pub use grep::GrepScanner;
pub use mock::StaticScanner;
pub use walk::WalkScanner;

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Substring a file name must contain to be scanned
pub const INCLUDE_NAME: &str = "test";

/// Directory names excluded from scanning; a trailing `*` is a prefix match
pub const EXCLUDED_DIRS: &[&str] = &["vendor", "gen-*"];

/// Result of a single content scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "outcome", content = "detail")]
pub enum ScanOutcome {
    /// Number of matching lines
    Matched(usize),
    NoMatch,
    /// The scan could not run or errored part way through
    Failed(String),
}

impl ScanOutcome {
    pub fn is_match(&self) -> bool {
        matches!(self, ScanOutcome::Matched(n) if *n > 0)
    }
}

/// Searches a repository's test files for a regex pattern
pub trait ContentScanner: Send + Sync {
    fn name(&self) -> &'static str;

    fn scan(&self, repo_root: &Path, pattern: &str) -> ScanOutcome;
}

crate::define_id_enum! {
    /// Selectable [`ContentScanner`] implementations
    ScanBackend {
        /// `grep` subprocess, the behaviour migrated repositories were tuned against
        Grep => "grep" : "grep",
        Builtin => "builtin" : "built-in walker" | "walk",
    }
}

impl ScanBackend {
    pub fn create_scanner(&self) -> Box<dyn ContentScanner> {
        match self {
            ScanBackend::Grep => Box::new(GrepScanner::new()),
            ScanBackend::Builtin => Box::new(WalkScanner::new()),
        }
    }
}

/// True when a directory name falls under [`EXCLUDED_DIRS`]
pub fn is_excluded_dir(name: &str) -> bool {
    EXCLUDED_DIRS.iter().any(|excluded| match excluded.strip_suffix('*') {
        Some(prefix) => name.starts_with(prefix),
        None => name == *excluded,
    })
}

/// True when a file name falls under [`INCLUDE_NAME`]
pub fn is_included_file(name: &str) -> bool {
    name.contains(INCLUDE_NAME)
}
