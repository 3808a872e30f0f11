use super::{ContentScanner, ScanOutcome};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

/// Scanner with canned answers per pattern, for tests
///
/// Patterns without a registered answer report [`ScanOutcome::NoMatch`].
#[derive(Default)]
pub struct StaticScanner {
    outcomes: HashMap<String, ScanOutcome>,
    queries: Mutex<Vec<String>>,
}

impl StaticScanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_outcome(mut self, pattern: &str, outcome: ScanOutcome) -> Self {
        self.outcomes.insert(pattern.to_string(), outcome);
        self
    }

    pub fn with_match(self, pattern: &str) -> Self {
        self.with_outcome(pattern, ScanOutcome::Matched(1))
    }

    /// Patterns scanned so far, in call order
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

impl ContentScanner for StaticScanner {
    fn name(&self) -> &'static str {
        "static"
    }

    fn scan(&self, _repo_root: &Path, pattern: &str) -> ScanOutcome {
        self.queries.lock().unwrap().push(pattern.to_string());
        self.outcomes
            .get(pattern)
            .cloned()
            .unwrap_or(ScanOutcome::NoMatch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canned_outcomes_and_queries() {
        let scanner = StaticScanner::new()
            .with_match("postgres")
            .with_outcome("mongo", ScanOutcome::Failed("boom".into()));

        assert!(scanner.scan(Path::new("/repo"), "postgres").is_match());
        assert!(!scanner.scan(Path::new("/repo"), "mongo").is_match());
        assert_eq!(
            scanner.scan(Path::new("/repo"), "redis"),
            ScanOutcome::NoMatch
        );
        assert_eq!(scanner.queries(), vec!["postgres", "mongo", "redis"]);
    }
}
