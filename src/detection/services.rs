//! Auxiliary data store detection
//!
//! Each store has a Makefile signal, optionally a circle.yml signal, and a
//! content scan over test files. Any positive signal is enough; every failure
//! degrades to "not needed".

use super::{DatabaseType, DetectionInputs};
use crate::scan::{ContentScanner, ScanOutcome};
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;
use tracing::{debug, warn};

/// Test-file pattern for postgres
pub const POSTGRES_SCAN_PATTERN: &str = "postgres";

/// Test-file pattern for mongo (`mongo`, `Mongo`, `mgo`, ...)
pub const MONGO_SCAN_PATTERN: &str = "[a-z]*[mM]o*n*go";

fn postgres_makefile_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"psql").expect("valid regex"))
}

fn postgres_legacy_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"postgres").expect("valid regex"))
}

fn mongo_makefile_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"MONGO_TEST_DB|mongodb://localhost|mongodb://127.0.0.1").expect("valid regex")
    })
}

fn scan_matches(
    scanner: &dyn ContentScanner,
    inputs: &DetectionInputs<'_>,
    database: DatabaseType,
    pattern: &str,
) -> bool {
    match scanner.scan(inputs.repo_root, pattern) {
        ScanOutcome::Matched(lines) => {
            debug!(database = %database, lines, scanner = scanner.name(), "Test files mention database");
            lines > 0
        }
        ScanOutcome::NoMatch => false,
        ScanOutcome::Failed(reason) => {
            warn!(
                database = %database,
                scanner = scanner.name(),
                "Failed to check test files: {}",
                reason
            );
            false
        }
    }
}

/// PostgreSQL is needed when the Makefile calls `psql`, circle.yml mentions
/// postgres, or a test file does
pub fn needs_postgresql(inputs: &DetectionInputs<'_>, scanner: &dyn ContentScanner) -> bool {
    if postgres_makefile_regex().is_match(inputs.makefile()) {
        debug!("Makefile uses psql");
        return true;
    }
    if postgres_legacy_regex().is_match(inputs.legacy_raw) {
        debug!("circle.yml mentions postgres");
        return true;
    }
    scan_matches(scanner, inputs, DatabaseType::Postgresql, POSTGRES_SCAN_PATTERN)
}

/// MongoDB is needed when the Makefile configures a test database or a test
/// file mentions mongo
pub fn needs_mongodb(inputs: &DetectionInputs<'_>, scanner: &dyn ContentScanner) -> bool {
    if mongo_makefile_regex().is_match(inputs.makefile()) {
        debug!("Makefile configures a mongo test database");
        return true;
    }
    scan_matches(scanner, inputs, DatabaseType::Mongo, MONGO_SCAN_PATTERN)
}

/// Databases the test suite depends on
///
/// Redis is never inferred here; repositories that need it list it under
/// `machine.services`.
pub fn detect_database_types(
    inputs: &DetectionInputs<'_>,
    scanner: &dyn ContentScanner,
) -> BTreeSet<DatabaseType> {
    let mut databases = BTreeSet::new();
    if needs_postgresql(inputs, scanner) {
        databases.insert(DatabaseType::Postgresql);
    }
    if needs_mongodb(inputs, scanner) {
        databases.insert(DatabaseType::Mongo);
    }
    databases
}
