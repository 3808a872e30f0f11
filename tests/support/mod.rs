use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("migrate")
}

fn copy_tree(from: &Path, to: &Path) {
    fs::create_dir_all(to).expect("Failed to create fixture directory");
    for entry in fs::read_dir(from).expect("Failed to read fixture directory") {
        let entry = entry.expect("Failed to read fixture entry");
        let target = to.join(entry.file_name());
        if entry.file_type().expect("Failed to stat fixture entry").is_dir() {
            copy_tree(&entry.path(), &target);
        } else {
            fs::copy(entry.path(), &target).expect("Failed to copy fixture file");
        }
    }
}

/// Copies a fixture into a fresh temp directory, keeping the fixture name as
/// the repository directory name
#[allow(dead_code)]
pub fn checkout_fixture(name: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let repo = dir.path().join(name);
    copy_tree(&fixtures_dir().join(name), &repo);
    let repo = repo.canonicalize().expect("Failed to canonicalize repo path");
    (dir, repo)
}

#[allow(dead_code)]
pub fn circle_migrate_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_circle-migrate"))
}
