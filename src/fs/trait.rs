//! FileSystem trait definition

use anyhow::Result;
use std::path::Path;

/// Type of file system entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    File,
    Directory,
}

/// Abstraction over the file operations the migration needs
///
/// Detection only ever reads; the write side is used once, by the migration
/// pipeline, after translation has fully succeeded.
pub trait FileSystem: Send + Sync {
    /// Check if a path exists
    fn exists(&self, path: &Path) -> bool;

    /// Check if path is a directory
    fn is_dir(&self, path: &Path) -> bool;

    /// Check if path is a file
    fn is_file(&self, path: &Path) -> bool;

    /// Read file contents as string
    fn read_to_string(&self, path: &Path) -> Result<String>;

    /// Read raw file contents
    fn read_bytes(&self, path: &Path) -> Result<Vec<u8>>;

    /// Write a file, replacing any existing contents
    fn write(&self, path: &Path, contents: &str) -> Result<()>;

    /// Create a directory and all of its missing parents
    fn create_dir_all(&self, path: &Path) -> Result<()>;

    /// Rename a file, replacing the destination if it exists
    fn rename(&self, from: &Path, to: &Path) -> Result<()>;

    /// Read a file if it exists, treating any failure as absence
    fn read_optional(&self, path: &Path) -> Option<String> {
        if !self.is_file(path) {
            return None;
        }
        self.read_to_string(path).ok()
    }

    /// Like [`FileSystem::read_optional`], but invalid UTF-8 becomes U+FFFD
    /// instead of hiding the whole file from ASCII heuristics
    fn read_optional_lossy(&self, path: &Path) -> Option<String> {
        if !self.is_file(path) {
            return None;
        }
        self.read_bytes(path)
            .ok()
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
    }
}
