use crate::fs::FileSystem;
use anyhow::Result;
use std::path::Path;

/// Repository state every detection rule reads from
///
/// The Makefile and legacy document are read once by the caller and passed
/// down, so no rule touches the same file twice.
#[derive(Clone, Copy)]
pub struct DetectionInputs<'a> {
    pub fs: &'a dyn FileSystem,
    pub repo_root: &'a Path,
    pub makefile: Option<&'a str>,
    pub legacy_raw: &'a str,
}

impl<'a> DetectionInputs<'a> {
    pub fn new(
        fs: &'a dyn FileSystem,
        repo_root: &'a Path,
        makefile: Option<&'a str>,
        legacy_raw: &'a str,
    ) -> Self {
        Self {
            fs,
            repo_root,
            makefile,
            legacy_raw,
        }
    }

    /// Makefile contents, empty when the repository has none
    pub fn makefile(&self) -> &'a str {
        self.makefile.unwrap_or("")
    }

    pub fn has_file(&self, name: &str) -> bool {
        self.fs.is_file(&self.repo_root.join(name))
    }

    /// Reads a repository file; invalid UTF-8 is replaced, not rejected
    pub fn read(&self, name: &str) -> Result<String> {
        let bytes = self.fs.read_bytes(&self.repo_root.join(name))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}
