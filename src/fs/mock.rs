use super::{FileSystem, FileType};
use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

#[derive(Debug, Clone)]
struct MockEntry {
    content: Option<Vec<u8>>,
    file_type: FileType,
}

/// In-memory file system rooted at a fake repository path
pub struct MockFileSystem {
    files: RwLock<HashMap<PathBuf, MockEntry>>,
    root: PathBuf,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::with_root(PathBuf::from("/mock"))
    }

    pub fn with_root(root: PathBuf) -> Self {
        let fs = Self {
            files: RwLock::new(HashMap::new()),
            root: root.clone(),
        };
        fs.add_dir(&root);
        fs
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn add_file(&self, path: impl AsRef<Path>, content: &str) {
        self.add_file_bytes(path, content.as_bytes());
    }

    pub fn add_file_bytes(&self, path: impl AsRef<Path>, content: &[u8]) {
        let path = self.normalize_path(path.as_ref());
        let mut files = self.files.write().unwrap();

        if let Some(parent) = path.parent() {
            Self::ensure_parents(&mut files, parent);
        }

        files.insert(
            path,
            MockEntry {
                content: Some(content.to_vec()),
                file_type: FileType::File,
            },
        );
    }

    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let path = self.normalize_path(path.as_ref());
        let mut files = self.files.write().unwrap();
        Self::ensure_parents(&mut files, &path);
    }

    fn normalize_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    fn ensure_parents(files: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            files.entry(current.clone()).or_insert(MockEntry {
                content: None,
                file_type: FileType::Directory,
            });
        }
    }

    fn entry_type(&self, path: &Path) -> Option<FileType> {
        let path = self.normalize_path(path);
        self.files.read().unwrap().get(&path).map(|e| e.file_type)
    }
}

impl Default for MockFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystem for MockFileSystem {
    fn exists(&self, path: &Path) -> bool {
        self.entry_type(path).is_some()
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.entry_type(path) == Some(FileType::Directory)
    }

    fn is_file(&self, path: &Path) -> bool {
        self.entry_type(path) == Some(FileType::File)
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        let bytes = self.read_bytes(path)?;
        String::from_utf8(bytes).map_err(|_| anyhow!("File is not valid UTF-8: {:?}", path))
    }

    fn read_bytes(&self, path: &Path) -> Result<Vec<u8>> {
        let path = self.normalize_path(path);
        let files = self.files.read().unwrap();
        let entry = files
            .get(&path)
            .ok_or_else(|| anyhow!("File not found: {:?}", path))?;

        entry
            .content
            .clone()
            .ok_or_else(|| anyhow!("Not a file: {:?}", path))
    }

    fn write(&self, path: &Path, contents: &str) -> Result<()> {
        let normalized = self.normalize_path(path);
        let parent_exists = normalized
            .parent()
            .map(|p| self.is_dir(p))
            .unwrap_or(false);
        if !parent_exists {
            return Err(anyhow!("Parent directory missing for {:?}", normalized));
        }
        if self.is_dir(&normalized) {
            return Err(anyhow!("Is a directory: {:?}", normalized));
        }
        self.add_file(normalized, contents);
        Ok(())
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        if self.is_file(path) {
            return Err(anyhow!("Not a directory: {:?}", path));
        }
        self.add_dir(path);
        Ok(())
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        let from = self.normalize_path(from);
        let to = self.normalize_path(to);
        let mut files = self.files.write().unwrap();
        let entry = files
            .remove(&from)
            .ok_or_else(|| anyhow!("File not found: {:?}", from))?;
        files.insert(to, entry);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_file() {
        let fs = MockFileSystem::new();
        fs.add_file("package.json", "{}");

        assert!(fs.exists(Path::new("/mock/package.json")));
        assert!(fs.is_file(Path::new("package.json")));
        assert!(fs.is_dir(Path::new("/mock")));
    }

    #[test]
    fn test_parent_directories_created() {
        let fs = MockFileSystem::with_root(PathBuf::from("/repo"));
        fs.add_file("a/b/c_test.go", "package c");

        assert!(fs.is_dir(Path::new("/repo/a")));
        assert!(fs.is_dir(Path::new("/repo/a/b")));
        assert_eq!(
            fs.read_to_string(Path::new("/repo/a/b/c_test.go")).unwrap(),
            "package c"
        );
    }

    #[test]
    fn test_write_requires_parent() {
        let fs = MockFileSystem::new();

        assert!(fs.write(Path::new(".circleci/config.yml"), "x").is_err());
        fs.create_dir_all(Path::new(".circleci")).unwrap();
        fs.write(Path::new(".circleci/config.yml"), "version: 2")
            .unwrap();
        assert_eq!(
            fs.read_optional(Path::new(".circleci/config.yml")).as_deref(),
            Some("version: 2")
        );
    }

    #[test]
    fn test_rename() {
        let fs = MockFileSystem::new();
        fs.add_file("circle.yml", "test: {}");

        fs.rename(Path::new("circle.yml"), Path::new("circle.yml.bak"))
            .unwrap();
        assert!(!fs.exists(Path::new("circle.yml")));
        assert!(fs.is_file(Path::new("circle.yml.bak")));
        assert!(fs
            .rename(Path::new("circle.yml"), Path::new("other"))
            .is_err());
    }

    #[test]
    fn test_invalid_utf8_file() {
        let fs = MockFileSystem::new();
        fs.add_file_bytes("Makefile", b"MONGO_TEST_DB=x \xff\n");

        assert!(fs.read_to_string(Path::new("Makefile")).is_err());
        assert!(fs.read_optional(Path::new("Makefile")).is_none());
        assert_eq!(
            fs.read_optional_lossy(Path::new("Makefile")).as_deref(),
            Some("MONGO_TEST_DB=x \u{fffd}\n")
        );
    }

    #[test]
    fn test_read_directory_fails() {
        let fs = MockFileSystem::new();
        fs.add_dir("vendor");

        assert!(fs.read_to_string(Path::new("vendor")).is_err());
        assert!(fs.read_optional(Path::new("vendor")).is_none());
        assert!(fs.read_optional_lossy(Path::new("vendor")).is_none());
    }
}
