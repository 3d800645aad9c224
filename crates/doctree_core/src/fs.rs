use std::io::{Error, ErrorKind, Result};
use std::path::{Path, PathBuf};

/// Abstraction over filesystem operations.
///
/// The manager and storage adapters are generic over this trait so that tests
/// can run against an in-memory store while hosts use the real filesystem.
/// Send + Sync required for multi-threaded host environments.
pub trait FileSystem: Send + Sync {
    /// Reads the full file content as UTF-8 text
    fn read_to_string(&self, path: &Path) -> Result<String>;

    /// Overwrites a file, creating it if absent
    fn write_file(&self, path: &Path, content: &str) -> Result<()>;

    /// Creates a file ONLY if it doesn't exist (for new topics).
    /// Returns an error if the file exists.
    fn create_new(&self, path: &Path, content: &str) -> Result<()>;

    /// Deletes a file
    fn delete_file(&self, path: &Path) -> Result<()>;

    /// Move/rename a file from `from` to `to`.
    ///
    /// Errors if the source does not exist or the destination already exists.
    fn move_file(&self, from: &Path, to: &Path) -> Result<()>;

    /// Lists markdown files directly inside a folder (not recursive)
    fn list_md_files(&self, dir: &Path) -> Result<Vec<PathBuf>>;

    /// Checks if a file or directory exists
    fn exists(&self, path: &Path) -> bool;

    /// Checks if a path is a directory
    fn is_dir(&self, path: &Path) -> bool;

    /// Creates a directory and all parent directories
    fn create_dir_all(&self, path: &Path) -> Result<()>;
}

// Blanket implementation for references to FileSystem
impl<T: FileSystem> FileSystem for &T {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        (*self).read_to_string(path)
    }

    fn write_file(&self, path: &Path, content: &str) -> Result<()> {
        (*self).write_file(path, content)
    }

    fn create_new(&self, path: &Path, content: &str) -> Result<()> {
        (*self).create_new(path, content)
    }

    fn delete_file(&self, path: &Path) -> Result<()> {
        (*self).delete_file(path)
    }

    fn move_file(&self, from: &Path, to: &Path) -> Result<()> {
        (*self).move_file(from, to)
    }

    fn list_md_files(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        (*self).list_md_files(dir)
    }

    fn exists(&self, path: &Path) -> bool {
        (*self).exists(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        (*self).is_dir(path)
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        (*self).create_dir_all(path)
    }
}

// ============================================================================
// RealFileSystem - maps straight to std::fs
// ============================================================================

use std::fs::{self, OpenOptions};
use std::io::Write;

/// Filesystem implementation that delegates to `std::fs`
#[derive(Clone, Copy, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path)
    }

    fn write_file(&self, path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, content)
    }

    fn create_new(&self, path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        // create_new is an atomic existence check + create
        let mut file = OpenOptions::new().write(true).create_new(true).open(path)?;
        file.write_all(content.as_bytes())
    }

    fn delete_file(&self, path: &Path) -> Result<()> {
        fs::remove_file(path)
    }

    fn move_file(&self, from: &Path, to: &Path) -> Result<()> {
        if !from.exists() {
            return Err(Error::new(
                ErrorKind::NotFound,
                format!("Source file not found: {:?}", from),
            ));
        }
        if to.exists() {
            return Err(Error::new(
                ErrorKind::AlreadyExists,
                format!("Destination already exists: {:?}", to),
            ));
        }

        if let Some(parent) = to.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::rename(from, to)
    }

    fn list_md_files(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        if dir.is_dir() {
            for entry in fs::read_dir(dir)? {
                let entry = entry?;
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "md") {
                    files.push(path);
                }
            }
        }
        files.sort();
        Ok(files)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path)
    }
}

// ============================================================================
// InMemoryFileSystem - hermetic store for tests and embedded hosts
// ============================================================================

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

/// An in-memory filesystem implementation.
///
/// Cloning is cheap and clones share the same underlying store, so a clone
/// can be handed to an adapter while the test keeps its own handle.
#[derive(Clone, Debug, Default)]
pub struct InMemoryFileSystem {
    /// Files stored as path -> content
    files: Arc<RwLock<HashMap<PathBuf, String>>>,
    /// Directories that exist (implicitly created when files are added)
    directories: Arc<RwLock<HashSet<PathBuf>>>,
}

impl InMemoryFileSystem {
    /// Create a new empty in-memory filesystem
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a filesystem pre-populated with files
    pub fn with_files(entries: Vec<(PathBuf, String)>) -> Self {
        let fs = Self::new();
        for (path, content) in entries {
            // write_file records parent directories as it goes
            let _ = fs.write_file(&path, &content);
        }
        fs
    }

    /// Get a sorted list of all file paths in the filesystem
    pub fn all_paths(&self) -> Vec<PathBuf> {
        let files = self.files.read().unwrap();
        let mut paths: Vec<PathBuf> = files.keys().cloned().collect();
        paths.sort();
        paths
    }

    /// Normalize paths (drop `.` components, resolve `..` where possible)
    fn normalize(path: &Path) -> PathBuf {
        use std::path::Component;
        let mut components = Vec::new();
        for component in path.components() {
            match component {
                Component::CurDir => {}
                Component::ParentDir => {
                    if !components.is_empty() {
                        components.pop();
                    }
                }
                c => components.push(c),
            }
        }
        components.iter().collect()
    }

    fn record_parents(&self, path: &Path) {
        let mut dirs = self.directories.write().unwrap();
        let mut current = path;
        while let Some(parent) = current.parent() {
            if parent.as_os_str().is_empty() {
                break;
            }
            dirs.insert(parent.to_path_buf());
            current = parent;
        }
    }
}

impl FileSystem for InMemoryFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        let normalized = Self::normalize(path);
        let files = self.files.read().unwrap();
        files
            .get(&normalized)
            .cloned()
            .ok_or_else(|| Error::new(ErrorKind::NotFound, format!("File not found: {:?}", path)))
    }

    fn write_file(&self, path: &Path, content: &str) -> Result<()> {
        let normalized = Self::normalize(path);
        self.record_parents(&normalized);
        let mut files = self.files.write().unwrap();
        files.insert(normalized, content.to_string());
        Ok(())
    }

    fn create_new(&self, path: &Path, content: &str) -> Result<()> {
        let normalized = Self::normalize(path);
        {
            let files = self.files.read().unwrap();
            if files.contains_key(&normalized) {
                return Err(Error::new(
                    ErrorKind::AlreadyExists,
                    format!("File already exists: {:?}", path),
                ));
            }
        }
        self.record_parents(&normalized);
        let mut files = self.files.write().unwrap();
        files.insert(normalized, content.to_string());
        Ok(())
    }

    fn delete_file(&self, path: &Path) -> Result<()> {
        let normalized = Self::normalize(path);
        let mut files = self.files.write().unwrap();
        if files.remove(&normalized).is_some() {
            Ok(())
        } else {
            Err(Error::new(
                ErrorKind::NotFound,
                format!("File not found: {:?}", path),
            ))
        }
    }

    fn move_file(&self, from: &Path, to: &Path) -> Result<()> {
        let from_norm = Self::normalize(from);
        let to_norm = Self::normalize(to);

        if from_norm == to_norm {
            return Ok(());
        }

        self.record_parents(&to_norm);
        let mut files = self.files.write().unwrap();
        if files.contains_key(&to_norm) {
            return Err(Error::new(
                ErrorKind::AlreadyExists,
                format!("Destination already exists: {:?}", to),
            ));
        }
        match files.remove(&from_norm) {
            Some(content) => {
                files.insert(to_norm, content);
                Ok(())
            }
            None => Err(Error::new(
                ErrorKind::NotFound,
                format!("Source file not found: {:?}", from),
            )),
        }
    }

    fn list_md_files(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let normalized = Self::normalize(dir);
        let files = self.files.read().unwrap();

        let mut result: Vec<PathBuf> = files
            .keys()
            .filter(|path| {
                path.parent() == Some(normalized.as_path())
                    && path.extension().is_some_and(|ext| ext == "md")
            })
            .cloned()
            .collect();
        result.sort();
        Ok(result)
    }

    fn exists(&self, path: &Path) -> bool {
        let normalized = Self::normalize(path);
        let files = self.files.read().unwrap();
        let dirs = self.directories.read().unwrap();
        files.contains_key(&normalized) || dirs.contains(&normalized)
    }

    fn is_dir(&self, path: &Path) -> bool {
        let normalized = Self::normalize(path);
        let dirs = self.directories.read().unwrap();
        dirs.contains(&normalized)
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        let normalized = Self::normalize(path);
        let mut dirs = self.directories.write().unwrap();
        let mut current = normalized.as_path();
        loop {
            if !current.as_os_str().is_empty() {
                dirs.insert(current.to_path_buf());
            }
            match current.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => current = parent,
                _ => break,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_fs_read_write() {
        let fs = InMemoryFileSystem::new();
        let path = Path::new("topics/intro.md");

        fs.write_file(path, "# Intro\n").unwrap();
        assert_eq!(fs.read_to_string(path).unwrap(), "# Intro\n");
        assert!(fs.exists(path));
        assert!(fs.is_dir(Path::new("topics")));
    }

    #[test]
    fn test_memory_fs_create_new_rejects_existing() {
        let fs = InMemoryFileSystem::new();
        let path = Path::new("topics/intro.md");

        fs.create_new(path, "first").unwrap();
        let err = fs.create_new(path, "second").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyExists);
        // Original content untouched
        assert_eq!(fs.read_to_string(path).unwrap(), "first");
    }

    #[test]
    fn test_memory_fs_move_file() {
        let fs = InMemoryFileSystem::new();
        fs.write_file(Path::new("topics/a.md"), "a").unwrap();

        fs.move_file(Path::new("topics/a.md"), Path::new("topics/b.md"))
            .unwrap();
        assert!(!fs.exists(Path::new("topics/a.md")));
        assert_eq!(fs.read_to_string(Path::new("topics/b.md")).unwrap(), "a");

        // Source missing
        let err = fs
            .move_file(Path::new("topics/a.md"), Path::new("topics/c.md"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        // Destination taken
        fs.write_file(Path::new("topics/c.md"), "c").unwrap();
        let err = fs
            .move_file(Path::new("topics/b.md"), Path::new("topics/c.md"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyExists);
    }

    #[test]
    fn test_memory_fs_list_md_files_is_direct_children_only() {
        let fs = InMemoryFileSystem::with_files(vec![
            (PathBuf::from("topics/a.md"), String::new()),
            (PathBuf::from("topics/b.md"), String::new()),
            (PathBuf::from("topics/sub/c.md"), String::new()),
            (PathBuf::from("topics/notes.txt"), String::new()),
        ]);

        let files = fs.list_md_files(Path::new("topics")).unwrap();
        assert_eq!(
            files,
            vec![PathBuf::from("topics/a.md"), PathBuf::from("topics/b.md")]
        );
    }

    #[test]
    fn test_memory_fs_normalizes_dot_components() {
        let fs = InMemoryFileSystem::new();
        fs.write_file(Path::new("base/./topics/a.md"), "x").unwrap();
        assert!(fs.exists(Path::new("base/topics/a.md")));
        assert!(fs.exists(Path::new("base/topics/../topics/a.md")));
    }

    #[test]
    fn test_real_fs_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let fs = RealFileSystem;
        let path = dir.path().join("topics").join("intro.md");

        fs.write_file(&path, "# Intro\n").unwrap();
        assert!(fs.exists(&path));
        assert_eq!(fs.read_to_string(&path).unwrap(), "# Intro\n");

        let renamed = dir.path().join("topics").join("renamed.md");
        fs.move_file(&path, &renamed).unwrap();
        assert!(!fs.exists(&path));

        let listed = fs.list_md_files(&dir.path().join("topics")).unwrap();
        assert_eq!(listed, vec![renamed.clone()]);

        fs.delete_file(&renamed).unwrap();
        assert!(!fs.exists(&renamed));
    }
}
