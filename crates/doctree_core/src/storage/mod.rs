//! Storage adapters.
//!
//! A [`StorageAdapter`] translates between the in-memory [`ProjectConfig`]
//! and one on-disk representation. Two backends exist: a flat JSON file
//! ([`JsonStorage`]) and an XML index plus per-document `.tree` files
//! ([`XmlStorage`]). The manager is written against the trait and the
//! backend is selected once at startup, never through inheritance.

mod json;
mod xml;

pub use json::JsonStorage;
pub use xml::XmlStorage;

use std::path::{Path, PathBuf};

use crate::error::{DoctreeError, Result};
use crate::fs::FileSystem;
use crate::model::ProjectConfig;

/// File name of the JSON project configuration
pub const JSON_CONFIG_FILE: &str = "doctree.json";
/// Default file name of the XML project index
pub const XML_INDEX_FILE: &str = "doctree.ihp";

/// Caller's indentation preference, applied when serializing configuration
/// files (mirrors the host editor's tab settings at save time).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndentStyle {
    /// Indent with the given number of spaces per level
    Spaces(usize),
    /// Indent with one tab per level
    Tabs,
}

impl Default for IndentStyle {
    fn default() -> Self {
        IndentStyle::Spaces(4)
    }
}

impl IndentStyle {
    /// One level of indentation as a string
    pub fn unit(&self) -> String {
        match self {
            IndentStyle::Spaces(n) => " ".repeat(*n),
            IndentStyle::Tabs => "\t".to_string(),
        }
    }

    /// Indent character and count, for writers that take them separately
    pub fn char_count(&self) -> (char, usize) {
        match self {
            IndentStyle::Spaces(n) => (' ', *n),
            IndentStyle::Tabs => ('\t', 1),
        }
    }
}

/// Contract shared by both storage backends
pub trait StorageAdapter {
    /// Load the configuration, or write and return the default empty one
    /// when no configuration file exists yet (load-or-initialize).
    ///
    /// A file that exists but does not parse into the expected shape is a
    /// [`DoctreeError::SchemaInvalid`].
    fn load(&self) -> Result<ProjectConfig>;

    /// Persist the full configuration, document list included
    fn save(&self, config: &ProjectConfig) -> Result<()>;

    /// Persist a single document's TOC.
    ///
    /// The JSON backend has one file, so this is equivalent to [`save`];
    /// the XML backend writes only that document's `.tree` file and leaves
    /// the shared index untouched.
    ///
    /// [`save`]: StorageAdapter::save
    fn save_document(&self, config: &ProjectConfig, id: &str) -> Result<()>;

    /// Directory the configuration file lives in; relative content
    /// directories are resolved against it
    fn base_dir(&self) -> &Path;

    /// Absolute path of the topics directory
    fn topics_dir(&self, config: &ProjectConfig) -> PathBuf {
        self.base_dir().join(&config.topics_dir)
    }

    /// Absolute path of the images directory
    fn images_dir(&self, config: &ProjectConfig) -> PathBuf {
        self.base_dir().join(&config.images_dir)
    }
}

/// Storage backend chosen for a project directory.
///
/// Wraps the two adapter types so callers that pick a backend at runtime
/// (the CLI, editor hosts) can hold a single manager type.
#[derive(Debug)]
pub enum ProjectStorage<FS: FileSystem> {
    /// Flat JSON configuration file
    Json(JsonStorage<FS>),
    /// XML index plus per-document `.tree` files
    Xml(XmlStorage<FS>),
}

impl<FS: FileSystem> StorageAdapter for ProjectStorage<FS> {
    fn load(&self) -> Result<ProjectConfig> {
        match self {
            ProjectStorage::Json(s) => s.load(),
            ProjectStorage::Xml(s) => s.load(),
        }
    }

    fn save(&self, config: &ProjectConfig) -> Result<()> {
        match self {
            ProjectStorage::Json(s) => s.save(config),
            ProjectStorage::Xml(s) => s.save(config),
        }
    }

    fn save_document(&self, config: &ProjectConfig, id: &str) -> Result<()> {
        match self {
            ProjectStorage::Json(s) => s.save_document(config, id),
            ProjectStorage::Xml(s) => s.save_document(config, id),
        }
    }

    fn base_dir(&self) -> &Path {
        match self {
            ProjectStorage::Json(s) => s.base_dir(),
            ProjectStorage::Xml(s) => s.base_dir(),
        }
    }
}

/// Detect which backend a project directory uses.
///
/// A `doctree.json` wins over an `.ihp` index. Errors with
/// [`DoctreeError::ProjectNotFound`] when neither is present.
pub fn detect_project<FS: FileSystem>(
    fs: FS,
    dir: &Path,
    indent: IndentStyle,
) -> Result<ProjectStorage<FS>> {
    let json_path = dir.join(JSON_CONFIG_FILE);
    if fs.exists(&json_path) {
        return Ok(ProjectStorage::Json(JsonStorage::new(
            fs, json_path, indent,
        )));
    }

    let ihp_path = dir.join(XML_INDEX_FILE);
    if fs.exists(&ihp_path) {
        return Ok(ProjectStorage::Xml(XmlStorage::new(fs, ihp_path, indent)));
    }

    Err(DoctreeError::ProjectNotFound(dir.to_path_buf()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::InMemoryFileSystem;

    #[test]
    fn test_indent_unit() {
        assert_eq!(IndentStyle::Spaces(2).unit(), "  ");
        assert_eq!(IndentStyle::Tabs.unit(), "\t");
        assert_eq!(IndentStyle::default().unit(), "    ");
    }

    #[test]
    fn test_detect_project_prefers_json() {
        let fs = InMemoryFileSystem::with_files(vec![
            ("proj/doctree.json".into(), "{}".to_string()),
            ("proj/doctree.ihp".into(), "<ihp version=\"2.0\"/>".to_string()),
        ]);

        let storage = detect_project(fs, Path::new("proj"), IndentStyle::default()).unwrap();
        assert!(matches!(storage, ProjectStorage::Json(_)));
    }

    #[test]
    fn test_detect_project_missing() {
        let fs = InMemoryFileSystem::new();
        let err = detect_project(fs, Path::new("proj"), IndentStyle::default()).unwrap_err();
        assert!(matches!(err, DoctreeError::ProjectNotFound(_)));
    }
}
