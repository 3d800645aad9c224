//! JSON storage backend.
//!
//! One configuration file per project holds the content directories and
//! every document's TOC. The on-disk schema is fixed by the external
//! toolchain this format is shared with (kebab-case keys, `instances` /
//! `toc-elements` naming) and must not drift.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DoctreeError, Result};
use crate::fs::FileSystem;
use crate::model::{Document, ProjectConfig};
use crate::storage::{IndentStyle, StorageAdapter};
use crate::toc::TopicNode;

/// Adapter persisting the whole project into a single JSON file
#[derive(Debug)]
pub struct JsonStorage<FS: FileSystem> {
    fs: FS,
    config_path: PathBuf,
    base_dir: PathBuf,
    indent: IndentStyle,
}

impl<FS: FileSystem> JsonStorage<FS> {
    /// Create an adapter for the given configuration file path
    pub fn new(fs: FS, config_path: PathBuf, indent: IndentStyle) -> Self {
        let base_dir = config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Self {
            fs,
            config_path,
            base_dir,
            indent,
        }
    }

    /// Path of the configuration file
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    fn serialize(&self, file: &ConfigFile) -> Result<String> {
        let unit = self.indent.unit();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(unit.as_bytes());
        let mut buf = Vec::new();
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        file.serialize(&mut ser)?;
        let mut text = String::from_utf8_lossy(&buf).into_owned();
        text.push('\n');
        Ok(text)
    }

    fn write(&self, config: &ProjectConfig) -> Result<()> {
        let text = self.serialize(&ConfigFile::from_model(config))?;
        self.fs
            .write_file(&self.config_path, &text)
            .map_err(|e| DoctreeError::FileWrite {
                path: self.config_path.clone(),
                source: e,
            })
    }
}

impl<FS: FileSystem> StorageAdapter for JsonStorage<FS> {
    fn load(&self) -> Result<ProjectConfig> {
        if !self.fs.exists(&self.config_path) {
            // Load-or-initialize: a fresh project gets the default empty
            // configuration written before it is returned
            let config = ProjectConfig::default();
            self.write(&config)?;
            return Ok(config);
        }

        let content =
            self.fs
                .read_to_string(&self.config_path)
                .map_err(|e| DoctreeError::FileRead {
                    path: self.config_path.clone(),
                    source: e,
                })?;

        let file: ConfigFile =
            serde_json::from_str(&content).map_err(|e| DoctreeError::SchemaInvalid {
                path: self.config_path.clone(),
                reason: e.to_string(),
            })?;

        Ok(file.into_model())
    }

    fn save(&self, config: &ProjectConfig) -> Result<()> {
        self.write(config)
    }

    fn save_document(&self, config: &ProjectConfig, _id: &str) -> Result<()> {
        // Single file: a per-document save is a full save
        self.write(config)
    }

    fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

// ============================================================================
// On-disk schema
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
struct ConfigFile {
    topics: DirSection,
    images: ImagesSection,
    #[serde(default)]
    instances: Vec<InstanceSection>,
}

#[derive(Debug, Serialize, Deserialize)]
struct DirSection {
    dir: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct ImagesSection {
    dir: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    version: Option<String>,
    #[serde(rename = "web-path", default, skip_serializing_if = "Option::is_none")]
    web_path: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct InstanceSection {
    id: String,
    name: String,
    #[serde(rename = "start-page", default, skip_serializing_if = "Option::is_none")]
    start_page: Option<String>,
    #[serde(rename = "toc-elements", default)]
    toc_elements: Vec<TocElement>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TocElement {
    topic: String,
    #[serde(default)]
    title: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    children: Vec<TocElement>,
}

impl ConfigFile {
    fn from_model(config: &ProjectConfig) -> Self {
        Self {
            topics: DirSection {
                dir: config.topics_dir.clone(),
            },
            images: ImagesSection {
                dir: config.images_dir.clone(),
                version: config.image_version.clone(),
                web_path: config.web_path.clone(),
            },
            instances: config
                .documents
                .iter()
                .map(|doc| InstanceSection {
                    id: doc.id.clone(),
                    name: doc.name.clone(),
                    start_page: doc.start_page.clone(),
                    toc_elements: doc.topics.iter().map(TocElement::from_node).collect(),
                })
                .collect(),
        }
    }

    fn into_model(self) -> ProjectConfig {
        ProjectConfig {
            topics_dir: self.topics.dir,
            images_dir: self.images.dir,
            image_version: self.images.version,
            web_path: self.images.web_path,
            documents: self
                .instances
                .into_iter()
                .map(|instance| Document {
                    id: instance.id,
                    name: instance.name,
                    start_page: instance.start_page,
                    topics: instance
                        .toc_elements
                        .into_iter()
                        .map(TocElement::into_node)
                        .collect(),
                    tree_file: None,
                })
                .collect(),
        }
    }
}

impl TocElement {
    fn from_node(node: &TopicNode) -> Self {
        Self {
            topic: node.file_name.clone(),
            title: node.title.clone(),
            children: node.children.iter().map(TocElement::from_node).collect(),
        }
    }

    fn into_node(self) -> TopicNode {
        TopicNode {
            file_name: self.topic,
            title: self.title,
            children: self
                .children
                .into_iter()
                .map(TocElement::into_node)
                .collect(),
        }
    }
}
