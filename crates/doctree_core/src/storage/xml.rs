//! XML storage backend (`.ihp` index + per-document `.tree` files).
//!
//! Two-level persistence: the small shared index lists the content
//! directories and one `<instance src="X.tree"/>` entry per document; each
//! document's TOC lives in its own `.tree` file. TOC-only changes rewrite
//! just the affected `.tree` file, the index is rewritten only when the
//! document list itself changes.
//!
//! The serialized bytes are a compatibility contract with the consuming
//! toolchain: `.tree` files carry a fixed XML declaration and DOCTYPE ahead
//! of the serializer output, and attribute names follow the external DTD.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DoctreeError, Result};
use crate::fs::FileSystem;
use crate::model::{Document, ProjectConfig, DEFAULT_IMAGES_DIR, DEFAULT_TOPICS_DIR};
use crate::storage::{IndentStyle, StorageAdapter};
use crate::toc::TopicNode;

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;
const TREE_DOCTYPE: &str = r#"<!DOCTYPE instance-profile SYSTEM "https://resources.jetbrains.com/writerside/1.0/product-profile.dtd">"#;

/// Adapter persisting the project as an index file plus `.tree` files
#[derive(Debug)]
pub struct XmlStorage<FS: FileSystem> {
    fs: FS,
    index_path: PathBuf,
    base_dir: PathBuf,
    indent: IndentStyle,
}

impl<FS: FileSystem> XmlStorage<FS> {
    /// Create an adapter for the given `.ihp` index file path
    pub fn new(fs: FS, index_path: PathBuf, indent: IndentStyle) -> Self {
        let base_dir = index_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Self {
            fs,
            index_path,
            base_dir,
            indent,
        }
    }

    /// Path of the `.ihp` index file
    pub fn index_path(&self) -> &Path {
        &self.index_path
    }

    /// Resolve which `.tree` file holds the document with the given id.
    ///
    /// The index only records file paths, not ids, so every referenced
    /// `.tree` file is opened and parsed until one's embedded id matches.
    /// O(documents) per lookup, fine at the document counts this format
    /// targets.
    pub fn resolve_tree_file(&self, id: &str) -> Result<Option<PathBuf>> {
        let index = self.read_index()?;
        for instance in &index.instances {
            let tree_path = self.base_dir.join(&instance.src);
            if !self.fs.exists(&tree_path) {
                continue;
            }
            let profile = self.read_tree(&tree_path)?;
            if profile.id == id {
                return Ok(Some(tree_path));
            }
        }
        Ok(None)
    }

    fn tree_path_for(&self, doc: &Document) -> PathBuf {
        doc.tree_file
            .clone()
            .unwrap_or_else(|| self.base_dir.join(format!("{}.tree", doc.id)))
    }

    fn read_index(&self) -> Result<IhpFile> {
        let content =
            self.fs
                .read_to_string(&self.index_path)
                .map_err(|e| DoctreeError::FileRead {
                    path: self.index_path.clone(),
                    source: e,
                })?;
        quick_xml::de::from_str(&content).map_err(|e| DoctreeError::SchemaInvalid {
            path: self.index_path.clone(),
            reason: e.to_string(),
        })
    }

    fn read_tree(&self, path: &Path) -> Result<InstanceProfile> {
        let content = self
            .fs
            .read_to_string(path)
            .map_err(|e| DoctreeError::FileRead {
                path: path.to_path_buf(),
                source: e,
            })?;
        quick_xml::de::from_str(&content).map_err(|e| DoctreeError::SchemaInvalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    fn to_xml<T: Serialize>(&self, value: &T) -> Result<String> {
        let mut body = String::new();
        let mut ser = quick_xml::se::Serializer::new(&mut body);
        let (ch, count) = self.indent.char_count();
        ser.indent(ch, count);
        value.serialize(ser)?;
        Ok(body)
    }

    fn write_index(&self, config: &ProjectConfig) -> Result<()> {
        let index = IhpFile {
            version: "2.0".to_string(),
            topics: Some(DirElement {
                dir: config.topics_dir.clone(),
            }),
            images: Some(DirElement {
                dir: config.images_dir.clone(),
            }),
            instances: config
                .documents
                .iter()
                .map(|doc| {
                    let tree_path = self.tree_path_for(doc);
                    let src = tree_path
                        .strip_prefix(&self.base_dir)
                        .unwrap_or(&tree_path)
                        .to_string_lossy()
                        .into_owned();
                    InstanceElement { src }
                })
                .collect(),
        };

        let text = format!("{}\n", self.to_xml(&index)?);
        self.fs
            .write_file(&self.index_path, &text)
            .map_err(|e| DoctreeError::FileWrite {
                path: self.index_path.clone(),
                source: e,
            })
    }

    fn write_tree(&self, doc: &Document) -> Result<()> {
        let profile = InstanceProfile::from_document(doc);
        let body = self.to_xml(&profile)?;
        // The declaration and DOCTYPE are injected ahead of the serializer
        // output; the consuming toolchain requires both
        let text = format!("{}\n{}\n{}\n", XML_DECLARATION, TREE_DOCTYPE, body);

        let path = self.tree_path_for(doc);
        self.fs
            .write_file(&path, &text)
            .map_err(|e| DoctreeError::FileWrite {
                path: path.clone(),
                source: e,
            })
    }
}

impl<FS: FileSystem> StorageAdapter for XmlStorage<FS> {
    fn load(&self) -> Result<ProjectConfig> {
        if !self.fs.exists(&self.index_path) {
            // Load-or-initialize, as for the JSON backend
            let config = ProjectConfig::default();
            self.write_index(&config)?;
            return Ok(config);
        }

        let index = self.read_index()?;
        let mut config = ProjectConfig {
            topics_dir: index
                .topics
                .map(|t| t.dir)
                .unwrap_or_else(|| DEFAULT_TOPICS_DIR.to_string()),
            images_dir: index
                .images
                .map(|i| i.dir)
                .unwrap_or_else(|| DEFAULT_IMAGES_DIR.to_string()),
            image_version: None,
            web_path: None,
            documents: Vec::new(),
        };

        for instance in index.instances {
            let tree_path = self.base_dir.join(&instance.src);
            if !self.fs.exists(&tree_path) {
                // Dangling reference; recovered locally
                log::warn!("Referenced tree file does not exist: {:?}", tree_path);
                continue;
            }
            let profile = self.read_tree(&tree_path)?;
            config.documents.push(profile.into_document(tree_path));
        }

        Ok(config)
    }

    fn save(&self, config: &ProjectConfig) -> Result<()> {
        self.write_index(config)?;
        for doc in &config.documents {
            self.write_tree(doc)?;
        }
        Ok(())
    }

    fn save_document(&self, config: &ProjectConfig, id: &str) -> Result<()> {
        let doc = config
            .document(id)
            .ok_or_else(|| DoctreeError::TreeFileNotFound(id.to_string()))?;
        self.write_tree(doc)
    }

    fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

// ============================================================================
// On-disk schema
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename = "ihp")]
struct IhpFile {
    #[serde(rename = "@version")]
    version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    topics: Option<DirElement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    images: Option<DirElement>,
    #[serde(rename = "instance", default, skip_serializing_if = "Vec::is_empty")]
    instances: Vec<InstanceElement>,
}

#[derive(Debug, Serialize, Deserialize)]
struct DirElement {
    #[serde(rename = "@dir")]
    dir: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct InstanceElement {
    #[serde(rename = "@src")]
    src: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename = "instance-profile")]
struct InstanceProfile {
    #[serde(rename = "@id")]
    id: String,
    #[serde(rename = "@name")]
    name: String,
    #[serde(rename = "@start-page", default, skip_serializing_if = "Option::is_none")]
    start_page: Option<String>,
    #[serde(rename = "toc-element", default, skip_serializing_if = "Vec::is_empty")]
    toc_elements: Vec<TocElement>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TocElement {
    #[serde(rename = "@topic")]
    topic: String,
    #[serde(rename = "toc-element", default, skip_serializing_if = "Vec::is_empty")]
    children: Vec<TocElement>,
}

impl InstanceProfile {
    fn from_document(doc: &Document) -> Self {
        Self {
            id: doc.id.clone(),
            name: doc.name.clone(),
            start_page: doc.start_page.clone(),
            toc_elements: doc.topics.iter().map(TocElement::from_node).collect(),
        }
    }

    fn into_document(self, tree_path: PathBuf) -> Document {
        Document {
            id: self.id,
            name: self.name,
            start_page: self.start_page,
            topics: self
                .toc_elements
                .into_iter()
                .map(TocElement::into_node)
                .collect(),
            tree_file: Some(tree_path),
        }
    }
}

impl TocElement {
    fn from_node(node: &TopicNode) -> Self {
        Self {
            topic: node.file_name.clone(),
            children: node.children.iter().map(TocElement::from_node).collect(),
        }
    }

    fn into_node(self) -> TopicNode {
        TopicNode {
            file_name: self.topic,
            // The tree format carries no titles; they are re-derived from
            // the Markdown files on reload
            title: String::new(),
            children: self
                .children
                .into_iter()
                .map(TocElement::into_node)
                .collect(),
        }
    }
}
