//! In-memory project model.
//!
//! [`ProjectConfig`] is the root of the object graph a storage adapter loads:
//! the two content directories plus the list of [`Document`]s. Both backends
//! (JSON and XML) deserialize into this shared shape, so the manager never
//! sees storage-specific types.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::toc::{self, TopicNode};

/// Default relative name of the topics directory
pub const DEFAULT_TOPICS_DIR: &str = "topics";
/// Default relative name of the images directory
pub const DEFAULT_IMAGES_DIR: &str = "images";

/// One documentation book: an id, a display name, a start page and the
/// ordered forest of TOC roots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Unique id within the project; external reference key
    pub id: String,
    /// Display name, independent from the id
    pub name: String,
    /// File name of the landing topic; must name a tree node when the tree
    /// is non-empty
    pub start_page: Option<String>,
    /// Roots of the TOC forest
    pub topics: Vec<TopicNode>,
    /// Path of this document's own `.tree` file. Set by the XML backend
    /// only; never serialized into the document itself.
    #[serde(skip)]
    pub tree_file: Option<PathBuf>,
}

impl Document {
    /// Create an empty document
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            start_page: None,
            topics: Vec::new(),
            tree_file: None,
        }
    }

    /// Returns true if `file_name` appears anywhere in this document's tree
    pub fn contains_topic(&self, file_name: &str) -> bool {
        toc::find(&self.topics, file_name).is_some()
    }

    /// Every file name reachable from this document's tree, pre-order
    pub fn all_file_names(&self) -> Vec<String> {
        toc::all_file_names(&self.topics)
    }

    /// Number of topics in the whole tree
    pub fn topic_count(&self) -> usize {
        self.all_file_names().len()
    }

    /// When the document is reduced to exactly one topic, the start page is
    /// forced to that topic's file name.
    pub fn enforce_single_topic_start_page(&mut self) {
        let names = self.all_file_names();
        if names.len() == 1 {
            self.start_page = Some(names[0].clone());
        }
    }
}

/// Root of the in-memory configuration graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Relative name of the topics directory
    pub topics_dir: String,
    /// Relative name of the images directory
    pub images_dir: String,
    /// Image set version carried through the JSON format
    pub image_version: Option<String>,
    /// Web path for images carried through the JSON format
    pub web_path: Option<String>,
    /// All documents in the project, in declaration order
    pub documents: Vec<Document>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            topics_dir: DEFAULT_TOPICS_DIR.to_string(),
            images_dir: DEFAULT_IMAGES_DIR.to_string(),
            image_version: None,
            web_path: None,
            documents: Vec::new(),
        }
    }
}

impl ProjectConfig {
    /// Look up a document by id
    pub fn document(&self, id: &str) -> Option<&Document> {
        self.documents.iter().find(|doc| doc.id == id)
    }

    /// Mutable document lookup
    pub fn document_mut(&mut self, id: &str) -> Option<&mut Document> {
        self.documents.iter_mut().find(|doc| doc.id == id)
    }
}
