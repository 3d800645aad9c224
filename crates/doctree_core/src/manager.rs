//! Document manager.
//!
//! [`DocumentManager`] is the only component that touches both tree shape
//! and disk files in one operation, so that the serialized configuration,
//! the in-memory TOC and the Markdown files move together.
//!
//! Failure surface: conditions a caller can recover from locally (unknown
//! document, missing topic, name collisions) come back as `Ok(false)` with a
//! `log::warn!`, leaving no partial mutation behind. Genuine I/O or schema
//! failures are `Err` and abort the operation; sub-steps that already
//! completed are left as-is (best-effort consistency, not transactional).
//!
//! Known limitation: persists carry no version check, so two overlapping
//! mutation sequences against the same tree can lose updates. The model
//! assumes the host drives one user command at a time.

use std::path::PathBuf;

use crate::error::{DoctreeError, Result};
use crate::fs::FileSystem;
use crate::heading;
use crate::model::{Document, ProjectConfig};
use crate::storage::StorageAdapter;
use crate::toc::{self, TopicNode};

/// A topic whose Markdown file is confirmed present on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicOnDisk {
    /// Id of the owning document
    pub document_id: String,
    /// Display title of the topic
    pub title: String,
    /// Tree-relative file name
    pub file_name: String,
    /// Resolved path of the Markdown file
    pub path: PathBuf,
}

/// Owns the loaded project and coordinates tree mutations with disk I/O
pub struct DocumentManager<FS: FileSystem, S: StorageAdapter> {
    fs: FS,
    storage: S,
    config: ProjectConfig,
}

impl<FS: FileSystem, S: StorageAdapter> DocumentManager<FS, S> {
    /// Load the project through the storage adapter and derive topic titles
    /// from the Markdown files.
    pub fn load(fs: FS, storage: S) -> Result<Self> {
        let mut manager = Self {
            fs,
            storage,
            config: ProjectConfig::default(),
        };
        manager.reload()?;
        Ok(manager)
    }

    /// Discard in-memory state and rebuild it from disk.
    ///
    /// Every node's title is re-derived from the first heading of its
    /// Markdown file; files that cannot be read or carry no `# ` heading
    /// yield the `<fileName>` placeholder.
    pub fn reload(&mut self) -> Result<()> {
        self.config = self.storage.load()?;
        let topics_dir = self.storage.topics_dir(&self.config);
        for doc in &mut self.config.documents {
            for node in &mut doc.topics {
                derive_titles(&self.fs, &topics_dir, node);
            }
        }
        Ok(())
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// All documents, in declaration order
    pub fn documents(&self) -> &[Document] {
        &self.config.documents
    }

    /// Look up a document by id
    pub fn document(&self, id: &str) -> Option<&Document> {
        self.config.document(id)
    }

    /// The loaded configuration
    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    /// Reference to the underlying filesystem
    pub fn fs_ref(&self) -> &FS {
        &self.fs
    }

    /// Absolute path of the topics directory
    pub fn topics_dir(&self) -> PathBuf {
        self.storage.topics_dir(&self.config)
    }

    /// Absolute path of the images directory
    pub fn images_dir(&self) -> PathBuf {
        self.storage.images_dir(&self.config)
    }

    // ========================================================================
    // Document operations
    // ========================================================================

    /// Append a new document.
    ///
    /// When the document arrives with a first top-level topic, that topic's
    /// Markdown file is created before anything is persisted, so a total
    /// write failure never leaves a configuration referencing a file that
    /// was never created. A file that already exists is kept as-is (warned,
    /// not an error); the caller resolves the collision by picking another
    /// name up front.
    pub fn create_document(&mut self, mut doc: Document) -> Result<bool> {
        if self.config.document(&doc.id).is_some() {
            log::warn!("Document '{}' already exists", doc.id);
            return Ok(false);
        }

        if let Some(first) = doc.topics.first() {
            let path = self.topics_dir().join(&first.file_name);
            if self.fs.exists(&path) {
                log::warn!(
                    "Topic file already exists, leaving it untouched: {:?}",
                    path
                );
            } else {
                let content = heading::initial_topic_content(&first.title);
                self.fs
                    .create_new(&path, &content)
                    .map_err(|e| DoctreeError::FileWrite {
                        path: path.clone(),
                        source: e,
                    })?;
            }
        }

        doc.enforce_single_topic_start_page();
        self.config.documents.push(doc);
        // Document list changed: full save, index included
        self.storage.save(&self.config)?;
        Ok(true)
    }

    /// Remove a document and delete every Markdown file its tree reaches.
    /// Files already missing from disk are ignored.
    pub fn remove_document(&mut self, id: &str) -> Result<bool> {
        let Some(idx) = self.config.documents.iter().position(|doc| doc.id == id) else {
            log::warn!("Document '{}' not found", id);
            return Ok(false);
        };

        let topics_dir = self.topics_dir();
        for file_name in self.config.documents[idx].all_file_names() {
            let path = topics_dir.join(&file_name);
            if self.fs.exists(&path) {
                self.fs
                    .delete_file(&path)
                    .map_err(|e| DoctreeError::FileWrite {
                        path: path.clone(),
                        source: e,
                    })?;
            }
        }

        self.config.documents.remove(idx);
        self.storage.save(&self.config)?;
        Ok(true)
    }

    /// Change a document's display name
    pub fn rename_document(&mut self, id: &str, new_name: &str) -> Result<bool> {
        let Some(doc) = self.config.document_mut(id) else {
            log::warn!("Document '{}' not found", id);
            return Ok(false);
        };
        doc.name = new_name.to_string();
        self.storage.save_document(&self.config, id)?;
        Ok(true)
    }

    // ========================================================================
    // Topic operations
    // ========================================================================

    /// Append a new topic under `parent` (or at the top level when `parent`
    /// is `None`) and create its Markdown file.
    ///
    /// A file name already present in the tree or on disk is a hard
    /// conflict: warn and stop before any mutation.
    pub fn add_child_topic(
        &mut self,
        doc_id: &str,
        parent: Option<&str>,
        node: TopicNode,
    ) -> Result<bool> {
        let topics_dir = self.topics_dir();
        let Some(doc) = self.config.document_mut(doc_id) else {
            log::warn!("Document '{}' not found", doc_id);
            return Ok(false);
        };

        if doc.contains_topic(&node.file_name) {
            log::warn!("Topic '{}' already exists in the tree", node.file_name);
            return Ok(false);
        }
        if let Some(parent_name) = parent {
            if !doc.contains_topic(parent_name) {
                log::warn!("Parent topic '{}' not found", parent_name);
                return Ok(false);
            }
        }

        let path = topics_dir.join(&node.file_name);
        if self.fs.exists(&path) {
            log::warn!("Topic file already exists: {:?}", path);
            return Ok(false);
        }

        let content = heading::initial_topic_content(&node.title);
        self.fs
            .create_new(&path, &content)
            .map_err(|e| DoctreeError::FileWrite {
                path: path.clone(),
                source: e,
            })?;

        match parent {
            Some(parent_name) => {
                // Presence checked above
                if let Some(parent_node) = toc::find_mut(&mut doc.topics, parent_name) {
                    parent_node.children.push(node);
                }
            }
            None => doc.topics.push(node),
        }

        doc.enforce_single_topic_start_page();
        self.storage.save_document(&self.config, doc_id)?;
        Ok(true)
    }

    /// Append a new topic next to `sibling`, at the same level
    pub fn add_sibling_topic(
        &mut self,
        doc_id: &str,
        sibling: &str,
        node: TopicNode,
    ) -> Result<bool> {
        let Some(doc) = self.config.document(doc_id) else {
            log::warn!("Document '{}' not found", doc_id);
            return Ok(false);
        };

        let parents = toc::parent_map(&doc.topics);
        let Some(parent) = parents.get(sibling) else {
            log::warn!("Sibling topic '{}' not found", sibling);
            return Ok(false);
        };
        let parent = parent.clone();
        self.add_child_topic(doc_id, parent.as_deref(), node)
    }

    /// Move a topic (with its whole subtree) to become the last child of
    /// `target`. Rejected when the move would detach the branch into its own
    /// descendant.
    pub fn move_topic(&mut self, doc_id: &str, source: &str, target: &str) -> Result<bool> {
        let Some(doc) = self.config.document_mut(doc_id) else {
            log::warn!("Document '{}' not found", doc_id);
            return Ok(false);
        };

        if !toc::move_node(&mut doc.topics, source, target) {
            log::warn!("Cannot move '{}' under '{}'", source, target);
            return Ok(false);
        }

        self.storage.save_document(&self.config, doc_id)?;
        Ok(true)
    }

    /// Retitle a topic and rename its Markdown file.
    ///
    /// The new file name is `explicit_file_name` when given, otherwise the
    /// slug of the new title. Fails when the old file is missing or the new
    /// name is already taken (tree or disk).
    pub fn rename_topic(
        &mut self,
        doc_id: &str,
        old_file_name: &str,
        new_title: &str,
        explicit_file_name: Option<&str>,
    ) -> Result<bool> {
        let topics_dir = self.topics_dir();
        let Some(doc) = self.config.document_mut(doc_id) else {
            log::warn!("Document '{}' not found", doc_id);
            return Ok(false);
        };
        if !doc.contains_topic(old_file_name) {
            log::warn!("Topic '{}' not found", old_file_name);
            return Ok(false);
        }

        let new_file_name = explicit_file_name
            .map(str::to_string)
            .unwrap_or_else(|| toc::format_title_as_file_name(new_title));

        if new_file_name != old_file_name {
            let old_path = topics_dir.join(old_file_name);
            let new_path = topics_dir.join(&new_file_name);

            if !self.fs.exists(&old_path) {
                log::warn!("Topic file missing on disk: {:?}", old_path);
                return Ok(false);
            }
            if doc.contains_topic(&new_file_name) || self.fs.exists(&new_path) {
                log::warn!("Topic file name already taken: '{}'", new_file_name);
                return Ok(false);
            }

            self.fs
                .move_file(&old_path, &new_path)
                .map_err(|e| DoctreeError::FileWrite {
                    path: new_path.clone(),
                    source: e,
                })?;
        }

        if let Some(node) = toc::find_mut(&mut doc.topics, old_file_name) {
            node.file_name = new_file_name;
            node.title = new_title.to_string();
        }

        // Start page follows the rename only through the single-topic rule
        doc.enforce_single_topic_start_page();
        self.storage.save_document(&self.config, doc_id)?;
        Ok(true)
    }

    /// Remove a topic subtree and delete every Markdown file in it.
    /// Files already missing from disk are ignored.
    pub fn delete_topic(&mut self, doc_id: &str, file_name: &str) -> Result<bool> {
        let topics_dir = self.topics_dir();
        let Some(doc) = self.config.document_mut(doc_id) else {
            log::warn!("Document '{}' not found", doc_id);
            return Ok(false);
        };

        let Some(removed) = toc::extract(&mut doc.topics, file_name) else {
            log::warn!("Topic '{}' not found", file_name);
            return Ok(false);
        };

        for name in toc::all_file_names(std::slice::from_ref(&removed)) {
            let path = topics_dir.join(&name);
            if self.fs.exists(&path) {
                self.fs
                    .delete_file(&path)
                    .map_err(|e| DoctreeError::FileWrite {
                        path: path.clone(),
                        source: e,
                    })?;
            }
        }

        doc.enforce_single_topic_start_page();
        self.storage.save_document(&self.config, doc_id)?;
        Ok(true)
    }

    /// Designate an existing topic as the document's landing page
    pub fn set_start_page(&mut self, doc_id: &str, file_name: &str) -> Result<bool> {
        let Some(doc) = self.config.document_mut(doc_id) else {
            log::warn!("Document '{}' not found", doc_id);
            return Ok(false);
        };
        if !doc.contains_topic(file_name) {
            log::warn!("Topic '{}' not found", file_name);
            return Ok(false);
        }

        doc.start_page = Some(file_name.to_string());
        self.storage.save_document(&self.config, doc_id)?;
        Ok(true)
    }

    /// Every tree topic whose Markdown file actually exists on disk,
    /// filtering out dangling references.
    pub fn topics_on_disk(&self) -> Vec<TopicOnDisk> {
        let topics_dir = self.topics_dir();
        let mut result = Vec::new();
        for doc in &self.config.documents {
            for node_name in doc.all_file_names() {
                let path = topics_dir.join(&node_name);
                if !self.fs.exists(&path) {
                    continue;
                }
                let title = toc::find(&doc.topics, &node_name)
                    .map(|node| node.title.clone())
                    .unwrap_or_default();
                result.push(TopicOnDisk {
                    document_id: doc.id.clone(),
                    title,
                    file_name: node_name,
                    path,
                });
            }
        }
        result
    }
}

/// Re-derive titles for a node and its subtree from the Markdown files
fn derive_titles<FS: FileSystem>(fs: &FS, topics_dir: &std::path::Path, node: &mut TopicNode) {
    let path = topics_dir.join(&node.file_name);
    let content = fs.read_to_string(&path).ok();
    node.title = heading::title_or_placeholder(&node.file_name, content.as_deref());
    for child in &mut node.children {
        derive_titles(fs, topics_dir, child);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::InMemoryFileSystem;
    use crate::storage::{IndentStyle, JsonStorage};
    use std::path::Path;

    fn new_manager() -> (
        InMemoryFileSystem,
        DocumentManager<InMemoryFileSystem, JsonStorage<InMemoryFileSystem>>,
    ) {
        let fs = InMemoryFileSystem::new();
        let storage = JsonStorage::new(
            fs.clone(),
            PathBuf::from("proj/doctree.json"),
            IndentStyle::Spaces(2),
        );
        let manager = DocumentManager::load(fs.clone(), storage).unwrap();
        (fs, manager)
    }

    fn topic(title: &str) -> TopicNode {
        TopicNode::new(toc::format_title_as_file_name(title), title)
    }

    #[test]
    fn test_create_document_writes_first_topic_file() {
        let (fs, mut manager) = new_manager();

        let mut doc = Document::new("d1", "Guide");
        doc.topics.push(topic("Intro"));
        assert!(manager.create_document(doc).unwrap());

        let content = fs
            .read_to_string(Path::new("proj/topics/intro.md"))
            .unwrap();
        assert_eq!(content, "# Intro\n\nContent goes here...");

        // Single topic forces the start page
        let doc = manager.document("d1").unwrap();
        assert_eq!(doc.start_page.as_deref(), Some("intro.md"));

        // Duplicate id rejected
        assert!(!manager.create_document(Document::new("d1", "Again")).unwrap());
    }

    #[test]
    fn test_create_document_keeps_existing_file() {
        let (fs, mut manager) = new_manager();
        fs.write_file(Path::new("proj/topics/intro.md"), "preexisting")
            .unwrap();

        let mut doc = Document::new("d1", "Guide");
        doc.topics.push(topic("Intro"));
        assert!(manager.create_document(doc).unwrap());

        // Existing content is not overwritten
        assert_eq!(
            fs.read_to_string(Path::new("proj/topics/intro.md")).unwrap(),
            "preexisting"
        );
    }

    #[test]
    fn test_add_child_topic_conflicts() {
        let (fs, mut manager) = new_manager();
        let mut doc = Document::new("d1", "Guide");
        doc.topics.push(topic("Intro"));
        manager.create_document(doc).unwrap();

        // Unknown document
        assert!(!manager
            .add_child_topic("nope", None, topic("Setup"))
            .unwrap());
        // Unknown parent
        assert!(!manager
            .add_child_topic("d1", Some("missing.md"), topic("Setup"))
            .unwrap());
        // Name already in the tree
        assert!(!manager.add_child_topic("d1", None, topic("Intro")).unwrap());
        // File on disk but not in the tree: hard conflict, no mutation
        fs.write_file(Path::new("proj/topics/setup.md"), "stray")
            .unwrap();
        assert!(!manager.add_child_topic("d1", None, topic("Setup")).unwrap());
        assert!(!manager.document("d1").unwrap().contains_topic("setup.md"));
    }

    #[test]
    fn test_add_sibling_topic_resolves_parent_level() {
        let (_fs, mut manager) = new_manager();
        let mut doc = Document::new("d1", "Guide");
        doc.topics.push(topic("Intro"));
        manager.create_document(doc).unwrap();
        manager
            .add_child_topic("d1", Some("intro.md"), topic("Setup"))
            .unwrap();

        // Sibling of a nested topic lands under the same parent
        assert!(manager
            .add_sibling_topic("d1", "setup.md", topic("Usage"))
            .unwrap());
        let doc = manager.document("d1").unwrap();
        let intro = toc::find(&doc.topics, "intro.md").unwrap();
        assert_eq!(intro.children.len(), 2);
        assert_eq!(intro.children[1].file_name, "usage.md");

        // Sibling of a top-level topic lands at the top level
        assert!(manager
            .add_sibling_topic("d1", "intro.md", topic("FAQ"))
            .unwrap());
        let doc = manager.document("d1").unwrap();
        assert_eq!(doc.topics.len(), 2);

        // Unknown sibling
        assert!(!manager
            .add_sibling_topic("d1", "missing.md", topic("Nope"))
            .unwrap());
    }

    #[test]
    fn test_move_topic_persists_and_guards_cycles() {
        let (fs, mut manager) = new_manager();
        let mut doc = Document::new("d1", "Guide");
        doc.topics.push(topic("Intro"));
        manager.create_document(doc).unwrap();
        manager
            .add_child_topic("d1", Some("intro.md"), topic("Setup"))
            .unwrap();
        manager.add_child_topic("d1", None, topic("FAQ")).unwrap();

        assert!(manager.move_topic("d1", "faq.md", "setup.md").unwrap());
        let doc = manager.document("d1").unwrap();
        let setup = toc::find(&doc.topics, "setup.md").unwrap();
        assert_eq!(setup.children[0].file_name, "faq.md");

        // Moving intro under its own descendant is a no-op
        assert!(!manager.move_topic("d1", "intro.md", "faq.md").unwrap());

        // The move was persisted
        let saved = fs
            .read_to_string(Path::new("proj/doctree.json"))
            .unwrap();
        assert!(saved.contains("faq.md"));
    }

    #[test]
    fn test_rename_topic_moves_file_and_updates_node() {
        let (fs, mut manager) = new_manager();
        let mut doc = Document::new("d1", "Guide");
        doc.topics.push(topic("Intro"));
        manager.create_document(doc).unwrap();
        manager
            .add_child_topic("d1", Some("intro.md"), topic("Setup"))
            .unwrap();

        assert!(manager
            .rename_topic("d1", "intro.md", "Getting Started", None)
            .unwrap());

        assert!(!fs.exists(Path::new("proj/topics/intro.md")));
        assert!(fs.exists(Path::new("proj/topics/getting-started.md")));

        let doc = manager.document("d1").unwrap();
        let node = toc::find(&doc.topics, "getting-started.md").unwrap();
        assert_eq!(node.title, "Getting Started");
        // More than one topic: start page untouched by the rename
        assert_eq!(doc.start_page.as_deref(), Some("intro.md"));
    }

    #[test]
    fn test_rename_topic_explicit_file_name_and_conflicts() {
        let (fs, mut manager) = new_manager();
        let mut doc = Document::new("d1", "Guide");
        doc.topics.push(topic("Intro"));
        manager.create_document(doc).unwrap();
        manager.add_child_topic("d1", None, topic("FAQ")).unwrap();

        // Explicit file name wins over the slug
        assert!(manager
            .rename_topic("d1", "faq.md", "Questions", Some("questions-and-answers.md"))
            .unwrap());
        assert!(fs.exists(Path::new("proj/topics/questions-and-answers.md")));

        // Target name taken in the tree
        assert!(!manager
            .rename_topic("d1", "questions-and-answers.md", "Intro", None)
            .unwrap());

        // Old file missing on disk
        fs.delete_file(Path::new("proj/topics/questions-and-answers.md"))
            .unwrap();
        assert!(!manager
            .rename_topic("d1", "questions-and-answers.md", "Other", None)
            .unwrap());
    }

    #[test]
    fn test_delete_topic_cascades() {
        let (fs, mut manager) = new_manager();
        let mut doc = Document::new("d1", "Guide");
        doc.topics.push(topic("Intro"));
        manager.create_document(doc).unwrap();
        manager
            .add_child_topic("d1", Some("intro.md"), topic("Setup"))
            .unwrap();
        manager
            .add_child_topic("d1", Some("setup.md"), topic("Install"))
            .unwrap();
        manager.add_child_topic("d1", None, topic("FAQ")).unwrap();

        // Deleting intro removes itself plus both descendants: 3 files
        assert!(manager.delete_topic("d1", "intro.md").unwrap());
        assert!(!fs.exists(Path::new("proj/topics/intro.md")));
        assert!(!fs.exists(Path::new("proj/topics/setup.md")));
        assert!(!fs.exists(Path::new("proj/topics/install.md")));
        assert!(fs.exists(Path::new("proj/topics/faq.md")));

        // One topic remains: the start page follows it
        let doc = manager.document("d1").unwrap();
        assert_eq!(doc.topic_count(), 1);
        assert_eq!(doc.start_page.as_deref(), Some("faq.md"));
    }

    #[test]
    fn test_remove_document_deletes_all_files() {
        let (fs, mut manager) = new_manager();
        let mut doc = Document::new("d1", "Guide");
        doc.topics.push(topic("Intro"));
        manager.create_document(doc).unwrap();
        manager
            .add_child_topic("d1", Some("intro.md"), topic("Setup"))
            .unwrap();

        assert!(manager.remove_document("d1").unwrap());
        assert!(manager.documents().is_empty());
        assert!(!fs.exists(Path::new("proj/topics/intro.md")));
        assert!(!fs.exists(Path::new("proj/topics/setup.md")));

        assert!(!manager.remove_document("d1").unwrap());
    }

    #[test]
    fn test_set_start_page_requires_existing_topic() {
        let (_fs, mut manager) = new_manager();
        let mut doc = Document::new("d1", "Guide");
        doc.topics.push(topic("Intro"));
        manager.create_document(doc).unwrap();
        manager.add_child_topic("d1", None, topic("FAQ")).unwrap();

        assert!(manager.set_start_page("d1", "faq.md").unwrap());
        assert_eq!(
            manager.document("d1").unwrap().start_page.as_deref(),
            Some("faq.md")
        );
        assert!(!manager.set_start_page("d1", "missing.md").unwrap());
    }

    #[test]
    fn test_topics_on_disk_filters_dangling_references() {
        let (fs, mut manager) = new_manager();
        let mut doc = Document::new("d1", "Guide");
        doc.topics.push(topic("Intro"));
        manager.create_document(doc).unwrap();
        manager.add_child_topic("d1", None, topic("FAQ")).unwrap();

        // Remove faq.md behind the manager's back
        fs.delete_file(Path::new("proj/topics/faq.md")).unwrap();

        let on_disk = manager.topics_on_disk();
        assert_eq!(on_disk.len(), 1);
        assert_eq!(on_disk[0].file_name, "intro.md");
        assert_eq!(on_disk[0].path, PathBuf::from("proj/topics/intro.md"));
    }

    #[test]
    fn test_reload_derives_titles_from_files() {
        let (fs, mut manager) = new_manager();
        let mut doc = Document::new("d1", "Guide");
        doc.topics.push(topic("Intro"));
        manager.create_document(doc).unwrap();
        manager.add_child_topic("d1", None, topic("FAQ")).unwrap();

        // Edit the heading behind the manager's back, strip the other file
        fs.write_file(Path::new("proj/topics/intro.md"), "# Introduction\n\nBody")
            .unwrap();
        fs.write_file(Path::new("proj/topics/faq.md"), "no heading here")
            .unwrap();

        manager.reload().unwrap();
        let doc = manager.document("d1").unwrap();
        assert_eq!(toc::find(&doc.topics, "intro.md").unwrap().title, "Introduction");
        assert_eq!(toc::find(&doc.topics, "faq.md").unwrap().title, "<faq.md>");
    }

    #[test]
    fn test_uniqueness_invariant_across_mutations() {
        let (_fs, mut manager) = new_manager();
        let mut doc = Document::new("d1", "Guide");
        doc.topics.push(topic("Intro"));
        manager.create_document(doc).unwrap();
        manager
            .add_child_topic("d1", Some("intro.md"), topic("Setup"))
            .unwrap();
        manager.add_child_topic("d1", None, topic("FAQ")).unwrap();
        manager.move_topic("d1", "faq.md", "intro.md").unwrap();
        manager
            .rename_topic("d1", "setup.md", "Installation", None)
            .unwrap();

        let names = manager.document("d1").unwrap().all_file_names();
        let mut deduped = names.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(names.len(), deduped.len());
    }

    #[test]
    fn test_scenario_end_to_end() {
        // Full lifecycle walk: create, add child, rename, delete
        let (_fs, mut manager) = new_manager();

        manager.create_document(Document::new("d1", "Doc")).unwrap();
        assert!(manager.add_child_topic("d1", None, topic("Intro")).unwrap());
        {
            let doc = manager.document("d1").unwrap();
            assert_eq!(doc.topics[0].file_name, "intro.md");
            assert_eq!(doc.topics[0].title, "Intro");
            assert_eq!(doc.start_page.as_deref(), Some("intro.md"));
        }

        assert!(manager
            .add_child_topic("d1", Some("intro.md"), topic("Setup"))
            .unwrap());
        {
            let doc = manager.document("d1").unwrap();
            let intro = toc::find(&doc.topics, "intro.md").unwrap();
            assert_eq!(intro.children[0].file_name, "setup.md");
        }

        assert!(manager
            .rename_topic("d1", "intro.md", "Getting Started", None)
            .unwrap());
        {
            let doc = manager.document("d1").unwrap();
            assert!(doc.contains_topic("getting-started.md"));
            // Two topics: rename leaves the start page alone
            assert_eq!(doc.start_page.as_deref(), Some("intro.md"));
        }

        assert!(manager.delete_topic("d1", "setup.md").unwrap());
        {
            let doc = manager.document("d1").unwrap();
            assert_eq!(doc.topic_count(), 1);
            assert_eq!(doc.start_page.as_deref(), Some("getting-started.md"));
        }
    }
}
