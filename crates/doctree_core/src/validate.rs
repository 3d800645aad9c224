//! Project consistency checks.
//!
//! A loaded project can drift from the files on disk: topics edited away
//! outside the tool, stray Markdown files never added to a tree, a start
//! page pointing at a topic that no longer exists. [`validate`] walks the
//! configuration and the topics directory and reports every mismatch
//! without mutating anything.

use std::collections::HashSet;
use std::path::PathBuf;

use crate::fs::FileSystem;
use crate::model::ProjectConfig;

/// A single consistency finding
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Finding {
    /// The same file name appears more than once in a document's tree
    DuplicateTopic {
        /// Document the duplicate is in
        document_id: String,
        /// The repeated file name
        file_name: String,
    },
    /// A tree references a Markdown file that does not exist
    MissingFile {
        /// Document holding the dangling reference
        document_id: String,
        /// Referenced file name
        file_name: String,
        /// Path that was checked
        path: PathBuf,
    },
    /// A document's start page names a topic not present in its tree
    DanglingStartPage {
        /// Document with the bad start page
        document_id: String,
        /// The start page value
        start_page: String,
    },
    /// A Markdown file in the topics directory belongs to no document
    OrphanFile {
        /// Path of the unreferenced file
        path: PathBuf,
    },
}

/// Outcome of a validation pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// All findings, in discovery order
    pub findings: Vec<Finding>,
}

impl ValidationReport {
    /// True when no inconsistency was found
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }
}

/// Check every document tree against the topics directory.
///
/// An unreadable topics directory is not an error here; directory listing
/// failures simply skip the orphan check (the per-topic existence checks
/// still run).
pub fn validate<FS: FileSystem>(
    fs: &FS,
    config: &ProjectConfig,
    topics_dir: &std::path::Path,
) -> ValidationReport {
    let mut report = ValidationReport::default();
    let mut referenced: HashSet<String> = HashSet::new();

    for doc in &config.documents {
        let names = doc.all_file_names();

        let mut seen: HashSet<&str> = HashSet::new();
        for name in &names {
            if !seen.insert(name) {
                report.findings.push(Finding::DuplicateTopic {
                    document_id: doc.id.clone(),
                    file_name: name.clone(),
                });
            }
        }

        for name in &names {
            let path = topics_dir.join(name);
            if !fs.exists(&path) {
                report.findings.push(Finding::MissingFile {
                    document_id: doc.id.clone(),
                    file_name: name.clone(),
                    path,
                });
            }
            referenced.insert(name.clone());
        }

        if let Some(start_page) = &doc.start_page {
            if !doc.contains_topic(start_page) {
                report.findings.push(Finding::DanglingStartPage {
                    document_id: doc.id.clone(),
                    start_page: start_page.clone(),
                });
            }
        }
    }

    if let Ok(files) = fs.list_md_files(topics_dir) {
        for path in files {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            if !referenced.contains(&name) {
                report.findings.push(Finding::OrphanFile { path });
            }
        }
    } else {
        log::debug!("Topics directory not listable, skipping orphan check");
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::InMemoryFileSystem;
    use crate::model::Document;
    use crate::toc::TopicNode;
    use std::path::Path;

    fn config_with_tree() -> ProjectConfig {
        let mut doc = Document::new("d1", "Guide");
        doc.start_page = Some("intro.md".to_string());
        let mut intro = TopicNode::new("intro.md", "Intro");
        intro.children.push(TopicNode::new("setup.md", "Setup"));
        doc.topics.push(intro);

        let mut config = ProjectConfig::default();
        config.documents.push(doc);
        config
    }

    #[test]
    fn test_clean_project() {
        let fs = InMemoryFileSystem::with_files(vec![
            ("proj/topics/intro.md".into(), "# Intro".to_string()),
            ("proj/topics/setup.md".into(), "# Setup".to_string()),
        ]);

        let report = validate(&fs, &config_with_tree(), Path::new("proj/topics"));
        assert!(report.is_clean());
    }

    #[test]
    fn test_missing_file_reported() {
        let fs = InMemoryFileSystem::with_files(vec![(
            "proj/topics/intro.md".into(),
            "# Intro".to_string(),
        )]);

        let report = validate(&fs, &config_with_tree(), Path::new("proj/topics"));
        assert_eq!(report.findings.len(), 1);
        assert!(matches!(
            &report.findings[0],
            Finding::MissingFile { file_name, .. } if file_name == "setup.md"
        ));
    }

    #[test]
    fn test_orphan_file_reported() {
        let fs = InMemoryFileSystem::with_files(vec![
            ("proj/topics/intro.md".into(), "# Intro".to_string()),
            ("proj/topics/setup.md".into(), "# Setup".to_string()),
            ("proj/topics/stray.md".into(), "# Stray".to_string()),
        ]);

        let report = validate(&fs, &config_with_tree(), Path::new("proj/topics"));
        assert_eq!(report.findings.len(), 1);
        assert!(matches!(
            &report.findings[0],
            Finding::OrphanFile { path } if path == Path::new("proj/topics/stray.md")
        ));
    }

    #[test]
    fn test_duplicate_and_dangling_start_page() {
        let mut config = config_with_tree();
        {
            let doc = &mut config.documents[0];
            doc.topics.push(TopicNode::new("intro.md", "Intro Again"));
            doc.start_page = Some("missing.md".to_string());
        }
        let fs = InMemoryFileSystem::with_files(vec![
            ("proj/topics/intro.md".into(), "# Intro".to_string()),
            ("proj/topics/setup.md".into(), "# Setup".to_string()),
        ]);

        let report = validate(&fs, &config, Path::new("proj/topics"));
        assert!(report.findings.iter().any(|f| matches!(
            f,
            Finding::DuplicateTopic { file_name, .. } if file_name == "intro.md"
        )));
        assert!(report.findings.iter().any(|f| matches!(
            f,
            Finding::DanglingStartPage { start_page, .. } if start_page == "missing.md"
        )));
    }
}
