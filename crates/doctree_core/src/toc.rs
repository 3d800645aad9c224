//! Table-of-contents tree model.
//!
//! A document's TOC is an ordered forest of [`TopicNode`]s. Nodes carry no
//! parent back-references; upward lookups go through [`parent_map`], which is
//! rebuilt from the forest whenever it is needed. All functions here are pure
//! tree algorithms with no filesystem access.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One entry in a document's table of contents.
///
/// `file_name` is the relative path of the backing Markdown file under the
/// topics directory and must be unique across the whole tree of one document.
/// `title` mirrors the first `# ` heading of the file; the file is the source
/// of truth and the node caches it. Child order is display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicNode {
    /// Relative path of the backing Markdown file
    pub file_name: String,
    /// Display title (cached from the file's first heading)
    pub title: String,
    /// Ordered child topics
    #[serde(default)]
    pub children: Vec<TopicNode>,
}

impl TopicNode {
    /// Create a leaf node
    pub fn new(file_name: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            title: title.into(),
            children: Vec::new(),
        }
    }

    /// Returns true if `name` appears anywhere in this node's subtree,
    /// the node itself included.
    pub fn contains(&self, name: &str) -> bool {
        self.file_name == name || self.children.iter().any(|child| child.contains(name))
    }
}

/// Find the first node matching `name` in pre-order (node before children,
/// siblings left to right).
pub fn find<'a>(forest: &'a [TopicNode], name: &str) -> Option<&'a TopicNode> {
    for node in forest {
        if node.file_name == name {
            return Some(node);
        }
        if let Some(found) = find(&node.children, name) {
            return Some(found);
        }
    }
    None
}

/// Mutable pre-order lookup
pub fn find_mut<'a>(forest: &'a mut [TopicNode], name: &str) -> Option<&'a mut TopicNode> {
    for node in forest {
        if node.file_name == name {
            return Some(node);
        }
        if let Some(found) = find_mut(&mut node.children, name) {
            return Some(found);
        }
    }
    None
}

/// Remove and return the node matching `name` (with its whole subtree) from
/// wherever it is in the forest, or `None` if absent.
///
/// Extract-then-reinsert is the only way nodes relocate, which is what keeps
/// the structure a tree rather than a graph.
pub fn extract(forest: &mut Vec<TopicNode>, name: &str) -> Option<TopicNode> {
    if let Some(idx) = forest.iter().position(|node| node.file_name == name) {
        return Some(forest.remove(idx));
    }
    for node in forest.iter_mut() {
        if let Some(extracted) = extract(&mut node.children, name) {
            return Some(extracted);
        }
    }
    None
}

/// Collect every `file_name` in the forest, pre-order.
///
/// Used to determine the full set of Markdown files affected when a branch
/// is deleted.
pub fn all_file_names(forest: &[TopicNode]) -> Vec<String> {
    let mut names = Vec::new();
    collect_file_names(forest, &mut names);
    names
}

fn collect_file_names(forest: &[TopicNode], names: &mut Vec<String>) {
    for node in forest {
        names.push(node.file_name.clone());
        collect_file_names(&node.children, names);
    }
}

/// Move the `source` subtree to become the last child of `target`.
///
/// Returns `false` (forest unchanged) when source equals target, when either
/// endpoint is missing, or when target lies inside source's own subtree —
/// the cycle guard holds on every path.
pub fn move_node(forest: &mut Vec<TopicNode>, source: &str, target: &str) -> bool {
    if source == target {
        return false;
    }

    let Some(source_node) = find(forest, source) else {
        return false;
    };
    // Target inside the source subtree would detach the branch from the tree
    if source_node.contains(target) {
        return false;
    }
    if find(forest, target).is_none() {
        return false;
    }

    let extracted = match extract(forest, source) {
        Some(node) => node,
        None => return false,
    };

    match find_mut(forest, target) {
        Some(target_node) => {
            target_node.children.push(extracted);
            true
        }
        // Unreachable after the lookups above; restore rather than drop
        None => {
            forest.push(extracted);
            false
        }
    }
}

/// Map every `file_name` to its parent's `file_name` (`None` = top level).
///
/// Rebuilt on demand instead of storing live parent references that would go
/// stale across extract/move operations.
pub fn parent_map(forest: &[TopicNode]) -> HashMap<String, Option<String>> {
    let mut map = HashMap::new();
    for node in forest {
        map.insert(node.file_name.clone(), None);
        record_parents(node, &mut map);
    }
    map
}

fn record_parents(node: &TopicNode, map: &mut HashMap<String, Option<String>>) {
    for child in &node.children {
        map.insert(child.file_name.clone(), Some(node.file_name.clone()));
        record_parents(child, map);
    }
}

/// Convert a display title into the canonical Markdown file name:
/// trim, lowercase, collapse internal whitespace runs to a single `-`,
/// append `.md`.
pub fn format_title_as_file_name(title: &str) -> String {
    let slug = title
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-");
    format!("{}.md", slug)
}

/// Format a forest for display (like the `tree` command)
pub fn render_tree(forest: &[TopicNode]) -> String {
    let mut result = String::new();
    for node in forest {
        render_node(node, "", &mut result);
    }
    result
}

fn render_node(node: &TopicNode, prefix: &str, out: &mut String) {
    out.push_str(&node.title);
    out.push_str(" (");
    out.push_str(&node.file_name);
    out.push_str(")\n");

    let child_count = node.children.len();
    for (i, child) in node.children.iter().enumerate() {
        let is_last_child = i == child_count - 1;
        let connector = if is_last_child {
            "└── "
        } else {
            "├── "
        };
        let child_prefix = if is_last_child { "    " } else { "│   " };

        out.push_str(prefix);
        out.push_str(connector);
        render_node(child, &format!("{}{}", prefix, child_prefix), out);
    }
}
