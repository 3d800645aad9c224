//! Title binding between TOC nodes and Markdown files.
//!
//! The Markdown file is the source of truth for a topic's title: the first
//! non-blank line, when it is a `# ` heading, names the topic. Node titles
//! are caches re-derived on every reload.

/// Extract the title from the first non-blank line of a Markdown file.
///
/// Returns `Some` only when that line starts with `# `; the remainder is
/// trimmed.
pub fn first_heading(content: &str) -> Option<String> {
    let line = content.lines().find(|line| !line.trim().is_empty())?;
    let rest = line.strip_prefix("# ")?;
    Some(rest.trim().to_string())
}

/// Title for a topic whose file content may be unreadable or heading-less:
/// the heading when present, otherwise the angle-bracket-wrapped file name.
pub fn title_or_placeholder(file_name: &str, content: Option<&str>) -> String {
    content
        .and_then(first_heading)
        .unwrap_or_else(|| format!("<{}>", file_name))
}

/// Initial content written when a topic file is created
pub fn initial_topic_content(title: &str) -> String {
    format!("# {}\n\nContent goes here...", title)
}
