//! Clap argument definitions

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Manage documentation projects: documents and their Markdown topic trees
#[derive(Parser)]
#[command(name = "doctree", version, about)]
pub struct Cli {
    /// Project directory (defaults to the current directory)
    #[arg(short, long, global = true)]
    pub dir: Option<PathBuf>,

    /// Indent configuration files with tabs instead of spaces
    #[arg(long, global = true)]
    pub tabs: bool,

    /// Spaces per indentation level in configuration files
    #[arg(long, global = true, default_value_t = 4)]
    pub indent: usize,

    #[command(subcommand)]
    pub command: Commands,
}

/// Storage backend for a new project
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageFormat {
    /// Flat doctree.json configuration file
    Json,
    /// doctree.ihp index plus per-document .tree files
    Xml,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new project in the given directory
    Init {
        /// Storage backend to use
        #[arg(long, value_enum, default_value_t = StorageFormat::Json)]
        format: StorageFormat,
    },

    /// List the project's documents
    List,

    /// Print a document's topic tree
    Tree {
        /// Document id
        id: String,
    },

    /// Document management
    Doc {
        #[command(subcommand)]
        command: DocCommands,
    },

    /// Topic management
    Topic {
        #[command(subcommand)]
        command: TopicCommands,
    },

    /// Set a document's start page
    StartPage {
        /// Document id
        id: String,
        /// Topic file name (e.g. intro.md)
        file_name: String,
    },

    /// Check tree and disk consistency
    Status,
}

#[derive(Subcommand)]
pub enum DocCommands {
    /// Add a new document
    Add {
        /// Document id
        id: String,
        /// Display name
        name: String,
        /// Title of an initial top-level topic to create
        #[arg(long)]
        topic: Option<String>,
    },

    /// Rename a document
    Rename {
        /// Document id
        id: String,
        /// New display name
        name: String,
    },

    /// Remove a document and delete its topic files
    Remove {
        /// Document id
        id: String,
    },
}

#[derive(Subcommand)]
pub enum TopicCommands {
    /// Add a top-level topic
    Add {
        /// Document id
        id: String,
        /// Topic title
        title: String,
    },

    /// Add a topic as the last child of a parent topic
    AddChild {
        /// Document id
        id: String,
        /// Parent topic file name
        parent: String,
        /// Topic title
        title: String,
    },

    /// Add a topic next to a sibling, at the same level
    AddSibling {
        /// Document id
        id: String,
        /// Sibling topic file name
        sibling: String,
        /// Topic title
        title: String,
    },

    /// Retitle a topic and rename its file
    Rename {
        /// Document id
        id: String,
        /// Current topic file name
        file_name: String,
        /// New title
        title: String,
        /// Explicit new file name (defaults to the slug of the title)
        #[arg(long)]
        new_file_name: Option<String>,
    },

    /// Move a topic under a new parent
    Move {
        /// Document id
        id: String,
        /// Topic file name to move
        source: String,
        /// Target parent topic file name
        target: String,
    },

    /// Delete a topic and its descendants, files included
    Delete {
        /// Document id
        id: String,
        /// Topic file name
        file_name: String,
    },
}
