#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// Error (common error types)
pub mod error;

/// Filesystem abstraction
pub mod fs;

/// Title derivation from Markdown headings
pub mod heading;

/// Document manager (tree mutations coordinated with disk I/O)
pub mod manager;

/// Project model (documents, configuration)
pub mod model;

/// Storage backends (JSON configuration, XML index and tree files)
pub mod storage;

/// Topic tree structure and pure tree algorithms
pub mod toc;

/// Validate (check tree and disk consistency)
pub mod validate;
