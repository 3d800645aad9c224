use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// Unified error type for doctree operations
#[derive(Debug, Error)]
pub enum DoctreeError {
    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write file '{path}': {source}")]
    FileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    // Configuration errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::DeError),

    #[error("Configuration file '{path}' is not valid: {reason}")]
    SchemaInvalid { path: PathBuf, reason: String },

    #[error("No .tree file with id '{0}' is referenced from the index")]
    TreeFileNotFound(String),

    // Project errors
    #[error("Project not found at '{0}'")]
    ProjectNotFound(PathBuf),

    #[error("Project already exists at '{0}'")]
    ProjectAlreadyExists(PathBuf),
}

/// Result type alias for doctree operations
pub type Result<T> = std::result::Result<T, DoctreeError>;

/// A serializable representation of DoctreeError for IPC (e.g., editor hosts)
#[derive(Debug, Clone, Serialize)]
pub struct SerializableError {
    /// Error kind/variant name
    pub kind: String,
    /// Human-readable error message
    pub message: String,
    /// Associated path (if applicable)
    pub path: Option<PathBuf>,
}

impl From<&DoctreeError> for SerializableError {
    fn from(err: &DoctreeError) -> Self {
        let kind = match err {
            DoctreeError::Io(_) => "Io",
            DoctreeError::FileRead { .. } => "FileRead",
            DoctreeError::FileWrite { .. } => "FileWrite",
            DoctreeError::Json(_) => "Json",
            DoctreeError::Xml(_) => "Xml",
            DoctreeError::SchemaInvalid { .. } => "SchemaInvalid",
            DoctreeError::TreeFileNotFound(_) => "TreeFileNotFound",
            DoctreeError::ProjectNotFound(_) => "ProjectNotFound",
            DoctreeError::ProjectAlreadyExists(_) => "ProjectAlreadyExists",
        }
        .to_string();

        let path = match err {
            DoctreeError::FileRead { path, .. } => Some(path.clone()),
            DoctreeError::FileWrite { path, .. } => Some(path.clone()),
            DoctreeError::SchemaInvalid { path, .. } => Some(path.clone()),
            DoctreeError::ProjectNotFound(path) => Some(path.clone()),
            DoctreeError::ProjectAlreadyExists(path) => Some(path.clone()),
            _ => None,
        };

        Self {
            kind,
            message: err.to_string(),
            path,
        }
    }
}

impl From<DoctreeError> for SerializableError {
    fn from(err: DoctreeError) -> Self {
        SerializableError::from(&err)
    }
}

impl DoctreeError {
    /// Convert to a serializable representation for IPC
    pub fn to_serializable(&self) -> SerializableError {
        SerializableError::from(self)
    }
}
