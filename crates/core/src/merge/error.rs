//! Error types for the merge module.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::package::PackageError;

/// Errors that can occur while merging documents.
#[derive(Debug, Error)]
pub enum MergeError {
    /// Nothing to merge.
    #[error("No documents to merge")]
    NoDocuments,

    /// Failed to read an input or write the output.
    #[error("I/O error on {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An input is not a valid docx archive, or the output could not be packed.
    #[error("Invalid docx archive {path}")]
    Archive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    /// An input has no usable document body.
    #[error("Malformed document {path}: {reason}")]
    MalformedDocument { path: PathBuf, reason: String },
}

impl MergeError {
    pub(crate) fn from_package(path: &Path, err: PackageError) -> Self {
        match err {
            PackageError::Io { path, source } => MergeError::Io { path, source },
            PackageError::Archive(source) => MergeError::Archive {
                path: path.to_path_buf(),
                source,
            },
            other => MergeError::MalformedDocument {
                path: path.to_path_buf(),
                reason: other.to_string(),
            },
        }
    }

    pub(crate) fn malformed(path: &Path, reason: impl Into<String>) -> Self {
        MergeError::MalformedDocument {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }
}
