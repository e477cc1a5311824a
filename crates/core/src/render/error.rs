//! Error types for the render module.

use std::path::PathBuf;

use thiserror::Error;

use crate::package::PackageError;

/// Errors that can occur while rendering a template.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Template file does not exist.
    #[error("Template not found: {path}")]
    TemplateNotFound { path: PathBuf },

    /// Failed to read the template or write the target.
    #[error("I/O error on {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The template is not a valid docx archive.
    #[error("Invalid docx archive: {0}")]
    Archive(#[source] zip::result::ZipError),

    /// The template lacks a required part.
    #[error("Missing template part: {0}")]
    MissingPart(String),

    /// A template part is not valid UTF-8.
    #[error("Template part is not valid UTF-8: {0}")]
    InvalidUtf8(String),

    /// Renderer-specific failure.
    #[error("Render failed: {0}")]
    Failed(String),
}

impl From<PackageError> for RenderError {
    fn from(err: PackageError) -> Self {
        match err {
            PackageError::Io { path, source } => RenderError::Io { path, source },
            PackageError::Archive(e) => RenderError::Archive(e),
            PackageError::MissingPart(part) => RenderError::MissingPart(part),
            PackageError::InvalidUtf8(part) => RenderError::InvalidUtf8(part),
        }
    }
}
