//! Low-level `.docx` package access.
//!
//! A `.docx` file is a zip archive of XML parts. [`DocxPackage`] loads every
//! part into memory, lets callers read and replace parts by name, and writes
//! the archive back out with the original part order preserved.

use std::io::{Cursor, Read, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Main document part of a word-processing package.
pub const DOCUMENT_PART: &str = "word/document.xml";

/// Errors from reading or writing a package.
#[derive(Debug, Error)]
pub enum PackageError {
    /// Failed to read or write the package file.
    #[error("I/O error on {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The archive is corrupt or could not be written.
    #[error("Invalid docx archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// A required part is absent.
    #[error("Missing package part: {0}")]
    MissingPart(String),

    /// An XML part is not valid UTF-8.
    #[error("Package part is not valid UTF-8: {0}")]
    InvalidUtf8(String),
}

#[derive(Debug, Clone)]
struct Part {
    name: String,
    data: Vec<u8>,
}

/// An in-memory `.docx` package.
#[derive(Debug, Clone, Default)]
pub struct DocxPackage {
    parts: Vec<Part>,
}

impl DocxPackage {
    /// Create an empty package.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a package from disk.
    pub fn open(path: &Path) -> Result<Self, PackageError> {
        let bytes = std::fs::read(path).map_err(|source| PackageError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_bytes(bytes)
    }

    /// Load a package from raw archive bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, PackageError> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))?;
        let mut parts = Vec::with_capacity(archive.len());

        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            if file.is_dir() {
                continue;
            }
            let name = file.name().to_string();
            let mut data = Vec::with_capacity(file.size() as usize);
            file.read_to_end(&mut data)
                .map_err(|source| PackageError::Io {
                    path: PathBuf::from(&name),
                    source,
                })?;
            parts.push(Part { name, data });
        }

        Ok(Self { parts })
    }

    /// Names of all parts, in archive order.
    pub fn part_names(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().map(|p| p.name.as_str())
    }

    pub fn has_part(&self, name: &str) -> bool {
        self.parts.iter().any(|p| p.name == name)
    }

    /// Raw bytes of a part.
    pub fn part(&self, name: &str) -> Option<&[u8]> {
        self.parts
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.data.as_slice())
    }

    /// A part decoded as UTF-8 text.
    pub fn part_text(&self, name: &str) -> Result<&str, PackageError> {
        let data = self
            .part(name)
            .ok_or_else(|| PackageError::MissingPart(name.to_string()))?;
        std::str::from_utf8(data).map_err(|_| PackageError::InvalidUtf8(name.to_string()))
    }

    /// Replace a part, or append it if absent.
    pub fn set_part(&mut self, name: &str, data: impl Into<Vec<u8>>) {
        let data = data.into();
        match self.parts.iter_mut().find(|p| p.name == name) {
            Some(part) => part.data = data,
            None => self.parts.push(Part {
                name: name.to_string(),
                data,
            }),
        }
    }

    /// The main document XML.
    pub fn document_xml(&self) -> Result<&str, PackageError> {
        self.part_text(DOCUMENT_PART)
    }

    pub fn set_document_xml(&mut self, xml: impl Into<Vec<u8>>) {
        self.set_part(DOCUMENT_PART, xml);
    }

    /// Serialize the package into archive bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, PackageError> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

        for part in &self.parts {
            writer.start_file(part.name.as_str(), options)?;
            writer
                .write_all(&part.data)
                .map_err(|source| PackageError::Io {
                    path: PathBuf::from(&part.name),
                    source,
                })?;
        }

        Ok(writer.finish()?.into_inner())
    }

    /// Write the package to disk, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), PackageError> {
        let bytes = self.to_bytes()?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| PackageError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(path, bytes).map_err(|source| PackageError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}
