//! Trait definitions for the merge module.

use std::path::{Path, PathBuf};

use serde::Serialize;

use super::error::MergeError;

/// Outcome of a successful merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MergeSummary {
    /// Number of input documents.
    pub documents: usize,
    /// Number of page breaks inserted.
    pub page_breaks: usize,
}

impl MergeSummary {
    /// Page breaks a merge of `documents` inputs inserts.
    pub fn expected_page_breaks(documents: usize) -> usize {
        documents.saturating_sub(1)
    }
}

/// Concatenates documents in order into a single output document.
pub trait DocumentMerger: Send + Sync {
    /// Returns the name of this merger implementation.
    fn name(&self) -> &str;

    /// Merge `documents` in order and write the result to `output`.
    fn merge(&self, documents: &[PathBuf], output: &Path) -> Result<MergeSummary, MergeError>;
}
