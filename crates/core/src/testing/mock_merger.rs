//! Mock document merger for testing.

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use crate::merge::{DocumentMerger, MergeError, MergeSummary};

/// A recorded merge for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedMerge {
    /// Input paths in merge order.
    pub documents: Vec<PathBuf>,
    /// Contents of each input at merge time.
    pub contents: Vec<String>,
    pub output: PathBuf,
    pub success: bool,
}

/// Mock implementation of the DocumentMerger trait.
///
/// Concatenates the inputs as text, separated by a form feed for every page
/// break a real merge would insert.
#[derive(Debug, Default)]
pub struct MockMerger {
    merges: Arc<RwLock<Vec<RecordedMerge>>>,
    /// If set, the next merge writes a partial output and then fails.
    next_error: Arc<RwLock<Option<String>>>,
}

impl MockMerger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next merge fail after it has started writing the output.
    pub fn set_next_error(&self, reason: impl Into<String>) {
        *self.next_error.write().unwrap() = Some(reason.into());
    }

    pub fn clear_next_error(&self) {
        *self.next_error.write().unwrap() = None;
    }

    pub fn recorded_merges(&self) -> Vec<RecordedMerge> {
        self.merges.read().unwrap().clone()
    }

    pub fn merge_count(&self) -> usize {
        self.merges.read().unwrap().len()
    }

    fn run(&self, documents: &[PathBuf], output: &Path) -> Result<(Vec<String>, MergeSummary), MergeError> {
        if documents.is_empty() {
            return Err(MergeError::NoDocuments);
        }

        let contents = documents
            .iter()
            .map(|path| {
                std::fs::read_to_string(path).map_err(|source| MergeError::Io {
                    path: path.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let io_error = |source| MergeError::Io {
            path: output.to_path_buf(),
            source,
        };
        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }

        if let Some(reason) = self.next_error.write().unwrap().take() {
            std::fs::write(output, &contents[0]).map_err(io_error)?;
            return Err(MergeError::MalformedDocument {
                path: output.to_path_buf(),
                reason,
            });
        }

        std::fs::write(output, contents.join("\u{c}")).map_err(io_error)?;
        let summary = MergeSummary {
            documents: documents.len(),
            page_breaks: MergeSummary::expected_page_breaks(documents.len()),
        };
        Ok((contents, summary))
    }
}

impl DocumentMerger for MockMerger {
    fn name(&self) -> &str {
        "mock"
    }

    fn merge(&self, documents: &[PathBuf], output: &Path) -> Result<MergeSummary, MergeError> {
        let result = self.run(documents, output);

        let contents = match &result {
            Ok((contents, _)) => contents.clone(),
            Err(_) => documents
                .iter()
                .map(|p| std::fs::read_to_string(p).unwrap_or_default())
                .collect(),
        };
        self.merges.write().unwrap().push(RecordedMerge {
            documents: documents.to_vec(),
            contents,
            output: output.to_path_buf(),
            success: result.is_ok(),
        });

        result.map(|(_, summary)| summary)
    }
}
