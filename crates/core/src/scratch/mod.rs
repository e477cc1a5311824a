//! Run-scoped temporary artifacts.
//!
//! Every intermediate `.docx` a run writes (the metadata-filled template and
//! one document per ticket) is allocated from a [`ScratchSpace`]. Names carry
//! a per-run id, so concurrent runs sharing one directory never collide.
//! Cleanup removes whatever was allocated, keeps going past individual
//! failures, and runs again on drop.
//!
//! The final document is staged next to its destination and renamed over it
//! only once complete, so a failed run never leaves a truncated output.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, error};
use uuid::Uuid;

/// Result of removing a run's artifacts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleanupReport {
    /// Artifacts that existed and were removed.
    pub removed: usize,
    /// Artifacts that could not be removed, with the reason.
    pub failed: Vec<CleanupFailure>,
}

impl CleanupReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// An artifact that survived cleanup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CleanupFailure {
    pub path: PathBuf,
    pub reason: String,
}

/// Temporary artifact tracker for one run.
#[derive(Debug)]
pub struct ScratchSpace {
    root: PathBuf,
    run_id: String,
    artifacts: Vec<PathBuf>,
}

impl ScratchSpace {
    /// Prepare a scratch space under `root`, creating the directory if needed.
    pub fn create(root: &Path) -> std::io::Result<Self> {
        std::fs::create_dir_all(root)?;
        let run_id = Uuid::new_v4().simple().to_string();
        debug!(root = %root.display(), run_id, "Created scratch space");
        Ok(Self {
            root: root.to_path_buf(),
            run_id,
            artifacts: Vec::new(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Reserve a run-unique artifact path and record it for cleanup.
    ///
    /// Nothing is created on disk; the caller writes the file.
    pub fn allocate(&mut self, label: &str) -> PathBuf {
        let path = self
            .root
            .join(format!("tmp_{}_{}.docx", self.run_id, label));
        self.artifacts.push(path.clone());
        path
    }

    /// Reserve a staging path in the directory of `target`.
    ///
    /// The directory is created if needed. The staged file is removed on
    /// cleanup unless [`ScratchSpace::persist`] moved it into place first.
    pub fn stage(&mut self, target: &Path) -> std::io::Result<PathBuf> {
        let parent = target
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(parent)?;

        let name = target
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "output.docx".to_string());
        let path = parent.join(format!("tmp_{}_{}", self.run_id, name));
        self.artifacts.push(path.clone());
        Ok(path)
    }

    /// Rename a staged file over `target` and stop tracking it.
    pub fn persist(&mut self, staged: &Path, target: &Path) -> std::io::Result<()> {
        std::fs::rename(staged, target)?;
        self.artifacts.retain(|p| p != staged);
        debug!(staged = %staged.display(), target = %target.display(), "Persisted output");
        Ok(())
    }

    /// Paths allocated so far, in allocation order.
    pub fn artifacts(&self) -> &[PathBuf] {
        &self.artifacts
    }

    /// Remove every allocated artifact that exists.
    ///
    /// Failures are logged and reported, never returned as errors. Removed
    /// and missing artifacts are forgotten, so a second call only retries
    /// the failures.
    pub fn cleanup(&mut self) -> CleanupReport {
        let mut report = CleanupReport::default();
        let mut remaining = Vec::new();

        for path in self.artifacts.drain(..) {
            if !path.exists() {
                continue;
            }
            match std::fs::remove_file(&path) {
                Ok(()) => {
                    debug!(path = %path.display(), "Removed scratch artifact");
                    report.removed += 1;
                }
                Err(e) => {
                    error!(path = %path.display(), error = %e, "Failed to remove scratch artifact");
                    report.failed.push(CleanupFailure {
                        path: path.clone(),
                        reason: e.to_string(),
                    });
                    remaining.push(path);
                }
            }
        }

        self.artifacts = remaining;
        report
    }
}

impl Drop for ScratchSpace {
    fn drop(&mut self) {
        if !self.artifacts.is_empty() {
            self.cleanup();
        }
    }
}
