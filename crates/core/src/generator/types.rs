//! Request and report types for generation runs.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::metadata::DocumentMetadata;
use crate::config::GenerationConfig;
use crate::merge::MergeSummary;
use crate::planner::TicketCountMode;
use crate::question::{QuestionCategory, QuestionError, QuestionStore, SortOrder};
use crate::scratch::CleanupReport;
use crate::selection::SelectionMode;

/// Everything needed to produce one output document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Where the final document is written.
    pub output: PathBuf,
    pub metadata: DocumentMetadata,
    pub ticket_count_mode: TicketCountMode,
    /// Only used with [`TicketCountMode::Manual`].
    pub manual_count: Option<i64>,
    pub practical_mode: SelectionMode,
    pub theoretical_mode: SelectionMode,
}

impl GenerationRequest {
    /// A request using the configured default modes.
    pub fn new(
        output: impl Into<PathBuf>,
        metadata: DocumentMetadata,
        config: &GenerationConfig,
    ) -> Self {
        Self {
            output: output.into(),
            metadata,
            ticket_count_mode: config.ticket_count_mode,
            manual_count: None,
            practical_mode: config.practical_mode,
            theoretical_mode: config.theoretical_mode,
        }
    }

    /// Manual ticket count.
    pub fn with_count(mut self, count: i64) -> Self {
        self.ticket_count_mode = TicketCountMode::Manual;
        self.manual_count = Some(count);
        self
    }

    pub fn with_count_mode(mut self, mode: TicketCountMode) -> Self {
        self.ticket_count_mode = mode;
        self
    }

    pub fn with_modes(mut self, practical: SelectionMode, theoretical: SelectionMode) -> Self {
        self.practical_mode = practical;
        self.theoretical_mode = theoretical;
        self
    }
}

/// The question texts a run works from, read once at its start.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionSnapshot {
    pub practical: Vec<String>,
    pub theoretical: Vec<String>,
}

impl QuestionSnapshot {
    pub fn take(store: &dyn QuestionStore, order: SortOrder) -> Result<Self, QuestionError> {
        Ok(Self {
            practical: store.read_texts(QuestionCategory::Practical, order)?,
            theoretical: store.read_texts(QuestionCategory::Theoretical, order)?,
        })
    }
}

/// One rendered ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TicketSummary {
    /// 0-based position in the run.
    pub index: usize,
    /// 1-based number printed on the ticket.
    pub number: usize,
    pub practical_question: String,
    pub theoretical_question: String,
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationReport {
    pub output: PathBuf,
    /// Scratch run id, also carried by every temporary file name.
    pub run_id: String,
    pub tickets: Vec<TicketSummary>,
    /// Absent for single-ticket runs.
    pub merged: Option<MergeSummary>,
    pub cleanup: CleanupReport,
}
