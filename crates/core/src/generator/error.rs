//! Error types for the generator module.

use std::path::PathBuf;

use thiserror::Error;

use crate::merge::MergeError;
use crate::planner::PlanError;
use crate::question::QuestionError;
use crate::render::RenderError;

/// Errors that can abort a generation run.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Reading the question snapshot failed.
    #[error("Failed to read questions: {0}")]
    Store(#[from] QuestionError),

    /// The ticket count could not be resolved.
    #[error(transparent)]
    Plan(#[from] PlanError),

    /// The scratch directory could not be prepared.
    #[error("Failed to prepare scratch directory")]
    Scratch(#[source] std::io::Error),

    /// Filling the template with document metadata failed.
    #[error("Failed to render document template")]
    Template(#[source] RenderError),

    /// Rendering one ticket failed.
    ///
    /// `ticket_number` is 1-based, as printed on the ticket. Use
    /// [`GenerationError::ticket_index`] for the 0-based plan index.
    #[error("Failed to render ticket {ticket_number}")]
    Render {
        ticket_number: usize,
        #[source]
        source: RenderError,
    },

    /// Merging the rendered tickets failed.
    #[error("Failed to merge tickets")]
    Merge(#[from] MergeError),

    /// The finished document could not be moved into place.
    #[error("Failed to write output {}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl GenerationError {
    /// True for failures detected before any file was written.
    pub fn is_planning(&self) -> bool {
        matches!(
            self,
            GenerationError::Plan(_) | GenerationError::Store(_)
        )
    }

    /// Ticket number the failure relates to, if any.
    pub fn ticket_number(&self) -> Option<usize> {
        match self {
            GenerationError::Render { ticket_number, .. } => Some(*ticket_number),
            _ => None,
        }
    }

    /// 0-based plan index of the failing ticket, if any.
    pub fn ticket_index(&self) -> Option<usize> {
        self.ticket_number().map(|number| number - 1)
    }
}
