//! Ticket-count resolution.
//!
//! Decides how many tickets a run produces before any document is touched,
//! so a misconfigured run fails without leaving files behind.

use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::question::QuestionCategory;
use crate::selection::UnknownModeError;

/// Upper bound on a manually requested ticket count.
pub const MAX_TICKET_COUNT: i64 = 10_000;

/// How the number of tickets for a run is determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketCountMode {
    /// Explicit count supplied with the request.
    #[default]
    Manual,
    /// One ticket per practical question.
    DeriveFromPractical,
    /// One ticket per theoretical question.
    DeriveFromTheoretical,
}

impl TicketCountMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketCountMode::Manual => "manual",
            TicketCountMode::DeriveFromPractical => "derive_from_practical",
            TicketCountMode::DeriveFromTheoretical => "derive_from_theoretical",
        }
    }
}

impl fmt::Display for TicketCountMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TicketCountMode {
    type Err = UnknownModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "manual" => Ok(TicketCountMode::Manual),
            "practical" | "derive_from_practical" => Ok(TicketCountMode::DeriveFromPractical),
            "theoretical" | "derive_from_theoretical" => {
                Ok(TicketCountMode::DeriveFromTheoretical)
            }
            _ => Err(UnknownModeError::new("ticket count mode", s)),
        }
    }
}

/// Errors from ticket-count resolution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    /// Manual mode without a count in `1..=MAX_TICKET_COUNT`.
    #[error(
        "Invalid ticket count: {}, expected 1 to {}",
        describe_count(.0),
        MAX_TICKET_COUNT
    )]
    InvalidCount(Option<i64>),

    /// Derived mode with no questions in the source category.
    #[error("No {0} questions to derive the ticket count from")]
    NoQuestions(QuestionCategory),
}

fn describe_count(count: &Option<i64>) -> String {
    match count {
        Some(count) => count.to_string(),
        None => "none given".to_string(),
    }
}

/// The ticket indices of one run, ascending and 0-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketPlan {
    range: Range<usize>,
}

impl TicketPlan {
    fn with_count(count: usize) -> Self {
        Self { range: 0..count }
    }

    pub fn len(&self) -> usize {
        self.range.len()
    }

    /// Never true for a plan returned by [`plan`].
    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }

    /// Single-ticket runs render straight to the output and skip merging.
    pub fn is_single(&self) -> bool {
        self.len() == 1
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> {
        self.range.clone()
    }

    pub fn indices(&self) -> Vec<usize> {
        self.iter().collect()
    }
}

/// Resolve the ticket indices for a run.
pub fn plan(
    mode: TicketCountMode,
    manual_count: Option<i64>,
    practical_available: usize,
    theoretical_available: usize,
) -> Result<TicketPlan, PlanError> {
    match mode {
        TicketCountMode::Manual => match manual_count {
            Some(count) if (1..=MAX_TICKET_COUNT).contains(&count) => {
                Ok(TicketPlan::with_count(count as usize))
            }
            other => Err(PlanError::InvalidCount(other)),
        },
        TicketCountMode::DeriveFromPractical => {
            if practical_available == 0 {
                return Err(PlanError::NoQuestions(QuestionCategory::Practical));
            }
            Ok(TicketPlan::with_count(practical_available))
        }
        TicketCountMode::DeriveFromTheoretical => {
            if theoretical_available == 0 {
                return Err(PlanError::NoQuestions(QuestionCategory::Theoretical));
            }
            Ok(TicketPlan::with_count(theoretical_available))
        }
    }
}
