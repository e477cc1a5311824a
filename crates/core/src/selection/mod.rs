//! Question selection policies.
//!
//! Given the ordered question snapshot of one category and a ticket index,
//! a [`SelectionMode`] decides which question text lands on that ticket.
//! Random draws are independent and with replacement: the same question may
//! appear on several tickets of one run.

use std::fmt;
use std::str::FromStr;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// A mode name that does not match any known mode.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown {kind}: {value}")]
pub struct UnknownModeError {
    /// What was being parsed (e.g. "selection mode").
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

impl UnknownModeError {
    pub fn new(kind: &'static str, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

/// How a question is picked for a given ticket index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
    /// The question at the ticket index, or nothing past the end of the pool.
    #[default]
    Sequential,
    /// A random question for every ticket.
    AlwaysRandom,
    /// The question at the ticket index, or a random one past the end of the pool.
    FallbackRandom,
}

impl SelectionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SelectionMode::Sequential => "sequential",
            SelectionMode::AlwaysRandom => "always_random",
            SelectionMode::FallbackRandom => "fallback_random",
        }
    }
}

impl fmt::Display for SelectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SelectionMode {
    type Err = UnknownModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "sequential" | "none" => Ok(SelectionMode::Sequential),
            "always_random" | "always" => Ok(SelectionMode::AlwaysRandom),
            "fallback_random" | "fallback" => Ok(SelectionMode::FallbackRandom),
            _ => Err(UnknownModeError::new("selection mode", s)),
        }
    }
}

/// Pick the question text for ticket `index`.
///
/// Returns an empty string when the mode yields nothing (empty pool, or an
/// out-of-range index under [`SelectionMode::Sequential`]).
pub fn select<R: Rng + ?Sized>(
    questions: &[String],
    mode: SelectionMode,
    index: usize,
    rng: &mut R,
) -> String {
    let picked = match mode {
        SelectionMode::Sequential => questions.get(index),
        SelectionMode::AlwaysRandom => questions.choose(rng),
        SelectionMode::FallbackRandom => questions.get(index).or_else(|| questions.choose(rng)),
    };
    picked.cloned().unwrap_or_default()
}

/// Like [`select`], but with the mode given by name.
///
/// An unrecognized name yields an empty string rather than an error.
pub fn select_by_name<R: Rng + ?Sized>(
    questions: &[String],
    mode: &str,
    index: usize,
    rng: &mut R,
) -> String {
    match mode.parse::<SelectionMode>() {
        Ok(mode) => select(questions, mode, index, rng),
        Err(e) => {
            warn!(mode, index, "{}, leaving question empty", e);
            String::new()
        }
    }
}
