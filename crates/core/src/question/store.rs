//! Question storage trait and types.

use std::collections::BTreeMap;

use thiserror::Error;

use super::{Question, QuestionCategory, SortOrder};

/// Error type for question bank operations.
#[derive(Debug, Error)]
pub enum QuestionError {
    /// Question text is empty after trimming.
    #[error("Question text cannot be empty")]
    EmptyText,

    /// No question with this id.
    #[error("Question not found: {0}")]
    NotFound(i64),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl From<rusqlite::Error> for QuestionError {
    fn from(err: rusqlite::Error) -> Self {
        QuestionError::Database(err.to_string())
    }
}

/// Trim a candidate question, rejecting empty text.
pub(crate) fn normalize_text(text: &str) -> Result<String, QuestionError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(QuestionError::EmptyText);
    }
    Ok(trimmed.to_string())
}

/// Trait for question storage backends.
pub trait QuestionStore: Send + Sync {
    /// Insert a single question.
    fn insert_one(&self, text: &str, category: QuestionCategory)
        -> Result<Question, QuestionError>;

    /// Insert several questions. Either all are inserted or none is.
    fn insert_many(
        &self,
        texts: &[String],
        category: QuestionCategory,
    ) -> Result<Vec<Question>, QuestionError>;

    /// Replace the text of existing questions, keyed by id.
    /// Returns the number of updated rows.
    fn update(&self, edits: &BTreeMap<i64, String>) -> Result<usize, QuestionError>;

    /// Permanently delete a question.
    fn delete(&self, id: i64) -> Result<(), QuestionError>;

    /// Get a question by id.
    fn get(&self, id: i64) -> Result<Option<Question>, QuestionError>;

    /// Read all questions of a category ordered by id.
    fn read_ordered(
        &self,
        category: QuestionCategory,
        order: SortOrder,
    ) -> Result<Vec<Question>, QuestionError>;

    /// Count the questions of a category.
    fn count(&self, category: QuestionCategory) -> Result<usize, QuestionError>;

    /// Read the question texts of a category ordered by id.
    fn read_texts(
        &self,
        category: QuestionCategory,
        order: SortOrder,
    ) -> Result<Vec<String>, QuestionError> {
        Ok(self
            .read_ordered(category, order)?
            .into_iter()
            .map(|q| q.text)
            .collect())
    }
}
