//! Question bank types.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::selection::UnknownModeError;

/// Kind of question a ticket slot is filled with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionCategory {
    Practical,
    Theoretical,
}

impl QuestionCategory {
    /// Value stored in the `question_type` column.
    pub fn as_db_str(&self) -> &'static str {
        match self {
            QuestionCategory::Practical => "practice",
            QuestionCategory::Theoretical => "theory",
        }
    }

    /// Parse a `question_type` column value.
    pub fn from_db_str(value: &str) -> Option<Self> {
        match value {
            "practice" => Some(QuestionCategory::Practical),
            "theory" => Some(QuestionCategory::Theoretical),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionCategory::Practical => "practical",
            QuestionCategory::Theoretical => "theoretical",
        }
    }
}

impl fmt::Display for QuestionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionCategory {
    type Err = UnknownModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "practical" | "practice" => Ok(QuestionCategory::Practical),
            "theoretical" | "theory" => Ok(QuestionCategory::Theoretical),
            _ => Err(UnknownModeError::new("question category", s)),
        }
    }
}

/// Read order by question id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub(crate) fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

impl FromStr for SortOrder {
    type Err = UnknownModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(UnknownModeError::new("sort order", s)),
        }
    }
}

/// A stored question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Row id, assigned by the store on insert.
    pub id: i64,
    /// Trimmed, never empty.
    pub text: String,
    pub category: QuestionCategory,
    /// Insert time. `None` for rows written before the column existed.
    pub created_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_db_round_trip() {
        for category in [QuestionCategory::Practical, QuestionCategory::Theoretical] {
            assert_eq!(
                QuestionCategory::from_db_str(category.as_db_str()),
                Some(category)
            );
        }
        assert_eq!(QuestionCategory::from_db_str("essay"), None);
    }

    #[test]
    fn test_category_from_str_accepts_aliases() {
        assert_eq!(
            "Practical".parse::<QuestionCategory>().unwrap(),
            QuestionCategory::Practical
        );
        assert_eq!(
            "theory".parse::<QuestionCategory>().unwrap(),
            QuestionCategory::Theoretical
        );
        assert!("oral".parse::<QuestionCategory>().is_err());
    }

    #[test]
    fn test_sort_order_from_str() {
        assert_eq!("DESC".parse::<SortOrder>().unwrap(), SortOrder::Desc);
        assert_eq!("asc".parse::<SortOrder>().unwrap(), SortOrder::Asc);
        assert!("random".parse::<SortOrder>().is_err());
    }
}
