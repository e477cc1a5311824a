//! Document-level metadata and the base render context built from it.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::config::GenerationConfig;
use crate::render::{RenderContext, RichText, StyledRun, Underline};

/// Template placeholder names.
pub mod keys {
    pub const SUBJECT: &str = "subject";
    pub const SPECIALTY: &str = "spec";
    pub const COMMITTEE_CHAIR: &str = "cmk";
    pub const TUTOR: &str = "tutor";
    pub const DAY: &str = "day";
    pub const MONTH: &str = "month";
    pub const YEAR: &str = "year";
    pub const QUALIFY: &str = "qualify";
    pub const TICKET_NUMBER: &str = "ticket_number";
    pub const QUESTION_ONE: &str = "question_one";
    pub const QUESTION_TWO: &str = "question_two";

    /// Keys filled per ticket rather than once per document.
    pub const TICKET_KEYS: [&str; 3] = [TICKET_NUMBER, QUESTION_ONE, QUESTION_TWO];
}

const MONTHS_GENITIVE: [&str; 12] = [
    "января",
    "февраля",
    "марта",
    "апреля",
    "мая",
    "июня",
    "июля",
    "августа",
    "сентября",
    "октября",
    "ноября",
    "декабря",
];

/// Month name as used in a date line ("5 мая 2024").
pub fn month_genitive(month: u32) -> &'static str {
    match month {
        1..=12 => MONTHS_GENITIVE[month as usize - 1],
        _ => "",
    }
}

/// Metadata shared by every ticket of one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub subject: String,
    pub specialty: String,
    /// Chair of the subject committee.
    pub committee_chair: String,
    pub tutor: String,
    pub date: Option<NaiveDate>,
    /// Marks the tickets as qualifying-exam tickets.
    pub qualifying: bool,
}

impl DocumentMetadata {
    /// Build the document-level render context.
    ///
    /// Ticket keys are not included.
    pub fn to_context(&self, config: &GenerationConfig) -> RenderContext {
        let (day, month, year) = match self.date {
            Some(date) => (
                format!("{:02}", date.day()),
                month_genitive(date.month()),
                format!("{:04}", date.year()),
            ),
            None => ("__".to_string(), "", String::new()),
        };

        let qualify = if self.qualifying {
            config.qualifying_suffix.clone()
        } else {
            String::new()
        };

        RenderContext::new()
            .with(keys::SUBJECT, self.subject.as_str())
            .with(keys::SPECIALTY, self.specialty.as_str())
            .with(keys::COMMITTEE_CHAIR, self.committee_chair.as_str())
            .with(keys::TUTOR, self.tutor.as_str())
            .with(
                keys::DAY,
                RichText::from(StyledRun::plain(day).underline(Underline::Single)),
            )
            .with(keys::MONTH, centered_month(month, config.month_field_width))
            .with(keys::YEAR, year)
            .with(keys::QUALIFY, qualify)
    }
}

/// The month name, bold with a thick underline, padded with spaces to `width`
/// characters. Odd padding puts the extra space on the right.
pub fn centered_month(month: &str, width: usize) -> RichText {
    let padding = width.saturating_sub(month.chars().count());
    let left = padding / 2;
    let right = padding - left;

    RichText::new()
        .push(StyledRun::plain(" ".repeat(left)))
        .push(
            StyledRun::plain(month)
                .bold()
                .underline(Underline::Thick),
        )
        .push(StyledRun::plain(" ".repeat(right)))
}
