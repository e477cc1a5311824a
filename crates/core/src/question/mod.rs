//! Question bank: the stored practical and theoretical questions that
//! tickets are assembled from.

pub mod import;
mod sqlite_store;
mod store;
mod types;

pub use import::{
    clean_question_line, extract_docx_questions, import_file, parse_plain_text, ImportError,
};
pub use sqlite_store::SqliteQuestionStore;
pub use store::{QuestionError, QuestionStore};
pub use types::{Question, QuestionCategory, SortOrder};
