//! Merging rendered tickets into one document.
//!
//! The first document is the base: its styles, relationships, and section
//! properties are kept. Body content of every other document is appended
//! after it, with a page break between consecutive documents.

mod docx;
mod error;
mod traits;

pub use docx::{DocxMerger, PAGE_BREAK};
pub use error::MergeError;
pub use traits::{DocumentMerger, MergeSummary};
