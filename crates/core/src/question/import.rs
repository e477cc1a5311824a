//! Bulk question import from plain-text and `.docx` sources.
//!
//! Plain text: every non-blank line is a question; a leading ordinal such as
//! `1.`, `2)` or `3.)` is stripped.
//!
//! Docx: every fragment numbered `N)` is a question; the `N)` prefix is
//! stripped. Unnumbered paragraphs (titles, instructions) are ignored.

use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex_lite::Regex;
use thiserror::Error;

/// Leading ordinal of a plain-text line: `1.`, `1)`, `1.)`.
static ORDINAL_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*\d+[.)]{1,2}\s*").expect("valid ordinal regex"));

/// A bracket-numbered fragment in docx text, up to the end of its line.
static BRACKET_NUMBERED_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*\d+\).*").expect("valid numbered line regex"));

static BRACKET_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*\d+\)").expect("valid bracket prefix regex"));

/// Errors that can occur while importing questions.
#[derive(Debug, Error)]
pub enum ImportError {
    /// File extension is neither `.txt` nor `.docx`.
    #[error("Unsupported file format: {path} (expected .docx or .txt)")]
    UnsupportedFormat { path: PathBuf },

    /// Failed to read the source file.
    #[error("Failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The docx package could not be parsed.
    #[error("Failed to parse docx: {0}")]
    Docx(String),

    /// The source contained no questions.
    #[error("No questions found in {path}")]
    NoQuestions { path: PathBuf },
}

/// Strip a leading ordinal from a line and trim it.
pub fn clean_question_line(line: &str) -> String {
    ORDINAL_PREFIX.replace(line.trim(), "").trim().to_string()
}

/// Split plain text into questions, one per non-blank line.
pub fn parse_plain_text(text: &str) -> Vec<String> {
    text.lines()
        .map(clean_question_line)
        .filter(|q| !q.is_empty())
        .collect()
}

/// Extract `N)`-numbered questions from a `.docx` document.
pub fn extract_docx_questions(bytes: &[u8]) -> Result<Vec<String>, ImportError> {
    let docx = docx_rs::read_docx(bytes).map_err(|e| ImportError::Docx(e.to_string()))?;

    let mut text = String::new();
    for child in &docx.document.children {
        match child {
            docx_rs::DocumentChild::Paragraph(para) => {
                text.push_str(&paragraph_text(para));
                text.push('\n');
            }
            docx_rs::DocumentChild::Table(table) => {
                for row in &table.rows {
                    if let docx_rs::TableChild::TableRow(row) = row {
                        for cell in &row.cells {
                            if let docx_rs::TableRowChild::TableCell(cell) = cell {
                                for content in &cell.children {
                                    if let docx_rs::TableCellContent::Paragraph(para) = content {
                                        text.push_str(&paragraph_text(para));
                                        text.push('\n');
                                    }
                                }
                            }
                        }
                    }
                }
            }
            _ => {}
        }
    }

    let text = text.replace('\t', "");
    Ok(BRACKET_NUMBERED_LINE
        .find_iter(&text)
        .map(|m| BRACKET_PREFIX.replace(m.as_str().trim(), "").trim().to_string())
        .filter(|q| !q.is_empty())
        .collect())
}

fn paragraph_text(para: &docx_rs::Paragraph) -> String {
    let mut line = String::new();
    for child in &para.children {
        match child {
            docx_rs::ParagraphChild::Run(run) => run_text(run, &mut line),
            docx_rs::ParagraphChild::Hyperlink(hyperlink) => {
                for child in &hyperlink.children {
                    if let docx_rs::ParagraphChild::Run(run) = child {
                        run_text(run, &mut line);
                    }
                }
            }
            docx_rs::ParagraphChild::Insert(ins) => {
                for child in &ins.children {
                    if let docx_rs::InsertChild::Run(run) = child {
                        run_text(run, &mut line);
                    }
                }
            }
            _ => {}
        }
    }
    line
}

fn run_text(run: &docx_rs::Run, out: &mut String) {
    for child in &run.children {
        match child {
            docx_rs::RunChild::Text(t) => out.push_str(&t.text),
            docx_rs::RunChild::Break(_) => out.push('\n'),
            _ => {}
        }
    }
}

/// Import questions from a `.txt` or `.docx` file.
pub fn import_file(path: &Path) -> Result<Vec<String>, ImportError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    let read = |path: &Path| {
        std::fs::read(path).map_err(|source| ImportError::Io {
            path: path.to_path_buf(),
            source,
        })
    };

    let questions = match extension.as_deref() {
        Some("docx") => extract_docx_questions(&read(path)?)?,
        Some("txt") => parse_plain_text(&String::from_utf8_lossy(&read(path)?)),
        _ => {
            return Err(ImportError::UnsupportedFormat {
                path: path.to_path_buf(),
            })
        }
    };

    if questions.is_empty() {
        return Err(ImportError::NoQuestions {
            path: path.to_path_buf(),
        });
    }

    Ok(questions)
}
