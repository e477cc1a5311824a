//! `.docx` merger.

use std::path::{Path, PathBuf};

use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::{debug, info};

use super::error::MergeError;
use super::traits::{DocumentMerger, MergeSummary};
use crate::package::DocxPackage;

/// A paragraph holding nothing but a page break.
pub const PAGE_BREAK: &str = r#"<w:p><w:r><w:br w:type="page"/></w:r></w:p>"#;

const BODY: &[u8] = b"w:body";
const SECTION_PROPERTIES: &[u8] = b"w:sectPr";

/// Byte range of the body content of `word/document.xml`, excluding the
/// trailing section properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BodyRange {
    start: usize,
    end: usize,
}

fn locate_body(xml: &str) -> Result<BodyRange, String> {
    let mut reader = Reader::from_str(xml);
    // depth below <w:body>, once inside it
    let mut depth: Option<usize> = None;
    let mut start = 0;
    let mut section_start = None;

    loop {
        let before = reader.buffer_position() as usize;
        match reader.read_event() {
            Ok(Event::Start(e)) => match depth {
                None if e.name().as_ref() == BODY => {
                    depth = Some(0);
                    start = reader.buffer_position() as usize;
                }
                Some(d) => {
                    if d == 0 && e.name().as_ref() == SECTION_PROPERTIES {
                        section_start = Some(before);
                    }
                    depth = Some(d + 1);
                }
                None => {}
            },
            Ok(Event::Empty(e)) => {
                if depth == Some(0) && e.name().as_ref() == SECTION_PROPERTIES {
                    section_start = Some(before);
                }
            }
            Ok(Event::End(_)) => match depth {
                Some(0) => {
                    return Ok(BodyRange {
                        start,
                        end: section_start.unwrap_or(before),
                    })
                }
                Some(d) => depth = Some(d - 1),
                None => {}
            },
            Ok(Event::Eof) => return Err("document has no body".to_string()),
            Err(e) => return Err(e.to_string()),
            _ => {}
        }
    }
}

/// Merges `.docx` documents produced from the same template.
#[derive(Debug, Clone, Default)]
pub struct DocxMerger;

impl DocxMerger {
    pub fn new() -> Self {
        Self
    }

    fn open(path: &Path) -> Result<(DocxPackage, String, BodyRange), MergeError> {
        let package = DocxPackage::open(path).map_err(|e| MergeError::from_package(path, e))?;
        let xml = package
            .document_xml()
            .map_err(|e| MergeError::from_package(path, e))?
            .to_string();
        let body = locate_body(&xml).map_err(|reason| MergeError::malformed(path, reason))?;
        Ok((package, xml, body))
    }
}

impl DocumentMerger for DocxMerger {
    fn name(&self) -> &str {
        "docx"
    }

    fn merge(&self, documents: &[PathBuf], output: &Path) -> Result<MergeSummary, MergeError> {
        let (base_path, rest) = documents.split_first().ok_or(MergeError::NoDocuments)?;
        let (mut base, base_xml, base_body) = Self::open(base_path)?;

        let mut appended = String::new();
        let mut page_breaks = 0;
        if !rest.is_empty() {
            appended.push_str(PAGE_BREAK);
            page_breaks += 1;
        }

        for (i, path) in rest.iter().enumerate() {
            let (_, xml, body) = Self::open(path)?;
            appended.push_str(&xml[body.start..body.end]);
            if i + 1 < rest.len() {
                appended.push_str(PAGE_BREAK);
                page_breaks += 1;
            }
            debug!(document = %path.display(), "Appended document body");
        }

        let mut merged = String::with_capacity(base_xml.len() + appended.len());
        merged.push_str(&base_xml[..base_body.end]);
        merged.push_str(&appended);
        merged.push_str(&base_xml[base_body.end..]);
        base.set_document_xml(merged);
        base.save(output)
            .map_err(|e| MergeError::from_package(output, e))?;

        info!(
            documents = documents.len(),
            page_breaks,
            output = %output.display(),
            "Merged documents"
        );

        Ok(MergeSummary {
            documents: documents.len(),
            page_breaks,
        })
    }
}
