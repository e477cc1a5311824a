//! Testing utilities and mock implementations.
//!
//! Mocks stand in for the renderer and merger so generation runs can be
//! tested without real documents; the fixtures build small but valid `.docx`
//! packages for the tests that do need them.
//!
//! # Example
//!
//! ```rust,ignore
//! use doctemplater_core::testing::{MockMerger, MockRenderer};
//!
//! let renderer = Arc::new(MockRenderer::new());
//! let merger = Arc::new(MockMerger::new());
//! let generator = TicketGenerator::new(store, renderer.clone(), merger.clone(), "t.docx", config);
//! ```

mod mock_merger;
mod mock_renderer;

pub use mock_merger::{MockMerger, RecordedMerge};
pub use mock_renderer::{MockRenderer, RecordedRender};

/// Test fixtures and helper functions.
pub mod fixtures {
    use std::path::Path;

    use quick_xml::events::Event;
    use quick_xml::Reader;

    use crate::package::DocxPackage;

    const CONTENT_TYPES: &str = concat!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
        r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
        r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
        r#"<Default Extension="xml" ContentType="application/xml"/>"#,
        r#"<Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>"#,
        r#"</Types>"#
    );

    const PACKAGE_RELS: &str = concat!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
        r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>"#,
        r#"</Relationships>"#
    );

    const DOCUMENT_RELS: &str = concat!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
        r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        r#"</Relationships>"#
    );

    /// Paragraphs of the ticket template written by [`write_template_docx`].
    pub const TEMPLATE_PARAGRAPHS: [&str; 8] = [
        "Subject: {{ subject }}{{ qualify }}",
        "Specialty: {{ spec }}",
        "Committee chair: {{ cmk }}",
        "Tutor: {{ tutor }}",
        "Date: {{ day }} {{ month }} {{ year }}",
        "Ticket {{ ticket_number }}",
        "1) {{ question_one }}",
        "2) {{ question_two }}",
    ];

    /// A single-run paragraph.
    pub fn paragraph(text: &str) -> String {
        format!(
            r#"<w:p><w:r><w:t xml:space="preserve">{}</w:t></w:r></w:p>"#,
            quick_xml::escape::escape(text)
        )
    }

    /// A complete `word/document.xml` around `body`.
    pub fn document_xml(body: &str) -> String {
        format!(
            concat!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
                r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">"#,
                r#"<w:body>{}<w:sectPr><w:pgSz w:w="11906" w:h="16838"/></w:sectPr></w:body>"#,
                r#"</w:document>"#
            ),
            body
        )
    }

    /// A minimal `.docx` package with the given document XML.
    pub fn package_bytes(document_xml: &str) -> Vec<u8> {
        let mut package = DocxPackage::new();
        package.set_part("[Content_Types].xml", CONTENT_TYPES);
        package.set_part("_rels/.rels", PACKAGE_RELS);
        package.set_document_xml(document_xml);
        package.set_part("word/_rels/document.xml.rels", DOCUMENT_RELS);
        package.to_bytes().expect("fixture package serializes")
    }

    /// A `.docx` with one paragraph per entry.
    pub fn docx_bytes(paragraphs: &[&str]) -> Vec<u8> {
        let body: String = paragraphs.iter().map(|p| paragraph(p)).collect();
        package_bytes(&document_xml(&body))
    }

    pub fn write_docx(path: &Path, paragraphs: &[&str]) {
        write_bytes(path, docx_bytes(paragraphs));
    }

    /// Write a `.docx` whose body is raw WordprocessingML.
    pub fn write_docx_with_body(path: &Path, body: &str) {
        write_bytes(path, package_bytes(&document_xml(body)));
    }

    /// Write the standard ticket template.
    pub fn write_template_docx(path: &Path) {
        write_docx(path, &TEMPLATE_PARAGRAPHS);
    }

    fn write_bytes(path: &Path, bytes: Vec<u8>) {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create fixture directory");
        }
        std::fs::write(path, bytes).expect("write fixture docx");
    }

    /// Text of every body paragraph, empty paragraphs included.
    pub fn document_paragraphs(path: &Path) -> Vec<String> {
        let package = DocxPackage::open(path).expect("open docx");
        let xml = package.document_xml().expect("document part");

        let mut reader = Reader::from_str(xml);
        let mut paragraphs = Vec::new();
        let mut current: Option<String> = None;
        let mut in_text = false;

        loop {
            match reader.read_event().expect("well-formed document") {
                Event::Start(e) if e.name().as_ref() == b"w:p" => current = Some(String::new()),
                Event::Empty(e) if e.name().as_ref() == b"w:p" => paragraphs.push(String::new()),
                Event::End(e) if e.name().as_ref() == b"w:p" => paragraphs.extend(current.take()),
                Event::Start(e) if e.name().as_ref() == b"w:t" => in_text = true,
                Event::End(e) if e.name().as_ref() == b"w:t" => in_text = false,
                Event::Text(t) if in_text => {
                    if let Some(text) = current.as_mut() {
                        text.push_str(&t.unescape().expect("valid text"));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        paragraphs
    }

    /// Number of page breaks in the document body.
    pub fn count_page_breaks(path: &Path) -> usize {
        let package = DocxPackage::open(path).expect("open docx");
        package
            .document_xml()
            .expect("document part")
            .matches(r#"<w:br w:type="page"/>"#)
            .count()
    }

    /// Owned question texts.
    pub fn questions(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }
}
