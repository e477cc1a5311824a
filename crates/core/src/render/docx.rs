//! `.docx` renderer.
//!
//! Placeholders have the form `{{ key }}`. Word processors often split such
//! text over several runs (spell-check marks, revision ids), so each templated
//! part is first rewritten to put every placeholder back into a single text
//! node, and only then substituted.

use std::path::Path;

use once_cell::sync::Lazy;
use regex_lite::{Captures, Regex};
use tracing::debug;

use super::context::{RenderContext, RenderValue, RichText, StyledRun};
use super::error::RenderError;
use super::traits::Renderer;
use crate::package::{DocxPackage, DOCUMENT_PART};

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").expect("valid placeholder regex")
});

const LINE_BREAK: &str = "</w:t><w:br/><w:t xml:space=\"preserve\">";

/// Renders `{{ key }}` placeholders in the body, headers and footers of a
/// `.docx` template.
#[derive(Debug, Clone, Default)]
pub struct DocxRenderer;

impl DocxRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Render a single XML part.
    pub fn render_xml(xml: &str, context: &RenderContext) -> String {
        let xml = preserve_text_whitespace(xml);
        let xml = collapse_split_placeholders(&xml);
        PLACEHOLDER
            .replace_all(&xml, |caps: &Captures<'_>| match context.get(&caps[1]) {
                Some(RenderValue::Text(text)) => text_xml(text),
                Some(RenderValue::Rich(rich)) => rich_xml(rich),
                None => caps[0].to_string(),
            })
            .into_owned()
    }
}

impl Renderer for DocxRenderer {
    fn name(&self) -> &str {
        "docx"
    }

    fn render(
        &self,
        template: &Path,
        context: &RenderContext,
        target: &Path,
    ) -> Result<(), RenderError> {
        if !template.exists() {
            return Err(RenderError::TemplateNotFound {
                path: template.to_path_buf(),
            });
        }

        let mut package = DocxPackage::open(template)?;
        if !package.has_part(DOCUMENT_PART) {
            return Err(RenderError::MissingPart(DOCUMENT_PART.to_string()));
        }

        let parts: Vec<String> = package
            .part_names()
            .filter(|name| is_templated_part(name))
            .map(String::from)
            .collect();

        for part in &parts {
            let rendered = Self::render_xml(package.part_text(part)?, context);
            package.set_part(part, rendered);
        }

        package.save(target)?;
        debug!(
            template = %template.display(),
            target = %target.display(),
            parts = parts.len(),
            "Rendered template"
        );
        Ok(())
    }
}

fn is_templated_part(name: &str) -> bool {
    if name == DOCUMENT_PART {
        return true;
    }
    let Some(file) = name.strip_prefix("word/") else {
        return false;
    };
    !file.contains('/')
        && file.ends_with(".xml")
        && (file.starts_with("header") || file.starts_with("footer"))
}

/// Substituted values may start or end with spaces, which Word drops unless
/// the text node asks to keep them.
fn preserve_text_whitespace(xml: &str) -> String {
    xml.replace("<w:t>", "<w:t xml:space=\"preserve\">")
}

/// Move every placeholder whose characters are spread over several text nodes
/// into the first of those nodes, keeping all markup in between.
fn collapse_split_placeholders(xml: &str) -> String {
    // character data of the part, with the xml byte offset of each text byte
    let mut text = String::with_capacity(xml.len() / 4);
    let mut offsets = Vec::with_capacity(xml.len() / 4);
    let mut in_tag = false;

    for (i, c) in xml.char_indices() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => {
                offsets.extend(i..i + c.len_utf8());
                text.push(c);
            }
            _ => {}
        }
    }

    let mut out = String::with_capacity(xml.len());
    let mut cursor = 0;
    for m in PLACEHOLDER.find_iter(&text) {
        let start = offsets[m.start()];
        let end = offsets[m.end() - 1] + 1;
        let span = &xml[start..end];
        if !span.contains('<') {
            continue;
        }
        out.push_str(&xml[cursor..start]);
        out.push_str(m.as_str());
        out.push_str(&markup_only(span));
        cursor = end;
    }
    out.push_str(&xml[cursor..]);
    out
}

fn markup_only(span: &str) -> String {
    let mut out = String::with_capacity(span.len());
    let mut in_tag = false;
    for c in span.chars() {
        match c {
            '<' => {
                in_tag = true;
                out.push(c);
            }
            '>' if in_tag => {
                in_tag = false;
                out.push(c);
            }
            _ if in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

fn escape_text(text: &str) -> String {
    text.replace('\r', "")
        .split('\n')
        .map(|line| quick_xml::escape::escape(line).into_owned())
        .collect::<Vec<_>>()
        .join(LINE_BREAK)
}

fn text_xml(text: &str) -> String {
    escape_text(text)
}

/// Close the enclosing run, emit one run per styled piece, then reopen a
/// plain run for whatever followed the placeholder.
fn rich_xml(rich: &RichText) -> String {
    let mut out = String::from("</w:t></w:r>");
    for run in &rich.runs {
        out.push_str("<w:r>");
        out.push_str(&run_properties(run));
        out.push_str("<w:t xml:space=\"preserve\">");
        out.push_str(&escape_text(&run.text));
        out.push_str("</w:t></w:r>");
    }
    out.push_str("<w:r><w:t xml:space=\"preserve\">");
    out
}

fn run_properties(run: &StyledRun) -> String {
    if !run.is_formatted() {
        return String::new();
    }
    let mut props = String::from("<w:rPr>");
    if run.bold {
        props.push_str("<w:b/>");
    }
    if let Some(underline) = run.underline {
        props.push_str(&format!("<w:u w:val=\"{}\"/>", underline.as_ooxml()));
    }
    props.push_str("</w:rPr>");
    props
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Underline;
    use crate::testing::fixtures;
    use tempfile::TempDir;

    fn context() -> RenderContext {
        RenderContext::new()
            .with("subject", "Physics & Maths")
            .with("ticket_number", "2")
    }

    #[test]
    fn test_render_xml_substitutes_and_escapes() {
        let xml = r#"<w:p><w:r><w:t>Subject: {{ subject }}</w:t></w:r></w:p>"#;
        let rendered = DocxRenderer::render_xml(xml, &context());
        assert_eq!(
            rendered,
            r#"<w:p><w:r><w:t xml:space="preserve">Subject: Physics &amp; Maths</w:t></w:r></w:p>"#
        );
    }

    #[test]
    fn test_render_xml_leaves_unknown_placeholders() {
        let xml = r#"<w:t>{{question_one}} / {{ticket_number}}</w:t>"#;
        let rendered = DocxRenderer::render_xml(xml, &context());
        assert!(rendered.contains("{{question_one}} / 2"));
    }

    #[test]
    fn test_render_xml_collapses_split_placeholder() {
        let xml = concat!(
            r#"<w:p><w:r><w:t>{{</w:t></w:r>"#,
            r#"<w:proofErr w:type="spellStart"/>"#,
            r#"<w:r><w:rPr><w:i/></w:rPr><w:t>subj</w:t></w:r>"#,
            r#"<w:r><w:t>ect }}!</w:t></w:r></w:p>"#,
        );
        let rendered = DocxRenderer::render_xml(xml, &context());

        assert!(rendered.contains("Physics &amp; Maths"));
        assert!(!rendered.contains("{{"));
        assert!(rendered.contains(r#"<w:proofErr w:type="spellStart"/>"#));
        assert!(rendered.ends_with(r#"<w:t xml:space="preserve">!</w:t></w:r></w:p>"#));
    }

    #[test]
    fn test_render_xml_newlines_become_breaks() {
        let ctx = RenderContext::new().with("question_one", "Line one\nLine two");
        let rendered = DocxRenderer::render_xml("<w:t>{{question_one}}</w:t>", &ctx);
        assert!(rendered.contains("Line one</w:t><w:br/><w:t xml:space=\"preserve\">Line two"));
    }

    #[test]
    fn test_render_xml_rich_value_emits_runs() {
        let month = RichText::from(
            StyledRun::plain("  мая  ")
                .bold()
                .underline(Underline::Thick),
        );
        let ctx = RenderContext::new().with("month", month);
        let rendered =
            DocxRenderer::render_xml("<w:r><w:t>«{{month}}»</w:t></w:r>", &ctx);

        assert_eq!(
            rendered,
            concat!(
                r#"<w:r><w:t xml:space="preserve">«</w:t></w:r>"#,
                r#"<w:r><w:rPr><w:b/><w:u w:val="thick"/></w:rPr>"#,
                r#"<w:t xml:space="preserve">  мая  </w:t></w:r>"#,
                r#"<w:r><w:t xml:space="preserve">»</w:t></w:r>"#,
            )
        );
    }

    #[test]
    fn test_templated_parts() {
        assert!(is_templated_part("word/document.xml"));
        assert!(is_templated_part("word/header1.xml"));
        assert!(is_templated_part("word/footer2.xml"));
        assert!(!is_templated_part("word/styles.xml"));
        assert!(!is_templated_part("word/_rels/header1.xml.rels"));
        assert!(!is_templated_part("customXml/item1.xml"));
    }

    #[test]
    fn test_render_docx_file() {
        let dir = TempDir::new().unwrap();
        let template = dir.path().join("template.docx");
        let target = dir.path().join("out/ticket.docx");
        fixtures::write_docx(&template, &["Ticket {{ ticket_number }}", "{{ subject }}"]);

        DocxRenderer::new()
            .render(&template, &context(), &target)
            .unwrap();

        assert_eq!(
            fixtures::document_paragraphs(&target),
            vec!["Ticket 2", "Physics & Maths"]
        );
        // template untouched
        assert_eq!(
            fixtures::document_paragraphs(&template),
            vec!["Ticket {{ ticket_number }}", "{{ subject }}"]
        );
    }

    #[test]
    fn test_render_missing_template() {
        let dir = TempDir::new().unwrap();
        let result = DocxRenderer::new().render(
            &dir.path().join("absent.docx"),
            &context(),
            &dir.path().join("out.docx"),
        );
        assert!(matches!(result, Err(RenderError::TemplateNotFound { .. })));
    }

    #[test]
    fn test_render_corrupt_template() {
        let dir = TempDir::new().unwrap();
        let template = dir.path().join("broken.docx");
        std::fs::write(&template, b"not a docx").unwrap();

        let result =
            DocxRenderer::new().render(&template, &context(), &dir.path().join("out.docx"));
        assert!(matches!(result, Err(RenderError::Archive(_))));
    }
}
