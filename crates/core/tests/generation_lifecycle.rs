//! Generation lifecycle integration tests.
//!
//! These tests run the ticket generator against an on-disk question store:
//! - Ticket order and question selection
//! - Single-ticket runs bypassing the merger
//! - Scratch cleanup on success and on every failure path
//! - Real docx rendering and merging

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tempfile::TempDir;

use doctemplater_core::{
    generator::keys,
    testing::{fixtures, MockMerger, MockRenderer},
    DocumentMetadata, DocxMerger, DocxRenderer, GenerationConfig, GenerationError,
    GenerationRequest, PlanError, QuestionCategory, QuestionStore, SelectionMode,
    SqliteQuestionStore, TicketCountMode, TicketGenerator,
};

/// Test helper wiring a generator to mocks and a temp directory.
struct TestHarness {
    generator: TicketGenerator,
    renderer: Arc<MockRenderer>,
    merger: Arc<MockMerger>,
    store: Arc<SqliteQuestionStore>,
    temp_dir: TempDir,
}

impl TestHarness {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = Arc::new(
            SqliteQuestionStore::new(&temp_dir.path().join("questions.db"))
                .expect("Failed to create question store"),
        );
        let renderer = Arc::new(MockRenderer::new());
        let merger = Arc::new(MockMerger::new());

        let config = GenerationConfig {
            temp_dir: temp_dir.path().join("scratch"),
            ..Default::default()
        };
        let generator = TicketGenerator::new(
            store.clone(),
            renderer.clone(),
            merger.clone(),
            temp_dir.path().join("template.docx"),
            config,
        );

        Self {
            generator,
            renderer,
            merger,
            store,
            temp_dir,
        }
    }

    fn add(&self, category: QuestionCategory, texts: &[&str]) {
        self.store
            .insert_many(&fixtures::questions(texts), category)
            .expect("Failed to insert questions");
    }

    fn output(&self) -> PathBuf {
        self.temp_dir.path().join("out/tickets.docx")
    }

    fn request(&self) -> GenerationRequest {
        GenerationRequest::new(
            self.output(),
            metadata(),
            self.generator.config(),
        )
    }

    fn scratch_files(&self) -> Vec<PathBuf> {
        let mut files = tmp_files(&self.temp_dir.path().join("scratch"));
        files.extend(tmp_files(&self.temp_dir.path().join("out")));
        files
    }
}

/// Temporary files directly under `dir`.
fn tmp_files(dir: &Path) -> Vec<PathBuf> {
    match std::fs::read_dir(dir) {
        Ok(entries) => entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| {
                p.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with("tmp_"))
            })
            .collect(),
        Err(_) => Vec::new(),
    }
}

fn metadata() -> DocumentMetadata {
    DocumentMetadata {
        subject: "Operating Systems".to_string(),
        specialty: "09.02.07".to_string(),
        committee_chair: "Ivanova I.I.".to_string(),
        tutor: "Petrov P.P.".to_string(),
        date: NaiveDate::from_ymd_opt(2024, 5, 7),
        qualifying: false,
    }
}

fn questions_of(contexts: &[doctemplater_core::RenderContext]) -> Vec<(String, String, String)> {
    contexts
        .iter()
        .map(|c| {
            (
                c.text(keys::TICKET_NUMBER).unwrap_or_default(),
                c.text(keys::QUESTION_ONE).unwrap_or_default(),
                c.text(keys::QUESTION_TWO).unwrap_or_default(),
            )
        })
        .collect()
}

fn triple(n: &str, one: &str, two: &str) -> (String, String, String) {
    (n.to_string(), one.to_string(), two.to_string())
}

#[test]
fn test_sequential_run_pairs_questions_in_order() {
    let harness = TestHarness::new();
    harness.add(QuestionCategory::Practical, &["A", "B"]);
    harness.add(QuestionCategory::Theoretical, &["X", "Y", "Z"]);

    let request = harness.request().with_count(2);
    let report = harness.generator.generate(&request).unwrap();

    assert_eq!(
        questions_of(&harness.renderer.ticket_contexts()),
        vec![triple("1", "A", "X"), triple("2", "B", "Y")]
    );
    assert_eq!(report.tickets.len(), 2);
    assert_eq!(report.tickets[1].practical_question, "B");
    assert_eq!(report.merged.unwrap().page_breaks, 1);

    let merges = harness.merger.recorded_merges();
    assert_eq!(merges.len(), 1);
    assert_eq!(merges[0].documents.len(), 2);
    assert!(merges[0].contents[0].contains("\"A\""));
    assert!(merges[0].contents[1].contains("\"B\""));

    assert!(harness.output().exists());
    assert!(harness.scratch_files().is_empty());
    assert_eq!(report.cleanup.removed, 3);
    assert!(report.cleanup.is_clean());
}

#[test]
fn test_ticket_contexts_carry_document_metadata() {
    let harness = TestHarness::new();
    harness.add(QuestionCategory::Practical, &["A"]);
    harness.add(QuestionCategory::Theoretical, &["X"]);

    harness
        .generator
        .generate(&harness.request().with_count(2))
        .unwrap();

    let renders = harness.renderer.recorded_renders();
    // base template first, then one render per ticket
    assert_eq!(renders.len(), 3);
    assert!(renders[0].ticket_number().is_none());
    assert_eq!(renders[0].template, harness.generator.template());
    assert_eq!(renders[1].template, renders[0].target);

    for ctx in harness.renderer.ticket_contexts() {
        assert_eq!(ctx.text(keys::SUBJECT).as_deref(), Some("Operating Systems"));
        assert_eq!(ctx.text(keys::DAY).as_deref(), Some("07"));
        assert_eq!(ctx.text(keys::YEAR).as_deref(), Some("2024"));
    }
}

#[test]
fn test_derived_count_with_sequential_gaps() {
    let harness = TestHarness::new();
    harness.add(QuestionCategory::Practical, &["A"]);
    harness.add(QuestionCategory::Theoretical, &["X", "Y", "Z"]);

    let request = harness
        .request()
        .with_count_mode(TicketCountMode::DeriveFromTheoretical)
        .with_modes(SelectionMode::Sequential, SelectionMode::Sequential);
    let report = harness.generator.generate(&request).unwrap();

    assert_eq!(
        questions_of(&harness.renderer.ticket_contexts()),
        vec![
            triple("1", "A", "X"),
            triple("2", "", "Y"),
            triple("3", "", "Z")
        ]
    );
    assert_eq!(report.merged.unwrap().page_breaks, 2);
}

#[test]
fn test_fallback_random_fills_every_ticket() {
    let harness = TestHarness::new();
    harness.add(QuestionCategory::Practical, &["A", "B"]);
    harness.add(QuestionCategory::Theoretical, &["X"]);

    let request = harness
        .request()
        .with_count(5)
        .with_modes(SelectionMode::FallbackRandom, SelectionMode::FallbackRandom);
    let report = harness
        .generator
        .generate_with_rng(&request, &mut StdRng::seed_from_u64(11))
        .unwrap();

    assert_eq!(report.tickets[0].practical_question, "A");
    assert_eq!(report.tickets[1].practical_question, "B");
    for ticket in &report.tickets {
        assert!(["A", "B"].contains(&ticket.practical_question.as_str()));
        assert_eq!(ticket.theoretical_question, "X");
    }
}

#[test]
fn test_single_ticket_skips_merger() {
    let harness = TestHarness::new();
    harness.add(QuestionCategory::Practical, &["A"]);
    harness.add(QuestionCategory::Theoretical, &["X"]);

    let report = harness
        .generator
        .generate(&harness.request().with_count(1))
        .unwrap();

    assert_eq!(harness.merger.merge_count(), 0);
    assert_eq!(harness.renderer.render_count(), 1);
    assert!(report.merged.is_none());
    assert!(harness.output().exists());
    assert!(harness.scratch_files().is_empty());

    // rendered into a staging file beside the output, then renamed
    let renders = harness.renderer.recorded_renders();
    assert_ne!(renders[0].target, harness.output());
    assert_eq!(renders[0].target.parent(), harness.output().parent());
    assert!(renders[0].target.to_string_lossy().contains(&report.run_id));
    assert_eq!(renders[0].template, harness.generator.template());
}

#[test]
fn test_render_failure_cleans_up() {
    let harness = TestHarness::new();
    harness.add(QuestionCategory::Practical, &["A", "B", "C"]);
    harness.add(QuestionCategory::Theoretical, &["X", "Y", "Z"]);
    harness.renderer.fail_on_ticket(2);

    let err = harness
        .generator
        .generate(&harness.request().with_count(3))
        .unwrap_err();

    match err {
        GenerationError::Render { ticket_number, .. } => assert_eq!(ticket_number, 2),
        other => panic!("expected render error, got {:?}", other),
    }
    assert_eq!(harness.merger.merge_count(), 0);
    assert!(harness.scratch_files().is_empty());
    assert!(!harness.output().exists());
}

#[test]
fn test_single_ticket_render_failure_leaves_no_output() {
    let harness = TestHarness::new();
    harness.add(QuestionCategory::Practical, &["A"]);
    harness.add(QuestionCategory::Theoretical, &["X"]);
    harness.renderer.fail_on_ticket(1);

    let err = harness
        .generator
        .generate(&harness.request().with_count(1))
        .unwrap_err();

    assert_eq!(err.ticket_number(), Some(1));
    assert!(!harness.output().exists());
}

#[test]
fn test_template_failure_cleans_up() {
    let harness = TestHarness::new();
    harness.add(QuestionCategory::Practical, &["A", "B"]);
    harness.add(QuestionCategory::Theoretical, &["X", "Y"]);
    harness.renderer.set_next_error("template is locked");

    let err = harness
        .generator
        .generate(&harness.request().with_count(2))
        .unwrap_err();

    assert!(matches!(err, GenerationError::Template(_)));
    assert!(!err.is_planning());
    assert!(harness.renderer.ticket_contexts().is_empty());
    assert!(harness.scratch_files().is_empty());
}

#[test]
fn test_merge_failure_removes_partial_output() {
    let harness = TestHarness::new();
    harness.add(QuestionCategory::Practical, &["A", "B"]);
    harness.add(QuestionCategory::Theoretical, &["X", "Y"]);
    harness.merger.set_next_error("disk full");

    let err = harness
        .generator
        .generate(&harness.request().with_count(2))
        .unwrap_err();

    assert!(matches!(err, GenerationError::Merge(_)));
    assert!(!harness.output().exists());
    assert!(harness.scratch_files().is_empty());
}

#[test]
fn test_merge_failure_keeps_preexisting_output() {
    let harness = TestHarness::new();
    harness.add(QuestionCategory::Practical, &["A", "B"]);
    harness.add(QuestionCategory::Theoretical, &["X", "Y"]);

    let output = harness.output();
    std::fs::create_dir_all(output.parent().unwrap()).unwrap();
    std::fs::write(&output, b"previous run").unwrap();
    harness.merger.set_next_error("disk full");

    assert!(harness
        .generator
        .generate(&harness.request().with_count(2))
        .is_err());
    assert_eq!(std::fs::read(&output).unwrap(), b"previous run");
    assert!(harness.scratch_files().is_empty());

    let merges = harness.merger.recorded_merges();
    assert_ne!(merges[0].output, output);
}

#[test]
fn test_single_ticket_failure_keeps_preexisting_output() {
    let harness = TestHarness::new();
    harness.add(QuestionCategory::Practical, &["A"]);
    harness.add(QuestionCategory::Theoretical, &["X"]);

    let output = harness.output();
    std::fs::create_dir_all(output.parent().unwrap()).unwrap();
    std::fs::write(&output, b"previous run").unwrap();
    harness.renderer.fail_on_ticket(1);

    let err = harness
        .generator
        .generate(&harness.request().with_count(1))
        .unwrap_err();

    assert_eq!(err.ticket_index(), Some(0));
    assert_eq!(std::fs::read(&output).unwrap(), b"previous run");
    assert!(harness.scratch_files().is_empty());
}

#[test]
fn test_successful_run_replaces_existing_output() {
    let harness = TestHarness::new();
    harness.add(QuestionCategory::Practical, &["A", "B"]);
    harness.add(QuestionCategory::Theoretical, &["X", "Y"]);

    let output = harness.output();
    std::fs::create_dir_all(output.parent().unwrap()).unwrap();
    std::fs::write(&output, b"previous run").unwrap();

    harness
        .generator
        .generate(&harness.request().with_count(2))
        .unwrap();

    let written = std::fs::read_to_string(&output).unwrap();
    assert!(written.contains("\"A\""));
    assert!(harness.scratch_files().is_empty());
}

#[test]
fn test_oversized_count_is_rejected_before_any_render() {
    let harness = TestHarness::new();
    harness.add(QuestionCategory::Practical, &["A"]);
    harness.add(QuestionCategory::Theoretical, &["X"]);

    let err = harness
        .generator
        .generate(&harness.request().with_count(10_000_000_000))
        .unwrap_err();

    assert!(err.is_planning());
    assert!(matches!(
        err,
        GenerationError::Plan(PlanError::InvalidCount(Some(10_000_000_000)))
    ));
    assert_eq!(harness.renderer.render_count(), 0);
    assert!(!harness.temp_dir.path().join("scratch").exists());
    assert!(!harness.output().exists());
}

#[test]
fn test_planning_failure_touches_nothing() {
    let harness = TestHarness::new();
    harness.add(QuestionCategory::Theoretical, &["X"]);

    let mut request = harness.request();
    request.ticket_count_mode = TicketCountMode::Manual;
    request.manual_count = None;
    let err = harness.generator.generate(&request).unwrap_err();
    assert!(err.is_planning());

    let request = harness
        .request()
        .with_count_mode(TicketCountMode::DeriveFromPractical);
    let err = harness.generator.generate(&request).unwrap_err();
    assert!(err.is_planning());
    assert_eq!(
        err.to_string(),
        "No practical questions to derive the ticket count from"
    );

    assert_eq!(harness.renderer.render_count(), 0);
    assert_eq!(harness.merger.merge_count(), 0);
    assert!(!harness.output().exists());
    assert!(harness.scratch_files().is_empty());
}

#[test]
fn test_each_run_reads_a_fresh_snapshot() {
    let harness = TestHarness::new();
    harness.add(QuestionCategory::Practical, &["A"]);
    harness.add(QuestionCategory::Theoretical, &["X"]);

    let request = harness
        .request()
        .with_count_mode(TicketCountMode::DeriveFromPractical);
    assert_eq!(harness.generator.generate(&request).unwrap().tickets.len(), 1);

    harness.add(QuestionCategory::Practical, &["B"]);
    let report = harness.generator.generate(&request).unwrap();
    assert_eq!(report.tickets.len(), 2);
    assert_eq!(report.tickets[1].practical_question, "B");
}

/// Real renderer and merger over generated docx files.
fn docx_generator(dir: &Path, store: Arc<SqliteQuestionStore>) -> TicketGenerator {
    let template = dir.join("template.docx");
    fixtures::write_template_docx(&template);
    let config = GenerationConfig {
        temp_dir: dir.join("scratch"),
        ..Default::default()
    };
    TicketGenerator::new(
        store,
        Arc::new(DocxRenderer::new()),
        Arc::new(DocxMerger::new()),
        template,
        config,
    )
}

#[test]
fn test_docx_run_produces_ordered_tickets_with_page_breaks() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(SqliteQuestionStore::in_memory().unwrap());
    store
        .insert_many(&fixtures::questions(&["A", "B", "C"]), QuestionCategory::Practical)
        .unwrap();
    store
        .insert_many(&fixtures::questions(&["X", "Y", "Z"]), QuestionCategory::Theoretical)
        .unwrap();

    let generator = docx_generator(dir.path(), store);
    let output = dir.path().join("tickets.docx");
    let request = GenerationRequest::new(&output, metadata(), generator.config()).with_count(3);

    let report = generator.generate(&request).unwrap();
    assert_eq!(report.merged.unwrap().page_breaks, 2);

    let paragraphs = fixtures::document_paragraphs(&output);
    let tickets: Vec<&String> = paragraphs.iter().filter(|p| p.starts_with("Ticket ")).collect();
    assert_eq!(tickets, vec!["Ticket 1", "Ticket 2", "Ticket 3"]);
    assert!(paragraphs.contains(&"1) B".to_string()));
    assert!(paragraphs.contains(&"2) Z".to_string()));
    assert_eq!(
        paragraphs
            .iter()
            .filter(|p| *p == "Subject: Operating Systems")
            .count(),
        3
    );
    assert!(paragraphs.iter().any(|p| p.starts_with("Date: 07 ") && p.contains("мая")));
    assert_eq!(fixtures::count_page_breaks(&output), 2);

    let leftovers: Vec<_> = std::fs::read_dir(dir.path().join("scratch"))
        .unwrap()
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn test_docx_single_ticket_has_no_page_break() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(SqliteQuestionStore::in_memory().unwrap());
    store.insert_one("A", QuestionCategory::Practical).unwrap();
    store.insert_one("X", QuestionCategory::Theoretical).unwrap();

    let generator = docx_generator(dir.path(), store);
    let output = dir.path().join("single.docx");
    let mut meta = metadata();
    meta.qualifying = true;
    let request = GenerationRequest::new(&output, meta, generator.config()).with_count(1);

    generator.generate(&request).unwrap();

    let paragraphs = fixtures::document_paragraphs(&output);
    assert_eq!(paragraphs[0], "Subject: Operating Systems (квалификационный)");
    assert!(paragraphs.contains(&"Ticket 1".to_string()));
    assert!(paragraphs.contains(&"1) A".to_string()));
    assert_eq!(fixtures::count_page_breaks(&output), 0);
}
