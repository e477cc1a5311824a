//! Ticket document generation command.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use doctemplater_core::{
    Config, DocumentMetadata, DocxMerger, DocxRenderer, GenerationConfig, GenerationReport,
    GenerationRequest, TicketCountMode, TicketGenerator,
};

use super::open_store;
use crate::cli::GenerateArgs;

pub async fn run(args: GenerateArgs, config: &Config) -> Result<()> {
    let store = Arc::new(open_store(config)?);
    let template = args
        .template
        .clone()
        .unwrap_or_else(|| config.template.path.clone());
    info!("Template: {:?}", template);

    let generator = TicketGenerator::new(
        store,
        Arc::new(DocxRenderer::new()),
        Arc::new(DocxMerger::new()),
        template,
        config.generation.clone(),
    );
    let request = build_request(&args, &config.generation);

    // document work is blocking; keep it off the runtime threads
    let report = tokio::task::spawn_blocking(move || generator.generate(&request))
        .await
        .context("Generation task failed")?
        .context("Generation failed")?;

    if !report.cleanup.is_clean() {
        warn!(
            failed = report.cleanup.failed.len(),
            "Some temporary files could not be removed"
        );
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report);
    }
    Ok(())
}

/// Combine command-line options with configured defaults.
fn build_request(args: &GenerateArgs, defaults: &GenerationConfig) -> GenerationRequest {
    let metadata = DocumentMetadata {
        subject: args.subject.clone(),
        specialty: args.specialty.clone(),
        committee_chair: args.committee_chair.clone(),
        tutor: args.tutor.clone(),
        date: args.date,
        qualifying: args.qualifying,
    };

    let count_mode = match (args.count_mode, args.count) {
        (Some(mode), _) => mode,
        (None, Some(_)) => TicketCountMode::Manual,
        (None, None) => defaults.ticket_count_mode,
    };

    let mut request = GenerationRequest::new(&args.output, metadata, defaults)
        .with_count_mode(count_mode)
        .with_modes(
            args.practical_mode.unwrap_or(defaults.practical_mode),
            args.theoretical_mode.unwrap_or(defaults.theoretical_mode),
        );
    request.manual_count = args.count;
    request
}

fn print_summary(report: &GenerationReport) {
    println!(
        "Generated {} ticket(s) into {}",
        report.tickets.len(),
        report.output.display()
    );
    for ticket in &report.tickets {
        println!(
            "  #{:<3} {} | {}",
            ticket.number, ticket.practical_question, ticket.theoretical_question
        );
    }
}
