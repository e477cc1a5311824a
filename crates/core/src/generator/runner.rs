//! End-to-end generation runs.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rand::Rng;
use tracing::info;

use super::assembler::TicketAssembler;
use super::error::GenerationError;
use super::types::{GenerationReport, GenerationRequest, QuestionSnapshot, TicketSummary};
use crate::config::GenerationConfig;
use crate::merge::{DocumentMerger, MergeSummary};
use crate::planner::{self, TicketPlan};
use crate::question::QuestionStore;
use crate::render::{RenderContext, Renderer};
use crate::scratch::ScratchSpace;

/// Produces ticket documents from the question bank.
pub struct TicketGenerator {
    store: Arc<dyn QuestionStore>,
    renderer: Arc<dyn Renderer>,
    merger: Arc<dyn DocumentMerger>,
    template: PathBuf,
    config: GenerationConfig,
}

impl TicketGenerator {
    pub fn new(
        store: Arc<dyn QuestionStore>,
        renderer: Arc<dyn Renderer>,
        merger: Arc<dyn DocumentMerger>,
        template: impl Into<PathBuf>,
        config: GenerationConfig,
    ) -> Self {
        Self {
            store,
            renderer,
            merger,
            template: template.into(),
            config,
        }
    }

    pub fn template(&self) -> &Path {
        &self.template
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Run a generation with the thread-local random source.
    pub fn generate(&self, request: &GenerationRequest) -> Result<GenerationReport, GenerationError> {
        self.generate_with_rng(request, &mut rand::thread_rng())
    }

    /// Run a generation.
    ///
    /// The question snapshot is read and the ticket count resolved before any
    /// file is written. The document is built in a staging file next to the
    /// output and renamed over it only on success, so a failed run leaves any
    /// existing output untouched. Every scratch artifact is removed either way.
    pub fn generate_with_rng<R: Rng + ?Sized>(
        &self,
        request: &GenerationRequest,
        rng: &mut R,
    ) -> Result<GenerationReport, GenerationError> {
        info!(
            output = %request.output.display(),
            count_mode = %request.ticket_count_mode,
            practical_mode = %request.practical_mode,
            theoretical_mode = %request.theoretical_mode,
            "Starting generation"
        );

        let snapshot = QuestionSnapshot::take(self.store.as_ref(), self.config.question_order)?;
        let plan = planner::plan(
            request.ticket_count_mode,
            request.manual_count,
            snapshot.practical.len(),
            snapshot.theoretical.len(),
        )?;
        info!(
            tickets = plan.len(),
            practical = snapshot.practical.len(),
            theoretical = snapshot.theoretical.len(),
            "Planned tickets"
        );

        let base = request.metadata.to_context(&self.config);
        let assembler = TicketAssembler::new(
            self.renderer.as_ref(),
            &snapshot,
            request.practical_mode,
            request.theoretical_mode,
        );

        let mut scratch =
            ScratchSpace::create(&self.config.temp_dir).map_err(GenerationError::Scratch)?;
        let result = self.produce(&assembler, &base, &plan, &mut scratch, &request.output, rng);
        let cleanup = scratch.cleanup();

        let (tickets, merged) = result?;
        info!(
            output = %request.output.display(),
            tickets = tickets.len(),
            removed = cleanup.removed,
            "Generation complete"
        );
        Ok(GenerationReport {
            output: request.output.clone(),
            run_id: scratch.run_id().to_string(),
            tickets,
            merged,
            cleanup,
        })
    }

    /// Build the output document in a staging file and move it into place.
    fn produce<R: Rng + ?Sized>(
        &self,
        assembler: &TicketAssembler<'_>,
        base: &RenderContext,
        plan: &TicketPlan,
        scratch: &mut ScratchSpace,
        output: &Path,
        rng: &mut R,
    ) -> Result<(Vec<TicketSummary>, Option<MergeSummary>), GenerationError> {
        let output_error = |source: std::io::Error| GenerationError::Output {
            path: output.to_path_buf(),
            source,
        };
        let staged = scratch.stage(output).map_err(output_error)?;

        let (tickets, merged) = if plan.is_single() {
            // one ticket renders straight from the original template
            let ticket = assembler.render_ticket(&self.template, base, 0, &staged, rng)?;
            (vec![ticket], None)
        } else {
            let (tickets, merged) =
                self.render_and_merge(assembler, base, plan, scratch, &staged, rng)?;
            (tickets, Some(merged))
        };

        scratch.persist(&staged, output).map_err(output_error)?;
        Ok((tickets, merged))
    }

    fn render_and_merge<R: Rng + ?Sized>(
        &self,
        assembler: &TicketAssembler<'_>,
        base: &RenderContext,
        plan: &TicketPlan,
        scratch: &mut ScratchSpace,
        output: &Path,
        rng: &mut R,
    ) -> Result<(Vec<TicketSummary>, MergeSummary), GenerationError> {
        // metadata filled once; ticket placeholders survive for the next pass
        let template = scratch.allocate("base");
        self.renderer
            .render(&self.template, base, &template)
            .map_err(GenerationError::Template)?;

        let rendered = assembler.assemble(&template, base, plan, scratch, rng)?;
        let (tickets, documents): (Vec<_>, Vec<_>) = rendered.into_iter().unzip();

        let merged = self.merger.merge(&documents, output)?;
        Ok((tickets, merged))
    }
}
