//! Per-ticket question selection and rendering.

use std::path::{Path, PathBuf};

use rand::Rng;
use tracing::info;

use super::error::GenerationError;
use super::metadata::keys;
use super::types::{QuestionSnapshot, TicketSummary};
use crate::planner::TicketPlan;
use crate::render::{RenderContext, Renderer};
use crate::scratch::ScratchSpace;
use crate::selection::{select, SelectionMode};

/// Picks the questions for each ticket and renders it.
pub struct TicketAssembler<'a> {
    renderer: &'a dyn Renderer,
    snapshot: &'a QuestionSnapshot,
    practical_mode: SelectionMode,
    theoretical_mode: SelectionMode,
}

impl<'a> TicketAssembler<'a> {
    pub fn new(
        renderer: &'a dyn Renderer,
        snapshot: &'a QuestionSnapshot,
        practical_mode: SelectionMode,
        theoretical_mode: SelectionMode,
    ) -> Self {
        Self {
            renderer,
            snapshot,
            practical_mode,
            theoretical_mode,
        }
    }

    /// Select the questions for the ticket at `index`.
    pub fn select_ticket<R: Rng + ?Sized>(&self, index: usize, rng: &mut R) -> TicketSummary {
        TicketSummary {
            index,
            number: index + 1,
            practical_question: select(&self.snapshot.practical, self.practical_mode, index, rng),
            theoretical_question: select(
                &self.snapshot.theoretical,
                self.theoretical_mode,
                index,
                rng,
            ),
        }
    }

    /// `base` extended with the ticket's own keys.
    pub fn ticket_context(base: &RenderContext, ticket: &TicketSummary) -> RenderContext {
        let mut context = base.clone();
        context.insert(keys::TICKET_NUMBER, ticket.number.to_string());
        context.insert(keys::QUESTION_ONE, ticket.practical_question.as_str());
        context.insert(keys::QUESTION_TWO, ticket.theoretical_question.as_str());
        context
    }

    /// Select and render one ticket into `target`.
    pub fn render_ticket<R: Rng + ?Sized>(
        &self,
        template: &Path,
        base: &RenderContext,
        index: usize,
        target: &Path,
        rng: &mut R,
    ) -> Result<TicketSummary, GenerationError> {
        let ticket = self.select_ticket(index, rng);
        let context = Self::ticket_context(base, &ticket);

        self.renderer
            .render(template, &context, target)
            .map_err(|source| GenerationError::Render {
                ticket_number: ticket.number,
                source,
            })?;

        info!(
            ticket = ticket.number,
            practical = %ticket.practical_question,
            theoretical = %ticket.theoretical_question,
            "Rendered ticket"
        );
        Ok(ticket)
    }

    /// Render every planned ticket into its own scratch artifact.
    ///
    /// Stops at the first failure. Artifacts written so far stay recorded in
    /// `scratch` for cleanup.
    pub fn assemble<R: Rng + ?Sized>(
        &self,
        template: &Path,
        base: &RenderContext,
        plan: &TicketPlan,
        scratch: &mut ScratchSpace,
        rng: &mut R,
    ) -> Result<Vec<(TicketSummary, PathBuf)>, GenerationError> {
        let mut rendered = Vec::new();
        for index in plan.iter() {
            let target = scratch.allocate(&format!("ticket_{}", index + 1));
            let ticket = self.render_ticket(template, base, index, &target, rng)?;
            rendered.push((ticket, target));
        }
        Ok(rendered)
    }
}
