//! Mock renderer for testing.

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use crate::generator::keys;
use crate::render::{RenderContext, RenderError, Renderer};

/// A recorded render call for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedRender {
    pub template: PathBuf,
    pub context: RenderContext,
    pub target: PathBuf,
    /// Whether the render succeeded.
    pub success: bool,
}

impl RecordedRender {
    /// Ticket number in the context, if this was a ticket render.
    pub fn ticket_number(&self) -> Option<usize> {
        self.context
            .text(keys::TICKET_NUMBER)
            .and_then(|n| n.parse().ok())
    }
}

/// Mock implementation of the Renderer trait.
///
/// Successful renders write the context as JSON to the target path, so the
/// files exist for cleanup and merge assertions.
///
/// # Example
///
/// ```rust,ignore
/// use doctemplater_core::testing::MockRenderer;
///
/// let renderer = MockRenderer::new();
/// renderer.fail_on_ticket(2);
///
/// // run a generation...
///
/// let tickets = renderer.ticket_contexts();
/// assert_eq!(tickets.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct MockRenderer {
    renders: Arc<RwLock<Vec<RecordedRender>>>,
    /// Renders of this ticket number fail.
    fail_on_ticket: Arc<RwLock<Option<usize>>>,
    /// If set, the next render fails with this message.
    next_error: Arc<RwLock<Option<String>>>,
}

impl MockRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every render of ticket `number` fail.
    pub fn fail_on_ticket(&self, number: usize) {
        *self.fail_on_ticket.write().unwrap() = Some(number);
    }

    /// Make the next render fail, whatever it renders.
    pub fn set_next_error(&self, message: impl Into<String>) {
        *self.next_error.write().unwrap() = Some(message.into());
    }

    pub fn clear_failures(&self) {
        *self.fail_on_ticket.write().unwrap() = None;
        *self.next_error.write().unwrap() = None;
    }

    /// All render calls, successful or not.
    pub fn recorded_renders(&self) -> Vec<RecordedRender> {
        self.renders.read().unwrap().clone()
    }

    pub fn render_count(&self) -> usize {
        self.renders.read().unwrap().len()
    }

    /// Contexts of successful ticket renders, in call order.
    pub fn ticket_contexts(&self) -> Vec<RenderContext> {
        self.renders
            .read()
            .unwrap()
            .iter()
            .filter(|r| r.success && r.ticket_number().is_some())
            .map(|r| r.context.clone())
            .collect()
    }

    fn check_failure(&self, context: &RenderContext) -> Option<RenderError> {
        if let Some(message) = self.next_error.write().unwrap().take() {
            return Some(RenderError::Failed(message));
        }
        let fail_on = *self.fail_on_ticket.read().unwrap();
        let ticket = context
            .text(keys::TICKET_NUMBER)
            .and_then(|n| n.parse::<usize>().ok());
        match (fail_on, ticket) {
            (Some(fail_on), Some(ticket)) if fail_on == ticket => Some(RenderError::Failed(
                format!("mock failure on ticket {}", ticket),
            )),
            _ => None,
        }
    }
}

impl Renderer for MockRenderer {
    fn name(&self) -> &str {
        "mock"
    }

    fn render(
        &self,
        template: &Path,
        context: &RenderContext,
        target: &Path,
    ) -> Result<(), RenderError> {
        let failure = self.check_failure(context);

        let result = match failure {
            Some(err) => Err(err),
            None => write_context(context, target),
        };

        self.renders.write().unwrap().push(RecordedRender {
            template: template.to_path_buf(),
            context: context.clone(),
            target: target.to_path_buf(),
            success: result.is_ok(),
        });

        result
    }
}

fn write_context(context: &RenderContext, target: &Path) -> Result<(), RenderError> {
    let io_error = |source| RenderError::Io {
        path: target.to_path_buf(),
        source,
    };
    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_error)?;
    }
    let json = serde_json::to_vec_pretty(context)
        .map_err(|e| RenderError::Failed(e.to_string()))?;
    std::fs::write(target, json).map_err(io_error)
}
