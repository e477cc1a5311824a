//! Trait definitions for the render module.

use std::path::Path;

use super::context::RenderContext;
use super::error::RenderError;

/// Fills a template with context values.
pub trait Renderer: Send + Sync {
    /// Returns the name of this renderer implementation.
    fn name(&self) -> &str;

    /// Render `template` with `context` and write the result to `target`.
    ///
    /// Placeholders with no matching context key are left untouched, so the
    /// output of one render can serve as the template of another.
    fn render(
        &self,
        template: &Path,
        context: &RenderContext,
        target: &Path,
    ) -> Result<(), RenderError>;
}
