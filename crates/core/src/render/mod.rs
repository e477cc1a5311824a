//! Template rendering.
//!
//! A [`Renderer`] fills a template with a [`RenderContext`] and writes the
//! result to a target path. [`DocxRenderer`] is the `.docx` implementation;
//! tests use the mock from [`crate::testing`].

mod context;
mod docx;
mod error;
mod traits;

pub use context::{RenderContext, RenderValue, RichText, StyledRun, Underline};
pub use docx::DocxRenderer;
pub use error::RenderError;
pub use traits::Renderer;
