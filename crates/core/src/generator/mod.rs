//! Ticket document generation.
//!
//! A run reads a fresh question snapshot, resolves the ticket count, renders
//! every ticket from the template, and merges the results into the output
//! document:
//!
//! ```ignore
//! use doctemplater_core::generator::{DocumentMetadata, GenerationRequest, TicketGenerator};
//!
//! let generator = TicketGenerator::new(store, renderer, merger, template, config.generation.clone());
//! let request = GenerationRequest::new("tickets.docx", metadata, &config.generation).with_count(25);
//! let report = generator.generate(&request)?;
//! println!("{} tickets written to {}", report.tickets.len(), report.output.display());
//! ```
//!
//! Single-ticket runs render straight to the output. Longer runs first fill
//! the document metadata into a scratch copy of the template, render one
//! scratch document per ticket from it, and merge those in ticket order.

mod assembler;
mod error;
mod metadata;
mod runner;
mod types;

pub use assembler::TicketAssembler;
pub use error::GenerationError;
pub use metadata::{centered_month, keys, month_genitive, DocumentMetadata};
pub use runner::TicketGenerator;
pub use types::{GenerationReport, GenerationRequest, QuestionSnapshot, TicketSummary};
