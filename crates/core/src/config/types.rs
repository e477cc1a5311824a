use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::planner::TicketCountMode;
use crate::question::SortOrder;
use crate::selection::SelectionMode;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub template: TemplateConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("doctemplater.db")
}

/// Ticket template configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TemplateConfig {
    /// Path to the `.docx` ticket template.
    #[serde(default = "default_template_path")]
    pub path: PathBuf,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            path: default_template_path(),
        }
    }
}

fn default_template_path() -> PathBuf {
    PathBuf::from("assets/templates/base.docx")
}

/// Generation run defaults
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GenerationConfig {
    /// Directory for run-scoped scratch documents.
    #[serde(default = "default_temp_dir")]
    pub temp_dir: PathBuf,

    /// Order of the question snapshot taken at the start of a run.
    #[serde(default = "default_question_order")]
    pub question_order: SortOrder,

    /// Width the month name is centered into.
    #[serde(default = "default_month_field_width")]
    pub month_field_width: usize,

    /// Appended to the title of qualifying exams.
    #[serde(default = "default_qualifying_suffix")]
    pub qualifying_suffix: String,

    #[serde(default)]
    pub ticket_count_mode: TicketCountMode,

    #[serde(default)]
    pub practical_mode: SelectionMode,

    #[serde(default)]
    pub theoretical_mode: SelectionMode,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temp_dir: default_temp_dir(),
            question_order: default_question_order(),
            month_field_width: default_month_field_width(),
            qualifying_suffix: default_qualifying_suffix(),
            ticket_count_mode: TicketCountMode::default(),
            practical_mode: SelectionMode::default(),
            theoretical_mode: SelectionMode::default(),
        }
    }
}

fn default_temp_dir() -> PathBuf {
    std::env::temp_dir().join("doctemplater")
}

fn default_question_order() -> SortOrder {
    SortOrder::Asc
}

fn default_month_field_width() -> usize {
    16
}

fn default_qualifying_suffix() -> String {
    " (квалификационный)".to_string()
}
