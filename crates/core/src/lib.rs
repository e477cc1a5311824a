pub mod config;
pub mod generator;
pub mod merge;
pub mod package;
pub mod planner;
pub mod question;
pub mod render;
pub mod scratch;
pub mod selection;
pub mod testing;

pub use config::{
    load_config, load_config_from_str, load_config_or_default, validate_config, Config,
    ConfigError, DatabaseConfig, GenerationConfig, TemplateConfig,
};
pub use generator::{
    DocumentMetadata, GenerationError, GenerationReport, GenerationRequest, TicketGenerator,
    TicketSummary,
};
pub use merge::{DocumentMerger, DocxMerger, MergeError, MergeSummary};
pub use planner::{plan, PlanError, TicketCountMode, TicketPlan, MAX_TICKET_COUNT};
pub use question::{
    import_file, ImportError, Question, QuestionCategory, QuestionError, QuestionStore,
    SortOrder, SqliteQuestionStore,
};
pub use render::{DocxRenderer, RenderContext, RenderError, RenderValue, Renderer, RichText};
pub use scratch::{CleanupReport, ScratchSpace};
pub use selection::{select, select_by_name, SelectionMode, UnknownModeError};
