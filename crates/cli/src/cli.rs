//! Command-line arguments.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};

use doctemplater_core::{QuestionCategory, SelectionMode, SortOrder, TicketCountMode};

#[derive(Debug, Parser)]
#[command(
    name = "doctemplater",
    version,
    about = "Generate exam ticket documents from a question bank"
)]
pub struct Cli {
    /// Configuration file (default: $DOCTEMPLATER_CONFIG or doctemplater.toml)
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty, global = true)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage the question bank
    #[command(subcommand)]
    Questions(QuestionsCommand),

    /// Generate a ticket document
    Generate(GenerateArgs),

    /// Print the effective configuration
    Config,
}

#[derive(Debug, Subcommand)]
pub enum QuestionsCommand {
    /// Add one question per argument
    Add {
        #[arg(long, short = 't')]
        category: QuestionCategory,
        #[arg(required = true)]
        texts: Vec<String>,
    },

    /// Import questions from a .txt or .docx file
    Import {
        #[arg(long, short = 't')]
        category: QuestionCategory,
        file: PathBuf,
    },

    /// Read questions from stdin, one per line
    Paste {
        #[arg(long, short = 't')]
        category: QuestionCategory,
    },

    /// List stored questions
    List {
        #[arg(long, short = 't')]
        category: QuestionCategory,
        #[arg(long, default_value = "asc")]
        order: SortOrder,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Replace the text of a question
    Edit { id: i64, text: String },

    /// Delete questions by id
    Remove {
        #[arg(required = true)]
        ids: Vec<i64>,
    },
}

#[derive(Debug, Clone, Args)]
pub struct GenerateArgs {
    /// Output .docx path
    #[arg(long, short)]
    pub output: PathBuf,

    #[arg(long, default_value = "")]
    pub subject: String,

    /// Specialty
    #[arg(long = "spec", default_value = "")]
    pub specialty: String,

    /// Subject committee chair
    #[arg(long = "cmk", default_value = "")]
    pub committee_chair: String,

    #[arg(long, default_value = "")]
    pub tutor: String,

    /// Exam date (YYYY-MM-DD)
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Mark tickets as qualifying-exam tickets
    #[arg(long)]
    pub qualifying: bool,

    /// manual, practical or theoretical (default from configuration)
    #[arg(long)]
    pub count_mode: Option<TicketCountMode>,

    /// Ticket count; implies manual mode unless --count-mode is given
    #[arg(long)]
    pub count: Option<i64>,

    /// sequential, always_random or fallback_random
    #[arg(long)]
    pub practical_mode: Option<SelectionMode>,

    /// sequential, always_random or fallback_random
    #[arg(long)]
    pub theoretical_mode: Option<SelectionMode>,

    /// Template overriding the configured one
    #[arg(long)]
    pub template: Option<PathBuf>,

    /// Print the run report as JSON
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_questions_add() {
        let cli = Cli::try_parse_from([
            "doctemplater",
            "questions",
            "add",
            "--category",
            "practical",
            "First",
            "Second",
        ])
        .unwrap();

        match cli.command {
            Command::Questions(QuestionsCommand::Add { category, texts }) => {
                assert_eq!(category, QuestionCategory::Practical);
                assert_eq!(texts, vec!["First", "Second"]);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_questions_list_defaults() {
        let cli =
            Cli::try_parse_from(["doctemplater", "questions", "list", "-t", "theory"]).unwrap();
        match cli.command {
            Command::Questions(QuestionsCommand::List {
                category,
                order,
                json,
            }) => {
                assert_eq!(category, QuestionCategory::Theoretical);
                assert_eq!(order, SortOrder::Asc);
                assert!(!json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_unknown_category_fails() {
        let result =
            Cli::try_parse_from(["doctemplater", "questions", "paste", "--category", "oral"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_generate() {
        let cli = Cli::try_parse_from([
            "doctemplater",
            "--log-format",
            "json",
            "generate",
            "--output",
            "tickets.docx",
            "--subject",
            "Networks",
            "--cmk",
            "Ivanova",
            "--date",
            "2024-05-07",
            "--qualifying",
            "--count",
            "12",
            "--practical-mode",
            "fallback",
        ])
        .unwrap();

        assert_eq!(cli.log_format, LogFormat::Json);
        let Command::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(args.output, PathBuf::from("tickets.docx"));
        assert_eq!(args.subject, "Networks");
        assert_eq!(args.committee_chair, "Ivanova");
        assert_eq!(args.specialty, "");
        assert_eq!(args.date, NaiveDate::from_ymd_opt(2024, 5, 7));
        assert!(args.qualifying);
        assert_eq!(args.count, Some(12));
        assert_eq!(args.practical_mode, Some(SelectionMode::FallbackRandom));
        assert_eq!(args.theoretical_mode, None);
    }

    #[test]
    fn test_parse_generate_rejects_unknown_mode() {
        let result = Cli::try_parse_from([
            "doctemplater",
            "generate",
            "-o",
            "out.docx",
            "--count-mode",
            "by_chapter",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_generate_requires_output() {
        assert!(Cli::try_parse_from(["doctemplater", "generate"]).is_err());
    }

    #[test]
    fn test_global_config_after_subcommand() {
        let cli = Cli::try_parse_from(["doctemplater", "config", "--config", "custom.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
        assert!(matches!(cli.command, Command::Config));
    }
}
