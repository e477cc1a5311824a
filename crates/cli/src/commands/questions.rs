//! Question bank commands.

use std::collections::BTreeMap;
use std::io::Read;

use anyhow::{bail, Context, Result};
use tracing::info;

use doctemplater_core::question::parse_plain_text;
use doctemplater_core::{import_file, Config, Question, QuestionCategory, QuestionStore};

use super::open_store;
use crate::cli::QuestionsCommand;

pub fn run(command: QuestionsCommand, config: &Config) -> Result<()> {
    let store = open_store(config)?;
    execute(command, &store, &mut std::io::stdin().lock())
}

/// Run a question command against `store`, reading pasted text from `input`.
fn execute(command: QuestionsCommand, store: &dyn QuestionStore, input: &mut dyn Read) -> Result<()> {
    match command {
        QuestionsCommand::Add { category, texts } => {
            let added = store
                .insert_many(&texts, category)
                .context("Failed to add questions")?;
            report_added(&added, category);
        }
        QuestionsCommand::Import { category, file } => {
            let texts = import_file(&file)
                .with_context(|| format!("Failed to import questions from {:?}", file))?;
            let added = store
                .insert_many(&texts, category)
                .context("Failed to store imported questions")?;
            report_added(&added, category);
        }
        QuestionsCommand::Paste { category } => {
            let mut text = String::new();
            input
                .read_to_string(&mut text)
                .context("Failed to read questions from stdin")?;
            let texts = parse_plain_text(&text);
            if texts.is_empty() {
                bail!("No questions in input");
            }
            let added = store
                .insert_many(&texts, category)
                .context("Failed to store pasted questions")?;
            report_added(&added, category);
        }
        QuestionsCommand::List {
            category,
            order,
            json,
        } => {
            let questions = store
                .read_ordered(category, order)
                .context("Failed to read questions")?;
            if json {
                println!("{}", serde_json::to_string_pretty(&questions)?);
            } else {
                for question in &questions {
                    println!("{:>5}  {}", question.id, question.text);
                }
            }
        }
        QuestionsCommand::Edit { id, text } => {
            let edits = BTreeMap::from([(id, text)]);
            store
                .update(&edits)
                .with_context(|| format!("Failed to edit question {}", id))?;
            info!(id, "Question updated");
        }
        QuestionsCommand::Remove { ids } => {
            for id in ids {
                store
                    .delete(id)
                    .with_context(|| format!("Failed to remove question {}", id))?;
                info!(id, "Question removed");
            }
        }
    }
    Ok(())
}

fn report_added(added: &[Question], category: QuestionCategory) {
    info!(count = added.len(), %category, "Questions added");
    println!("Added {} {} question(s)", added.len(), category);
}
