pub mod generate;
pub mod questions;

use anyhow::{Context, Result};

use doctemplater_core::{Config, SqliteQuestionStore};

pub fn open_store(config: &Config) -> Result<SqliteQuestionStore> {
    SqliteQuestionStore::new(&config.database.path).with_context(|| {
        format!(
            "Failed to open question database {:?}",
            config.database.path
        )
    })
}

pub fn print_config(config: &Config) -> Result<()> {
    let rendered = toml::to_string_pretty(config).context("Failed to serialize configuration")?;
    print!("{}", rendered);
    Ok(())
}
