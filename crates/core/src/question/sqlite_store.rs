//! SQLite-backed question store implementation.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rusqlite::types::ValueRef;
use rusqlite::{params, Connection};
use tracing::debug;

use super::store::normalize_text;
use super::{Question, QuestionCategory, QuestionError, QuestionStore, SortOrder};

const SELECT_COLUMNS: &str = "SELECT id, question, question_type, created_at FROM questions";

/// SQLite-backed question store.
pub struct SqliteQuestionStore {
    conn: Mutex<Connection>,
}

impl SqliteQuestionStore {
    /// Create a new SQLite question store, creating the database file and tables if needed.
    pub fn new(path: &Path) -> Result<Self, QuestionError> {
        let conn = Connection::open(path)?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory SQLite question store (useful for testing).
    pub fn in_memory() -> Result<Self, QuestionError> {
        let conn = Connection::open_in_memory()?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), QuestionError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS questions (
                id INTEGER PRIMARY KEY,
                question TEXT NOT NULL,
                question_type TEXT CHECK (question_type IN ('theory', 'practice'))
            );

            CREATE INDEX IF NOT EXISTS idx_questions_type ON questions(question_type);
            "#,
        )?;

        // Migration: databases created by earlier releases lack created_at
        let _ = conn.execute("ALTER TABLE questions ADD COLUMN created_at TEXT", []);

        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, QuestionError> {
        self.conn
            .lock()
            .map_err(|_| QuestionError::Database("connection lock poisoned".to_string()))
    }

    fn row_to_question(row: &rusqlite::Row) -> rusqlite::Result<Question> {
        let id: i64 = row.get(0)?;
        // Older tables declared the column with numeric affinity, so a purely
        // numeric question comes back as an integer or a real.
        let text = match row.get_ref(1)? {
            ValueRef::Text(bytes) => String::from_utf8_lossy(bytes).into_owned(),
            ValueRef::Integer(i) => i.to_string(),
            ValueRef::Real(f) => f.to_string(),
            ValueRef::Blob(bytes) => String::from_utf8_lossy(bytes).into_owned(),
            ValueRef::Null => String::new(),
        };
        let question_type: String = row.get(2)?;
        let created_at_str: Option<String> = row.get(3)?;

        let category = QuestionCategory::from_db_str(&question_type).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                2,
                rusqlite::types::Type::Text,
                format!("unknown question_type: {}", question_type).into(),
            )
        })?;

        let created_at = created_at_str.and_then(|s| {
            DateTime::parse_from_rfc3339(&s)
                .map(|dt| dt.with_timezone(&Utc))
                .ok()
        });

        Ok(Question {
            id,
            text,
            category,
            created_at,
        })
    }

    fn insert_row(
        conn: &Connection,
        text: String,
        category: QuestionCategory,
        now: DateTime<Utc>,
    ) -> Result<Question, QuestionError> {
        conn.execute(
            "INSERT INTO questions (question, question_type, created_at) VALUES (?, ?, ?)",
            params![text, category.as_db_str(), now.to_rfc3339()],
        )?;

        Ok(Question {
            id: conn.last_insert_rowid(),
            text,
            category,
            created_at: Some(now),
        })
    }
}

impl QuestionStore for SqliteQuestionStore {
    fn insert_one(
        &self,
        text: &str,
        category: QuestionCategory,
    ) -> Result<Question, QuestionError> {
        let text = normalize_text(text)?;
        let conn = self.lock()?;
        let question = Self::insert_row(&conn, text, category, Utc::now())?;
        debug!(id = question.id, %category, "Inserted question");
        Ok(question)
    }

    fn insert_many(
        &self,
        texts: &[String],
        category: QuestionCategory,
    ) -> Result<Vec<Question>, QuestionError> {
        // Validate everything before touching the database
        let validated = texts
            .iter()
            .map(|t| normalize_text(t))
            .collect::<Result<Vec<_>, _>>()?;

        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let now = Utc::now();

        let mut inserted = Vec::with_capacity(validated.len());
        for text in validated {
            inserted.push(Self::insert_row(&tx, text, category, now)?);
        }
        tx.commit()?;

        debug!(count = inserted.len(), %category, "Inserted questions");
        Ok(inserted)
    }

    fn update(&self, edits: &BTreeMap<i64, String>) -> Result<usize, QuestionError> {
        let validated = edits
            .iter()
            .map(|(id, text)| normalize_text(text).map(|t| (*id, t)))
            .collect::<Result<Vec<_>, _>>()?;

        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        for (id, text) in &validated {
            let changed = tx.execute(
                "UPDATE questions SET question = ? WHERE id = ?",
                params![text, id],
            )?;
            if changed == 0 {
                // Dropping the transaction rolls back earlier updates
                return Err(QuestionError::NotFound(*id));
            }
        }
        tx.commit()?;

        Ok(validated.len())
    }

    fn delete(&self, id: i64) -> Result<(), QuestionError> {
        let conn = self.lock()?;
        let changed = conn.execute("DELETE FROM questions WHERE id = ?", params![id])?;
        if changed == 0 {
            return Err(QuestionError::NotFound(id));
        }
        debug!(id, "Deleted question");
        Ok(())
    }

    fn get(&self, id: i64) -> Result<Option<Question>, QuestionError> {
        let conn = self.lock()?;

        let result = conn.query_row(
            &format!("{} WHERE id = ?", SELECT_COLUMNS),
            params![id],
            Self::row_to_question,
        );

        match result {
            Ok(question) => Ok(Some(question)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(QuestionError::Database(e.to_string())),
        }
    }

    fn read_ordered(
        &self,
        category: QuestionCategory,
        order: SortOrder,
    ) -> Result<Vec<Question>, QuestionError> {
        let conn = self.lock()?;

        let sql = format!(
            "{} WHERE question_type = ? ORDER BY id {}",
            SELECT_COLUMNS,
            order.as_sql()
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![category.as_db_str()], Self::row_to_question)?;

        let mut questions = Vec::new();
        for row_result in rows {
            questions.push(row_result?);
        }

        Ok(questions)
    }

    fn count(&self, category: QuestionCategory) -> Result<usize, QuestionError> {
        let conn = self.lock()?;

        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM questions WHERE question_type = ?",
            params![category.as_db_str()],
            |row| row.get(0),
        )?;

        Ok(count as usize)
    }
}
