//! Persistence for per-category timing models.
//!
//! The engine only needs load-by-key and save-by-key; [`TimingStore`]
//! captures that. [`SqliteTimingStore`] keeps one row per category with the
//! model encoded as JSON.

use std::path::Path;

use chrono::Utc;
use rusqlite::{params, Connection};

use super::data_dir;
use crate::error::{Result, StoreError};
use crate::timing::TimingModel;

/// Key-value persistence for [`TimingModel`]s, keyed by category.
pub trait TimingStore {
    /// Load the model for `category`, if one was saved.
    fn load(&self, category: &str) -> Result<Option<TimingModel>>;

    /// Insert or replace the model under its category.
    fn save(&self, model: &TimingModel) -> Result<()>;

    /// Every category with a saved model, sorted.
    fn categories(&self) -> Result<Vec<String>>;
}

/// SQLite-backed timing model store.
pub struct SqliteTimingStore {
    conn: Connection,
}

impl SqliteTimingStore {
    /// Open the store at `~/.config/nudge/nudge.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    pub fn open() -> Result<Self> {
        let dir = data_dir()?;
        Self::open_at(&dir.join("nudge.db"))
    }

    /// Open the store at an explicit path.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| StoreError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    /// Open an in-memory store (tests and dry runs).
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> Result<()> {
        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS timing_models (
                    category    TEXT PRIMARY KEY,
                    model       TEXT NOT NULL,
                    updated_at  TEXT NOT NULL
                );",
            )
            .map_err(|e| StoreError::MigrationFailed(e.to_string()))?;
        Ok(())
    }

    /// Delete the saved model for `category`. Returns whether a row existed.
    pub fn delete(&self, category: &str) -> Result<bool> {
        let removed = self.conn.execute(
            "DELETE FROM timing_models WHERE category = ?1",
            params![category],
        )?;
        Ok(removed > 0)
    }
}

impl TimingStore for SqliteTimingStore {
    fn load(&self, category: &str) -> Result<Option<TimingModel>> {
        let mut stmt = self
            .conn
            .prepare("SELECT model FROM timing_models WHERE category = ?1")?;
        let raw = match stmt.query_row(params![category], |row| row.get::<_, String>(0)) {
            Ok(raw) => raw,
            Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let mut model: TimingModel =
            serde_json::from_str(&raw).map_err(|e| StoreError::Corrupt {
                category: category.to_string(),
                message: e.to_string(),
            })?;
        if model.sanitize() {
            tracing::warn!(category, "stored timing model had out-of-range values");
        }
        Ok(Some(model))
    }

    fn save(&self, model: &TimingModel) -> Result<()> {
        let raw = serde_json::to_string(model)?;
        self.conn.execute(
            "INSERT OR REPLACE INTO timing_models (category, model, updated_at)
             VALUES (?1, ?2, ?3)",
            params![model.category(), raw, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    fn categories(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT category FROM timing_models ORDER BY category")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;

    #[test]
    fn save_and_load() {
        let store = SqliteTimingStore::open_memory().unwrap();
        assert!(store.load("contact").unwrap().is_none());

        let mut model = TimingModel::new("contact");
        model.record_sent();
        store.save(&model).unwrap();

        let loaded = store.load("contact").unwrap().unwrap();
        assert_eq!(loaded.total_sent(), 1);
        assert_eq!(loaded.category(), "contact");
    }

    #[test]
    fn save_replaces_existing_row() {
        let store = SqliteTimingStore::open_memory().unwrap();
        let mut model = TimingModel::new("goal");
        store.save(&model).unwrap();
        model.record_sent();
        model.record_sent();
        store.save(&model).unwrap();

        assert_eq!(store.categories().unwrap(), vec!["goal".to_string()]);
        assert_eq!(store.load("goal").unwrap().unwrap().total_sent(), 2);
    }

    #[test]
    fn categories_are_sorted() {
        let store = SqliteTimingStore::open_memory().unwrap();
        for category in ["streak", "contact", "goal"] {
            store.save(&TimingModel::new(category)).unwrap();
        }
        assert_eq!(store.categories().unwrap(), vec!["contact", "goal", "streak"]);
        assert!(store.delete("goal").unwrap());
        assert!(!store.delete("goal").unwrap());
    }

    #[test]
    fn corrupt_row_is_reported() {
        let store = SqliteTimingStore::open_memory().unwrap();
        store
            .conn
            .execute(
                "INSERT INTO timing_models (category, model, updated_at) VALUES ('bad', '{', '')",
                [],
            )
            .unwrap();
        let err = store.load("bad").unwrap_err();
        assert!(matches!(err, CoreError::Store(StoreError::Corrupt { .. })));
    }
}
