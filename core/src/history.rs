//! Recent-query history persisted in the settings database
//!
//! History is a JSON array of strings stored under a single key of the
//! `app_settings` key-value table. Most recent first, no case-insensitive
//! duplicates, at most [`MAX_HISTORY_ITEMS`] entries.

use crate::error::QuranError;
use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension};
use std::path::{Path, PathBuf};

pub const HISTORY_KEY: &str = "quranVerseHistory";
pub const MAX_HISTORY_ITEMS: usize = 15;

/// Get the data directory
///
/// - `AYAT_DATA_DIR` is handled by the caller; this is the fallback.
/// - Platform data directory (`~/.local/share/Ayat`, `~/Library/Application Support/Ayat`, ...)
/// - `./data` when no platform directory is known
pub fn get_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("Ayat"))
        .unwrap_or_else(|| PathBuf::from("data"))
}

/// Get the settings database path inside `data_dir`
pub fn get_settings_db_path(data_dir: &Path) -> PathBuf {
    data_dir.join("settings.db")
}

pub struct HistoryStore {
    db_path: PathBuf,
}

impl HistoryStore {
    /// Open (and create if missing) the settings database at `db_path`.
    pub fn open(db_path: PathBuf) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create data directory {:?}", parent))?;
        }

        let conn = Connection::open(&db_path)
            .with_context(|| format!("Failed to open settings database at {:?}", db_path))?;
        Self::init_tables(&conn)?;

        Ok(Self { db_path })
    }

    fn init_tables(conn: &Connection) -> rusqlite::Result<()> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS app_settings (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            "#,
        )
    }

    fn connection(&self) -> Result<Connection, QuranError> {
        Connection::open(&self.db_path)
            .map_err(|e| QuranError::Database(format!("unable to open database file: {}", e)))
    }

    /// Current history, most recent first. Corrupt stored data is discarded.
    pub fn get(&self) -> Result<Vec<String>, QuranError> {
        let conn = self.connection()?;
        let stored: Option<String> = conn
            .query_row(
                "SELECT value FROM app_settings WHERE key = ?1",
                [HISTORY_KEY],
                |row| row.get(0),
            )
            .optional()?;

        let Some(json) = stored else {
            return Ok(Vec::new());
        };

        match serde_json::from_str::<Vec<String>>(&json) {
            Ok(items) => Ok(items),
            Err(e) => {
                tracing::warn!("Failed to parse stored history, clearing it: {}", e);
                conn.execute("DELETE FROM app_settings WHERE key = ?1", [HISTORY_KEY])?;
                Ok(Vec::new())
            }
        }
    }

    /// Move `query` to the front of the history and return the new list.
    pub fn add(&self, query: &str) -> Result<Vec<String>, QuranError> {
        let history = push_front(self.get()?, query);

        let json = serde_json::to_string(&history)
            .map_err(|e| QuranError::Database(format!("Failed to encode history: {}", e)))?;
        self.connection()?.execute(
            "INSERT INTO app_settings (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            [HISTORY_KEY, json.as_str()],
        )?;

        Ok(history)
    }

    pub fn clear(&self) -> Result<(), QuranError> {
        self.connection()?
            .execute("DELETE FROM app_settings WHERE key = ?1", [HISTORY_KEY])?;
        Ok(())
    }
}

fn push_front(history: Vec<String>, query: &str) -> Vec<String> {
    let lowered = query.to_lowercase();
    std::iter::once(query.to_string())
        .chain(history.into_iter().filter(|item| item.to_lowercase() != lowered))
        .take(MAX_HISTORY_ITEMS)
        .collect()
}
