// src/db.rs
use chrono::{NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::APP_DIR;

pub const WORKOUTS_KEY: &str = "saved_workouts";
pub const TEMPLATES_KEY: &str = "workout_templates";
pub const WEIGHT_ENTRIES_KEY: &str = "weight_entries";
pub const SELECTED_TEMPLATE_KEY: &str = "selected_template";
pub const SESSION_KEY_PREFIX: &str = "session_";

const DB_FILE_NAME: &str = "fitness.sqlite";
const DATA_ENV_VAR: &str = "FITNESS_TRACKER_DATA_DIR";

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database connection failed: {0}")]
    Connection(#[from] rusqlite::Error),
    #[error("Failed to get application data directory")]
    DataDir,
    #[error("I/O error accessing database file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Stored data under '{key}' is corrupt: {source}")]
    CorruptData {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to serialize data for '{key}': {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Workout not found: {0}")]
    WorkoutNotFound(String),
    #[error("Identifier '{0}' matches more than one record. Use more characters.")]
    AmbiguousId(String),
    #[error("Template not found: {0}")]
    TemplateNotFound(String),
    #[error("A template named '{0}' already exists.")]
    TemplateExists(String),
    #[error("Template '{0}' has no exercises.")]
    EmptyTemplate(String),
    #[error("Weight entry not found: {0}")]
    WeightEntryNotFound(String),
    #[error("A weight entry for {0} already exists.")]
    WeightEntryExists(NaiveDate),
    #[error("No exercises in the session for {0}.")]
    EmptySession(NaiveDate),
    #[error("{what} number {index} is out of range (1-{len}).")]
    IndexOutOfRange {
        what: &'static str,
        index: usize,
        len: usize,
    },
    #[error("Set {set} of '{exercise}' is still empty. Fill it in before saving.")]
    UnfilledSet { exercise: String, set: usize },
    #[error("No exercise history found for '{0}'.")]
    NoExerciseHistory(String),
}

/// Minimal string key-value contract the rest of the crate persists through.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, Error>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), Error>;
    fn remove(&mut self, key: &str) -> Result<(), Error>;
    /// Keys starting with `prefix`, sorted.
    fn keys(&self, prefix: &str) -> Result<Vec<String>, Error>;
}

/// SQLite backed store. One row per key.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (or creates) the database file and its table.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let conn = Connection::open(path)?;
        init_db(&conn)?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self, Error> {
        let conn = Connection::open_in_memory()?;
        init_db(&conn)?;
        Ok(Self { conn })
    }
}

/// Initializes the key-value table if it doesn't exist.
fn init_db(conn: &Connection) -> Result<(), Error> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS kv_store (
            key TEXT PRIMARY KEY NOT NULL,
            value TEXT NOT NULL,
            updated_at TEXT           -- RFC3339
        )",
        [],
    )?;
    Ok(())
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, Error> {
        tracing::debug!(key, "reading key");
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), Error> {
        tracing::debug!(key, bytes = value.len(), "writing key");
        self.conn.execute(
            "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), Error> {
        tracing::debug!(key, "removing key");
        self.conn
            .execute("DELETE FROM kv_store WHERE key = ?1", params![key])?;
        Ok(())
    }

    fn keys(&self, prefix: &str) -> Result<Vec<String>, Error> {
        let mut stmt = self.conn.prepare(
            "SELECT key FROM kv_store WHERE substr(key, 1, length(?1)) = ?1 ORDER BY key",
        )?;
        let keys = stmt
            .query_map(params![prefix], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(keys)
    }
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, Error> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), Error> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), Error> {
        self.entries.remove(key);
        Ok(())
    }

    fn keys(&self, prefix: &str) -> Result<Vec<String>, Error> {
        Ok(self
            .entries
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }
}

/// Loads a JSON list stored under `key`. A missing key is an empty list.
pub fn load_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Vec<T>, Error> {
    Ok(load_value(store, key)?.unwrap_or_default())
}

/// Loads any JSON value stored under `key`.
pub fn load_value<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, Error> {
    store
        .get(key)?
        .map(|raw| {
            serde_json::from_str(&raw).map_err(|source| Error::CorruptData {
                key: key.to_string(),
                source,
            })
        })
        .transpose()
}

pub fn save_json<T: Serialize + ?Sized>(
    store: &mut dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), Error> {
    let raw = serde_json::to_string(value).map_err(|source| Error::Serialize {
        key: key.to_string(),
        source,
    })?;
    store.set(key, &raw)
}

pub fn session_key(date: NaiveDate) -> String {
    format!("{SESSION_KEY_PREFIX}{}", date.format("%Y-%m-%d"))
}

/// Gets the path to the SQLite database file.
/// `FITNESS_TRACKER_DATA_DIR` wins over the configured `storage_path`,
/// which wins over the platform data directory.
/// Creates the parent directory if it doesn't exist.
pub fn get_db_path(storage_path: Option<&Path>) -> Result<PathBuf, Error> {
    let db_path = if let Ok(dir) = std::env::var(DATA_ENV_VAR) {
        PathBuf::from(dir).join(DB_FILE_NAME)
    } else if let Some(path) = storage_path {
        path.to_path_buf()
    } else {
        let data_dir = dirs::data_dir().ok_or(Error::DataDir)?;
        data_dir.join(APP_DIR).join(DB_FILE_NAME)
    };
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(db_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise_store(store: &mut dyn KeyValueStore) {
        assert_eq!(store.get("missing").unwrap(), None);
        store.set("session_2024-01-15", "[]").unwrap();
        store.set("session_2024-01-16", "[1]").unwrap();
        store.set("saved_workouts", "[]").unwrap();
        store.set("session_2024-01-15", "[2]").unwrap();

        assert_eq!(
            store.get("session_2024-01-15").unwrap().as_deref(),
            Some("[2]")
        );
        assert_eq!(
            store.keys(SESSION_KEY_PREFIX).unwrap(),
            vec!["session_2024-01-15", "session_2024-01-16"]
        );

        store.remove("session_2024-01-15").unwrap();
        assert_eq!(store.get("session_2024-01-15").unwrap(), None);
        store.remove("never-set").unwrap();
    }

    #[test]
    fn memory_store_contract() {
        exercise_store(&mut MemoryStore::new());
    }

    #[test]
    fn sqlite_store_contract() {
        exercise_store(&mut SqliteStore::open_in_memory().unwrap());
    }

    #[test]
    fn sqlite_store_persists_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DB_FILE_NAME);
        {
            let mut store = SqliteStore::open(&path).unwrap();
            save_json(&mut store, WORKOUTS_KEY, &vec![1, 2, 3]).unwrap();
        }
        let store = SqliteStore::open(&path).unwrap();
        let loaded: Vec<i32> = load_json(&store, WORKOUTS_KEY).unwrap();
        assert_eq!(loaded, vec![1, 2, 3]);
    }

    #[test]
    fn corrupt_blob_reports_key() {
        let mut store = MemoryStore::new();
        store.set(TEMPLATES_KEY, "{not json").unwrap();
        let err = load_json::<i32>(&store, TEMPLATES_KEY).unwrap_err();
        assert!(matches!(err, Error::CorruptData { ref key, .. } if key == TEMPLATES_KEY));
    }

    #[test]
    fn missing_list_is_empty() {
        let store = MemoryStore::new();
        let loaded: Vec<String> = load_json(&store, WEIGHT_ENTRIES_KEY).unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn session_key_uses_iso_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(session_key(date), "session_2024-03-07");
    }
}
