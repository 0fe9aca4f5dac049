//! Key-value persistence module
//!
//! Favorites and goals survive between sessions in a small string-keyed
//! store. The derivation engine never touches it; callers load a
//! configuration, pass it in by value and save whatever the user changed.
//!
//! - `KeyValueStore`: the injected interface
//! - `SqliteStore`: file-backed implementation
//! - `MemoryStore`: ephemeral implementation for tests and previews

pub mod favorites;
pub mod goals;
pub mod schema;

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use rusqlite::{params, Connection, OptionalExtension};
use thiserror::Error;

pub use favorites::{FavoriteDraft, FavoritesRepository};
pub use goals::GoalsRepository;

/// Storage key for pinned analytics widgets
pub const FAVORITES_KEY: &str = "mf_favorite_charts";
/// Storage key for per-property goals
pub const GOALS_KEY: &str = "eb_goals";

/// Store errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid value: {0}")]
    Invalid(String),

    #[error("Lock poisoned")]
    LockPoisoned,
}

/// String-keyed persistence used for caller configuration
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// In-memory store
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.lock().map_err(|_| StoreError::LockPoisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().map_err(|_| StoreError::LockPoisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().map_err(|_| StoreError::LockPoisoned)?;
        entries.remove(key);
        Ok(())
    }
}

/// SQLite-backed store
pub struct SqliteStore {
    conn: Mutex<Connection>,
    path: Option<PathBuf>,
}

impl SqliteStore {
    /// Open (or create) a store file and make sure the schema exists
    pub fn open(path: PathBuf) -> Result<Self, StoreError> {
        let conn = Connection::open(&path)?;
        schema::create_tables(&conn)?;
        tracing::debug!("Opened key-value store at {:?}", path);

        Ok(Self {
            conn: Mutex::new(conn),
            path: Some(path),
        })
    }

    /// Store that lives only as long as this value
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        schema::create_tables(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
            path: None,
        })
    }

    /// Get the store file path, `None` for in-memory stores
    pub fn path(&self) -> Option<&PathBuf> {
        self.path.as_ref()
    }

    /// Execute a query with the store connection
    pub fn with_connection<F, T>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&Connection) -> Result<T, StoreError>,
    {
        let conn = self.conn.lock().map_err(|_| StoreError::LockPoisoned)?;
        f(&conn)
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.with_connection(|conn| {
            let value = conn
                .query_row(
                    "SELECT value FROM kv_store WHERE key = ?1",
                    params![key],
                    |row| row.get::<_, String>(0),
                )
                .optional()?;
            Ok(value)
        })
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.with_connection(|conn| {
            conn.execute(
                "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, CURRENT_TIMESTAMP)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = CURRENT_TIMESTAMP",
                params![key, value],
            )?;
            Ok(())
        })
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.with_connection(|conn| {
            conn.execute("DELETE FROM kv_store WHERE key = ?1", params![key])?;
            Ok(())
        })
    }
}

/// Get the default store path
pub fn default_store_path() -> PathBuf {
    let data_dir = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));

    data_dir.join("energoboard").join("storage.db")
}
