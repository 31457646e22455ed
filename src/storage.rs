//! The storage module provides the disk-backed response cache that fronts
//! every external call (page fetch, narrative generation, image generation)
//! using SQLite.

use anyhow::Result;
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};
use std::sync::{Arc, Mutex};

/// Cache operation name used for page-fetch responses.
pub const FETCH_OP: &str = "fetch";
/// Cache operation name used for narrative replies.
pub const NARRATIVE_OP: &str = "narrative";
/// Cache operation name used for generated image URLs.
pub const IMAGE_OP: &str = "image";

/// A transparent memoization layer for external calls.
///
/// Each stored value is keyed by an operation name plus the call's exact
/// argument string; identical arguments short-circuit to the stored result.
/// Implemented by [`Storage`] in production and by fakes in tests.
pub trait ResponseCache {
    /// Returns the stored value for `(op, key)` if one exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store cannot be read
    fn lookup(&self, op: &str, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `(op, key)`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store cannot be written
    fn store(&self, op: &str, key: &str, value: &str) -> Result<()>;
}

/// Storage provides database operations for persisting cached responses
/// across runs.
pub struct Storage {
    /// The underlying SQLite connection wrapped in Arc<Mutex<>> to make it thread-safe
    conn: Arc<Mutex<Connection>>,
}

impl Storage {
    /// Creates a new Storage instance with a database at the specified path.
    ///
    /// # Arguments
    ///
    /// * `database_path` - Path where the database file should be created or opened
    ///
    /// # Returns
    ///
    /// Returns a new Storage instance on success, or an error if database creation fails
    ///
    /// # Errors
    ///
    /// Returns an error if database creation fails
    pub fn new(database_path: &str) -> Result<Self> {
        let conn = Connection::open(database_path)?;

        Self::init_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Creates a Storage instance backed by an in-memory database.
    ///
    /// Nothing persists beyond the instance; intended for tests.
    ///
    /// # Errors
    ///
    /// Returns an error if database creation fails
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;

        Self::init_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Initializes the database schema with the responses table if it doesn't exist.
    fn init_schema(conn: &Connection) -> Result<()> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS responses (
                op TEXT NOT NULL,
                key TEXT NOT NULL,
                value TEXT NOT NULL,
                added_at INTEGER NOT NULL,
                PRIMARY KEY (op, key)
            )",
            params![],
        )?;

        Ok(())
    }
}

impl ResponseCache for Storage {
    /// Returns the stored value for `(op, key)` if one exists.
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned
    fn lookup(&self, op: &str, key: &str) -> Result<Option<String>> {
        let conn = self.conn.lock().expect("Storage mutex poisoned");
        let mut stmt = conn.prepare("SELECT value FROM responses WHERE op = ?1 AND key = ?2")?;
        let value: Result<Option<String>, rusqlite::Error> =
            stmt.query_row([op, key], |row| row.get(0)).optional();

        value.map_err(|e| e.into())
    }

    /// Stores `value` under `(op, key)`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned
    fn store(&self, op: &str, key: &str, value: &str) -> Result<()> {
        let conn = self.conn.lock().expect("Storage mutex poisoned");
        conn.execute(
            "INSERT OR REPLACE INTO responses (op, key, value, added_at) VALUES (?1, ?2, ?3, ?4)",
            params![op, key, value, Utc::now().timestamp()],
        )?;

        Ok(())
    }
}
