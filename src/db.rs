//! Database module for the chat widget
//!
//! Durable key-value flags, scoped by origin. Chat history is not stored
//! here; it only lives as long as its widget.

mod schema;

use schema::SCHEMA;

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Database connection lock poisoned")]
    Poisoned,
}

pub type DbResult<T> = Result<T, DbError>;

/// Thread-safe database handle
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open or create database at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let conn = Connection::open(path)?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.run_migrations()?;
        Ok(db)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.run_migrations()?;
        Ok(db)
    }

    fn lock(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| DbError::Poisoned)
    }

    fn run_migrations(&self) -> DbResult<()> {
        let conn = self.lock()?;
        conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Read a flag value, `None` if it was never written
    pub fn get_flag(&self, origin: &str, key: &str) -> DbResult<Option<String>> {
        let conn = self.lock()?;
        let value = conn
            .query_row(
                "SELECT value FROM flags WHERE origin = ?1 AND key = ?2",
                params![origin, key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    /// Write a flag value. Rewriting an existing flag replaces it.
    pub fn set_flag(&self, origin: &str, key: &str, value: &str) -> DbResult<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO flags (origin, key, value, updated_at) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(origin, key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![origin, key, value, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    /// Remove a flag, as if it was never written
    pub fn clear_flag(&self, origin: &str, key: &str) -> DbResult<()> {
        let conn = self.lock()?;
        conn.execute(
            "DELETE FROM flags WHERE origin = ?1 AND key = ?2",
            params![origin, key],
        )?;
        Ok(())
    }
}
