//! Local record store for fireline.
//!
//! The store is an ordered list of [`IncidentRecord`]s persisted as
//! JSON text in a local `SQLite` key-value table, plus the draft index
//! marking the one in-progress record. The list is read-modify-written as
//! a whole; there is no per-record update primitive. Mutations that touch
//! both the list and the draft index run inside a transaction, so a failed
//! write never leaves a partial state behind.

pub mod migrations;
pub mod schema;

use std::path::{Path, PathBuf};

use rusqlite::{Connection, OptionalExtension};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::record::{IncidentRecord, IncidentStatus};

use self::schema::{DRAFT_INDEX_KEY, RECORDS_KEY};

/// Persistent store for incident records.
#[derive(Debug)]
pub struct Store {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
}

impl Store {
    /// Open or create a record store at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist.
    /// Initializes the schema if this is a new store.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema
    /// initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening record store at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::StoreOpen {
            path: path.clone(),
            source,
        })?;

        // Enable WAL mode for better concurrent read performance
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

        migrations::initialize_schema(&conn)?;

        info!("Record store opened at {}", path.display());
        Ok(Self { path, conn })
    }

    /// Create an in-memory store for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::StoreOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn,
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the full ordered record list.
    ///
    /// An absent records key means an empty store.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the stored JSON is corrupt.
    pub fn records(&self) -> Result<Vec<IncidentRecord>> {
        match kv_get(&self.conn, RECORDS_KEY)? {
            Some(text) => Ok(serde_json::from_str(&text)?),
            None => Ok(Vec::new()),
        }
    }

    /// Rewrite the whole record list.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save_records(&self, records: &[IncidentRecord]) -> Result<()> {
        let text = serde_json::to_string(records)?;
        kv_set(&self.conn, RECORDS_KEY, &text)?;
        debug!("Rewrote record list ({} records)", records.len());
        Ok(())
    }

    /// Get the index of the in-progress draft record, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the stored index is corrupt.
    pub fn draft_index(&self) -> Result<Option<usize>> {
        match kv_get(&self.conn, DRAFT_INDEX_KEY)? {
            Some(text) => text
                .parse::<usize>()
                .map(Some)
                .map_err(|_| Error::internal(format!("corrupt draft index: {text}"))),
            None => Ok(None),
        }
    }

    /// Append a new record and open a draft pointing at it.
    ///
    /// Runs as one transaction; returns the new record's index.
    ///
    /// # Errors
    ///
    /// Returns an error if the read, serialization, or write fails.
    pub fn append_draft(&mut self, record: IncidentRecord) -> Result<usize> {
        let mut records = self.records()?;
        records.push(record);
        let index = records.len() - 1;
        let text = serde_json::to_string(&records)?;

        let tx = self.conn.transaction()?;
        kv_set(&tx, RECORDS_KEY, &text)?;
        kv_set(&tx, DRAFT_INDEX_KEY, &index.to_string())?;
        tx.commit()?;

        info!("Opened draft at index {index}");
        Ok(index)
    }

    /// Commit a completed record list and clear the draft index, atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn commit_completion(&mut self, records: &[IncidentRecord]) -> Result<()> {
        let text = serde_json::to_string(records)?;

        let tx = self.conn.transaction()?;
        kv_set(&tx, RECORDS_KEY, &text)?;
        kv_delete(&tx, DRAFT_INDEX_KEY)?;
        tx.commit()?;

        debug!("Committed completion ({} records)", records.len());
        Ok(())
    }

    /// Drop the in-progress draft pointer, touching no records.
    ///
    /// Returns `true` if a draft was in progress.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn abandon_draft(&mut self) -> Result<bool> {
        let existed = kv_delete(&self.conn, DRAFT_INDEX_KEY)?;
        if existed {
            info!("Abandoned in-progress draft");
        }
        Ok(existed)
    }

    /// Count records in the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails.
    pub fn count(&self) -> Result<usize> {
        Ok(self.records()?.len())
    }

    /// Get store statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails.
    pub fn stats(&self) -> Result<StoreStats> {
        let records = self.records()?;
        let pending = records
            .iter()
            .filter(|r| r.status == IncidentStatus::Pending)
            .count();

        let db_size_bytes = if self.path.to_string_lossy() == ":memory:" {
            0
        } else {
            std::fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0)
        };

        Ok(StoreStats {
            total_records: records.len(),
            pending,
            draft_index: self.draft_index()?,
            db_size_bytes,
        })
    }

    /// Set the draft index directly. Test-only hook for simulating a stale
    /// pointer left behind by an interrupted flow.
    #[cfg(test)]
    pub fn set_draft_index_for_test(&self, index: usize) -> Result<()> {
        kv_set(&self.conn, DRAFT_INDEX_KEY, &index.to_string())
    }
}

/// Statistics about the store.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct StoreStats {
    /// Total number of records stored.
    pub total_records: usize,
    /// Number of records still pending completion.
    pub pending: usize,
    /// Index of the in-progress draft, if any.
    pub draft_index: Option<usize>,
    /// Size of the database file in bytes.
    pub db_size_bytes: u64,
}

fn kv_get(conn: &Connection, key: &str) -> Result<Option<String>> {
    let value = conn
        .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| {
            row.get(0)
        })
        .optional()?;
    Ok(value)
}

fn kv_set(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
        (key, value),
    )?;
    Ok(())
}

fn kv_delete(conn: &Connection, key: &str) -> Result<bool> {
    let affected = conn.execute("DELETE FROM kv WHERE key = ?1", [key])?;
    Ok(affected > 0)
}
