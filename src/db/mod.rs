//! The relational store handle and the row repositories built on it.
//!
//! A [`Database`] is always passed explicitly to whatever needs the store;
//! nothing here is process-global, so each test can open its own in-memory
//! database.

pub mod events;
pub mod regions;
pub mod schema_gen;

use std::path::Path;
use std::time::Duration;

use rusqlite::{Connection, OptionalExtension, TransactionBehavior};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::schema::{get_table, TableSchema, ALL_TABLES};
use schema_gen::{generate_create_table, generate_indexes, quote_ident};

/// Connection settings for a file-backed store
#[derive(Debug, Clone)]
pub struct StoreOptions {
    /// How long to wait for another writer before giving up
    pub busy_timeout: Duration,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            busy_timeout: Duration::from_millis(5000),
        }
    }
}

pub struct Database {
    conn: Connection,
    location: String,
}

impl Database {
    /// Open (creating if needed) a file-backed store
    pub fn open(db_path: &Path, options: &StoreOptions) -> Result<Self> {
        let location = db_path.display().to_string();
        let conn = Connection::open(db_path).map_err(|source| Error::StorageUnavailable {
            location: location.clone(),
            source,
        })?;

        configure(&conn, options, true).map_err(|source| Error::StorageUnavailable {
            location: location.clone(),
            source,
        })?;

        Ok(Self { conn, location })
    }

    /// Open an isolated in-memory store
    pub fn open_in_memory() -> Result<Self> {
        let location = ":memory:".to_string();
        let conn = Connection::open_in_memory().map_err(|source| Error::StorageUnavailable {
            location: location.clone(),
            source,
        })?;

        configure(&conn, &StoreOptions::default(), false).map_err(|source| {
            Error::StorageUnavailable {
                location: location.clone(),
                source,
            }
        })?;

        Ok(Self { conn, location })
    }

    /// Create the `region` and `event` tables if they do not exist.
    /// Existing tables are never altered or dropped.
    pub fn ensure_schema(&mut self) -> Result<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        for schema in ALL_TABLES {
            let sql = generate_create_table(schema);
            debug!(table = schema.name, "ensuring table");
            tx.execute(&sql, [])?;

            for index_sql in generate_indexes(schema) {
                tx.execute(&index_sql, [])?;
            }
        }

        tx.commit()?;
        info!(location = %self.location, "schema ready");
        Ok(())
    }

    /// Number of rows in a declared table
    pub fn count_rows(&self, table: &str) -> Result<u64> {
        let schema = get_table(table).ok_or_else(|| Error::UnknownTable(table.to_string()))?;
        Ok(count_rows_in(&self.conn, schema)?)
    }

    /// Whether a table exists in the store
    pub fn has_table(&self, name: &str) -> Result<bool> {
        let found: Option<String> = self
            .conn
            .query_row(
                "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1",
                [name],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn connection_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }
}

fn configure(conn: &Connection, options: &StoreOptions, file_backed: bool) -> rusqlite::Result<()> {
    conn.busy_timeout(options.busy_timeout)?;
    // The event -> region reference is advisory; events may name unknown NOCs
    conn.pragma_update(None, "foreign_keys", false)?;
    if file_backed {
        let mode: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
        debug!(journal_mode = %mode, "store opened");
    }
    Ok(())
}

pub(crate) fn count_rows_in(conn: &Connection, schema: &TableSchema) -> rusqlite::Result<u64> {
    let sql = format!("SELECT COUNT(*) FROM {}", quote_ident(schema.name));
    let count: i64 = conn.query_row(&sql, [], |row| row.get(0))?;
    Ok(count as u64)
}
