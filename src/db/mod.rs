//! Database operations for journal entries and settings.
//!
//! This module provides SQLite storage for diary entries. It uses connection
//! pooling via r2d2, and exposes the entry operations the rest of the crate
//! needs through the [`EntryStore`] trait.
//!
//! # Module Structure
//!
//! - `schema`: Table definitions and schema initialization
//! - `entries`: Entry CRUD operations
//! - `settings`: Key/value settings used by the access gate
//!
//! # Example
//!
//! ```no_run
//! use daybook::db::{Database, EntryStore};
//! use std::path::Path;
//!
//! let db = Database::open(Path::new("/tmp/daybook.db"))?;
//! db.initialize_schema()?;
//! let snapshot = db.fetch_all()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod entries;
pub mod schema;
pub mod settings;

use crate::errors::{AppResult, DatabaseError};
use crate::journal_core::{EntryDraft, EntryId, JournalEntry};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// Type alias for a pooled SQLite connection.
pub type PooledConnection = r2d2::PooledConnection<SqliteConnectionManager>;

/// Durable, keyed collection of journal entries.
///
/// The query and aggregation code never calls a store directly; it only sees
/// the snapshot returned by [`EntryStore::fetch_all`]. Every call is atomic
/// from the caller's point of view, and callers re-fetch a full snapshot
/// after any write.
pub trait EntryStore {
    /// Every entry. Order is newest first but callers must not rely on it.
    fn fetch_all(&self) -> AppResult<Vec<JournalEntry>>;

    /// A single entry, if it exists.
    fn get(&self, id: EntryId) -> AppResult<Option<JournalEntry>>;

    /// Adds a new entry.
    fn insert(&self, entry: &JournalEntry) -> AppResult<()>;

    /// Replaces the editable fields of `entry` and returns the stored result.
    fn update(&self, entry: &JournalEntry, changes: &EntryDraft) -> AppResult<JournalEntry>;

    /// Removes `entry` permanently.
    fn delete(&self, entry: &JournalEntry) -> AppResult<()>;
}

impl<T: EntryStore + ?Sized> EntryStore for &T {
    fn fetch_all(&self) -> AppResult<Vec<JournalEntry>> {
        (**self).fetch_all()
    }

    fn get(&self, id: EntryId) -> AppResult<Option<JournalEntry>> {
        (**self).get(id)
    }

    fn insert(&self, entry: &JournalEntry) -> AppResult<()> {
        (**self).insert(entry)
    }

    fn update(&self, entry: &JournalEntry, changes: &EntryDraft) -> AppResult<JournalEntry> {
        (**self).update(entry, changes)
    }

    fn delete(&self, entry: &JournalEntry) -> AppResult<()> {
        (**self).delete(entry)
    }
}

/// Database handle with connection pooling.
pub struct Database {
    pool: Pool<SqliteConnectionManager>,
}

impl Database {
    /// Opens or creates the SQLite database at `db_path`.
    ///
    /// If the database file doesn't exist, it will be created. At-rest
    /// protection is left to the platform's storage.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Database file cannot be opened
    /// - The file is not a SQLite database
    /// - Connection pool cannot be initialized
    pub fn open(db_path: &Path) -> AppResult<Self> {
        debug!("Opening database at: {:?}", db_path);

        let manager = SqliteConnectionManager::file(db_path);
        let pool = Pool::builder()
            .max_size(5)
            .connection_timeout(Duration::from_secs(5))
            .connection_customizer(Box::new(ConnectionPragmas {
                busy_timeout: Duration::from_secs(5),
            }))
            .build(manager)
            .map_err(DatabaseError::Pool)?;

        // Fail early on unreadable or foreign files
        let conn = pool.get().map_err(DatabaseError::Pool)?;
        conn.query_row("SELECT COUNT(*) FROM sqlite_master", [], |row| {
            row.get::<_, i64>(0)
        })
        .map_err(DatabaseError::Sqlite)?;
        drop(conn);

        info!("Database opened successfully");
        Ok(Database { pool })
    }

    /// Gets a connection from the pool.
    ///
    /// # Errors
    ///
    /// Returns an error if no connection is available or the pool is exhausted.
    pub fn get_conn(&self) -> AppResult<PooledConnection> {
        self.pool
            .get()
            .map_err(|e| DatabaseError::Pool(e).into())
    }

    /// Initializes the database schema.
    ///
    /// Creates all necessary tables and indexes if they don't exist.
    /// This is idempotent and safe to call multiple times.
    ///
    /// # Errors
    ///
    /// Returns an error if schema creation fails.
    pub fn initialize_schema(&self) -> AppResult<()> {
        let conn = self.get_conn()?;
        schema::create_tables(&conn)?;
        info!("Database schema initialized");
        Ok(())
    }
}

impl EntryStore for Database {
    fn fetch_all(&self) -> AppResult<Vec<JournalEntry>> {
        let conn = self.get_conn()?;
        entries::fetch_all_entries(&conn)
    }

    fn get(&self, id: EntryId) -> AppResult<Option<JournalEntry>> {
        let conn = self.get_conn()?;
        entries::get_entry(&conn, id)
    }

    fn insert(&self, entry: &JournalEntry) -> AppResult<()> {
        let conn = self.get_conn()?;
        entries::insert_entry(&conn, entry)
    }

    fn update(&self, entry: &JournalEntry, changes: &EntryDraft) -> AppResult<JournalEntry> {
        let conn = self.get_conn()?;
        entries::update_entry(&conn, entry.id, changes)?;

        Ok(JournalEntry {
            id: entry.id,
            title: changes.title.clone(),
            content: changes.content.clone(),
            date: changes.date,
            image_data: changes.image_data.clone(),
        })
    }

    fn delete(&self, entry: &JournalEntry) -> AppResult<()> {
        let conn = self.get_conn()?;
        entries::delete_entry(&conn, entry.id)
    }
}

/// Connection customizer applied to every pooled connection.
#[derive(Debug)]
struct ConnectionPragmas {
    busy_timeout: Duration,
}

impl r2d2::CustomizeConnection<Connection, rusqlite::Error> for ConnectionPragmas {
    fn on_acquire(&self, conn: &mut Connection) -> Result<(), rusqlite::Error> {
        conn.busy_timeout(self.busy_timeout)?;
        conn.pragma_update(None, "foreign_keys", 1)?;
        Ok(())
    }

    fn on_release(&self, _conn: Connection) {}
}
