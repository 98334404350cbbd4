//! Entry CRUD operations.
//!
//! This module provides functions for creating, reading, updating, and
//! deleting journal entries in the database. Each function works on a single
//! connection; `Database` wraps them behind the `EntryStore` trait.

use crate::constants::DATETIME_FORMAT_STORAGE;
use crate::errors::{AppResult, DatabaseError};
use crate::journal_core::{EntryDraft, EntryId, JournalEntry};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::debug;

const ENTRY_COLUMNS: &str = "id, title, content, date, image_data";

/// Inserts a new journal entry.
///
/// # Arguments
///
/// * `conn` - Database connection
/// * `entry` - Entry to insert; its id must not exist yet
///
/// # Errors
///
/// Returns an error if the database operation fails, including a primary key
/// conflict on `id`.
pub fn insert_entry(conn: &Connection, entry: &JournalEntry) -> AppResult<()> {
    debug!("Inserting entry {} dated {}", entry.id, entry.date);

    conn.execute(
        r#"
        INSERT INTO entries (id, title, content, date, image_data)
        VALUES (?1, ?2, ?3, ?4, ?5)
        "#,
        params![
            entry.id.to_string(),
            entry.title,
            entry.content,
            format_stored_date(entry.date),
            entry.image_data,
        ],
    )
    .map_err(DatabaseError::Sqlite)?;

    Ok(())
}

/// Overwrites the editable fields of an entry in place.
///
/// # Errors
///
/// Returns `DatabaseError::NotFound` if no entry has this id, or an error if
/// the database operation fails.
pub fn update_entry(conn: &Connection, id: EntryId, draft: &EntryDraft) -> AppResult<()> {
    debug!("Updating entry {}", id);

    let rows_affected = conn
        .execute(
            r#"
            UPDATE entries
            SET title = ?2, content = ?3, date = ?4, image_data = ?5,
                updated_at = CURRENT_TIMESTAMP
            WHERE id = ?1
            "#,
            params![
                id.to_string(),
                draft.title,
                draft.content,
                format_stored_date(draft.date),
                draft.image_data,
            ],
        )
        .map_err(DatabaseError::Sqlite)?;

    if rows_affected == 0 {
        return Err(DatabaseError::NotFound(format!("Entry with id {} not found", id)).into());
    }

    Ok(())
}

/// Deletes an entry permanently.
///
/// # Errors
///
/// Returns `DatabaseError::NotFound` if no entry has this id, or an error if
/// the database operation fails.
pub fn delete_entry(conn: &Connection, id: EntryId) -> AppResult<()> {
    debug!("Deleting entry {}", id);

    let rows_affected = conn
        .execute("DELETE FROM entries WHERE id = ?1", params![id.to_string()])
        .map_err(DatabaseError::Sqlite)?;

    if rows_affected == 0 {
        return Err(DatabaseError::NotFound(format!("Entry with id {} not found", id)).into());
    }

    Ok(())
}

/// Retrieves an entry by id.
///
/// # Errors
///
/// Returns an error if the database operation fails.
/// Returns `Ok(None)` if no entry has this id.
pub fn get_entry(conn: &Connection, id: EntryId) -> AppResult<Option<JournalEntry>> {
    debug!("Getting entry {}", id);

    conn.query_row(
        &format!("SELECT {} FROM entries WHERE id = ?1", ENTRY_COLUMNS),
        params![id.to_string()],
        row_to_entry,
    )
    .optional()
    .map_err(|e| DatabaseError::Sqlite(e).into())
}

/// Retrieves every entry, newest diary date first.
///
/// Entries with the same date come back in insertion order.
///
/// # Errors
///
/// Returns an error if the database operation fails or a stored row is
/// malformed.
pub fn fetch_all_entries(conn: &Connection) -> AppResult<Vec<JournalEntry>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {} FROM entries ORDER BY date DESC, rowid ASC",
            ENTRY_COLUMNS
        ))
        .map_err(DatabaseError::Sqlite)?;

    let entries = stmt
        .query_map([], row_to_entry)
        .map_err(DatabaseError::Sqlite)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(DatabaseError::Sqlite)?;

    debug!("Fetched {} entries", entries.len());
    Ok(entries)
}

fn format_stored_date(date: NaiveDateTime) -> String {
    date.format(DATETIME_FORMAT_STORAGE).to_string()
}

fn row_to_entry(row: &Row<'_>) -> rusqlite::Result<JournalEntry> {
    let id_text: String = row.get(0)?;
    let id = id_text.parse::<EntryId>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })?;

    let date_text: String = row.get(3)?;
    let date = NaiveDateTime::parse_from_str(&date_text, DATETIME_FORMAT_STORAGE).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(JournalEntry {
        id,
        title: row.get(1)?,
        content: row.get(2)?,
        date,
        image_data: row.get(4)?,
    })
}
