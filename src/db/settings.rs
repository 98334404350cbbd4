//! Key/value settings storage.
//!
//! Holds the few values that must survive between runs but are not entries:
//! the unlock passphrase hash and the time of the last successful unlock.

use crate::errors::{AppResult, DatabaseError};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

/// Reads a setting. Returns `Ok(None)` if it was never set.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn get_setting(conn: &Connection, key: &str) -> AppResult<Option<String>> {
    conn.query_row(
        "SELECT value FROM settings WHERE key = ?1",
        params![key],
        |row| row.get(0),
    )
    .optional()
    .map_err(|e| DatabaseError::Sqlite(e).into())
}

/// Writes a setting, replacing any previous value.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn set_setting(conn: &Connection, key: &str, value: &str) -> AppResult<()> {
    debug!("Storing setting {}", key);

    conn.execute(
        r#"
        INSERT INTO settings (key, value, updated_at)
        VALUES (?1, ?2, CURRENT_TIMESTAMP)
        ON CONFLICT(key) DO UPDATE SET
            value = excluded.value,
            updated_at = CURRENT_TIMESTAMP
        "#,
        params![key, value],
    )
    .map_err(DatabaseError::Sqlite)?;

    Ok(())
}

/// Removes a setting. Removing an unset key is not an error.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn delete_setting(conn: &Connection, key: &str) -> AppResult<()> {
    debug!("Removing setting {}", key);

    conn.execute("DELETE FROM settings WHERE key = ?1", params![key])
        .map_err(DatabaseError::Sqlite)?;
    Ok(())
}
