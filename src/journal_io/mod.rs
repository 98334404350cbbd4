//! Journal session and data directory management.
//!
//! [`Journal`] sits between the CLI and an [`EntryStore`]. It keeps the last
//! fetched snapshot so several reads in one invocation cost one query, and
//! drops it after every successful write so the next read sees the change.
//! A failed write is logged and returned; the cached snapshot stays as it was.

use crate::db::EntryStore;
use crate::errors::{AppError, AppResult, DatabaseError};
use crate::journal_core::{EntryDraft, EntryId, JournalEntry};
use std::fs;
#[cfg(unix)]
use std::fs::Permissions;
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use tracing::{debug, error, info};

#[cfg(unix)]
use crate::constants::DEFAULT_DIR_PERMISSIONS;

/// Ensures the data directory exists, creating it if necessary.
///
/// Newly created directories are readable by their owner only.
///
/// # Errors
///
/// Returns:
/// - `AppError::Journal` if the provided path is not an absolute path
/// - `AppError::Io` if the directory creation fails due to permission issues,
///   invalid paths, or other filesystem errors
pub fn ensure_data_directory_exists(data_dir: &Path) -> AppResult<()> {
    if !data_dir.is_absolute() {
        return Err(AppError::Journal(format!(
            "Data directory path must be absolute: {}",
            data_dir.display()
        )));
    }

    if !data_dir.exists() {
        fs::create_dir_all(data_dir).map_err(|e| {
            AppError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to create data directory: {}", e),
            ))
        })?;

        #[cfg(unix)]
        {
            fs::set_permissions(data_dir, Permissions::from_mode(DEFAULT_DIR_PERMISSIONS))
                .map_err(|e| {
                    AppError::Io(std::io::Error::new(
                        e.kind(),
                        format!("Failed to set secure permissions on data directory: {}", e),
                    ))
                })?;
            debug!("Set 0o700 permissions on data directory");
        }
    }
    Ok(())
}

/// Drops the single line ending that terminates piped or typed input.
///
/// Only one `\n` or `\r\n` is removed; blank lines the writer left at the
/// end of the text are kept.
pub fn strip_trailing_newline(mut text: String) -> String {
    if text.ends_with('\n') {
        text.pop();
        if text.ends_with('\r') {
            text.pop();
        }
    }
    text
}

/// A working session over an entry store.
pub struct Journal<S: EntryStore> {
    store: S,
    snapshot: Option<Vec<JournalEntry>>,
}

impl<S: EntryStore> Journal<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            snapshot: None,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// The current snapshot, fetching it from the store if needed.
    ///
    /// # Errors
    ///
    /// Returns the store's error if the snapshot cannot be fetched.
    pub fn entries(&mut self) -> AppResult<&[JournalEntry]> {
        let snapshot = match self.snapshot.take() {
            Some(snapshot) => snapshot,
            None => {
                let fetched = self.store.fetch_all().map_err(|e| {
                    error!("Failed to load entries: {}", e);
                    e
                })?;
                debug!("Loaded snapshot of {} entries", fetched.len());
                fetched
            }
        };

        Ok(self.snapshot.insert(snapshot).as_slice())
    }

    /// Drops the cached snapshot so the next read goes to the store.
    pub fn invalidate(&mut self) {
        self.snapshot = None;
    }

    /// Looks up an entry by id.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if no entry has this id.
    pub fn entry(&mut self, id: EntryId) -> AppResult<JournalEntry> {
        self.entries()?
            .iter()
            .find(|entry| entry.id == id)
            .cloned()
            .ok_or_else(|| DatabaseError::NotFound(format!("Entry with id {} not found", id)).into())
    }

    /// Resolves a full id or a unique id prefix to an entry id.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Journal` if the input is empty or matches more than
    /// one entry, and `DatabaseError::NotFound` if it matches none.
    pub fn resolve_id(&mut self, input: &str) -> AppResult<EntryId> {
        let needle = input.trim().to_lowercase();
        if needle.is_empty() {
            return Err(AppError::Journal("Entry id cannot be empty".to_string()));
        }

        let matches: Vec<EntryId> = self
            .entries()?
            .iter()
            .map(|entry| entry.id)
            .filter(|id| id.to_string().starts_with(&needle))
            .collect();

        match matches.as_slice() {
            [id] => Ok(*id),
            [] => Err(DatabaseError::NotFound(format!("No entry id starts with '{}'", input)).into()),
            _ => Err(AppError::Journal(format!(
                "Entry id '{}' is ambiguous ({} entries match); type more characters",
                input,
                matches.len()
            ))),
        }
    }

    /// Validates and stores a new entry.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` without touching the store if the draft
    /// has a blank title or content, or the store's error if the insert fails.
    pub fn add_entry(&mut self, draft: EntryDraft) -> AppResult<JournalEntry> {
        draft.validate()?;

        let entry = JournalEntry::from_draft(draft);
        self.store.insert(&entry).map_err(|e| {
            error!("Failed to save entry {}: {}", entry.id, e);
            e
        })?;

        self.invalidate();
        info!("Added entry {}", entry.id);
        Ok(entry)
    }

    /// Validates and applies `draft` to an existing entry.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` for a blank draft, `DatabaseError::NotFound`
    /// for an unknown id, or the store's error if the update fails.
    pub fn update_entry(&mut self, id: EntryId, draft: EntryDraft) -> AppResult<JournalEntry> {
        draft.validate()?;

        let current = self.entry(id)?;
        let updated = self.store.update(&current, &draft).map_err(|e| {
            error!("Failed to update entry {}: {}", id, e);
            e
        })?;

        self.invalidate();
        info!("Updated entry {}", id);
        Ok(updated)
    }

    /// Permanently removes an entry.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` for an unknown id, or the store's
    /// error if the delete fails.
    pub fn delete_entry(&mut self, id: EntryId) -> AppResult<()> {
        let current = self.entry(id)?;
        self.store.delete(&current).map_err(|e| {
            error!("Failed to delete entry {}: {}", id, e);
            e
        })?;

        self.invalidate();
        info!("Deleted entry {}", id);
        Ok(())
    }
}
