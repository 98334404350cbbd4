//! Core journal functionality without I/O operations.
//!
//! This module contains the diary's domain types and the pure functions that
//! turn an entry snapshot into what the list screen shows: search results,
//! sort order, month groups and statistics. Nothing here touches the entry
//! store; callers hand in a snapshot and re-run the pipeline whenever the
//! snapshot, the search text or the sort order changes.
//!
//! - `query`: search and sort
//! - `aggregate`: month grouping and statistics
//! - `dates`: Korean date renderings shared by search, grouping and export

pub mod aggregate;
pub mod dates;
pub mod query;

use crate::constants::{DATETIME_FORMAT_MINUTES, DATE_FORMAT_COMPACT, DATE_FORMAT_ISO};
use crate::errors::{AppError, AppResult};
use aggregate::{EntryStatistics, MonthGroup};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

pub use aggregate::{group_by_month, statistics, streak, MonthKey};
pub use query::{apply_sort_order, search};

/// Opaque, immutable identifier of a journal entry.
///
/// Identifiers are random v4 UUIDs, so an id is never handed out twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(Uuid);

impl EntryId {
    /// Generates a fresh identifier.
    pub fn new() -> Self {
        EntryId(Uuid::new_v4())
    }

    /// The underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for EntryId {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(EntryId)
            .map_err(|e| AppError::Journal(format!("Invalid entry id '{}': {}", s, e)))
    }
}

/// A single diary entry.
///
/// `title` and `content` may be blank while an entry is being edited; they
/// are only required to be non-blank when saved (see [`EntryDraft`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalEntry {
    pub id: EntryId,
    pub title: String,
    pub content: String,
    /// Diary date and time, local wall clock. Defaults to creation time.
    pub date: NaiveDateTime,
    /// A single attached image, stored as raw bytes.
    pub image_data: Option<Vec<u8>>,
}

impl JournalEntry {
    /// Creates an entry with a fresh id and no image.
    pub fn new(title: impl Into<String>, content: impl Into<String>, date: NaiveDateTime) -> Self {
        JournalEntry {
            id: EntryId::new(),
            title: title.into(),
            content: content.into(),
            date,
            image_data: None,
        }
    }

    /// Creates an entry with a fresh id from a saved draft.
    pub fn from_draft(draft: EntryDraft) -> Self {
        JournalEntry {
            id: EntryId::new(),
            title: draft.title,
            content: draft.content,
            date: draft.date,
            image_data: draft.image_data,
        }
    }

    /// Attaches an image.
    pub fn with_image(mut self, image_data: Vec<u8>) -> Self {
        self.image_data = Some(image_data);
        self
    }

    /// Whether an image is attached.
    pub fn has_image(&self) -> bool {
        self.image_data.is_some()
    }

    /// Length of the content in characters.
    pub fn char_count(&self) -> usize {
        self.content.chars().count()
    }
}

/// The editable fields of an entry, as held by the write screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryDraft {
    pub title: String,
    pub content: String,
    pub date: NaiveDateTime,
    pub image_data: Option<Vec<u8>>,
}

impl EntryDraft {
    /// A draft with the given text and date and no image.
    pub fn new(title: impl Into<String>, content: impl Into<String>, date: NaiveDateTime) -> Self {
        EntryDraft {
            title: title.into(),
            content: content.into(),
            date,
            image_data: None,
        }
    }

    /// Starts a draft from an existing entry's fields.
    pub fn from_entry(entry: &JournalEntry) -> Self {
        EntryDraft {
            title: entry.title.clone(),
            content: entry.content.clone(),
            date: entry.date,
            image_data: entry.image_data.clone(),
        }
    }

    /// Whether the save action should be enabled.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use daybook::journal_core::EntryDraft;
    ///
    /// let date = NaiveDate::from_ymd_opt(2025, 7, 4).unwrap().and_hms_opt(9, 0, 0).unwrap();
    /// assert!(EntryDraft::new("산책", "공원을 걸었다", date).can_save());
    /// assert!(!EntryDraft::new("   ", "공원을 걸었다", date).can_save());
    /// ```
    pub fn can_save(&self) -> bool {
        self.validate().is_ok()
    }

    /// Checks that title and content are non-blank after trimming.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` naming the first blank field.
    pub fn validate(&self) -> AppResult<()> {
        if self.title.trim().is_empty() {
            return Err(AppError::Validation("title cannot be blank".to_string()));
        }
        if self.content.trim().is_empty() {
            return Err(AppError::Validation("content cannot be blank".to_string()));
        }
        Ok(())
    }
}

/// Order in which entries are listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum SortOrder {
    /// Most recent diary date first.
    #[default]
    Newest,
    /// Oldest diary date first.
    Oldest,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Newest => f.write_str("newest"),
            SortOrder::Oldest => f.write_str("oldest"),
        }
    }
}

/// Everything the entry list renders for one snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct JournalView<'a> {
    /// Matching entries in the requested order.
    pub entries: Vec<&'a JournalEntry>,
    /// The same entries bucketed by month, most recent month first.
    pub groups: Vec<MonthGroup<'a>>,
    /// Statistics over the matching entries.
    pub statistics: EntryStatistics,
}

/// Runs the whole list pipeline: search, sort, group, summarize.
///
/// This is a pure function of its inputs; callers re-invoke it whenever the
/// snapshot, the query or the order changes.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use daybook::journal_core::{build_view, JournalEntry, SortOrder};
///
/// let day = |d| NaiveDate::from_ymd_opt(2025, 7, d).unwrap().and_hms_opt(9, 0, 0).unwrap();
/// let snapshot = vec![
///     JournalEntry::new("산책", "공원", day(1)),
///     JournalEntry::new("여행", "바다", day(3)),
/// ];
///
/// let view = build_view(&snapshot, "", SortOrder::Newest);
/// assert_eq!(view.entries[0].title, "여행");
/// assert_eq!(view.groups.len(), 1);
/// assert_eq!(view.statistics.streak, 2);
/// ```
pub fn build_view<'a>(snapshot: &'a [JournalEntry], query: &str, order: SortOrder) -> JournalView<'a> {
    let matching = search(snapshot, query);
    let entries = apply_sort_order(&matching, order);
    let groups = group_by_month(&entries, order);
    let statistics = statistics(&entries);

    JournalView {
        entries,
        groups,
        statistics,
    }
}

/// Parses a date typed by the user (`YYYY-MM-DD` or `YYYYMMDD`).
///
/// # Errors
///
/// Returns `chrono::ParseError` if neither format matches.
pub fn parse_date_string(date_str: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(date_str, DATE_FORMAT_ISO)
        .or_else(|_| NaiveDate::parse_from_str(date_str, DATE_FORMAT_COMPACT))
}

/// Parses an entry timestamp typed by the user.
///
/// Accepts `YYYY-MM-DD HH:MM`; a bare date (either [`parse_date_string`]
/// format) takes the time of day from `time_of`, so a back-dated entry keeps
/// the moment it was written.
///
/// # Errors
///
/// Returns `AppError::Journal` if the string is not a recognised format.
pub fn parse_entry_datetime(input: &str, time_of: NaiveDateTime) -> AppResult<NaiveDateTime> {
    let trimmed = input.trim();
    if let Ok(datetime) = NaiveDateTime::parse_from_str(trimmed, DATETIME_FORMAT_MINUTES) {
        return Ok(datetime);
    }

    parse_date_string(trimmed)
        .map(|date| date.and_time(time_of.time()))
        .map_err(|e| {
            AppError::Journal(format!(
                "Invalid date format '{}': {}. Use YYYY-MM-DD, YYYYMMDD or 'YYYY-MM-DD HH:MM'",
                trimmed, e
            ))
        })
}
