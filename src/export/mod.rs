//! Exporting a date range of entries as a single document.
//!
//! Export always runs oldest-first so the document reads like a diary,
//! regardless of how the list is currently sorted. Each entry becomes one
//! section; Markdown output separates sections with a page break so a
//! printed copy puts every entry on its own page.

use crate::constants::EXPORT_PAGE_BREAK;
use crate::errors::{AppError, AppResult};
use crate::journal_core::dates::{format_long_date, format_time};
use crate::journal_core::{apply_sort_order, EntryId, JournalEntry, SortOrder};
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

#[cfg(unix)]
use crate::constants::DEFAULT_FILE_PERMISSIONS;
#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;

/// Output format of an export document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ExportFormat {
    #[default]
    Markdown,
    Json,
}

/// Entry as it appears in a JSON export.
///
/// Image bytes are not embedded; `has_image` records whether one was attached.
#[derive(Debug, Serialize)]
struct ExportedEntry<'a> {
    id: EntryId,
    title: &'a str,
    content: &'a str,
    date: NaiveDateTime,
    has_image: bool,
}

/// Selects entries whose calendar date lies in `[start, end]`, oldest first.
///
/// Both ends are inclusive; an entry at 23:59 on `end` is included. Entries
/// with equal dates keep their input order.
///
/// # Errors
///
/// Returns `AppError::Export` if `start` is after `end`.
pub fn select_for_export<'a>(
    entries: &'a [JournalEntry],
    start: NaiveDate,
    end: NaiveDate,
) -> AppResult<Vec<&'a JournalEntry>> {
    if start > end {
        return Err(AppError::Export(format!(
            "start date {} is after end date {}",
            start, end
        )));
    }

    let in_range: Vec<&JournalEntry> = entries
        .iter()
        .filter(|entry| {
            let day = entry.date.date();
            day >= start && day <= end
        })
        .collect();

    debug!(
        "Selected {} of {} entries between {} and {}",
        in_range.len(),
        entries.len(),
        start,
        end
    );
    Ok(apply_sort_order(&in_range, SortOrder::Oldest))
}

/// Renders entries as Markdown, one section per entry.
pub fn render_markdown(entries: &[&JournalEntry]) -> String {
    entries
        .iter()
        .map(|entry| render_markdown_section(entry))
        .collect::<Vec<_>>()
        .join(EXPORT_PAGE_BREAK)
}

fn render_markdown_section(entry: &JournalEntry) -> String {
    let mut section = format!(
        "# {}\n\n## {} {}\n\n{}\n",
        entry.title,
        format_long_date(entry.date.date()),
        format_time(entry.date),
        entry.content
    );

    if let Some(image) = &entry.image_data {
        section.push_str(&format!("\n[image: {} bytes]\n", image.len()));
    }
    section
}

/// Renders entries as a pretty-printed JSON array.
///
/// # Errors
///
/// Returns `AppError::Serialization` if serialization fails.
pub fn render_json(entries: &[&JournalEntry]) -> AppResult<String> {
    let exported: Vec<ExportedEntry<'_>> = entries
        .iter()
        .map(|entry| ExportedEntry {
            id: entry.id,
            title: &entry.title,
            content: &entry.content,
            date: entry.date,
            has_image: entry.has_image(),
        })
        .collect();

    Ok(serde_json::to_string_pretty(&exported)?)
}

/// Renders entries in the requested format.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn render(entries: &[&JournalEntry], format: ExportFormat) -> AppResult<String> {
    match format {
        ExportFormat::Markdown => Ok(render_markdown(entries)),
        ExportFormat::Json => render_json(entries),
    }
}

/// Writes an export document to `path`, replacing any existing file.
///
/// Missing parent directories are created. On Unix the file is readable by
/// its owner only.
///
/// # Errors
///
/// Returns `AppError::Io` if the directory or file cannot be written.
pub fn write_export(path: &Path, document: &str) -> AppResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(DEFAULT_FILE_PERMISSIONS);

    let mut file = options.open(path)?;
    file.write_all(document.as_bytes())?;
    file.flush()?;

    info!("Wrote export ({} bytes)", document.len());
    Ok(())
}
