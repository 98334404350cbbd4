/*!
# Daybook

Daybook is a private diary for the terminal. Entries have a title, free text,
a diary date and an optional photo, and are kept in a local SQLite database
behind a passphrase lock that re-engages shortly after each unlock.

## Core Features

- Write, edit and delete dated entries, optionally with an attached image
- Search by text or by date as it is written in Korean (`7월`, `금요일`, `2025.7.4`)
- Entries grouped by month, newest or oldest first
- Statistics: entry count, character count and writing streak
- Export a date range to Markdown or JSON, oldest entry first

## Architecture

- `journal_core`: Pure search, sort, grouping and statistics over a snapshot
- `db`: SQLite entry store behind the `EntryStore` trait
- `journal_io`: Session over a store that caches and invalidates the snapshot
- `auth`: Access gate with elapsed-time re-lock and passphrase authentication
- `export`: Date range selection and document rendering
- `cli`, `config`, `errors`, `constants`: Command line, settings and plumbing

## Usage Example

```rust,no_run
use daybook::db::Database;
use daybook::journal_core::{build_view, SortOrder};
use daybook::journal_io::Journal;
use daybook::Config;

fn main() -> daybook::AppResult<()> {
    let config = Config::load()?;
    let db = Database::open(&config.db_path())?;
    db.initialize_schema()?;

    let mut journal = Journal::new(&db);
    let view = build_view(journal.entries()?, "7월", SortOrder::Newest);
    println!("{} entries, streak {}", view.statistics.total_entries, view.statistics.streak);
    Ok(())
}
```
*/

/// Access gate and passphrase authentication
pub mod auth;
/// Command-line interface for parsing and handling user arguments
pub mod cli;
/// Configuration loading and management
pub mod config;
/// Application-wide constants
pub mod constants;
/// SQLite entry store
pub mod db;
/// Error types and utilities for error handling
pub mod errors;
/// Exporting entries to documents
pub mod export;
/// Entry model, search and aggregation
pub mod journal_core;
/// Journal session and data directory management
pub mod journal_io;

// Re-export important types for convenience
pub use cli::CliArgs;
pub use config::Config;
pub use errors::{AppError, AppResult};
pub use journal_core::{EntryDraft, EntryId, JournalEntry, SortOrder};
