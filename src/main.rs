/*!
# Daybook - A Private Diary

Daybook keeps dated diary entries in a local database behind a passphrase
lock. This file contains the main application flow: it sets up logging,
unlocks the diary, and runs the requested command against the library.

## Usage

```
daybook [OPTIONS] [COMMAND]

Commands:
  add     Write a new entry
  edit    Change an existing entry
  delete  Delete an entry permanently
  show    Show one entry in full
  list    List entries grouped by month
  stats   Show entry count, character count and writing streak
  export  Export a date range to a file
  lock    Lock the diary now so the next command asks for the passphrase

Options:
  -v, --verbose                Print verbose output
      --log-format <FORMAT>    Log output format [default: text] [possible values: text, json]
  -h, --help                   Print help
  -V, --version                Print version
```

## Configuration

- `DAYBOOK_DIR`: The directory holding the diary database (defaults to "~/Documents/daybook")
- `DAYBOOK_REAUTH_TIMEOUT`: Seconds an unlock stays valid (defaults to 30)
- `RUST_LOG`: Log filter (defaults to "info", or "debug" with `--verbose`)
*/

use chrono::{DateTime, Datelike, Local, Months, NaiveDateTime, Utc};
use daybook::auth::{self, AccessGate, PassphraseAuthenticator};
use daybook::cli::{AddArgs, CliArgs, Commands, EditArgs, ExportArgs, ListArgs, LogFormat};
use daybook::config::Config;
use daybook::constants::{
    DEFAULT_LOG_LEVEL, EXPORT_DEFAULT_MONTHS_BACK, TRACING_ROOT_SPAN_NAME, TRACING_SERVICE_NAME,
};
use daybook::db::{Database, EntryStore};
use daybook::errors::{AppError, AppResult, AuthError};
use daybook::export;
use daybook::journal_core::dates::{format_long_date, format_time, weekday_abbreviation};
use daybook::journal_core::aggregate::EntryStatistics;
use daybook::journal_core::{
    build_view, parse_entry_datetime, EntryDraft, JournalEntry, SortOrder,
};
use daybook::journal_io::{self, strip_trailing_newline, Journal};
use std::fs;
use std::io::{self, BufRead, IsTerminal, Read, Write};
use std::path::Path;
use tracing::{debug, error, info, info_span};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};
use uuid::Uuid;

/// Number of id characters shown in entry lists.
const SHORT_ID_LEN: usize = 8;

/// The main entry point for the daybook application.
///
/// 1. Parses command-line arguments
/// 2. Initializes logging
/// 3. Runs the command inside the invocation's root span
/// 4. Logs any error once and exits non-zero
fn main() {
    let args = CliArgs::parse();
    init_tracing(args.verbose, args.log_format);

    let correlation_id = Uuid::new_v4();
    let root_span = info_span!(
        TRACING_ROOT_SPAN_NAME,
        service = TRACING_SERVICE_NAME,
        correlation_id = %correlation_id
    );
    let _guard = root_span.enter();

    if let Err(e) = run(args) {
        error!(error = %e, "Application error");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Installs the tracing subscriber; logs go to stderr so stdout stays clean.
fn init_tracing(verbose: bool, format: LogFormat) {
    let default_level = if verbose { "debug" } else { DEFAULT_LOG_LEVEL };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(io::stderr))
            .init(),
        LogFormat::Text => registry
            .with(fmt::layer().with_target(false).with_writer(io::stderr))
            .init(),
    }
}

fn run(args: CliArgs) -> AppResult<()> {
    // Obtain current date/time once at the beginning
    let current_datetime = Local::now();
    let now_local = current_datetime.naive_local();
    let now_utc = current_datetime.with_timezone(&Utc);

    info!("Starting daybook");
    debug!("CLI arguments: {:?}", args);

    let config = Config::load()?;
    config.validate()?;
    debug!("Configuration: {:?}", config);

    journal_io::ensure_data_directory_exists(&config.data_dir)?;
    let db = Database::open(&config.db_path())?;
    db.initialize_schema()?;

    let command = args.command_or_default();
    if let Commands::Lock = command {
        return lock(&db, &config, now_utc);
    }

    unlock(&db, &config, now_utc)?;

    let mut journal = Journal::new(&db);
    match command {
        Commands::Add(add) => add_entry(&mut journal, add, now_local),
        Commands::Edit(edit) => edit_entry(&mut journal, edit),
        Commands::Delete { id, yes } => delete_entry(&mut journal, &id, yes),
        Commands::Show { id } => show_entry(&mut journal, &id),
        Commands::List(list) => list_entries(&mut journal, list),
        Commands::Stats { search } => show_statistics(&mut journal, search.as_deref()),
        Commands::Export(export) => export_entries(&mut journal, export, now_local),
        Commands::Lock => Ok(()),
    }
}

/// Passes the access gate, prompting only when the last unlock has expired.
fn unlock(db: &Database, config: &Config, now: DateTime<Utc>) -> AppResult<()> {
    let last_authenticated = auth::load_last_authenticated(db)?;
    let mut gate = AccessGate::restore(last_authenticated, config.reauth_timeout_secs, now);

    if gate.on_foreground(now) {
        let mut authenticator = PassphraseAuthenticator::new(db);
        if !gate.authenticate(&mut authenticator, now) {
            if let Some(message) = gate.auth_error() {
                eprintln!("{}", message);
            }
            return Err(AuthError::Locked.into());
        }
        auth::save_gate(db, &gate)?;
    } else {
        debug!("Unlock still valid, skipping passphrase prompt");
    }

    gate.ensure_unlocked()?;
    Ok(())
}

/// Locks the gate now so the next command asks for the passphrase.
fn lock(db: &Database, config: &Config, now: DateTime<Utc>) -> AppResult<()> {
    let mut gate = AccessGate::restore(
        auth::load_last_authenticated(db)?,
        config.reauth_timeout_secs,
        now,
    );
    gate.lock();
    auth::save_gate(db, &gate)?;

    info!("Journal locked");
    println!("일기를 잠갔습니다.");
    Ok(())
}

fn add_entry<S: EntryStore>(
    journal: &mut Journal<S>,
    args: AddArgs,
    now: NaiveDateTime,
) -> AppResult<()> {
    let content = match args.content {
        Some(content) => content,
        None => read_content_from_stdin()?,
    };
    let date = match args.date.as_deref() {
        Some(input) => parse_entry_datetime(input, now)?,
        None => now,
    };

    let mut draft = EntryDraft::new(args.title, content, date);
    if let Some(path) = args.image.as_deref() {
        draft.image_data = Some(read_image(path)?);
    }

    let entry = journal.add_entry(draft)?;
    println!("저장했습니다: {}", entry.id);
    Ok(())
}

fn edit_entry<S: EntryStore>(journal: &mut Journal<S>, args: EditArgs) -> AppResult<()> {
    let id = journal.resolve_id(&args.id)?;
    let current = journal.entry(id)?;

    let mut draft = EntryDraft::from_entry(&current);
    if let Some(title) = args.title {
        draft.title = title;
    }
    if let Some(content) = args.content {
        draft.content = content;
    }
    if let Some(input) = args.date.as_deref() {
        draft.date = parse_entry_datetime(input, current.date)?;
    }
    if args.remove_image {
        draft.image_data = None;
    } else if let Some(path) = args.image.as_deref() {
        draft.image_data = Some(read_image(path)?);
    }

    let updated = journal.update_entry(id, draft)?;
    println!("수정했습니다: {}", updated.id);
    Ok(())
}

fn delete_entry<S: EntryStore>(journal: &mut Journal<S>, input: &str, yes: bool) -> AppResult<()> {
    let id = journal.resolve_id(input)?;
    let entry = journal.entry(id)?;

    if !yes && !confirm(&format!("'{}' - 이 일기를 삭제하시겠습니까?", entry.title))? {
        println!("취소했습니다.");
        return Ok(());
    }

    journal.delete_entry(id)?;
    println!("삭제했습니다: {}", id);
    Ok(())
}

fn show_entry<S: EntryStore>(journal: &mut Journal<S>, input: &str) -> AppResult<()> {
    let id = journal.resolve_id(input)?;
    let entry = journal.entry(id)?;

    println!("# {}", entry.title);
    println!(
        "{} {}",
        format_long_date(entry.date.date()),
        format_time(entry.date)
    );
    println!();
    println!("{}", entry.content);
    if let Some(image) = &entry.image_data {
        println!();
        println!("[이미지 {} 바이트]", image.len());
    }
    println!();
    println!("id: {}", entry.id);
    Ok(())
}

fn list_entries<S: EntryStore>(journal: &mut Journal<S>, args: ListArgs) -> AppResult<()> {
    let query = args.search.as_deref().unwrap_or("");
    let view = build_view(journal.entries()?, query, args.sort);

    print_statistics(&view.statistics);
    if view.entries.is_empty() {
        if query.is_empty() {
            println!("아직 작성한 일기가 없습니다.");
        } else {
            println!("'{}'에 해당하는 일기가 없습니다.", query);
        }
        return Ok(());
    }

    for group in &view.groups {
        println!();
        println!("{}", group.label);
        for entry in &group.entries {
            println!("  {}", format_list_line(entry));
        }
    }
    Ok(())
}

fn show_statistics<S: EntryStore>(journal: &mut Journal<S>, search: Option<&str>) -> AppResult<()> {
    let view = build_view(journal.entries()?, search.unwrap_or(""), SortOrder::Newest);
    print_statistics(&view.statistics);
    Ok(())
}

fn export_entries<S: EntryStore>(
    journal: &mut Journal<S>,
    args: ExportArgs,
    now: NaiveDateTime,
) -> AppResult<()> {
    let (from, to) = args
        .parse_range()
        .map_err(|e| AppError::Journal(format!("Invalid date format: {}", e)))?;

    let today = now.date();
    let end = to.unwrap_or(today);
    let start = match from {
        Some(start) => start,
        None => today
            .checked_sub_months(Months::new(EXPORT_DEFAULT_MONTHS_BACK))
            .ok_or_else(|| AppError::Export("default start date is out of range".to_string()))?,
    };

    let selected = export::select_for_export(journal.entries()?, start, end)?;
    let document = export::render(&selected, args.format)?;
    export::write_export(&args.output, &document)?;

    println!(
        "{}개의 일기를 내보냈습니다 ({} ~ {}): {}",
        selected.len(),
        start,
        end,
        args.output.display()
    );
    Ok(())
}

fn print_statistics(statistics: &EntryStatistics) {
    println!(
        "일기 {}개 · {}자 · 연속 {}일",
        statistics.total_entries, statistics.total_words, statistics.streak
    );
}

fn format_list_line(entry: &JournalEntry) -> String {
    let id = entry.id.to_string();
    let short_id = id.get(..SHORT_ID_LEN).unwrap_or(&id);
    let date = entry.date.date();
    let image_marker = if entry.has_image() { " 📷" } else { "" };

    format!(
        "{}  {}월 {}일 ({}) {}  {}{}",
        short_id,
        date.month(),
        date.day(),
        weekday_abbreviation(date.weekday()),
        format_time(entry.date),
        entry.title,
        image_marker
    )
}

fn read_content_from_stdin() -> AppResult<String> {
    let mut stdin = io::stdin();
    if stdin.is_terminal() {
        eprintln!("내용을 입력하세요. 끝내려면 Ctrl-D를 누르세요.");
    }

    let mut content = String::new();
    stdin.read_to_string(&mut content)?;
    Ok(strip_trailing_newline(content))
}

fn read_image(path: &Path) -> AppResult<Vec<u8>> {
    fs::read(path).map_err(|e| {
        AppError::Io(io::Error::new(
            e.kind(),
            format!("Failed to read image {}: {}", path.display(), e),
        ))
    })
}

/// Asks a yes/no question on the terminal. Anything but yes means no.
fn confirm(question: &str) -> AppResult<bool> {
    print!("{} [y/N] ", question);
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;

    let answer = answer.trim().to_lowercase();
    Ok(matches!(answer.as_str(), "y" | "yes" | "예" | "네" | "ㅇ"))
}
