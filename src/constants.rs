//! Constants used throughout the application.
//!
//! This module contains all constants used in the daybook application, organized
//! into logical groups. Having constants centralized makes them easier to find,
//! modify, and reference consistently.

// Application Metadata
/// The name of the application.
pub const APP_NAME: &str = "daybook";
/// The description of the application used in CLI help text.
pub const APP_DESCRIPTION: &str = "A private diary with search, statistics and export";

// Logging Defaults
/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

// Configuration Keys & Environment Variables
/// Environment variable for specifying the daybook data directory.
pub const ENV_VAR_DAYBOOK_DIR: &str = "DAYBOOK_DIR";
/// Environment variable overriding the re-lock threshold, in seconds.
pub const ENV_VAR_REAUTH_TIMEOUT: &str = "DAYBOOK_REAUTH_TIMEOUT";
/// Environment variable supplying a passphrase without prompting (tests only).
pub const ENV_VAR_TEST_PASSPHRASE: &str = "DAYBOOK_TEST_PASSPHRASE";
/// Standard environment variable for the user's home directory.
pub const ENV_VAR_HOME: &str = "HOME";
/// Default sub-directory name for the diary within the user's home directory.
pub const DEFAULT_DATA_SUBDIR: &str = "Documents/daybook";
/// File name of the entry database inside the data directory.
pub const DATABASE_FILE_NAME: &str = "daybook.db";

// Access Gate
/// Seconds after a successful unlock before the journal locks itself again.
pub const DEFAULT_REAUTH_TIMEOUT_SECS: u64 = 30;
/// Reason shown to the user when the gate asks for credentials.
pub const AUTH_REASON: &str = "일기 잠금을 해제하려면 암호를 입력하세요.";
/// Settings key holding the argon2 hash of the unlock passphrase.
pub const SETTING_PASSPHRASE_HASH: &str = "passphrase_hash";
/// Settings key holding the RFC 3339 time of the last successful unlock.
pub const SETTING_LAST_AUTHENTICATED_AT: &str = "last_authenticated_at";

/// Placeholder string for redacted information in debug output.
pub const REDACTED_PLACEHOLDER: &str = "[REDACTED]";

// File System Parameters
/// Default POSIX permissions for newly created directories (owner read/write/execute).
#[cfg(unix)]
pub const DEFAULT_DIR_PERMISSIONS: u32 = 0o700;
/// Default POSIX permissions for newly created files (owner read/write).
#[cfg(unix)]
pub const DEFAULT_FILE_PERMISSIONS: u32 = 0o600;

// Date/Time Logic
/// Date format string for ISO date format (YYYY-MM-DD).
pub const DATE_FORMAT_ISO: &str = "%Y-%m-%d";
/// Date format string for compact date format (YYYYMMDD).
pub const DATE_FORMAT_COMPACT: &str = "%Y%m%d";
/// Date and minute format accepted on the command line.
pub const DATETIME_FORMAT_MINUTES: &str = "%Y-%m-%d %H:%M";
/// Storage format for entry timestamps.
pub const DATETIME_FORMAT_STORAGE: &str = "%Y-%m-%d %H:%M:%S%.9f";
/// Entries further apart than this many calendar days end a writing streak.
pub const STREAK_TOLERANCE_DAYS: i64 = 2;
/// Months before today used as the default start of an export range.
pub const EXPORT_DEFAULT_MONTHS_BACK: u32 = 1;

// Export
/// Line separating entries in a Markdown export, one entry per page.
pub const EXPORT_PAGE_BREAK: &str = "\n\n<div style=\"page-break-after: always;\"></div>\n\n";

// Logging Configuration
/// Service name used in tracing spans and structured logs.
pub const TRACING_SERVICE_NAME: &str = "daybook";
/// Name for the root tracing span covering an application invocation.
pub const TRACING_ROOT_SPAN_NAME: &str = "app_invocation";
