//! Configuration management for the daybook application.
//!
//! This module handles loading and validating configuration settings from environment
//! variables, with sensible defaults.
//!
//! # Environment Variables
//!
//! - `DAYBOOK_DIR`: Path to the data directory (defaults to ~/Documents/daybook)
//! - `DAYBOOK_REAUTH_TIMEOUT`: Seconds after an unlock before the diary locks again
//!   (defaults to 30)
//! - `HOME`: Used for expanding the default data directory path

use crate::constants::{
    DATABASE_FILE_NAME, DEFAULT_DATA_SUBDIR, DEFAULT_REAUTH_TIMEOUT_SECS, ENV_VAR_DAYBOOK_DIR,
    ENV_VAR_HOME, ENV_VAR_REAUTH_TIMEOUT, REDACTED_PLACEHOLDER,
};
use crate::errors::{AppError, AppResult};
use std::env;
use std::fmt;
use std::path::PathBuf;

/// Configuration for the daybook application.
///
/// # Examples
///
/// Creating a configuration manually:
/// ```
/// use daybook::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     data_dir: PathBuf::from("/path/to/daybook"),
///     reauth_timeout_secs: 30,
/// };
/// assert_eq!(config.db_path(), PathBuf::from("/path/to/daybook/daybook.db"));
/// ```
///
/// Loading configuration from environment variables:
/// ```no_run
/// use daybook::Config;
/// use std::env;
///
/// env::set_var("DAYBOOK_DIR", "/custom/daybook/path");
///
/// let config = Config::load().expect("Failed to load configuration");
/// assert_eq!(config.reauth_timeout_secs, 30);
/// ```
pub struct Config {
    /// Directory holding the diary database.
    ///
    /// Loaded from `DAYBOOK_DIR` with a fallback to ~/Documents/daybook.
    pub data_dir: PathBuf,

    /// Seconds after a successful unlock before the next invocation must
    /// authenticate again.
    pub reauth_timeout_secs: u64,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("data_dir", &REDACTED_PLACEHOLDER)
            .field("reauth_timeout_secs", &self.reauth_timeout_secs)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_dir: PathBuf::from(""),
            reauth_timeout_secs: DEFAULT_REAUTH_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Loads configuration from environment variables with sensible defaults.
    ///
    /// The data directory path is expanded with `shellexpand`, so `~` and
    /// `$VAR` references work.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if:
    /// - The data directory path expansion fails or yields an empty path
    /// - `DAYBOOK_REAUTH_TIMEOUT` is not a whole number of seconds
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use daybook::Config;
    ///
    /// match Config::load() {
    ///     Ok(config) => println!("Diary lives in {}", config.data_dir.display()),
    ///     Err(err) => eprintln!("Failed to load config: {}", err),
    /// }
    /// ```
    pub fn load() -> AppResult<Self> {
        let data_dir_str = env::var(ENV_VAR_DAYBOOK_DIR).unwrap_or_else(|_| {
            let home = env::var(ENV_VAR_HOME).unwrap_or_else(|_| "".to_string());
            format!("{}/{}", home, DEFAULT_DATA_SUBDIR)
        });

        let expanded_path = shellexpand::full(&data_dir_str)
            .map_err(|e| AppError::Config(format!("Failed to expand path: {}", e)))?;

        let data_dir = PathBuf::from(expanded_path.into_owned());

        if data_dir.as_os_str().is_empty() {
            return Err(AppError::Config("Data directory path is empty".to_string()));
        }

        let reauth_timeout_secs = match env::var(ENV_VAR_REAUTH_TIMEOUT) {
            Ok(raw) => Self::parse_reauth_timeout(&raw)?,
            Err(_) => DEFAULT_REAUTH_TIMEOUT_SECS,
        };

        Ok(Config {
            data_dir,
            reauth_timeout_secs,
        })
    }

    fn parse_reauth_timeout(raw: &str) -> AppResult<u64> {
        raw.trim().parse::<u64>().map_err(|_| {
            AppError::Config(format!(
                "{} must be a whole number of seconds, got '{}'",
                ENV_VAR_REAUTH_TIMEOUT, raw
            ))
        })
    }

    /// Validates that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` with one of the following messages:
    /// - "Data directory path is empty" if the data directory path is empty
    /// - "Data directory must be an absolute path" if the path is relative
    ///
    /// # Examples
    ///
    /// ```
    /// use daybook::Config;
    /// use std::path::PathBuf;
    ///
    /// let valid_config = Config {
    ///     data_dir: PathBuf::from("/absolute/path"),
    ///     reauth_timeout_secs: 30,
    /// };
    /// assert!(valid_config.validate().is_ok());
    ///
    /// let invalid_config = Config {
    ///     data_dir: PathBuf::from("relative/path"),
    ///     reauth_timeout_secs: 30,
    /// };
    /// assert!(invalid_config.validate().is_err());
    /// ```
    pub fn validate(&self) -> AppResult<()> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(AppError::Config("Data directory path is empty".to_string()));
        }

        if !self.data_dir.is_absolute() {
            return Err(AppError::Config(
                "Data directory must be an absolute path".to_string(),
            ));
        }

        Ok(())
    }

    /// Location of the diary database inside the data directory.
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DATABASE_FILE_NAME)
    }
}
