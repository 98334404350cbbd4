//! Passphrase authentication backed by the settings table.
//!
//! The first unlock chooses a passphrase and stores its argon2 hash. Later
//! unlocks verify against that hash. The time of the last successful unlock
//! is kept alongside it so separate invocations share one re-lock window.

use super::{AccessGate, Authenticator};
use crate::constants::{
    ENV_VAR_TEST_PASSPHRASE, SETTING_LAST_AUTHENTICATED_AT, SETTING_PASSPHRASE_HASH,
};
use crate::db::settings::{delete_setting, get_setting, set_setting};
use crate::db::Database;
use crate::errors::{AppResult, AuthError};
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

enum PassphraseSource {
    Terminal,
    Fixed(Zeroizing<String>),
}

/// Authenticates the journal owner with a passphrase.
///
/// # Testing
///
/// For non-interactive testing, set `DAYBOOK_TEST_PASSPHRASE`. The value is
/// used instead of prompting, both to set the passphrase on first run and to
/// unlock afterwards.
pub struct PassphraseAuthenticator<'a> {
    db: &'a Database,
    source: PassphraseSource,
}

impl<'a> PassphraseAuthenticator<'a> {
    /// Prompts on the terminal unless `DAYBOOK_TEST_PASSPHRASE` is set.
    pub fn new(db: &'a Database) -> Self {
        let source = match std::env::var(ENV_VAR_TEST_PASSPHRASE) {
            Ok(passphrase) => {
                debug!("Using {} for non-interactive unlock", ENV_VAR_TEST_PASSPHRASE);
                PassphraseSource::Fixed(Zeroizing::new(passphrase))
            }
            Err(_) => PassphraseSource::Terminal,
        };
        Self { db, source }
    }

    /// Uses `passphrase` instead of prompting.
    pub fn with_passphrase(db: &'a Database, passphrase: impl Into<String>) -> Self {
        Self {
            db,
            source: PassphraseSource::Fixed(Zeroizing::new(passphrase.into())),
        }
    }

    fn new_passphrase(&self) -> Result<Zeroizing<String>, AuthError> {
        let passphrase = match &self.source {
            PassphraseSource::Fixed(p) => p.clone(),
            PassphraseSource::Terminal => {
                debug!("Prompting for new passphrase (first-run)");
                eprintln!("\n🔐 Setting up your diary lock");
                eprintln!("Choose a passphrase to protect your entries.\n");

                let passphrase = prompt("Enter passphrase: ")?;
                let confirmation = prompt("Confirm passphrase: ")?;
                if *passphrase != *confirmation {
                    return Err(AuthError::PassphraseMismatch);
                }
                passphrase
            }
        };

        if passphrase.is_empty() {
            return Err(AuthError::EmptyPassphrase);
        }
        Ok(passphrase)
    }

    fn existing_passphrase(&self, reason: &str) -> Result<Zeroizing<String>, AuthError> {
        match &self.source {
            PassphraseSource::Fixed(p) => Ok(p.clone()),
            PassphraseSource::Terminal => {
                debug!("Prompting for existing passphrase");
                eprintln!("\n🔓 {}", reason);
                prompt("Passphrase: ")
            }
        }
    }
}

impl Authenticator for PassphraseAuthenticator<'_> {
    fn authenticate(&mut self, reason: &str) -> Result<bool, AuthError> {
        let conn = self
            .db
            .get_conn()
            .map_err(|e| AuthError::Unavailable(e.to_string()))?;
        let stored = get_setting(&conn, SETTING_PASSPHRASE_HASH)
            .map_err(|e| AuthError::Unavailable(e.to_string()))?;

        match stored {
            Some(hash) => {
                let passphrase = self.existing_passphrase(reason)?;
                verify_passphrase(&passphrase, &hash)
            }
            None => {
                let passphrase = self.new_passphrase()?;
                let hash = hash_passphrase(&passphrase)?;
                set_setting(&conn, SETTING_PASSPHRASE_HASH, &hash)
                    .map_err(|e| AuthError::Unavailable(e.to_string()))?;
                info!("New passphrase set");
                Ok(true)
            }
        }
    }
}

fn prompt(label: &str) -> Result<Zeroizing<String>, AuthError> {
    rpassword::prompt_password(label)
        .map(Zeroizing::new)
        .map_err(|e| AuthError::PassphrasePrompt(e.to_string()))
}

/// Hashes `passphrase` with argon2 and a fresh random salt.
///
/// Returns the PHC string form, which embeds the salt and parameters.
///
/// # Errors
///
/// Returns `AuthError::Hash` if hashing fails.
pub fn hash_passphrase(passphrase: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(passphrase.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Hash(e.to_string()))
}

/// Checks `passphrase` against a PHC hash produced by [`hash_passphrase`].
///
/// # Errors
///
/// Returns `AuthError::Hash` if the stored hash cannot be parsed. A wrong
/// passphrase is `Ok(false)`, not an error.
pub fn verify_passphrase(passphrase: &str, phc_hash: &str) -> Result<bool, AuthError> {
    let parsed = PasswordHash::new(phc_hash).map_err(|e| AuthError::Hash(e.to_string()))?;

    match Argon2::default().verify_password(passphrase.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(AuthError::Hash(e.to_string())),
    }
}

/// Reads the time of the last successful unlock.
///
/// An unreadable stored value is treated as "never" so the user is simply
/// asked again.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn load_last_authenticated(db: &Database) -> AppResult<Option<DateTime<Utc>>> {
    let conn = db.get_conn()?;
    let stored = get_setting(&conn, SETTING_LAST_AUTHENTICATED_AT)?;

    Ok(stored.and_then(|value| match DateTime::parse_from_rfc3339(&value) {
        Ok(at) => Some(at.with_timezone(&Utc)),
        Err(e) => {
            warn!("Ignoring unreadable last unlock time: {}", e);
            None
        }
    }))
}

/// Stores `at` as the time of the last successful unlock.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn record_authentication(db: &Database, at: DateTime<Utc>) -> AppResult<()> {
    let conn = db.get_conn()?;
    set_setting(&conn, SETTING_LAST_AUTHENTICATED_AT, &at.to_rfc3339())
}

/// Forgets the last unlock so the next invocation must authenticate.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn forget_authentication(db: &Database) -> AppResult<()> {
    let conn = db.get_conn()?;
    delete_setting(&conn, SETTING_LAST_AUTHENTICATED_AT)
}

/// Persists the gate's last unlock time, or clears it when the gate has
/// been locked.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn save_gate(db: &Database, gate: &AccessGate) -> AppResult<()> {
    match gate.last_authenticated() {
        Some(at) => record_authentication(db, at),
        None => forget_authentication(db),
    }
}
