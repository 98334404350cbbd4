//! Access gate with elapsed-time re-lock.
//!
//! The journal stays locked until an [`Authenticator`] says yes. After a
//! successful unlock the gate stays open until more than the configured
//! threshold has passed; the next foreground or invocation after that must
//! authenticate again.
//!
//! The gate never reads the clock itself. Every time-dependent call takes
//! `now`, so the re-lock rule can be tested without sleeping.
//!
//! # Example
//!
//! ```
//! use chrono::{Duration, Utc};
//! use daybook::auth::{AccessGate, Authenticator};
//! use daybook::errors::AuthError;
//!
//! struct AlwaysYes;
//!
//! impl Authenticator for AlwaysYes {
//!     fn authenticate(&mut self, _reason: &str) -> Result<bool, AuthError> {
//!         Ok(true)
//!     }
//! }
//!
//! let start = Utc::now();
//! let mut gate = AccessGate::new(30);
//! assert!(gate.should_reauthenticate(start));
//!
//! assert!(gate.authenticate(&mut AlwaysYes, start));
//! assert!(!gate.should_reauthenticate(start + Duration::seconds(29)));
//! assert!(gate.should_reauthenticate(start + Duration::seconds(31)));
//! ```

mod passphrase;

pub use passphrase::{
    forget_authentication, hash_passphrase, load_last_authenticated, record_authentication,
    save_gate, verify_passphrase, PassphraseAuthenticator,
};

use crate::constants::AUTH_REASON;
use crate::errors::AuthError;
use chrono::{DateTime, Utc};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Anything that can answer "is this the journal's owner?".
///
/// `Ok(true)` unlocks, `Ok(false)` is a rejected attempt, and `Err` means the
/// check could not be carried out at all.
pub trait Authenticator {
    fn authenticate(&mut self, reason: &str) -> Result<bool, AuthError>;
}

/// Unlock state plus the re-lock policy.
#[derive(Debug, Clone)]
pub struct AccessGate {
    unlocked: bool,
    last_authenticated: Option<DateTime<Utc>>,
    threshold: Duration,
    auth_error: Option<String>,
}

impl AccessGate {
    /// Creates a locked gate that re-locks `threshold_secs` after each unlock.
    pub fn new(threshold_secs: u64) -> Self {
        Self {
            unlocked: false,
            last_authenticated: None,
            threshold: Duration::from_secs(threshold_secs),
            auth_error: None,
        }
    }

    /// Rebuilds a gate from a persisted unlock time.
    ///
    /// The gate comes back unlocked only if re-authentication is not yet due
    /// at `now`.
    pub fn restore(
        last_authenticated: Option<DateTime<Utc>>,
        threshold_secs: u64,
        now: DateTime<Utc>,
    ) -> Self {
        let mut gate = Self::new(threshold_secs);
        gate.last_authenticated = last_authenticated;
        gate.unlocked = last_authenticated.is_some() && !gate.should_reauthenticate(now);
        debug!("Restored access gate (unlocked={})", gate.unlocked);
        gate
    }

    pub fn is_unlocked(&self) -> bool {
        self.unlocked
    }

    /// Message from the most recent failed attempt, cleared by a success.
    pub fn auth_error(&self) -> Option<&str> {
        self.auth_error.as_deref()
    }

    pub fn last_authenticated(&self) -> Option<DateTime<Utc>> {
        self.last_authenticated
    }

    /// Asks `authenticator` for permission and updates the gate.
    ///
    /// Returns `true` if the gate is now unlocked. On failure the gate stays
    /// locked and [`auth_error`](Self::auth_error) describes what happened.
    pub fn authenticate(
        &mut self,
        authenticator: &mut dyn Authenticator,
        now: DateTime<Utc>,
    ) -> bool {
        match authenticator.authenticate(AUTH_REASON) {
            Ok(true) => {
                self.unlocked = true;
                self.last_authenticated = Some(now);
                self.auth_error = None;
                info!("Journal unlocked");
                true
            }
            Ok(false) => {
                self.unlocked = false;
                self.auth_error = Some(
                    AuthError::Failed("the passphrase was not accepted".to_string()).to_string(),
                );
                warn!("Authentication rejected");
                false
            }
            Err(e) => {
                self.unlocked = false;
                self.auth_error = Some(e.to_string());
                warn!("Authentication could not complete: {}", e);
                false
            }
        }
    }

    /// True when the journal has never been unlocked, or when strictly more
    /// than the threshold has passed since the last unlock.
    ///
    /// A clock that moved backwards behind the last unlock also requires
    /// authentication.
    pub fn should_reauthenticate(&self, now: DateTime<Utc>) -> bool {
        match self.last_authenticated {
            None => true,
            Some(last) => match (now - last).to_std() {
                Ok(elapsed) => elapsed > self.threshold,
                Err(_) => {
                    warn!("Clock is behind the last unlock time, locking");
                    true
                }
            },
        }
    }

    /// Called when the app returns to the foreground.
    ///
    /// Locks the gate and returns `true` if the caller must authenticate
    /// again before showing any entry.
    pub fn on_foreground(&mut self, now: DateTime<Utc>) -> bool {
        if self.should_reauthenticate(now) {
            if self.unlocked {
                debug!("Re-lock threshold passed, locking journal");
            }
            self.unlocked = false;
            true
        } else {
            false
        }
    }

    /// Locks immediately and forgets the last unlock time.
    pub fn lock(&mut self) {
        self.unlocked = false;
        self.last_authenticated = None;
    }

    /// Fails with [`AuthError::Locked`] unless the gate is unlocked.
    pub fn ensure_unlocked(&self) -> Result<(), AuthError> {
        if self.unlocked {
            Ok(())
        } else {
            Err(AuthError::Locked)
        }
    }
}
