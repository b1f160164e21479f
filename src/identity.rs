//! Identity provider: registration, login, logout and the signed-in identity.
//!
//! [`IdentityProvider`] is the seam the rest of the crate uses to gate score
//! persistence and admin access.  [`LocalIdentityProvider`] keeps accounts in
//! `<data_dir>/accounts.toml` with salted SHA-256 password digests.
//!
//! Failures are [`AuthError`]s carrying an `auth/<reason>` code;
//! [`auth_error_message`] turns a code into the text shown to the player.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use bevy::log::warn;
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{AuthError, AuthResult};
use crate::store::current_unix_timestamp;
use crate::validation;

pub const EMAIL_ALREADY_IN_USE: &str = "auth/email-already-in-use";
pub const INVALID_EMAIL: &str = "auth/invalid-email";
pub const WEAK_PASSWORD: &str = "auth/weak-password";
pub const USER_NOT_FOUND: &str = "auth/user-not-found";
pub const WRONG_PASSWORD: &str = "auth/wrong-password";
pub const INVALID_CREDENTIAL: &str = "auth/invalid-credential";
pub const TOO_MANY_REQUESTS: &str = "auth/too-many-requests";
pub const STORAGE_FAILURE: &str = "auth/internal-error";

const ACCOUNTS_FILE: &str = "accounts.toml";

/// Fixed code → message table; unknown codes fall back to `raw`.
pub fn auth_error_message(code: &str, raw: &str) -> String {
    match code {
        EMAIL_ALREADY_IN_USE => "This email is already registered. Try logging in instead.",
        INVALID_EMAIL => "The email address is not valid.",
        WEAK_PASSWORD => "Password is too weak. Choose a stronger password.",
        USER_NOT_FOUND => "No account found with this email.",
        WRONG_PASSWORD => "Incorrect password. Please try again.",
        TOO_MANY_REQUESTS => "Too many failed attempts. Please try again later.",
        INVALID_CREDENTIAL => "Invalid email or password.",
        _ => return raw.to_string(),
    }
    .to_string()
}

/// The signed-in account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub uid: String,
    pub email: String,
}

pub trait IdentityProvider: Send + Sync {
    /// Create an account and sign it in.
    fn register(&mut self, email: &str, password: &str) -> AuthResult<Identity>;

    fn login(&mut self, email: &str, password: &str) -> AuthResult<Identity>;

    fn logout(&mut self);

    fn current_identity(&self) -> Option<Identity>;
}

// ── Local provider ────────────────────────────────────────────────────────────

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
struct Account {
    uid: String,
    salt: String,
    digest: String,
    #[serde(default)]
    failed_attempts: u32,
    #[serde(default)]
    locked_until_unix: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
struct AccountBook {
    #[serde(default)]
    accounts: BTreeMap<String, Account>,
}

/// File-backed provider; `dir == None` keeps accounts in memory only.
#[derive(Debug, Clone)]
pub struct LocalIdentityProvider {
    path: Option<PathBuf>,
    book: AccountBook,
    current: Option<Identity>,
    max_attempts: u32,
    lockout_secs: u64,
}

impl LocalIdentityProvider {
    pub fn in_memory(max_attempts: u32, lockout_secs: u64) -> Self {
        Self {
            path: None,
            book: AccountBook::default(),
            current: None,
            max_attempts,
            lockout_secs,
        }
    }

    /// Load accounts from `<dir>/accounts.toml` (missing file = no accounts).
    pub fn open(dir: impl AsRef<Path>, max_attempts: u32, lockout_secs: u64) -> AuthResult<Self> {
        let path = dir.as_ref().join(ACCOUNTS_FILE);
        let book = if path.exists() {
            let contents = fs::read_to_string(&path).map_err(|e| {
                AuthError::new(
                    STORAGE_FAILURE,
                    format!("failed to read {}: {e}", path.display()),
                )
            })?;
            toml::from_str(&contents).map_err(|e| {
                AuthError::new(STORAGE_FAILURE, format!("failed to parse accounts: {e}"))
            })?
        } else {
            AccountBook::default()
        };
        Ok(Self {
            path: Some(path),
            book,
            current: None,
            max_attempts,
            lockout_secs,
        })
    }

    /// Write `book` to disk; the in-memory book is only replaced by callers
    /// after this succeeds.
    fn write_book(&self, book: &AccountBook) -> AuthResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                AuthError::new(STORAGE_FAILURE, format!("failed to create data dir: {e}"))
            })?;
        }
        let serialized = toml::to_string_pretty(book).map_err(|e| {
            AuthError::new(STORAGE_FAILURE, format!("failed to serialize accounts: {e}"))
        })?;
        fs::write(path, serialized).map_err(|e| {
            AuthError::new(
                STORAGE_FAILURE,
                format!("failed to write {}: {e}", path.display()),
            )
        })
    }

    fn check_login(&mut self, email: &str, password: &str, now: u64) -> AuthResult<Identity> {
        let max_attempts = self.max_attempts;
        let lockout_secs = self.lockout_secs;
        let account = self.book.accounts.get_mut(email).ok_or_else(|| {
            AuthError::new(USER_NOT_FOUND, "There is no user record for this email.")
        })?;

        if account.locked_until_unix > now {
            return Err(AuthError::new(
                TOO_MANY_REQUESTS,
                "Access temporarily disabled due to many failed login attempts.",
            ));
        }

        if digest(&account.salt, password) != account.digest {
            account.failed_attempts += 1;
            if max_attempts > 0 && account.failed_attempts >= max_attempts {
                account.failed_attempts = 0;
                account.locked_until_unix = now + lockout_secs;
                return Err(AuthError::new(
                    TOO_MANY_REQUESTS,
                    "Access temporarily disabled due to many failed login attempts.",
                ));
            }
            return Err(AuthError::new(WRONG_PASSWORD, "The password is invalid."));
        }

        account.failed_attempts = 0;
        account.locked_until_unix = 0;
        Ok(Identity {
            uid: account.uid.clone(),
            email: email.to_string(),
        })
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

fn new_salt() -> String {
    let bytes: [u8; 16] = rand::thread_rng().gen();
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

impl IdentityProvider for LocalIdentityProvider {
    fn register(&mut self, email: &str, password: &str) -> AuthResult<Identity> {
        let email = normalize_email(email);
        if !validation::is_email_valid(&email) {
            return Err(AuthError::new(INVALID_EMAIL, "The email address is badly formatted."));
        }
        if password.len() < 6 {
            return Err(AuthError::new(
                WEAK_PASSWORD,
                "Password should be at least 6 characters.",
            ));
        }
        if self.book.accounts.contains_key(&email) {
            return Err(AuthError::new(
                EMAIL_ALREADY_IN_USE,
                "The email address is already in use by another account.",
            ));
        }

        let salt = new_salt();
        let account = Account {
            uid: uuid::Uuid::new_v4().simple().to_string(),
            digest: digest(&salt, password),
            salt,
            failed_attempts: 0,
            locked_until_unix: 0,
        };
        let identity = Identity {
            uid: account.uid.clone(),
            email: email.clone(),
        };
        let mut book = self.book.clone();
        book.accounts.insert(email, account);
        self.write_book(&book)?;
        self.book = book;
        self.current = Some(identity.clone());
        Ok(identity)
    }

    fn login(&mut self, email: &str, password: &str) -> AuthResult<Identity> {
        let email = normalize_email(email);
        let result = self.check_login(&email, password, current_unix_timestamp());
        // Attempt counters change on failure too; losing them on disk does not
        // change the outcome of this attempt.
        if let Err(err) = self.write_book(&self.book) {
            warn!("Could not save login attempt counters: {}", err);
        }
        let identity = result?;
        self.current = Some(identity.clone());
        Ok(identity)
    }

    fn logout(&mut self) {
        self.current = None;
    }

    fn current_identity(&self) -> Option<Identity> {
        self.current.clone()
    }
}
