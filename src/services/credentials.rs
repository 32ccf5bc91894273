//! Credential store behind the login widget.
//!
//! ARCHITECTURE
//! ============
//! The gate talks to a `CredentialStore` trait object. The shipped store is a
//! JSON file holding an array of user records, read on every call so edits
//! made outside the process are picked up on the next interaction.
//!
//! TRADE-OFFS
//! ==========
//! Passwords are stored as argon2id PHC strings carrying their own salt and
//! parameters, so existing records keep verifying if the defaults change.
//! Writes go through a temp file + rename under an async mutex, so concurrent
//! registrations serialize and readers never observe a half-written file.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use argon2::Argon2;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use async_trait::async_trait;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

const MAX_USERNAME_LEN: usize = 15;

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("credential store io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("credential store is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
    #[error("password hashing failed: {0}")]
    Hash(argon2::password_hash::Error),
}

/// Registration outcome. Every variant except `Store` is user-facing and
/// displayed inline by the widget.
#[derive(Debug, thiserror::Error)]
pub enum RegisterError {
    #[error("Please enter a valid name!")]
    InvalidName,
    #[error("Please enter a valid Email!")]
    InvalidEmail,
    #[error("Email already exists!")]
    EmailTaken,
    #[error("Invalid Username! Please try again")]
    InvalidUsername,
    #[error("Sorry, username already exists!")]
    UsernameTaken,
    #[error("Please enter a valid password!")]
    InvalidPassword,
    #[error(transparent)]
    Store(#[from] StoreError),
}

// =============================================================================
// RECORDS
// =============================================================================

/// One stored account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub username: String,
    pub name: String,
    pub email: String,
    /// argon2 PHC string.
    pub password: String,
}

/// Registration form contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub username: String,
    pub password: String,
}

#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Check a username/password pair. Returns the canonical username on a
    /// match, `None` on a mismatch or unknown user.
    async fn verify(&self, username: &str, password: &str) -> Result<Option<String>, StoreError>;

    /// Validate and persist a new account.
    async fn register(&self, account: NewAccount) -> Result<(), RegisterError>;
}

// =============================================================================
// VALIDATION + HASHING
// =============================================================================

#[must_use]
pub fn is_valid_name(name: &str) -> bool {
    let name = name.trim();
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_alphabetic() || matches!(c, ' ' | '_' | '-' | '.' | '\''))
}

/// Lower-cased email if it has one `@` with non-empty parts and a dotted domain.
#[must_use]
pub fn normalize_email(email: &str) -> Option<String> {
    let normalized = email.trim().to_ascii_lowercase();
    let (local, domain) = normalized.split_once('@')?;
    if local.is_empty()
        || domain.is_empty()
        || domain.contains('@')
        || !domain.contains('.')
        || domain.starts_with('.')
        || domain.ends_with('.')
        || normalized.chars().any(char::is_whitespace)
    {
        return None;
    }
    Some(normalized)
}

#[must_use]
pub fn is_valid_username(username: &str) -> bool {
    (1..=MAX_USERNAME_LEN).contains(&username.len())
        && username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

fn generate_salt() -> Result<SaltString, argon2::password_hash::Error> {
    let bytes: [u8; 16] = rand::rng().random();
    SaltString::encode_b64(&bytes)
}

/// Hash a new password into its stored PHC form.
///
/// # Errors
///
/// Returns the hasher's error; only reachable with invalid parameters.
pub fn seal_password(password: &str) -> Result<String, StoreError> {
    let salt = generate_salt().map_err(StoreError::Hash)?;
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(StoreError::Hash)?;
    Ok(hash.to_string())
}

/// Check `password` against a stored PHC string. Malformed entries never match.
#[must_use]
pub fn password_matches(stored: &str, password: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored) else {
        return false;
    };
    Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok()
}

/// Validate `account` against existing records and build the record to store.
///
/// # Errors
///
/// Returns the first failing check, in widget order: name, email format,
/// email uniqueness, username format, username uniqueness, password.
pub fn prepare_record(account: &NewAccount, existing: &[UserRecord]) -> Result<UserRecord, RegisterError> {
    if !is_valid_name(&account.name) {
        return Err(RegisterError::InvalidName);
    }
    let email = normalize_email(&account.email).ok_or(RegisterError::InvalidEmail)?;
    if existing.iter().any(|u| u.email.eq_ignore_ascii_case(&email)) {
        return Err(RegisterError::EmailTaken);
    }
    let username = account.username.trim();
    if !is_valid_username(username) {
        return Err(RegisterError::InvalidUsername);
    }
    if existing.iter().any(|u| u.username == username) {
        return Err(RegisterError::UsernameTaken);
    }
    if account.password.is_empty() {
        return Err(RegisterError::InvalidPassword);
    }

    Ok(UserRecord {
        username: username.to_owned(),
        name: account.name.trim().to_owned(),
        email,
        password: seal_password(&account.password)?,
    })
}

// =============================================================================
// JSON FILE STORE
// =============================================================================

pub struct JsonCredentialStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonCredentialStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), write_lock: Mutex::new(()) }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All stored records. A missing or blank file is an empty store.
    pub async fn load_users(&self) -> Result<Vec<UserRecord>, StoreError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&raw)?)
    }

    async fn save_users(&self, users: &[UserRecord]) -> Result<(), StoreError> {
        let body = serde_json::to_vec_pretty(users)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, body).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl CredentialStore for JsonCredentialStore {
    async fn verify(&self, username: &str, password: &str) -> Result<Option<String>, StoreError> {
        let users = self.load_users().await?;
        let username = username.trim();
        Ok(users
            .into_iter()
            .find(|u| u.username == username && password_matches(&u.password, password))
            .map(|u| u.username))
    }

    async fn register(&self, account: NewAccount) -> Result<(), RegisterError> {
        let _guard = self.write_lock.lock().await;
        let mut users = self.load_users().await?;
        let record = prepare_record(&account, &users)?;
        let username = record.username.clone();
        users.push(record);
        self.save_users(&users).await?;
        tracing::info!(%username, "account registered");
        Ok(())
    }
}

#[cfg(test)]
#[path = "credentials_test.rs"]
mod tests;
