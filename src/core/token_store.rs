//! Persistent storage for the session bearer token.
//!
//! At most one token is stored at a time. The keyring backend keeps it in the
//! platform credential store under the `evolance` service; the in-memory
//! backend is used when keyring access is disabled and in tests.

use keyring::Entry;
use std::error::Error;
use std::fmt;
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

pub const KEYRING_SERVICE: &str = "evolance";
pub const KEYRING_ACCOUNT: &str = "token";

/// Failures when attempting to access the system keyring.
///
/// Recoverable errors mean the credential backend was temporarily
/// unavailable (a locked keychain, for example). Permanent errors carry the
/// underlying cause so callers can report it.
#[derive(Debug)]
pub enum KeyringAccessError {
    Recoverable(keyring::Error),
    Permanent(keyring::Error),
}

impl KeyringAccessError {
    fn inner(&self) -> &keyring::Error {
        match self {
            KeyringAccessError::Recoverable(err) | KeyringAccessError::Permanent(err) => err,
        }
    }

    pub fn is_recoverable(&self) -> bool {
        matches!(self, KeyringAccessError::Recoverable(_))
    }
}

impl From<keyring::Error> for KeyringAccessError {
    fn from(err: keyring::Error) -> Self {
        match err {
            keyring::Error::PlatformFailure(_) | keyring::Error::NoStorageAccess(_) => {
                KeyringAccessError::Recoverable(err)
            }
            other => KeyringAccessError::Permanent(other),
        }
    }
}

impl fmt::Display for KeyringAccessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inner())
    }
}

impl Error for KeyringAccessError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(self.inner())
    }
}

#[derive(Debug)]
pub enum TokenStoreError {
    Keyring(KeyringAccessError),
}

impl TokenStoreError {
    pub fn is_recoverable(&self) -> bool {
        match self {
            TokenStoreError::Keyring(err) => err.is_recoverable(),
        }
    }
}

impl fmt::Display for TokenStoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenStoreError::Keyring(err) if err.is_recoverable() => {
                write!(f, "keyring temporarily unavailable: {err}")
            }
            TokenStoreError::Keyring(err) => write!(f, "keyring error: {err}"),
        }
    }
}

impl Error for TokenStoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            TokenStoreError::Keyring(err) => Some(err),
        }
    }
}

impl From<keyring::Error> for TokenStoreError {
    fn from(err: keyring::Error) -> Self {
        TokenStoreError::Keyring(KeyringAccessError::from(err))
    }
}

/// Durable home of the bearer token. `get` is called on every request, so
/// implementations should make it cheap after the first read.
pub trait TokenStore: Send + Sync {
    fn get(&self) -> Result<Option<String>, TokenStoreError>;
    fn set(&self, token: &str) -> Result<(), TokenStoreError>;
    /// Remove the token. Clearing an empty store is not an error.
    fn clear(&self) -> Result<(), TokenStoreError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Cached {
    Unknown,
    Missing,
    Present(String),
}

#[derive(Debug)]
pub struct KeyringTokenStore {
    service: String,
    account: String,
    cache: Mutex<Cached>,
}

impl Default for KeyringTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyringTokenStore {
    pub fn new() -> Self {
        Self::with_entry(KEYRING_SERVICE, KEYRING_ACCOUNT)
    }

    pub fn with_entry(service: impl Into<String>, account: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            account: account.into(),
            cache: Mutex::new(Cached::Unknown),
        }
    }

    fn entry(&self) -> Result<Entry, TokenStoreError> {
        Ok(Entry::new(&self.service, &self.account)?)
    }

    fn cache(&self) -> MutexGuard<'_, Cached> {
        self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl TokenStore for KeyringTokenStore {
    fn get(&self) -> Result<Option<String>, TokenStoreError> {
        let mut cache = self.cache();
        match &*cache {
            Cached::Present(token) => return Ok(Some(token.clone())),
            Cached::Missing => return Ok(None),
            Cached::Unknown => {}
        }

        let token = match self.entry()?.get_password() {
            Ok(token) => Some(token),
            Err(keyring::Error::NoEntry) => None,
            Err(err) => return Err(err.into()),
        };
        debug!(present = token.is_some(), "loaded session token from keyring");
        *cache = match &token {
            Some(token) => Cached::Present(token.clone()),
            None => Cached::Missing,
        };
        Ok(token)
    }

    fn set(&self, token: &str) -> Result<(), TokenStoreError> {
        let mut cache = self.cache();
        self.entry()?.set_password(token)?;
        *cache = Cached::Present(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), TokenStoreError> {
        let mut cache = self.cache();
        match self.entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => {
                *cache = Cached::Missing;
                Ok(())
            }
            Err(err) => {
                *cache = Cached::Unknown;
                Err(err.into())
            }
        }
    }
}

/// Process-local token storage; nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        Self {
            token: Mutex::new(Some(token.to_string())),
        }
    }

    fn slot(&self) -> MutexGuard<'_, Option<String>> {
        self.token.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Result<Option<String>, TokenStoreError> {
        Ok(self.slot().clone())
    }

    fn set(&self, token: &str) -> Result<(), TokenStoreError> {
        *self.slot() = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), TokenStoreError> {
        *self.slot() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_replaces_and_clears() {
        let store = MemoryTokenStore::new();
        assert_eq!(store.get().unwrap(), None);
        store.set("first").unwrap();
        store.set("second").unwrap();
        assert_eq!(store.get().unwrap().as_deref(), Some("second"));
        store.clear().unwrap();
        store.clear().unwrap();
        assert_eq!(store.get().unwrap(), None);
    }

    #[test]
    fn platform_failures_are_recoverable() {
        let err = KeyringAccessError::from(keyring::Error::PlatformFailure("locked".into()));
        assert!(err.is_recoverable());
        let err = TokenStoreError::from(keyring::Error::NoEntry);
        assert!(!err.is_recoverable());
        assert!(err.to_string().starts_with("keyring error"));
    }
}
