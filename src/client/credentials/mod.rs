//! Credential Store
//!
//! Tokens live in two places at once: a durable backend that survives restarts and
//! a cookie jar the edge server reads on every page navigation. Callers see one
//! store with `set`/`get`/`clear`; the redundancy stays in here.
//!
//! ## Reads
//!
//! `get` prefers the cookie and falls back to durable storage. A backend failure is
//! logged and reads as "absent"; it never fails the caller.
//!
//! ## Writes
//!
//! `set` writes both backends. If one fails the other is still written.
//!
//! ## Usage
//!
//! ```rust
//! use filedesk::client::credentials::{CredentialStore, MemoryStorage, TokenKind};
//!
//! let store = CredentialStore::new(Box::new(MemoryStorage::default()), time::Duration::days(7));
//! store.set(TokenKind::Access, "abc");
//! assert_eq!(store.get(TokenKind::Access).as_deref(), Some("abc"));
//!
//! store.clear();
//! assert!(store.get(TokenKind::Access).is_none());
//! ```

use std::sync::Mutex;

use thiserror::Error;

use crate::shared::models::TokenPair;

/// Durable storage backends
pub mod durable;

/// Cookie jar backend
pub mod cookies;

pub use cookies::CookieStorage;
pub use durable::{FileStorage, MemoryStorage};

/// Which token of the pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    pub const ALL: [TokenKind; 2] = [TokenKind::Access, TokenKind::Refresh];

    /// Storage key and cookie name
    pub fn key(self) -> &'static str {
        match self {
            TokenKind::Access => "access_token",
            TokenKind::Refresh => "refresh_token",
        }
    }
}

/// Errors raised by a storage backend
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("cookie expiry out of range for a lifetime of {0}")]
    ExpiryOutOfRange(time::Duration),
}

/// Key/value backend for credentials
pub trait TokenStorage: Send + Sync {
    /// Human-readable backend name for logs
    fn name(&self) -> &'static str;

    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn store(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`; removing a missing key is not an error
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Credential store mirroring tokens into durable storage and a cookie jar
pub struct CredentialStore {
    durable: Box<dyn TokenStorage>,
    cookies: CookieStorage,
    gate: Mutex<()>,
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore")
            .field("durable", &self.durable.name())
            .field("cookies", &self.cookies)
            .finish()
    }
}

impl CredentialStore {
    /// Create a store over `durable` with cookies living for `cookie_ttl`
    pub fn new(durable: Box<dyn TokenStorage>, cookie_ttl: time::Duration) -> Self {
        Self {
            durable,
            cookies: CookieStorage::new(cookie_ttl),
            gate: Mutex::new(()),
        }
    }

    /// Create a store from explicit backends
    pub fn with_backends(durable: Box<dyn TokenStorage>, cookies: CookieStorage) -> Self {
        Self {
            durable,
            cookies,
            gate: Mutex::new(()),
        }
    }

    /// Read a token, cookie first
    pub fn get(&self, kind: TokenKind) -> Option<String> {
        let _guard = self.gate.lock().unwrap_or_else(|e| e.into_inner());
        read(&self.cookies, kind).or_else(|| read(self.durable.as_ref(), kind))
    }

    /// Write a token to both backends
    pub fn set(&self, kind: TokenKind, value: &str) {
        let _guard = self.gate.lock().unwrap_or_else(|e| e.into_inner());
        self.write(kind, value);
    }

    /// Write both tokens of a pair
    pub fn set_pair(&self, pair: &TokenPair) {
        let _guard = self.gate.lock().unwrap_or_else(|e| e.into_inner());
        self.write(TokenKind::Access, &pair.access);
        self.write(TokenKind::Refresh, &pair.refresh);
    }

    /// Remove both tokens from both backends
    pub fn clear(&self) {
        let _guard = self.gate.lock().unwrap_or_else(|e| e.into_inner());
        for kind in TokenKind::ALL {
            for backend in [&self.cookies as &dyn TokenStorage, self.durable.as_ref()] {
                if let Err(e) = backend.remove(kind.key()) {
                    tracing::warn!(
                        "[Credentials] Failed to remove {} from {}: {}",
                        kind.key(),
                        backend.name(),
                        e
                    );
                }
            }
        }
        tracing::debug!("[Credentials] Cleared");
    }

    /// `Cookie` header value a page navigation would carry
    pub fn cookie_header(&self) -> Option<String> {
        self.cookies.cookie_header()
    }

    pub fn cookies(&self) -> &CookieStorage {
        &self.cookies
    }

    fn write(&self, kind: TokenKind, value: &str) {
        for backend in [&self.cookies as &dyn TokenStorage, self.durable.as_ref()] {
            if let Err(e) = backend.store(kind.key(), value) {
                tracing::warn!(
                    "[Credentials] Failed to write {} to {}: {}",
                    kind.key(),
                    backend.name(),
                    e
                );
            }
        }
    }
}

fn read(backend: &dyn TokenStorage, kind: TokenKind) -> Option<String> {
    match backend.load(kind.key()) {
        Ok(value) => value.filter(|v| !v.is_empty()),
        Err(e) => {
            tracing::warn!(
                "[Credentials] Failed to read {} from {}: {}",
                kind.key(),
                backend.name(),
                e
            );
            None
        }
    }
}
