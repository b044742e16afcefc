//! Session token storage.
//!
//! Tokens are kept under one key per [`Role`] (`adminToken`, `userToken`) until
//! logout clears them. There is no expiry tracking: the backend decides when a
//! token stops working.

use event_ticket_core::{ClientError, Role, SessionToken};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError, RwLock};
use thiserror::Error;

/// Errors from a session store backend
#[derive(Debug, Error)]
pub enum SessionStoreError {
    /// The backing file could not be read or written
    #[error("session file {path}: {source}")]
    Io {
        /// File path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The backing file is not a JSON object
    #[error("session file {path} is corrupt: {reason}")]
    Corrupt {
        /// File path
        path: PathBuf,
        /// Why it could not be decoded
        reason: String,
    },
}

impl From<SessionStoreError> for ClientError {
    fn from(error: SessionStoreError) -> Self {
        Self::Storage(error.to_string())
    }
}

/// Storage for role-keyed session tokens.
///
/// Implementations are shared across flows and must be thread-safe.
pub trait SessionStore: Send + Sync {
    /// Store the token for a role, replacing any previous one
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot persist the token
    fn set_token(&self, role: Role, token: &SessionToken) -> Result<(), SessionStoreError>;

    /// Token currently stored for a role
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read
    fn get_token(&self, role: Role) -> Result<Option<SessionToken>, SessionStoreError>;

    /// Remove every stored token
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot persist the removal
    fn clear_all(&self) -> Result<(), SessionStoreError>;
}

// ============================================================================
// In-memory store
// ============================================================================

/// Process-local store, lost when the process exits.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    tokens: RwLock<HashMap<Role, SessionToken>>,
}

impl MemorySessionStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn set_token(&self, role: Role, token: &SessionToken) -> Result<(), SessionStoreError> {
        self.tokens
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(role, token.clone());
        Ok(())
    }

    fn get_token(&self, role: Role) -> Result<Option<SessionToken>, SessionStoreError> {
        Ok(self
            .tokens
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&role)
            .cloned())
    }

    fn clear_all(&self) -> Result<(), SessionStoreError> {
        self.tokens
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        Ok(())
    }
}

// ============================================================================
// File-backed store
// ============================================================================

/// Store persisted as a JSON object file, rewritten on every mutation.
///
/// Keys other than the token keys are preserved. A missing file is an empty
/// store.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process
    lock: Mutex<()>,
}

impl FileSessionStore {
    /// Create a store backed by `path`; the file is created on first write
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Backing file path
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> SessionStoreError {
        SessionStoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn load(&self) -> Result<Map<String, Value>, SessionStoreError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(self.io_error(e)),
        };

        if raw.trim().is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(entries)) => Ok(entries),
            Ok(other) => Err(SessionStoreError::Corrupt {
                path: self.path.clone(),
                reason: format!("expected a JSON object, found {other}"),
            }),
            Err(e) => Err(SessionStoreError::Corrupt {
                path: self.path.clone(),
                reason: e.to_string(),
            }),
        }
    }

    fn save(&self, entries: Map<String, Value>) -> Result<(), SessionStoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let body = serde_json::to_string_pretty(&Value::Object(entries)).map_err(|e| {
            SessionStoreError::Corrupt {
                path: self.path.clone(),
                reason: e.to_string(),
            }
        })?;
        std::fs::write(&self.path, body).map_err(|e| self.io_error(e))
    }
}

impl SessionStore for FileSessionStore {
    fn set_token(&self, role: Role, token: &SessionToken) -> Result<(), SessionStoreError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut entries = self.load()?;
        entries.insert(
            role.storage_key().to_string(),
            Value::String(token.as_str().to_string()),
        );
        self.save(entries)
    }

    fn get_token(&self, role: Role) -> Result<Option<SessionToken>, SessionStoreError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let entries = self.load()?;
        Ok(entries
            .get(role.storage_key())
            .and_then(Value::as_str)
            .filter(|token| !token.is_empty())
            .map(SessionToken::new))
    }

    fn clear_all(&self) -> Result<(), SessionStoreError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        // An unreadable file is replaced rather than blocking logout
        let mut entries = self.load().unwrap_or_default();
        for role in Role::ALL {
            entries.remove(role.storage_key());
        }
        self.save(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> FileSessionStore {
        FileSessionStore::new(dir.path().join("nested").join("session.json"))
    }

    #[test]
    fn memory_store_keeps_roles_apart() {
        let store = MemorySessionStore::new();
        store.set_token(Role::Admin, &SessionToken::new("admin-1")).unwrap();
        store.set_token(Role::User, &SessionToken::new("u-1")).unwrap();

        assert_eq!(
            store.get_token(Role::Admin).unwrap(),
            Some(SessionToken::new("admin-1"))
        );
        assert_eq!(
            store.get_token(Role::User).unwrap(),
            Some(SessionToken::new("u-1"))
        );

        store.clear_all().unwrap();
        assert_eq!(store.get_token(Role::Admin).unwrap(), None);
        assert_eq!(store.get_token(Role::User).unwrap(), None);
    }

    #[test]
    fn missing_file_is_empty_store() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        assert_eq!(store.get_token(Role::User).unwrap(), None);
    }

    #[test]
    fn file_store_persists_across_instances() {
        let dir = TempDir::new().unwrap();
        store_in(&dir)
            .set_token(Role::Admin, &SessionToken::new("admin-xyz"))
            .unwrap();

        let reopened = store_in(&dir);
        assert_eq!(
            reopened.get_token(Role::Admin).unwrap(),
            Some(SessionToken::new("admin-xyz"))
        );

        let raw = std::fs::read_to_string(reopened.path()).unwrap();
        let json: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["adminToken"], "admin-xyz");
    }

    #[test]
    fn clear_all_keeps_unrelated_keys() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.set_token(Role::User, &SessionToken::new("u-1")).unwrap();

        let mut entries = store.load().unwrap();
        entries.insert("theme".into(), Value::String("dark".into()));
        store.save(entries).unwrap();

        store.clear_all().unwrap();

        let entries = store.load().unwrap();
        assert!(!entries.contains_key("userToken"));
        assert_eq!(entries["theme"], "dark");
    }

    #[test]
    fn corrupt_file_is_reported_and_cleared_on_logout() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(store.path(), "[1, 2").unwrap();

        let error = store.get_token(Role::Admin).unwrap_err();
        assert!(matches!(error, SessionStoreError::Corrupt { .. }));
        assert!(matches!(ClientError::from(error), ClientError::Storage(_)));

        store.clear_all().unwrap();
        assert_eq!(store.get_token(Role::Admin).unwrap(), None);
    }
}
