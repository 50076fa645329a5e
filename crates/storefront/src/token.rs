//! Bearer token storage.
//!
//! A token store holds at most one token. The [`ApiClient`](crate::api::ApiClient)
//! reads it on every request, so whatever was last set is what the next
//! request sends.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use tracing::debug;

/// Errors raised while persisting a token.
#[derive(Debug, Error)]
pub enum TokenStoreError {
    #[error("Failed to persist token to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Token store lock poisoned")]
    Poisoned,
}

/// A single-slot bearer token store.
pub trait TokenStore: Send + Sync {
    /// The current token, if any.
    fn get(&self) -> Option<SecretString>;

    /// Replace the token. `None` clears the slot.
    ///
    /// # Errors
    ///
    /// Returns `TokenStoreError` if the new value could not be persisted. The
    /// in-memory slot is still updated.
    fn set(&self, token: Option<SecretString>) -> Result<(), TokenStoreError>;

    /// Whether a token is currently held.
    fn is_set(&self) -> bool {
        self.get().is_some()
    }
}

// =============================================================================
// MemoryTokenStore
// =============================================================================

/// Token store that lives for the duration of the process.
#[derive(Default)]
pub struct MemoryTokenStore {
    slot: RwLock<Option<SecretString>>,
}

impl MemoryTokenStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-loaded with a token.
    #[must_use]
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            slot: RwLock::new(Some(SecretString::from(token.into()))),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Option<SecretString> {
        self.slot.read().ok().and_then(|slot| slot.clone())
    }

    fn set(&self, token: Option<SecretString>) -> Result<(), TokenStoreError> {
        let mut slot = self.slot.write().map_err(|_| TokenStoreError::Poisoned)?;
        *slot = token;
        Ok(())
    }
}

impl std::fmt::Debug for MemoryTokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryTokenStore")
            .field("token", &self.is_set().then_some("[REDACTED]"))
            .finish()
    }
}

// =============================================================================
// FileTokenStore
// =============================================================================

/// Token store backed by a file holding the raw token.
///
/// The file is read once on open and rewritten on every `set`. Clearing the
/// token removes the file.
pub struct FileTokenStore {
    path: PathBuf,
    memory: MemoryTokenStore,
}

impl FileTokenStore {
    /// Open the store, loading any token already on disk.
    ///
    /// # Errors
    ///
    /// Returns `TokenStoreError::Io` if the file exists but cannot be read.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, TokenStoreError> {
        let path = path.into();
        let memory = MemoryTokenStore::new();

        match fs::read_to_string(&path) {
            Ok(contents) => {
                let token = contents.trim();
                if !token.is_empty() {
                    memory.set(Some(SecretString::from(token.to_owned())))?;
                    debug!(path = %path.display(), "Loaded stored token");
                }
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(source) => return Err(TokenStoreError::Io { path, source }),
        }

        Ok(Self { path, memory })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, token: Option<&SecretString>) -> Result<(), TokenStoreError> {
        let result = match token {
            Some(token) => write_private(&self.path, token.expose_secret()),
            None => match fs::remove_file(&self.path) {
                Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
                other => other,
            },
        };
        result.map_err(|source| TokenStoreError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self) -> Option<SecretString> {
        self.memory.get()
    }

    fn set(&self, token: Option<SecretString>) -> Result<(), TokenStoreError> {
        let persisted = self.persist(token.as_ref());
        self.memory.set(token)?;
        persisted
    }
}

impl std::fmt::Debug for FileTokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileTokenStore")
            .field("path", &self.path)
            .field("token", &self.is_set().then_some("[REDACTED]"))
            .finish()
    }
}

#[cfg(unix)]
fn write_private(path: &Path, contents: &str) -> io::Result<()> {
    use std::io::Write;
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    // mode() only applies on creation
    file.set_permissions(fs::Permissions::from_mode(0o600))?;
    file.write_all(contents.as_bytes())
}

#[cfg(not(unix))]
fn write_private(path: &Path, contents: &str) -> io::Result<()> {
    fs::write(path, contents)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("marchenet-{name}-{}", uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_memory_store_single_slot() {
        let store = MemoryTokenStore::new();
        assert!(store.get().is_none());

        store.set(Some(SecretString::from("first"))).unwrap();
        store.set(Some(SecretString::from("second"))).unwrap();
        assert_eq!(store.get().unwrap().expose_secret(), "second");

        store.set(None).unwrap();
        assert!(!store.is_set());
    }

    #[test]
    fn test_debug_redacts_token() {
        let store = MemoryTokenStore::with_token("super-secret-token");
        let debug = format!("{store:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("super-secret-token"));
    }

    #[test]
    fn test_file_store_persists_across_open() {
        let path = temp_path("token");
        {
            let store = FileTokenStore::open(&path).unwrap();
            assert!(!store.is_set());
            store.set(Some(SecretString::from("jwt-abc"))).unwrap();
        }

        let reopened = FileTokenStore::open(&path).unwrap();
        assert_eq!(reopened.get().unwrap().expose_secret(), "jwt-abc");

        reopened.set(None).unwrap();
        assert!(!path.exists());
        assert!(!FileTokenStore::open(&path).unwrap().is_set());
    }

    #[test]
    fn test_clearing_missing_file_is_ok() {
        let store = FileTokenStore::open(temp_path("absent")).unwrap();
        store.set(None).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_file_store_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let path = temp_path("mode");
        let store = FileTokenStore::open(&path).unwrap();
        store.set(Some(SecretString::from("jwt"))).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        store.set(None).unwrap();
    }
}
