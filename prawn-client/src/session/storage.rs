//! Session storage port
//!
//! The session and its cart are two keyed records with one lifecycle:
//! `clear` always removes both. Implementations are injected so tests
//! run against memory and the app against files.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use thiserror::Error;

use shared::models::{Cart, Session};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Keyed persistence for the session and its bound cart
pub trait SessionStore: Send + Sync + 'static {
    fn load_session(&self) -> Result<Option<Session>, StorageError>;
    fn save_session(&self, session: &Session) -> Result<(), StorageError>;
    /// Missing record reads as an empty cart.
    fn load_cart(&self) -> Result<Cart, StorageError>;
    fn save_cart(&self, cart: &Cart) -> Result<(), StorageError>;
    /// Remove both records together.
    fn clear(&self) -> Result<(), StorageError>;
}

/// In-memory store for tests and demos
#[derive(Debug, Default)]
pub struct MemoryStore {
    session: Mutex<Option<Session>>,
    cart: Mutex<Cart>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemoryStore {
    fn load_session(&self) -> Result<Option<Session>, StorageError> {
        Ok(self.session.lock().unwrap().clone())
    }

    fn save_session(&self, session: &Session) -> Result<(), StorageError> {
        *self.session.lock().unwrap() = Some(session.clone());
        Ok(())
    }

    fn load_cart(&self) -> Result<Cart, StorageError> {
        Ok(self.cart.lock().unwrap().clone())
    }

    fn save_cart(&self, cart: &Cart) -> Result<(), StorageError> {
        *self.cart.lock().unwrap() = cart.clone();
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        *self.session.lock().unwrap() = None;
        self.cart.lock().unwrap().clear();
        Ok(())
    }
}

/// File store: one JSON document per record under a directory
///
/// Survives page reloads of the embedding app; a missing or unreadable
/// directory simply reads as "no session".
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn session_path(&self) -> PathBuf {
        self.dir.join("session.json")
    }

    fn cart_path(&self) -> PathBuf {
        self.dir.join("cart.json")
    }

    fn read<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>, StorageError> {
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    fn write<T: serde::Serialize>(&self, path: &Path, value: &T) -> Result<(), StorageError> {
        std::fs::create_dir_all(&self.dir)?;
        let content = serde_json::to_string_pretty(value)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

impl SessionStore for JsonFileStore {
    fn load_session(&self) -> Result<Option<Session>, StorageError> {
        Self::read(&self.session_path())
    }

    fn save_session(&self, session: &Session) -> Result<(), StorageError> {
        self.write(&self.session_path(), session)?;
        tracing::debug!(name = %session.name, "Session saved");
        Ok(())
    }

    fn load_cart(&self) -> Result<Cart, StorageError> {
        Ok(Self::read(&self.cart_path())?.unwrap_or_default())
    }

    fn save_cart(&self, cart: &Cart) -> Result<(), StorageError> {
        self.write(&self.cart_path(), cart)
    }

    fn clear(&self) -> Result<(), StorageError> {
        for path in [self.session_path(), self.cart_path()] {
            if path.exists() {
                std::fs::remove_file(&path)?;
            }
        }
        tracing::debug!("Session and cart cleared");
        Ok(())
    }
}
