//! Single-slot storage for the OAuth token record.
//!
//! Only one record is ever kept: every save overwrites the previous one and `clear` removes it.
//! There is no locking; when two writers race, the last write wins.

use crate::client_error::ClientError;
use crate::token_record::TokenRecord;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Somewhere to keep the current token record.
pub trait TokenStore {
    /// Persist `record`, replacing whatever was stored before.
    fn save(&self, record: &TokenRecord) -> Result<(), ClientError>;

    /// Return the stored record, or `None` when nothing is stored.
    fn load(&self) -> Result<Option<TokenRecord>, ClientError>;

    /// Whether a record is stored. Does not attempt to parse it.
    fn exists(&self) -> bool;

    /// Remove the stored record. Succeeds when nothing is stored.
    fn clear(&self) -> Result<(), ClientError>;
}

/// Keeps the token record as a JSON file on disk.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> FileTokenStore {
        FileTokenStore { path: path.into() }
    }

    /// Get the file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn save(&self, record: &TokenRecord) -> Result<(), ClientError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)?;

        // Created 0600 on Unix, then renamed over the old file.
        let mut file = NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut file, record)?;
        file.as_file().sync_all()?;
        file.persist(&self.path).map_err(|error| error.error)?;

        tracing::debug!(path = %self.path.display(), "Saved token record");

        Ok(())
    }

    fn load(&self) -> Result<Option<TokenRecord>, ClientError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&self.path)?;
        let record = serde_json::from_str(&content)?;

        Ok(Some(record))
    }

    fn exists(&self) -> bool {
        self.path.is_file()
    }

    fn clear(&self) -> Result<(), ClientError> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
            tracing::debug!(path = %self.path.display(), "Removed token record");
        }

        Ok(())
    }
}

/// Keeps the token record in memory. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    slot: Mutex<Option<TokenRecord>>,
}

impl MemoryTokenStore {
    pub fn new() -> MemoryTokenStore {
        MemoryTokenStore::default()
    }

    /// Create a store already holding `record`.
    pub fn with_record(record: TokenRecord) -> MemoryTokenStore {
        MemoryTokenStore {
            slot: Mutex::new(Some(record)),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn save(&self, record: &TokenRecord) -> Result<(), ClientError> {
        *self.slot.lock() = Some(record.clone());
        Ok(())
    }

    fn load(&self) -> Result<Option<TokenRecord>, ClientError> {
        Ok(self.slot.lock().clone())
    }

    fn exists(&self) -> bool {
        self.slot.lock().is_some()
    }

    fn clear(&self) -> Result<(), ClientError> {
        *self.slot.lock() = None;
        Ok(())
    }
}
