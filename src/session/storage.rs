//! Durable key-value storage backing the session mirror.
//!
//! Two backends are provided:
//!
//! * [`FileStorage`]: a JSON file wrapped in an envelope with a format version
//!   and a SHA256 checksum of the entries.
//! * [`MemoryStorage`]: an in-process map with an optional byte quota.
//!
//! A missing entry is reported as `Ok(None)`. Errors are reserved for storage
//! that exists but cannot be read or written.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Current version of the storage file format.
pub const STORAGE_VERSION: u32 = 1;

/// Errors raised by durable storage backends.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The underlying file could not be read or written.
    #[error("storage I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The stored data is unreadable or failed its integrity check.
    #[error("storage is corrupted: {0}")]
    Corrupted(String),

    /// A write would exceed the configured capacity.
    #[error("storage quota exceeded: {needed} bytes needed, {quota} available")]
    QuotaExceeded { needed: usize, quota: usize },
}

/// A string-keyed store that survives process restarts.
pub trait DurableStorage: fmt::Debug {
    /// Read an entry. A missing key is `Ok(None)`.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Insert or replace an entry.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove an entry. Removing a missing key succeeds.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;

    /// Apply several sets (`Some`) and removals (`None`) as one write.
    ///
    /// The default applies them one at a time; backends that can commit in
    /// a single write override it.
    fn write_entries(&mut self, entries: &[(&str, Option<&str>)]) -> Result<(), StorageError> {
        for (key, value) in entries {
            match value {
                Some(value) => self.set(key, value)?,
                None => self.remove(key)?,
            }
        }
        Ok(())
    }
}

// ==================== File Storage ====================

/// Envelope for storage files to include integrity checks.
#[derive(Debug, Serialize, Deserialize)]
struct StorageEnvelope {
    /// Format version.
    version: u32,
    /// When the file was last written.
    saved_at: DateTime<Utc>,
    /// SHA256 checksum of the compact-serialized entries.
    checksum: String,
    /// The stored entries.
    entries: BTreeMap<String, String>,
}

fn checksum(entries: &BTreeMap<String, String>) -> Result<String, StorageError> {
    let json = serde_json::to_string(entries)
        .map_err(|e| StorageError::Corrupted(format!("failed to serialize entries: {}", e)))?;
    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}

/// File-backed storage. Every write replaces the whole file.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Create storage backed by the given file. The file is not touched until
    /// the first read or write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Storage at the default platform-specific location.
    pub fn default_location() -> anyhow::Result<Self> {
        Ok(Self::new(Self::default_path()?))
    }

    /// Get the default platform-specific storage path.
    pub fn default_path() -> anyhow::Result<PathBuf> {
        let project_dirs = directories::ProjectDirs::from("com", "storydeck", "storydeck")
            .ok_or_else(|| anyhow::anyhow!("Failed to determine project directories"))?;
        Ok(project_dirs.data_dir().join("session.json"))
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }

    /// Load and verify all entries. A missing file is an empty map.
    fn load_entries(&self) -> Result<BTreeMap<String, String>, StorageError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(self.io_error(e)),
        };

        let envelope: StorageEnvelope = serde_json::from_str(&content).map_err(|e| {
            StorageError::Corrupted(format!("failed to parse storage envelope: {}", e))
        })?;

        if envelope.version != STORAGE_VERSION {
            return Err(StorageError::Corrupted(format!(
                "unsupported storage version {} (expected {})",
                envelope.version, STORAGE_VERSION
            )));
        }

        if checksum(&envelope.entries)? != envelope.checksum {
            return Err(StorageError::Corrupted(
                "integrity check failed: checksum mismatch".to_string(),
            ));
        }

        Ok(envelope.entries)
    }

    /// Load entries for a read-modify-write. A corrupted file is replaced.
    fn load_for_update(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match self.load_entries() {
            Err(StorageError::Corrupted(reason)) => {
                log::warn!(
                    "Replacing corrupted storage file {}: {}",
                    self.path.display(),
                    reason
                );
                Ok(BTreeMap::new())
            }
            other => other,
        }
    }

    fn save_entries(&self, entries: BTreeMap<String, String>) -> Result<(), StorageError> {
        let envelope = StorageEnvelope {
            version: STORAGE_VERSION,
            saved_at: Utc::now(),
            checksum: checksum(&entries)?,
            entries,
        };
        let json = serde_json::to_string_pretty(&envelope)
            .map_err(|e| StorageError::Corrupted(format!("failed to serialize envelope: {}", e)))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
            }
        }

        // Sibling temp file, then rename over the target.
        let tmp_path = self.path.with_extension("json.tmp");
        let written = write_and_replace(&tmp_path, &self.path, json.as_bytes());
        if let Err(e) = written {
            if let Err(cleanup) = fs::remove_file(&tmp_path) {
                if cleanup.kind() != std::io::ErrorKind::NotFound {
                    log::debug!("Could not remove {}: {}", tmp_path.display(), cleanup);
                }
            }
            return Err(self.io_error(e));
        }

        log::trace!("Wrote storage file {}", self.path.display());
        Ok(())
    }
}

fn write_and_replace(tmp_path: &Path, path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(tmp_path)?;
    file.write_all(bytes)?;
    file.sync_all()?;
    drop(file);
    fs::rename(tmp_path, path)
}

impl DurableStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.load_entries()?.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.write_entries(&[(key, Some(value))])
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.write_entries(&[(key, None)])
    }

    fn write_entries(&mut self, changes: &[(&str, Option<&str>)]) -> Result<(), StorageError> {
        let mut entries = self.load_for_update()?;
        for (key, value) in changes {
            match value {
                Some(value) => {
                    entries.insert((*key).to_string(), (*value).to_string());
                }
                None => {
                    entries.remove(*key);
                }
            }
        }
        self.save_entries(entries)
    }
}

// ==================== Memory Storage ====================

/// In-process storage, optionally capped at a byte quota.
///
/// The quota counts the bytes of every key and value, the way browser
/// storage counts its budget.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: BTreeMap<String, String>,
    quota: Option<usize>,
}

impl MemoryStorage {
    /// Create empty, unbounded storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create empty storage that rejects writes past `bytes`.
    #[must_use]
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            entries: BTreeMap::new(),
            quota: Some(bytes),
        }
    }

    /// Create storage pre-populated with entries.
    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            quota: None,
        }
    }

    /// Number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no entries are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn used_bytes(entries: &BTreeMap<String, String>) -> usize {
        entries.iter().map(|(k, v)| k.len() + v.len()).sum()
    }
}

impl DurableStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.write_entries(&[(key, Some(value))])
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.write_entries(&[(key, None)])
    }

    /// All changes land together or none do.
    fn write_entries(&mut self, changes: &[(&str, Option<&str>)]) -> Result<(), StorageError> {
        let mut next = self.entries.clone();
        for (key, value) in changes {
            match value {
                Some(value) => {
                    next.insert((*key).to_string(), (*value).to_string());
                }
                None => {
                    next.remove(*key);
                }
            }
        }
        if let Some(quota) = self.quota {
            let needed = Self::used_bytes(&next);
            if needed > quota {
                return Err(StorageError::QuotaExceeded { needed, quota });
            }
        }
        self.entries = next;
        Ok(())
    }
}
