//! # Persistent Store
//!
//! Sole owner of the on-disk document file and its reader/writer lock.
//!
//! ## Invariants
//! - Any number of `load()` calls may run together
//! - `replace()` and `update()` exclude every other operation
//! - A reader never observes a half-written file: writes go to a temp file,
//!   are fsynced, then renamed over the target

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use super::codec::{decode, encode};
use super::document::Document;
use super::errors::{StoreError, StoreResult};
use crate::observability::Logger;

/// File-backed document store
#[derive(Debug)]
pub struct PersistentStore {
    path: PathBuf,
    temp_path: PathBuf,
    lock: RwLock<()>,
}

impl PersistentStore {
    /// Create a handle without touching the filesystem.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "db.json".to_string());
        let temp_path = path.with_file_name(format!("{}.tmp", file_name));

        Self {
            path,
            temp_path,
            lock: RwLock::new(()),
        }
    }

    /// Create a handle and make sure the file exists.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let store = Self::new(path);
        store.ensure()?;
        Ok(store)
    }

    /// Path of the document file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the file with an empty document if it does not exist.
    pub fn ensure(&self) -> StoreResult<()> {
        let _guard = self.lock.write().map_err(|_| StoreError::LockPoisoned)?;

        match fs::metadata(&self.path) {
            Ok(_) => return Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(StoreError::io(&self.path, e)),
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
            }
        }

        self.write_document(&Document::new())?;
        let path = self.path.display().to_string();
        Logger::info("STORE_CREATED", &[("path", path.as_str())]);
        Ok(())
    }

    /// Read and decode the current document under a shared lock.
    pub fn load(&self) -> StoreResult<Document> {
        let _guard = self.lock.read().map_err(|_| StoreError::LockPoisoned)?;
        self.read_document()
    }

    /// Encode and atomically write `document` under an exclusive lock.
    pub fn replace(&self, document: &Document) -> StoreResult<()> {
        let _guard = self.lock.write().map_err(|_| StoreError::LockPoisoned)?;
        self.write_document(document)
    }

    /// Run one read-modify-write cycle under the exclusive lock.
    ///
    /// The document is written back only when `mutate` returns `Ok`.
    pub fn update<T, E, F>(&self, mutate: F) -> Result<T, E>
    where
        F: FnOnce(&mut Document) -> Result<T, E>,
        E: From<StoreError>,
    {
        let _guard = self.lock.write().map_err(|_| StoreError::LockPoisoned)?;
        let mut document = self.read_document()?;
        let value = mutate(&mut document)?;
        self.write_document(&document)?;
        Ok(value)
    }

    fn read_document(&self) -> StoreResult<Document> {
        let result = fs::read(&self.path)
            .map_err(|e| StoreError::io(&self.path, e))
            .and_then(|bytes| decode(&bytes));

        if let Err(e) = &result {
            let message = e.to_string();
            Logger::error(
                "STORE_LOAD_FAILED",
                &[("code", e.code()), ("error", message.as_str())],
            );
        }
        result
    }

    fn write_document(&self, document: &Document) -> StoreResult<()> {
        let result = encode(document).and_then(|bytes| self.write_atomic(&bytes));

        if let Err(e) = &result {
            let message = e.to_string();
            Logger::error(
                "STORE_WRITE_FAILED",
                &[("code", e.code()), ("error", message.as_str())],
            );
            let _ = fs::remove_file(&self.temp_path);
        }
        result
    }

    fn write_atomic(&self, bytes: &[u8]) -> StoreResult<()> {
        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options
            .open(&self.temp_path)
            .map_err(|e| StoreError::io(&self.temp_path, e))?;
        file.write_all(bytes)
            .map_err(|e| StoreError::io(&self.temp_path, e))?;
        file.sync_all()
            .map_err(|e| StoreError::io(&self.temp_path, e))?;
        drop(file);

        fs::rename(&self.temp_path, &self.path).map_err(|e| StoreError::io(&self.path, e))?;

        // The rename is already visible; a failed directory sync only
        // weakens durability across a crash
        if let Err(e) = sync_parent_dir(&self.path) {
            let path = self.path.display().to_string();
            let message = e.to_string();
            Logger::warn(
                "STORE_DIR_SYNC_FAILED",
                &[("error", message.as_str()), ("path", path.as_str())],
            );
        }

        Ok(())
    }
}

/// Fsync the directory holding `path` so a rename into it is durable
fn sync_parent_dir(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => File::open(parent)?.sync_all(),
        _ => Ok(()),
    }
}
