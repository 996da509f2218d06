//! Filesystem storage implementation for the Atom Wiki compiler.
//!
//! This crate provides [`FsStorage`], a filesystem-backed implementation of the
//! [`Storage`](aw_storage::Storage) trait rooted at the input folder.
//!
//! # Example
//!
//! ```ignore
//! use std::path::PathBuf;
//! use aw_storage::Storage;
//! use aw_storage_fs::FsStorage;
//!
//! let storage = FsStorage::new(PathBuf::from("docs"));
//! for entry in storage.list("")? {
//!     println!("{}", entry.name);
//! }
//! ```

use std::fs;
use std::path::PathBuf;

use aw_storage::{Entry, EntryKind, Storage, StorageError, StorageErrorKind};

/// Backend identifier for error messages.
const BACKEND: &str = "Fs";

/// Filesystem storage rooted at a source directory.
///
/// Directory listings are sorted by entry name so that repeated builds of an
/// unchanged folder see the same order on every platform.
#[derive(Debug, Clone)]
pub struct FsStorage {
    source_dir: PathBuf,
}

impl FsStorage {
    #[must_use]
    pub fn new(source_dir: PathBuf) -> Self {
        Self { source_dir }
    }

    /// Reject paths that could escape the source directory.
    fn validate_path(path: &str) -> Result<(), StorageError> {
        let escapes = path.starts_with('/')
            || path.contains('\\')
            || path.split('/').any(|segment| segment == "..");
        if escapes {
            return Err(StorageError::new(StorageErrorKind::InvalidPath)
                .with_path(path)
                .with_backend(BACKEND));
        }
        Ok(())
    }

    fn resolve(&self, path: &str) -> Result<PathBuf, StorageError> {
        Self::validate_path(path)?;
        let mut full = self.source_dir.clone();
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            full.push(segment);
        }
        Ok(full)
    }
}

impl Storage for FsStorage {
    fn list(&self, dir: &str) -> Result<Vec<Entry>, StorageError> {
        let full = self.resolve(dir)?;
        let read_dir = fs::read_dir(&full)
            .map_err(|e| StorageError::io(e, Some(full.clone())).with_backend(BACKEND))?;

        let mut entries = Vec::new();
        for entry in read_dir {
            // A failed iteration step names no entry; the rest of the listing is still usable.
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!(dir = %full.display(), error = %e, "Skipping unreadable directory entry");
                    continue;
                }
            };
            let name = entry.file_name().to_string_lossy().into_owned();
            let path = entry.path();
            let kind = match entry.file_type().ok() {
                Some(file_type) if file_type.is_dir() => EntryKind::Dir,
                // Symlinked folders are not followed, so walks stay finite.
                Some(file_type) if file_type.is_symlink() && path.is_dir() => {
                    tracing::debug!(path = %path.display(), "Skipping linked folder");
                    continue;
                }
                Some(file_type) if !file_type.is_file() && !file_type.is_symlink() => {
                    tracing::debug!(path = %path.display(), "Skipping special entry");
                    continue;
                }
                // Linked files, broken links and untyped entries are listed as files
                // so a failing read reports them.
                _ => EntryKind::File,
            };
            entries.push(Entry { name, kind });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn read(&self, path: &str) -> Result<String, StorageError> {
        let full = self.resolve(path)?;
        fs::read_to_string(&full).map_err(|e| StorageError::io(e, Some(full)).with_backend(BACKEND))
    }
}
