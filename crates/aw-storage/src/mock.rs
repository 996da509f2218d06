//! Mock storage implementation for testing.
//!
//! Provides [`MockStorage`] for unit testing without filesystem access.

use std::collections::HashSet;

use crate::storage::{Entry, EntryKind, Storage, StorageError, StorageErrorKind};

const BACKEND: &str = "Mock";

#[derive(Debug)]
enum MockFile {
    Text(String),
    Unreadable,
}

/// In-memory folder for tests.
///
/// Files are listed in insertion order, which stands in for the filesystem
/// listing order. Directories exist implicitly as soon as a file is added
/// below them.
///
/// # Example
///
/// ```ignore
/// use aw_storage::{MockStorage, Storage};
///
/// let storage = MockStorage::new()
///     .with_file("index.md", "# Home")
///     .with_file("api/ref.md", "# Reference");
///
/// let entries = storage.list("")?;
/// let content = storage.read("api/ref.md")?;
/// ```
#[derive(Debug, Default)]
pub struct MockStorage {
    files: Vec<(String, MockFile)>,
    unlistable: HashSet<String>,
}

impl MockStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a text file at the given relative path.
    #[must_use]
    pub fn with_file(mut self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.files.push((path.into(), MockFile::Text(content.into())));
        self
    }

    /// Add a file that is listed but fails to read.
    #[must_use]
    pub fn with_unreadable(mut self, path: impl Into<String>) -> Self {
        self.files.push((path.into(), MockFile::Unreadable));
        self
    }

    /// Make listing of a directory fail (`""` for the root).
    #[must_use]
    pub fn with_unlistable(mut self, dir: impl Into<String>) -> Self {
        self.unlistable.insert(dir.into());
        self
    }

    fn error(kind: StorageErrorKind, path: &str) -> StorageError {
        StorageError::new(kind)
            .with_path(path)
            .with_backend(BACKEND)
    }
}

impl Storage for MockStorage {
    fn list(&self, dir: &str) -> Result<Vec<Entry>, StorageError> {
        if self.unlistable.contains(dir) {
            return Err(Self::error(StorageErrorKind::PermissionDenied, dir));
        }

        let prefix = if dir.is_empty() {
            String::new()
        } else {
            format!("{dir}/")
        };

        let mut seen = HashSet::new();
        let mut entries = Vec::new();
        for (path, _) in &self.files {
            let Some(rest) = path.strip_prefix(&prefix) else {
                continue;
            };
            let (name, kind) = match rest.split_once('/') {
                Some((name, _)) => (name, EntryKind::Dir),
                None => (rest, EntryKind::File),
            };
            if seen.insert(name) {
                entries.push(Entry {
                    name: name.to_owned(),
                    kind,
                });
            }
        }

        if entries.is_empty() && !dir.is_empty() {
            return Err(Self::error(StorageErrorKind::NotFound, dir));
        }
        Ok(entries)
    }

    fn read(&self, path: &str) -> Result<String, StorageError> {
        match self.files.iter().find(|(p, _)| p == path) {
            Some((_, MockFile::Text(content))) => Ok(content.clone()),
            Some((_, MockFile::Unreadable)) => {
                Err(Self::error(StorageErrorKind::PermissionDenied, path))
            }
            None => Err(Self::error(StorageErrorKind::NotFound, path)),
        }
    }
}
