//! Directory capability for the Atom Wiki compiler.
//!
//! The compiler never touches the filesystem directly. It walks the input
//! folder through the [`Storage`] trait, which exposes exactly two operations:
//! listing a directory and reading a file as text.
//!
//! - [`Storage`] trait with `list()` and `read()`
//! - [`StorageError`] with a semantic [`StorageErrorKind`], path and backend context
//! - [`MockStorage`] for tests (behind the `mock` feature flag)
//!
//! The filesystem implementation lives in the `aw-storage-fs` crate.
//!
//! # Example
//!
//! ```ignore
//! use aw_storage::{EntryKind, Storage};
//!
//! for entry in storage.list("")? {
//!     if entry.kind == EntryKind::File {
//!         let text = storage.read(&entry.name)?;
//!     }
//! }
//! ```

#[cfg(feature = "mock")]
mod mock;
mod storage;

#[cfg(feature = "mock")]
pub use mock::MockStorage;
pub use storage::{Entry, EntryKind, Storage, StorageError, StorageErrorKind, join_path};
