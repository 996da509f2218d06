//! Input folder discovery.
//!
//! Walks the folder depth-first in listing order, separating markdown
//! documents from assets. Only the root listing is fatal; sub-folders that
//! cannot be listed are skipped with a warning.

use std::collections::{HashMap, HashSet};

use aw_storage::{EntryKind, Storage, join_path};

use crate::error::{BuildError, BuildWarning, FileProblem};
use crate::title::strip_markdown_extension;

/// Result of walking the input folder.
#[derive(Debug, Default)]
pub(crate) struct Discovery {
    /// Markdown document identities in discovery order.
    pub sources: Vec<String>,
    /// Every non-markdown file.
    pub assets: HashSet<String>,
    /// Position of each entry (file or folder) within its parent listing.
    pub ranks: HashMap<String, usize>,
    pub warnings: Vec<BuildWarning>,
}

pub(crate) fn discover(storage: &dyn Storage) -> Result<Discovery, BuildError> {
    let mut discovery = Discovery::default();
    let root = storage.list("")?;
    walk(storage, "", root, &mut discovery);
    tracing::debug!(
        documents = discovery.sources.len(),
        assets = discovery.assets.len(),
        "Discovered input files"
    );
    Ok(discovery)
}

fn walk(
    storage: &dyn Storage,
    dir: &str,
    entries: Vec<aw_storage::Entry>,
    discovery: &mut Discovery,
) {
    for (rank, entry) in entries.into_iter().enumerate() {
        if entry.name.starts_with('.') {
            continue;
        }
        let path = join_path(dir, &entry.name);
        discovery.ranks.insert(path.clone(), rank);

        match entry.kind {
            EntryKind::Dir => match storage.list(&path) {
                Ok(children) => walk(storage, &path, children, discovery),
                Err(e) => discovery.warnings.push(BuildWarning::file(
                    path,
                    FileProblem::UnlistableDirectory(e.to_string()),
                )),
            },
            EntryKind::File if is_markdown(&entry.name) => discovery.sources.push(path),
            EntryKind::File => {
                discovery.assets.insert(path);
            }
        }
    }
}

pub(crate) fn is_markdown(name: &str) -> bool {
    strip_markdown_extension(name).is_some()
}
