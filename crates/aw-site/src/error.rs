//! Build errors, recoverable warnings and the build report.

use std::path::PathBuf;

use aw_storage::StorageError;

/// Fatal build error.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// The input folder contains no loadable markdown document.
    #[error("No markdown documents found in input folder")]
    EmptyInput,
    /// The input folder itself could not be listed.
    #[error("Cannot read input folder: {0}")]
    Storage(#[from] StorageError),
    /// The output artifact could not be written.
    #[error("Cannot write output file {}: {source}", .path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// What went wrong with a single file or folder.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FileProblem {
    /// The file could not be read.
    #[error("unreadable file ({0})")]
    Unreadable(String),
    /// A sub-folder could not be listed.
    #[error("unreadable folder ({0})")]
    UnlistableDirectory(String),
    /// The frontmatter block was opened but never closed.
    #[error("frontmatter is never closed; treated as body text")]
    UnterminatedFrontmatter,
    /// The frontmatter block is not a YAML mapping.
    #[error("invalid frontmatter ({0})")]
    InvalidFrontmatter(String),
    /// A code block processor reported a problem.
    #[error("{0}")]
    Render(String),
}

/// Recoverable problem found during a build.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildWarning {
    #[error("{path}: {problem}")]
    File { path: String, problem: FileProblem },
    #[error("{document}: unresolved link '{target}'")]
    UnresolvedLink { document: String, target: String },
}

impl BuildWarning {
    pub(crate) fn file(path: impl Into<String>, problem: FileProblem) -> Self {
        Self::File {
            path: path.into(),
            problem,
        }
    }

    /// Log the warning through `tracing`.
    pub(crate) fn log(&self) {
        match self {
            Self::File { path, problem } => {
                tracing::warn!(path = %path, problem = %problem, "Skipped or degraded input");
            }
            Self::UnresolvedLink { document, target } => {
                tracing::warn!(document = %document, target = %target, "Unresolved link");
            }
        }
    }
}

/// Summary of a finished build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Number of documents in the graph.
    pub documents: usize,
    /// Number of non-markdown files found.
    pub assets: usize,
    /// Warnings in the order they were found.
    pub warnings: Vec<BuildWarning>,
}

impl BuildReport {
    /// Number of unresolved link warnings.
    #[must_use]
    pub fn unresolved_links(&self) -> usize {
        self.warnings
            .iter()
            .filter(|w| matches!(w, BuildWarning::UnresolvedLink { .. }))
            .count()
    }

    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}
