//! Document graph construction for the Atom Wiki compiler.
//!
//! This crate turns a folder (any [`Storage`](aw_storage::Storage)) into a
//! [`DocumentGraph`]: every markdown document parsed and rendered, relative
//! links rewired to in-page tokens, a navigation tree mirroring the folder
//! layout and a tag index.
//!
//! # Pipeline
//!
//! 1. Discovery walks the folder and records markdown files and assets.
//! 2. Each document is read, its frontmatter extracted and its body rendered
//!    (in parallel).
//! 3. Once every identity is known, links are rewritten per document (in
//!    parallel).
//! 4. Navigation and the tag index are built concurrently.
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::path::PathBuf;
//! use aw_site::GraphBuilder;
//! use aw_storage_fs::FsStorage;
//!
//! let storage = FsStorage::new(PathBuf::from("docs"));
//! let (graph, report) = GraphBuilder::new(&storage).build()?;
//!
//! for doc in graph.documents() {
//!     println!("{}: {}", doc.id, doc.title);
//! }
//! println!("{} warnings", report.warnings.len());
//! # Ok(())
//! # }
//! ```

mod discover;
mod document;
mod error;
mod graph;
mod links;
mod nav;
mod tags;
mod title;
mod toc;

pub use document::Document;
pub use error::{BuildError, BuildReport, BuildWarning, FileProblem};
pub use graph::{BuildOptions, DocumentGraph, GraphBuilder};
pub use links::{LinkTargets, Resolution, doc_token, resolve_reference, rewrite_links};
pub use nav::{FolderPlacement, NavKind, NavNode, Navigation};
pub use tags::{TagEntry, TagIndex};
pub use title::display_name;
pub use toc::{TocNode, build_toc};

// Re-exported for downstream crates that only depend on aw-site.
pub use aw_meta::{Frontmatter, MetaValue};
pub use aw_renderer::{TableClass, TablePolicy, TableSummary, TocEntry, escape_html};
