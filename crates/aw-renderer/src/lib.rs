//! Markdown to HTML fragment renderer for the Atom Wiki compiler.
//!
//! [`MarkdownRenderer`] walks `pulldown-cmark` events and produces an HTML
//! fragment together with the facts later stages need:
//!
//! - the first H1 text (used as a title fallback),
//! - one [`TocEntry`] per heading with a unique anchor id,
//! - one [`TableSummary`] per table, classified by [`classify`].
//!
//! Links are emitted exactly as authored. Cross-document rewriting happens
//! later, once every document identity is known.
//!
//! # Example
//!
//! ```
//! use aw_renderer::{MarkdownRenderer, TablePolicy};
//!
//! let result = MarkdownRenderer::new()
//!     .with_table_policy(TablePolicy { min_rows: 3 })
//!     .render_markdown("# Hello\n\n**Bold** text");
//!
//! assert_eq!(result.title.as_deref(), Some("Hello"));
//! ```

mod code_block;
mod renderer;
mod state;
mod table;
mod util;

pub use code_block::{CodeBlockProcessor, CodeTitleProcessor, ProcessResult};
pub use renderer::{MarkdownRenderer, RenderResult, parser_options};
pub use state::{TocEntry, escape_html, slugify};
pub use table::{TableClass, TablePolicy, TableSummary, classify};
