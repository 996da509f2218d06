//! Single-document assembly for the Atom Wiki compiler.
//!
//! Turns a [`DocumentGraph`] into one self-contained HTML page: inline CSS
//! with theme variables, the sidebar tree, the tag index, one `<template>`
//! per document, a JSON data island and the client script. The only
//! external references are the syntax highlighting CDN and, when enabled,
//! the table enhancement CDN.
//!
//! Assembly is a pure function of the graph and [`AssemblerOptions`]: the
//! same input always produces byte-identical output.
//!
//! # Example
//!
//! ```
//! use aw_bundle::{AssemblerOptions, assemble};
//! use aw_site::GraphBuilder;
//! use aw_storage::MockStorage;
//!
//! let storage = MockStorage::new().with_file("index.md", "# Home");
//! let (graph, _) = GraphBuilder::new(&storage).build().unwrap();
//!
//! let html = assemble(&graph, &AssemblerOptions::default()).unwrap();
//!
//! assert!(html.starts_with("<!DOCTYPE html>"));
//! assert!(html.contains(r#"<template id="wiki_doc_0" data-doc="index.md">"#));
//! ```

mod error;
mod island;
mod template;
mod theme;
mod writer;

use aw_site::DocumentGraph;

pub use error::BundleError;
pub use theme::{Palette, ThemeConfig, ThemeMode, ThemeSettings};
pub use writer::write_artifact;

/// Options controlling the assembled page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssemblerOptions {
    /// Page title and sidebar heading.
    pub title: String,
    /// Include heading outlines and the contents panel.
    pub table_of_contents: bool,
    /// Show each document's title above its content.
    pub show_file_titles: bool,
    /// Show author and tag chips above each document.
    pub show_frontmatter: bool,
    /// Load the table enhancement library for eligible tables.
    pub enhanced_tables: bool,
    pub theme: ThemeSettings,
}

impl Default for AssemblerOptions {
    fn default() -> Self {
        Self {
            title: "Wiki".to_owned(),
            table_of_contents: true,
            show_file_titles: true,
            show_frontmatter: true,
            enhanced_tables: false,
            theme: ThemeSettings::default(),
        }
    }
}

/// Assemble the single-page wiki.
///
/// Documents appear in navigation order; the first one is shown when the
/// page opens. The table enhancement scripts are only loaded when enabled
/// and at least one table is eligible.
pub fn assemble(graph: &DocumentGraph, options: &AssemblerOptions) -> Result<String, BundleError> {
    let documents = graph.documents_in_navigation_order();
    let enhance_tables = options.enhanced_tables && graph.has_eligible_tables();
    let data_json = island::data_island(
        &documents,
        graph.navigation(),
        graph.tags(),
        options,
        enhance_tables,
    )?;

    let html = template::render_page(&template::PageData {
        options,
        enhance_tables,
        navigation: graph.navigation().items(),
        documents: &documents,
        tags: graph.tags(),
        data_json: &data_json,
    });
    tracing::info!(
        documents = documents.len(),
        bytes = html.len(),
        enhanced_tables = enhance_tables,
        "Assembled wiki"
    );
    Ok(html)
}
