//! Document graph construction.

use std::collections::{HashMap, HashSet};

use aw_meta::{FrontmatterStatus, extract};
use aw_renderer::{CodeTitleProcessor, MarkdownRenderer, TablePolicy};
use aw_storage::Storage;
use rayon::prelude::*;

use crate::discover::discover;
use crate::document::Document;
use crate::error::{BuildError, BuildReport, BuildWarning, FileProblem};
use crate::links::{LinkTargets, rewrite_links};
use crate::nav::{FolderPlacement, Navigation};
use crate::tags::TagIndex;

/// Options affecting how documents are rendered and arranged.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BuildOptions {
    /// Minimum data rows for a table to be enhancement-eligible.
    pub table_policy: TablePolicy,
    /// Folder position within navigation levels.
    pub folder_placement: FolderPlacement,
}

/// Every document of a wiki together with its navigation and tag index.
///
/// Owned by the caller; later stages only read it.
#[derive(Debug)]
pub struct DocumentGraph {
    documents: Vec<Document>,
    index: HashMap<String, usize>,
    assets: HashSet<String>,
    navigation: Navigation,
    tags: TagIndex,
}

impl DocumentGraph {
    /// Documents in discovery order.
    #[must_use]
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Look up a document by identity.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Document> {
        self.index.get(id).map(|&i| &self.documents[i])
    }

    /// Documents in sidebar order.
    #[must_use]
    pub fn documents_in_navigation_order(&self) -> Vec<&Document> {
        self.navigation
            .document_order()
            .into_iter()
            .filter_map(|id| self.get(id))
            .collect()
    }

    #[must_use]
    pub fn assets(&self) -> &HashSet<String> {
        &self.assets
    }

    #[must_use]
    pub fn navigation(&self) -> &Navigation {
        &self.navigation
    }

    #[must_use]
    pub fn tags(&self) -> &TagIndex {
        &self.tags
    }

    /// Whether any document contains an enhancement-eligible table.
    #[must_use]
    pub fn has_eligible_tables(&self) -> bool {
        self.documents.iter().any(Document::has_eligible_tables)
    }
}

/// Builds a [`DocumentGraph`] from a [`Storage`].
///
/// # Example
///
/// ```
/// use aw_site::GraphBuilder;
/// use aw_storage::MockStorage;
///
/// let storage = MockStorage::new()
///     .with_file("index.md", "# Home\n\nSee [setup](guide/setup.md).")
///     .with_file("guide/setup.md", "---\ntags: [intro]\n---\n# Setup");
///
/// let (graph, report) = GraphBuilder::new(&storage).build().unwrap();
///
/// assert_eq!(graph.documents().len(), 2);
/// assert!(graph.get("index.md").unwrap().html.contains(r#"data-doc="guide/setup.md""#));
/// assert!(report.is_clean());
/// ```
pub struct GraphBuilder<'a> {
    storage: &'a dyn Storage,
    options: BuildOptions,
}

impl<'a> GraphBuilder<'a> {
    #[must_use]
    pub fn new(storage: &'a dyn Storage) -> Self {
        Self {
            storage,
            options: BuildOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: BuildOptions) -> Self {
        self.options = options;
        self
    }

    /// Discover, render and link every document.
    ///
    /// Recoverable problems are collected into the returned [`BuildReport`]
    /// and logged as warnings.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Storage`] if the root folder cannot be listed and
    /// [`BuildError::EmptyInput`] if no document could be loaded.
    pub fn build(&self) -> Result<(DocumentGraph, BuildReport), BuildError> {
        let discovery = discover(self.storage)?;
        let mut warnings = discovery.warnings;

        let loaded: Vec<(Option<Document>, Vec<BuildWarning>)> = discovery
            .sources
            .par_iter()
            .map(|id| self.load_document(id))
            .collect();

        let mut documents = Vec::with_capacity(loaded.len());
        for (doc, doc_warnings) in loaded {
            warnings.extend(doc_warnings);
            documents.extend(doc);
        }
        if documents.is_empty() {
            return Err(BuildError::EmptyInput);
        }

        let targets = LinkTargets::new(
            documents.iter().map(|d| d.id.clone()).collect(),
            discovery.assets.clone(),
        );
        let unresolved: Vec<Vec<String>> = documents
            .par_iter_mut()
            .map(|doc| {
                let (html, unresolved) = rewrite_links(&doc.html, &doc.id, &targets);
                doc.html = html;
                unresolved
            })
            .collect();
        for (doc, refs) in documents.iter().zip(unresolved) {
            warnings.extend(refs.into_iter().map(|target| BuildWarning::UnresolvedLink {
                document: doc.id.clone(),
                target,
            }));
        }

        let (navigation, tags) = rayon::join(
            || Navigation::build(&documents, &discovery.ranks, self.options.folder_placement),
            || TagIndex::build(&documents),
        );

        for warning in &warnings {
            warning.log();
        }
        let report = BuildReport {
            documents: documents.len(),
            assets: discovery.assets.len(),
            warnings,
        };
        tracing::info!(
            documents = report.documents,
            assets = report.assets,
            tags = tags.len(),
            warnings = report.warnings.len(),
            "Built document graph"
        );

        let index = documents
            .iter()
            .enumerate()
            .map(|(i, d)| (d.id.clone(), i))
            .collect();
        let graph = DocumentGraph {
            documents,
            index,
            assets: discovery.assets,
            navigation,
            tags,
        };
        Ok((graph, report))
    }

    fn load_document(&self, id: &str) -> (Option<Document>, Vec<BuildWarning>) {
        let mut warnings = Vec::new();
        let text = match self.storage.read(id) {
            Ok(text) => text,
            Err(e) => {
                warnings.push(BuildWarning::file(id, FileProblem::Unreadable(e.to_string())));
                return (None, warnings);
            }
        };

        let extracted = extract(&text);
        match extracted.status {
            FrontmatterStatus::Absent | FrontmatterStatus::Parsed => {}
            FrontmatterStatus::Unterminated => {
                warnings.push(BuildWarning::file(id, FileProblem::UnterminatedFrontmatter));
            }
            FrontmatterStatus::Invalid(reason) => {
                warnings.push(BuildWarning::file(id, FileProblem::InvalidFrontmatter(reason)));
            }
        }

        let rendered = MarkdownRenderer::new()
            .with_table_policy(self.options.table_policy)
            .with_processor(CodeTitleProcessor::new())
            .render_markdown(extracted.body);
        warnings.extend(
            rendered
                .warnings
                .into_iter()
                .map(|w| BuildWarning::file(id, FileProblem::Render(w))),
        );

        let frontmatter = extracted.frontmatter;
        let display_name = Document::display_name_for(id);
        let title = frontmatter
            .title()
            .map(str::to_owned)
            .or(rendered.title)
            .unwrap_or_else(|| display_name.clone());
        tracing::debug!(document = id, "Rendered document");

        let doc = Document {
            id: id.to_owned(),
            title,
            display_name,
            tags: frontmatter.tags(),
            frontmatter,
            body: extracted.body.to_owned(),
            html: rendered.html,
            toc: rendered.toc,
            tables: rendered.tables,
        };
        (Some(doc), warnings)
    }
}
