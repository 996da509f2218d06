use aw_meta::Frontmatter;
use aw_renderer::{TableSummary, TocEntry};
use serde::Serialize;

use crate::title::{display_name, strip_markdown_extension};

/// A rendered markdown document.
///
/// Created once per discovered file. The HTML fragment is final after link
/// rewriting; nothing mutates a document after the graph is built.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Document {
    /// Path relative to the input root, slash-separated, extension kept
    /// (e.g. `docs/api/ref.md`).
    pub id: String,
    /// Frontmatter `title`, else the first H1, else the display name.
    pub title: String,
    /// Prettified file stem.
    #[serde(rename = "displayName")]
    pub display_name: String,
    pub frontmatter: Frontmatter,
    /// Unique tags in first-seen order.
    pub tags: Vec<String>,
    /// Markdown source after the frontmatter block.
    #[serde(skip)]
    pub body: String,
    /// Rendered HTML fragment.
    #[serde(skip)]
    pub html: String,
    /// Headings in document order.
    pub toc: Vec<TocEntry>,
    /// Tables in document order.
    #[serde(skip)]
    pub tables: Vec<TableSummary>,
}

impl Document {
    /// File name without parent folders.
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.id.rsplit_once('/').map_or(self.id.as_str(), |(_, name)| name)
    }

    /// Folder containing the document (`""` for the root).
    #[must_use]
    pub fn dir(&self) -> &str {
        self.id.rsplit_once('/').map_or("", |(dir, _)| dir)
    }

    /// Whether this is a folder's index document (`index.md`, any case).
    #[must_use]
    pub fn is_index(&self) -> bool {
        strip_markdown_extension(self.file_name()).is_some_and(|stem| stem.eq_ignore_ascii_case("index"))
    }

    /// Whether any table qualifies for client-side enhancement.
    #[must_use]
    pub fn has_eligible_tables(&self) -> bool {
        self.tables
            .iter()
            .any(|t| t.class == aw_renderer::TableClass::Eligible)
    }

    pub(crate) fn display_name_for(id: &str) -> String {
        let name = id.rsplit_once('/').map_or(id, |(_, name)| name);
        display_name(name)
    }
}

#[cfg(test)]
pub(crate) fn test_document(id: &str) -> Document {
    Document {
        id: id.to_owned(),
        title: Document::display_name_for(id),
        display_name: Document::display_name_for(id),
        frontmatter: Frontmatter::new(),
        tags: Vec::new(),
        body: String::new(),
        html: String::new(),
        toc: Vec::new(),
        tables: Vec::new(),
    }
}
