//! Sidebar navigation tree.
//!
//! Mirrors the folder layout of the input. Only folders that contain
//! documents (directly or further down) appear, since the tree is built from
//! document identities rather than from directory listings.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::document::Document;
use crate::title::display_name;

/// Where folders go relative to documents within one folder.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FolderPlacement {
    /// Folders first, then documents (index documents still lead).
    Before,
    /// Documents first, then folders.
    #[default]
    After,
    /// Folders and documents interleaved by display name.
    Mixed,
}

/// What a navigation node points at.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum NavKind {
    Folder { path: String },
    Document { id: String },
}

/// Navigation node for the sidebar tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NavNode {
    /// Display label.
    pub label: String,
    #[serde(flatten)]
    pub kind: NavKind,
    /// Nesting depth, 0 for entries directly under the input root.
    pub depth: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NavNode>,
}

impl NavNode {
    /// Document identity for leaves.
    #[must_use]
    pub fn document_id(&self) -> Option<&str> {
        match &self.kind {
            NavKind::Document { id } => Some(id),
            NavKind::Folder { .. } => None,
        }
    }
}

/// Sidebar navigation rooted at the input folder.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Navigation {
    items: Vec<NavNode>,
}

#[derive(Default)]
struct FolderTree<'a> {
    folders: BTreeMap<&'a str, FolderTree<'a>>,
    documents: Vec<&'a Document>,
}

impl<'a> FolderTree<'a> {
    fn insert(&mut self, doc: &'a Document) {
        let mut node = self;
        let dir = doc.dir();
        if !dir.is_empty() {
            for segment in dir.split('/') {
                node = node.folders.entry(segment).or_default();
            }
        }
        node.documents.push(doc);
    }
}

/// Sort key within one folder: index documents lead, then display name
/// (case-insensitive), then position in the folder listing.
#[derive(PartialEq, Eq, PartialOrd, Ord)]
struct SortKey {
    not_index: bool,
    group: u8,
    name: String,
    rank: usize,
}

impl Navigation {
    /// Build the tree from documents.
    ///
    /// `ranks` maps each path to its position within the parent folder's
    /// listing and breaks ties between equal display names.
    #[must_use]
    pub fn build(
        documents: &[Document],
        ranks: &HashMap<String, usize>,
        placement: FolderPlacement,
    ) -> Self {
        let mut tree = FolderTree::default();
        for doc in documents {
            tree.insert(doc);
        }
        let items = build_children(&tree, "", 0, ranks, placement);
        tracing::debug!(items = items.len(), "Built navigation");
        Self { items }
    }

    /// Top-level nodes.
    #[must_use]
    pub fn items(&self) -> &[NavNode] {
        &self.items
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Document identities in sidebar order (depth-first).
    #[must_use]
    pub fn document_order(&self) -> Vec<&str> {
        fn visit<'n>(nodes: &'n [NavNode], out: &mut Vec<&'n str>) {
            for node in nodes {
                if let Some(id) = node.document_id() {
                    out.push(id);
                }
                visit(&node.children, out);
            }
        }

        let mut out = Vec::new();
        visit(&self.items, &mut out);
        out
    }
}

fn build_children(
    tree: &FolderTree<'_>,
    path: &str,
    depth: usize,
    ranks: &HashMap<String, usize>,
    placement: FolderPlacement,
) -> Vec<NavNode> {
    let (doc_group, folder_group) = match placement {
        FolderPlacement::Before => (1, 0),
        FolderPlacement::After => (0, 1),
        FolderPlacement::Mixed => (0, 0),
    };
    let rank_of = |p: &str| ranks.get(p).copied().unwrap_or(usize::MAX);

    let mut keyed: Vec<(SortKey, NavNode)> = Vec::new();

    for doc in &tree.documents {
        let key = SortKey {
            not_index: !doc.is_index(),
            group: doc_group,
            name: doc.display_name.to_lowercase(),
            rank: rank_of(&doc.id),
        };
        let node = NavNode {
            label: doc.display_name.clone(),
            kind: NavKind::Document { id: doc.id.clone() },
            depth,
            children: Vec::new(),
        };
        keyed.push((key, node));
    }

    for (name, subtree) in &tree.folders {
        let folder_path = if path.is_empty() {
            (*name).to_owned()
        } else {
            format!("{path}/{name}")
        };
        let label = display_name(name);
        let key = SortKey {
            not_index: true,
            group: folder_group,
            name: label.to_lowercase(),
            rank: rank_of(&folder_path),
        };
        let children = build_children(subtree, &folder_path, depth + 1, ranks, placement);
        let node = NavNode {
            label,
            kind: NavKind::Folder { path: folder_path },
            depth,
            children,
        };
        keyed.push((key, node));
    }

    keyed.sort_by(|a, b| a.0.cmp(&b.0));
    keyed.into_iter().map(|(_, node)| node).collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::document::test_document;

    fn docs(ids: &[&str]) -> Vec<Document> {
        ids.iter().copied().map(test_document).collect()
    }

    fn ranks(ids: &[&str]) -> HashMap<String, usize> {
        ids.iter()
            .enumerate()
            .map(|(i, id)| ((*id).to_owned(), i))
            .collect()
    }

    fn labels(nodes: &[NavNode]) -> Vec<&str> {
        nodes.iter().map(|n| n.label.as_str()).collect()
    }

    #[test]
    fn test_index_first_then_alphabetical() {
        let documents = docs(&["zeta.md", "Alpha.md", "index.md", "beta.md"]);

        let nav = Navigation::build(&documents, &HashMap::new(), FolderPlacement::After);

        assert_eq!(labels(nav.items()), vec!["Index", "Alpha", "Beta", "Zeta"]);
    }

    #[test]
    fn test_folders_after_documents_by_default() {
        let documents = docs(&["guide/setup.md", "about.md", "api/ref.md", "index.md"]);

        let nav = Navigation::build(&documents, &HashMap::new(), FolderPlacement::default());

        assert_eq!(labels(nav.items()), vec!["Index", "About", "Api", "Guide"]);
        assert!(matches!(nav.items()[2].kind, NavKind::Folder { ref path } if path == "api"));
    }

    #[test]
    fn test_folders_before_documents() {
        let documents = docs(&["zeta.md", "guide/setup.md", "index.md"]);

        let nav = Navigation::build(&documents, &HashMap::new(), FolderPlacement::Before);

        assert_eq!(labels(nav.items()), vec!["Index", "Guide", "Zeta"]);
    }

    #[test]
    fn test_mixed_placement() {
        let documents = docs(&["zeta.md", "guide/setup.md", "about.md"]);

        let nav = Navigation::build(&documents, &HashMap::new(), FolderPlacement::Mixed);

        assert_eq!(labels(nav.items()), vec!["About", "Guide", "Zeta"]);
    }

    #[test]
    fn test_ties_broken_by_listing_order() {
        let ids = ["my_page.md", "my-page.md"];
        let documents = docs(&ids);

        let nav = Navigation::build(&documents, &ranks(&ids), FolderPlacement::After);

        assert_eq!(nav.document_order(), vec!["my_page.md", "my-page.md"]);
    }

    #[test]
    fn test_nested_depth_and_index() {
        let documents = docs(&["guide/b.md", "guide/a/deep.md", "guide/index.md"]);

        let nav = Navigation::build(&documents, &HashMap::new(), FolderPlacement::After);

        let guide = &nav.items()[0];
        assert_eq!(guide.depth, 0);
        assert_eq!(labels(&guide.children), vec!["Index", "B", "A"]);
        assert_eq!(guide.children[0].depth, 1);
        assert_eq!(guide.children[2].children[0].depth, 2);
        assert_eq!(
            nav.document_order(),
            vec!["guide/index.md", "guide/b.md", "guide/a/deep.md"]
        );
    }

    #[test]
    fn test_every_document_appears_once() {
        let ids = ["index.md", "a/b/c.md", "a/x.md", "d/e.md", "f.md"];
        let documents = docs(&ids);

        let nav = Navigation::build(&documents, &HashMap::new(), FolderPlacement::Mixed);

        let mut order = nav.document_order();
        order.sort_unstable();
        let mut expected = ids.to_vec();
        expected.sort_unstable();
        assert_eq!(order, expected);
    }

    #[test]
    fn test_empty_folders_are_absent() {
        let nav = Navigation::build(&docs(&["a.md"]), &HashMap::new(), FolderPlacement::After);

        assert_eq!(nav.items().len(), 1);
        assert!(nav.items()[0].children.is_empty());
    }

    #[test]
    fn test_serialization_shape() {
        let nav = Navigation::build(&docs(&["g/a.md"]), &HashMap::new(), FolderPlacement::After);

        let json = serde_json::to_value(&nav).unwrap();

        assert_eq!(
            json,
            serde_json::json!([{
                "label": "G",
                "kind": "folder",
                "path": "g",
                "depth": 0,
                "children": [{"label": "A", "kind": "document", "id": "g/a.md", "depth": 1}]
            }])
        );
    }
}
