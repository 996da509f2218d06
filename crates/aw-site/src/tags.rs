use std::collections::HashMap;

use serde::Serialize;

use crate::document::Document;

/// Documents sharing one tag, in discovery order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TagEntry {
    pub name: String,
    pub documents: Vec<String>,
}

/// Tag index sorted case-insensitively by tag name.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TagIndex {
    entries: Vec<TagEntry>,
}

impl TagIndex {
    /// Build the index from documents in discovery order.
    #[must_use]
    pub fn build(documents: &[Document]) -> Self {
        let mut positions: HashMap<&str, usize> = HashMap::new();
        let mut entries: Vec<TagEntry> = Vec::new();

        for doc in documents {
            for tag in &doc.tags {
                let idx = *positions.entry(tag.as_str()).or_insert_with(|| {
                    entries.push(TagEntry {
                        name: tag.clone(),
                        documents: Vec::new(),
                    });
                    entries.len() - 1
                });
                entries[idx].documents.push(doc.id.clone());
            }
        }

        entries.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.name.cmp(&b.name))
        });
        tracing::debug!(tags = entries.len(), "Built tag index");
        Self { entries }
    }

    #[must_use]
    pub fn entries(&self) -> &[TagEntry] {
        &self.entries
    }

    #[must_use]
    pub fn get(&self, tag: &str) -> Option<&TagEntry> {
        self.entries.iter().find(|e| e.name == tag)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::document::test_document;

    fn tagged(id: &str, tags: &[&str]) -> Document {
        let mut doc = test_document(id);
        doc.tags = tags.iter().map(|t| (*t).to_owned()).collect();
        doc
    }

    #[test]
    fn test_empty() {
        let index = TagIndex::build(&[test_document("a.md")]);

        assert!(index.is_empty());
    }

    #[test]
    fn test_sorted_case_insensitively() {
        let docs = [
            tagged("a.md", &["rust", "Beta"]),
            tagged("b.md", &["alpha", "beta"]),
        ];

        let index = TagIndex::build(&docs);

        let names: Vec<&str> = index.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "Beta", "beta", "rust"]);
    }

    #[test]
    fn test_documents_keep_discovery_order() {
        let docs = [
            tagged("z.md", &["guide"]),
            tagged("a.md", &[]),
            tagged("m.md", &["guide", "api"]),
        ];

        let index = TagIndex::build(&docs);

        assert_eq!(index.get("guide").unwrap().documents, vec!["z.md", "m.md"]);
        assert_eq!(index.get("api").unwrap().documents, vec!["m.md"]);
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_round_trip_with_documents() {
        let docs = [
            tagged("a.md", &["x", "y"]),
            tagged("b.md", &["y"]),
            tagged("c.md", &["z", "x"]),
        ];

        let index = TagIndex::build(&docs);

        for doc in &docs {
            for tag in &doc.tags {
                assert!(index.get(tag).unwrap().documents.contains(&doc.id));
            }
        }
        for entry in index.entries() {
            assert!(!entry.documents.is_empty());
            for id in &entry.documents {
                let doc = docs.iter().find(|d| &d.id == id).unwrap();
                assert!(doc.tags.contains(&entry.name));
            }
        }
    }

    #[test]
    fn test_serializes_as_list() {
        let index = TagIndex::build(&[tagged("a.md", &["t"])]);

        let json = serde_json::to_string(&index).unwrap();

        assert_eq!(json, r#"[{"name":"t","documents":["a.md"]}]"#);
    }
}
