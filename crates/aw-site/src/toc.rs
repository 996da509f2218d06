use aw_renderer::TocEntry;
use serde::Serialize;

/// Heading in a nested table of contents.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TocNode {
    pub level: u8,
    pub title: String,
    pub id: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TocNode>,
}

/// Nest flat heading entries by level.
///
/// A heading becomes a child of the closest preceding heading with a lower
/// level. Skipped levels are kept as-is: an H3 directly under an H1 is a
/// direct child of that H1.
#[must_use]
pub fn build_toc(entries: &[TocEntry]) -> Vec<TocNode> {
    build_level(entries, &mut 0, 0)
}

fn build_level(entries: &[TocEntry], pos: &mut usize, parent_level: u8) -> Vec<TocNode> {
    let mut nodes = Vec::new();
    while let Some(entry) = entries.get(*pos) {
        if entry.level <= parent_level {
            break;
        }
        *pos += 1;
        let children = build_level(entries, pos, entry.level);
        nodes.push(TocNode {
            level: entry.level,
            title: entry.title.clone(),
            id: entry.id.clone(),
            children,
        });
    }
    nodes
}
