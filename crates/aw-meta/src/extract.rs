//! Frontmatter block detection and parsing.

use serde_yaml::Value;

use crate::value::{Frontmatter, MetaValue};

const MARKER: &str = "---";
const BOM: char = '\u{feff}';

/// How the frontmatter block of a document was handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrontmatterStatus {
    /// The document does not start with a `---` line.
    Absent,
    /// A closed block was parsed into a mapping.
    Parsed,
    /// The opening `---` was never closed; the whole text is the body.
    Unterminated,
    /// The block was closed but is not a YAML mapping.
    Invalid(String),
}

/// Result of [`extract`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted<'a> {
    pub frontmatter: Frontmatter,
    pub body: &'a str,
    pub status: FrontmatterStatus,
}

impl<'a> Extracted<'a> {
    fn unchanged(text: &'a str, status: FrontmatterStatus) -> Self {
        Self {
            frontmatter: Frontmatter::new(),
            body: text,
            status,
        }
    }
}

/// Split a document into frontmatter and markdown body.
///
/// The first line (after an optional byte order mark) must consist solely of
/// `---`; the block ends at the next such line. Trailing whitespace and `\r`
/// on marker lines are tolerated.
#[must_use]
pub fn extract(text: &str) -> Extracted<'_> {
    let content = text.strip_prefix(BOM).unwrap_or(text);

    let (first, mut rest) = split_line(content);
    if !is_marker(first) {
        return Extracted::unchanged(text, FrontmatterStatus::Absent);
    }

    let block_start = rest;
    let mut block_len = 0;
    loop {
        if rest.is_empty() {
            return Extracted::unchanged(text, FrontmatterStatus::Unterminated);
        }
        let (line, next) = split_line(rest);
        if is_marker(line) {
            let block = &block_start[..block_len];
            return parse_block(block, next);
        }
        block_len += rest.len() - next.len();
        rest = next;
    }
}

fn parse_block<'a>(block: &str, body: &'a str) -> Extracted<'a> {
    let (frontmatter, status) = match serde_yaml::from_str::<Value>(block) {
        Ok(Value::Null) => (Frontmatter::new(), FrontmatterStatus::Parsed),
        Ok(value) => match MetaValue::from_yaml(value) {
            MetaValue::Mapping(map) => (map, FrontmatterStatus::Parsed),
            _ => (
                Frontmatter::new(),
                FrontmatterStatus::Invalid("frontmatter is not a mapping".to_owned()),
            ),
        },
        Err(e) => (Frontmatter::new(), FrontmatterStatus::Invalid(e.to_string())),
    };
    Extracted {
        frontmatter,
        body,
        status,
    }
}

/// Split off the first line, returning it without its terminator.
fn split_line(s: &str) -> (&str, &str) {
    match s.find('\n') {
        Some(i) => (&s[..i], &s[i + 1..]),
        None => (s, ""),
    }
}

fn is_marker(line: &str) -> bool {
    line.trim_end() == MARKER
}
