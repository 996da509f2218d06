//! Cross-document link resolution and rewriting.
//!
//! Relative references in rendered fragments are resolved against the
//! referencing document's folder. References to known documents become
//! in-page tokens (`#/<id>`), asset references are left alone and anything
//! else is reported as unresolved.

use std::collections::HashSet;
use std::fmt::Write;
use std::sync::LazyLock;

use aw_renderer::escape_html;
use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};
use regex::Regex;

static TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<(a|img)\b[^>]*>").unwrap());
static HREF_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)\shref\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap());
static SRC_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)\ssrc\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap());

/// Characters escaped in the path and anchor parts of an in-page token.
const TOKEN_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'\'')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`');

/// Known link targets: document identities and asset paths.
#[derive(Debug, Default, Clone)]
pub struct LinkTargets {
    documents: HashSet<String>,
    assets: HashSet<String>,
}

impl LinkTargets {
    #[must_use]
    pub fn new(documents: HashSet<String>, assets: HashSet<String>) -> Self {
        Self { documents, assets }
    }

    #[must_use]
    pub fn is_document(&self, id: &str) -> bool {
        self.documents.contains(id)
    }

    #[must_use]
    pub fn is_asset(&self, path: &str) -> bool {
        self.assets.contains(path)
    }
}

/// Outcome of resolving one reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Points at a document in the graph.
    Document {
        id: String,
        fragment: Option<String>,
    },
    /// Points at a known non-markdown file.
    Asset(String),
    /// Relative reference with no matching target.
    Unresolved,
    /// Fragment-only, absolute, protocol-relative or scheme reference.
    Skipped,
}

/// In-page navigation token for a document identity.
///
/// # Examples
///
/// ```
/// use aw_site::doc_token;
///
/// assert_eq!(doc_token("guide/setup.md"), "#/guide/setup.md");
/// assert_eq!(doc_token("my notes.md"), "#/my%20notes.md");
/// ```
#[must_use]
pub fn doc_token(id: &str) -> String {
    format!("#/{}", utf8_percent_encode(id, TOKEN_ENCODE_SET))
}

/// Resolve `reference` as written in the document located in `from_dir`.
#[must_use]
pub fn resolve_reference(reference: &str, from_dir: &str, targets: &LinkTargets) -> Resolution {
    let reference = reference.trim();
    if is_skipped(reference) {
        return Resolution::Skipped;
    }

    let (without_fragment, fragment) = match reference.split_once('#') {
        Some((path, frag)) => (path, Some(frag)),
        None => (reference, None),
    };
    let raw_path = without_fragment
        .split_once('?')
        .map_or(without_fragment, |(path, _)| path);
    if raw_path.is_empty() {
        return Resolution::Skipped;
    }

    let decoded = percent_decode_str(raw_path).decode_utf8_lossy();
    let Some(path) = normalize(from_dir, &decoded) else {
        return Resolution::Unresolved;
    };
    let is_dir_ref = decoded.ends_with('/');

    for candidate in candidates(&path, is_dir_ref) {
        if targets.is_document(&candidate) {
            return Resolution::Document {
                id: candidate,
                fragment: fragment
                    .filter(|f| !f.is_empty())
                    .map(|f| percent_decode_str(f).decode_utf8_lossy().into_owned()),
            };
        }
    }
    if !is_dir_ref && targets.is_asset(&path) {
        return Resolution::Asset(path);
    }
    Resolution::Unresolved
}

/// Rewrite every `<a href>` and `<img src>` in `html`.
///
/// Returns the new fragment and the references that could not be resolved,
/// in document order. Running it again on its own output changes nothing.
#[must_use]
pub fn rewrite_links(html: &str, doc_id: &str, targets: &LinkTargets) -> (String, Vec<String>) {
    let from_dir = doc_id.rsplit_once('/').map_or("", |(dir, _)| dir);
    let mut output = String::with_capacity(html.len());
    let mut unresolved = Vec::new();
    let mut last = 0;

    for tag in TAG_PATTERN.captures_iter(html) {
        let (Some(whole), Some(name)) = (tag.get(0), tag.get(1)) else {
            continue;
        };
        let is_anchor = name.as_str().eq_ignore_ascii_case("a");
        let attr_pattern = if is_anchor { &HREF_PATTERN } else { &SRC_PATTERN };
        let Some(attr) = attr_pattern.captures(whole.as_str()) else {
            continue;
        };
        let (Some(attr_match), Some(value)) = (attr.get(0), attr.get(1).or_else(|| attr.get(2)))
        else {
            continue;
        };

        let reference = unescape_attr(value.as_str());
        match resolve_reference(&reference, from_dir, targets) {
            Resolution::Document { id, fragment } if is_anchor => {
                let start = whole.start() + attr_match.start();
                let end = whole.start() + attr_match.end();
                output.push_str(&html[last..start]);
                push_document_attrs(&mut output, &id, fragment.as_deref());
                last = end;
            }
            Resolution::Unresolved => unresolved.push(reference),
            Resolution::Document { .. } | Resolution::Asset(_) | Resolution::Skipped => {}
        }
    }

    output.push_str(&html[last..]);
    (output, unresolved)
}

fn push_document_attrs(out: &mut String, id: &str, fragment: Option<&str>) {
    let mut token = doc_token(id);
    if let Some(frag) = fragment {
        token.push('#');
        token.extend(utf8_percent_encode(frag, TOKEN_ENCODE_SET));
    }
    let _ = write!(
        out,
        r#" href="{}" data-doc="{}""#,
        escape_html(&token),
        escape_html(id)
    );
    if let Some(frag) = fragment {
        let _ = write!(out, r#" data-anchor="{}""#, escape_html(frag));
    }
}

fn is_skipped(reference: &str) -> bool {
    reference.is_empty()
        || reference.starts_with('#')
        || reference.starts_with('/')
        || reference.starts_with('\\')
        || has_scheme(reference)
}

/// `scheme:` prefix per RFC 3986 (letter, then letters, digits, `+ - .`).
fn has_scheme(reference: &str) -> bool {
    let Some((scheme, _)) = reference.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Join `path` onto `base_dir`, resolving `.` and `..`.
///
/// Returns `None` when the path climbs above the root.
fn normalize(base_dir: &str, path: &str) -> Option<String> {
    let mut segments: Vec<&str> = base_dir.split('/').filter(|s| !s.is_empty()).collect();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop()?;
            }
            other => segments.push(other),
        }
    }
    Some(segments.join("/"))
}

fn candidates(path: &str, is_dir_ref: bool) -> Vec<String> {
    if path.is_empty() {
        return vec!["index.md".to_owned()];
    }
    if is_dir_ref {
        return vec![format!("{path}/index.md")];
    }
    let file_name = path.rsplit_once('/').map_or(path, |(_, name)| name);
    if file_name.contains('.') {
        vec![path.to_owned()]
    } else {
        vec![
            path.to_owned(),
            format!("{path}.md"),
            format!("{path}/index.md"),
        ]
    }
}

fn unescape_attr(value: &str) -> String {
    if !value.contains('&') {
        return value.to_owned();
    }
    value
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#x27;", "'")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn targets() -> LinkTargets {
        let documents = [
            "index.md",
            "guide/index.md",
            "guide/setup.md",
            "guide/api/ref.md",
            "my notes.md",
            "faq.md",
        ]
        .into_iter()
        .map(str::to_owned)
        .collect();
        let assets = ["guide/img/shot.png", "files/report.pdf"]
            .into_iter()
            .map(str::to_owned)
            .collect();
        LinkTargets::new(documents, assets)
    }

    fn doc(id: &str, fragment: Option<&str>) -> Resolution {
        Resolution::Document {
            id: id.to_owned(),
            fragment: fragment.map(str::to_owned),
        }
    }

    #[test]
    fn test_resolve_sibling_and_parent() {
        let t = targets();

        assert_eq!(resolve_reference("setup.md", "guide", &t), doc("guide/setup.md", None));
        assert_eq!(resolve_reference("./setup.md", "guide", &t), doc("guide/setup.md", None));
        assert_eq!(resolve_reference("../faq.md", "guide", &t), doc("faq.md", None));
        assert_eq!(
            resolve_reference("../setup.md#install", "guide/api", &t),
            doc("guide/setup.md", Some("install"))
        );
    }

    #[test]
    fn test_resolve_redundant_segments() {
        let t = targets();

        assert_eq!(
            resolve_reference("guide//./api/../setup.md", "", &t),
            doc("guide/setup.md", None)
        );
    }

    #[test]
    fn test_resolve_percent_encoded_and_query() {
        let t = targets();

        assert_eq!(resolve_reference("my%20notes.md", "", &t), doc("my notes.md", None));
        assert_eq!(resolve_reference("faq.md?v=2#top", "", &t), doc("faq.md", Some("top")));
    }

    #[test]
    fn test_resolve_extensionless_and_directory() {
        let t = targets();

        assert_eq!(resolve_reference("setup", "guide", &t), doc("guide/setup.md", None));
        assert_eq!(resolve_reference("guide/", "", &t), doc("guide/index.md", None));
        assert_eq!(resolve_reference("guide", "", &t), doc("guide/index.md", None));
        assert_eq!(resolve_reference("..", "guide", &t), doc("index.md", None));
    }

    #[test]
    fn test_resolve_assets() {
        let t = targets();

        assert_eq!(
            resolve_reference("img/shot.png", "guide", &t),
            Resolution::Asset("guide/img/shot.png".to_owned())
        );
    }

    #[test]
    fn test_resolve_unresolved() {
        let t = targets();

        assert_eq!(resolve_reference("missing.md", "", &t), Resolution::Unresolved);
        assert_eq!(resolve_reference("../../faq.md", "guide", &t), Resolution::Unresolved);
        assert_eq!(resolve_reference("Faq.md", "", &t), Resolution::Unresolved);
    }

    #[test]
    fn test_resolve_skipped() {
        let t = targets();

        for reference in [
            "",
            "#section",
            "https://example.com/a.md",
            "mailto:me@example.com",
            "custom+scheme:thing",
            "//cdn.example.com/x.js",
            "/absolute/faq.md",
            "?only=query",
        ] {
            assert_eq!(resolve_reference(reference, "", &t), Resolution::Skipped, "{reference}");
        }
    }

    #[test]
    fn test_doc_token_encoding() {
        assert_eq!(doc_token("a/b.md"), "#/a/b.md");
        assert_eq!(doc_token("what?.md"), "#/what%3F.md");
        assert_eq!(doc_token("café.md"), "#/caf%C3%A9.md");
    }

    #[test]
    fn test_rewrite_document_link() {
        let html = r#"<p>See <a href="setup.md#install" title="Setup">setup</a>.</p>"#;

        let (out, unresolved) = rewrite_links(html, "guide/index.md", &targets());

        assert_eq!(
            out,
            r##"<p>See <a href="#/guide/setup.md#install" data-doc="guide/setup.md" data-anchor="install" title="Setup">setup</a>.</p>"##
        );
        assert!(unresolved.is_empty());
    }

    #[test]
    fn test_rewrite_encodes_anchor_in_token() {
        let html = r#"<a href="setup.md#Mise%20en%20place">x</a>"#;

        let (out, _) = rewrite_links(html, "guide/index.md", &targets());

        assert_eq!(
            out,
            r##"<a href="#/guide/setup.md#Mise%20en%20place" data-doc="guide/setup.md" data-anchor="Mise en place">x</a>"##
        );
    }

    #[test]
    fn test_rewrite_keeps_assets_and_external() {
        let html = concat!(
            r#"<img src="img/shot.png" alt="shot">"#,
            r#"<a href="https://example.com">x</a>"#,
            r##"<a href="#local">y</a>"##,
        );

        let (out, unresolved) = rewrite_links(html, "guide/setup.md", &targets());

        assert_eq!(out, html);
        assert!(unresolved.is_empty());
    }

    #[test]
    fn test_rewrite_reports_unresolved() {
        let html = r#"<a href="nowhere.md">a</a><img src="gone.png" alt="">"#;

        let (out, unresolved) = rewrite_links(html, "index.md", &targets());

        assert_eq!(out, html);
        assert_eq!(unresolved, vec!["nowhere.md", "gone.png"]);
    }

    #[test]
    fn test_rewrite_unescapes_attribute() {
        let html = r#"<a href="faq.md?a=1&amp;b=2">faq</a>"#;

        let (out, unresolved) = rewrite_links(html, "index.md", &targets());

        assert_eq!(out, r##"<a href="#/faq.md" data-doc="faq.md">faq</a>"##);
        assert!(unresolved.is_empty());
    }

    #[test]
    fn test_rewrite_single_quoted_attribute() {
        let html = "<a class='x' href='faq.md'>faq</a>";

        let (out, _) = rewrite_links(html, "index.md", &targets());

        assert_eq!(out, r##"<a class='x' href="#/faq.md" data-doc="faq.md">faq</a>"##);
    }

    #[test]
    fn test_rewrite_is_idempotent() {
        let html = concat!(
            r#"<p><a href="guide/setup.md#a">s</a> <a href="my%20notes.md">n</a> "#,
            r#"<a href="missing.md">m</a> <img src="guide/img/shot.png" alt=""></p>"#,
        );
        let t = targets();

        let (once, _) = rewrite_links(html, "index.md", &t);
        let (twice, unresolved) = rewrite_links(&once, "index.md", &t);

        assert_eq!(once, twice);
        assert_eq!(unresolved, vec!["missing.md"]);
    }

    #[test]
    fn test_anchor_without_href_untouched() {
        let html = r#"<a name="top"></a><abbr title="x">y</abbr>"#;

        let (out, unresolved) = rewrite_links(html, "index.md", &targets());

        assert_eq!(out, html);
        assert!(unresolved.is_empty());
    }
}
