/// Human-readable name for a file or folder.
///
/// Strips a markdown extension, turns `-` and `_` into spaces and capitalizes
/// the first letter of each word. The rest of each word is kept as written,
/// so `API-reference.md` becomes `API Reference`.
///
/// # Examples
///
/// ```
/// use aw_site::display_name;
///
/// assert_eq!(display_name("setup-guide.md"), "Setup Guide");
/// assert_eq!(display_name("release_notes"), "Release Notes");
/// ```
#[must_use]
pub fn display_name(name: &str) -> String {
    let stem = strip_markdown_extension(name).unwrap_or(name);
    let mut result = String::with_capacity(stem.len());
    for word in stem.split(['-', '_', ' ']).filter(|w| !w.is_empty()) {
        if !result.is_empty() {
            result.push(' ');
        }
        capitalize_first_into(word, &mut result);
    }
    if result.is_empty() {
        stem.to_owned()
    } else {
        result
    }
}

/// Return the file stem when `name` has a markdown extension
/// (`.md` or `.markdown`, any case).
pub(crate) fn strip_markdown_extension(name: &str) -> Option<&str> {
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() {
        return None;
    }
    (ext.eq_ignore_ascii_case("md") || ext.eq_ignore_ascii_case("markdown")).then_some(stem)
}

fn capitalize_first_into(word: &str, buf: &mut String) {
    let mut chars = word.chars();
    if let Some(first) = chars.next() {
        buf.extend(first.to_uppercase());
        buf.push_str(chars.as_str());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("getting-started.md"), "Getting Started");
        assert_eq!(display_name("my_page.markdown"), "My Page");
        assert_eq!(display_name("API-reference.MD"), "API Reference");
        assert_eq!(display_name("user guide"), "User Guide");
        assert_eq!(display_name("a--b__c"), "A B C");
    }

    #[test]
    fn test_display_name_keeps_other_dots() {
        assert_eq!(display_name("v1.2-notes.md"), "V1.2 Notes");
        assert_eq!(display_name("archive.tar"), "Archive.tar");
    }

    #[test]
    fn test_display_name_separator_only() {
        assert_eq!(display_name("_.md"), "_");
        assert_eq!(display_name("---"), "---");
    }

    #[test]
    fn test_strip_markdown_extension() {
        assert_eq!(strip_markdown_extension("index.md"), Some("index"));
        assert_eq!(strip_markdown_extension("Notes.Markdown"), Some("Notes"));
        assert_eq!(strip_markdown_extension("image.png"), None);
        assert_eq!(strip_markdown_extension(".md"), None);
        assert_eq!(strip_markdown_extension("README"), None);
    }
}
