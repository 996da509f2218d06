//! Code block processing hook.
//!
//! Processors are registered with the renderer and consulted in order for
//! every fenced code block that names a language. The first processor
//! returning [`ProcessResult::Inline`] wins; otherwise the block is rendered
//! as a regular `<pre><code class="language-...">` block for client-side
//! syntax highlighting.

use std::collections::HashMap;

use crate::state::escape_html;

/// Result of processing a code block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProcessResult {
    /// Replace the code block with this HTML.
    Inline(String),
    /// Render as a normal code block.
    PassThrough,
}

/// Hook for special code blocks.
pub trait CodeBlockProcessor: Send {
    /// Process a code block.
    ///
    /// # Arguments
    ///
    /// * `language` - Language identifier from the fence info string
    /// * `attrs` - `key=value` attributes following the language
    /// * `source` - Raw content of the code block
    fn process(
        &mut self,
        language: &str,
        attrs: &HashMap<String, String>,
        source: &str,
    ) -> ProcessResult;

    /// Warnings produced while processing.
    fn warnings(&self) -> &[String] {
        &[]
    }
}

/// Wraps code blocks carrying a `title` attribute in a captioned figure.
///
/// ````text
/// ```rust title="src/main.rs"
/// fn main() {}
/// ```
/// ````
#[derive(Debug, Default)]
pub struct CodeTitleProcessor {
    warnings: Vec<String>,
}

impl CodeTitleProcessor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl CodeBlockProcessor for CodeTitleProcessor {
    fn process(
        &mut self,
        language: &str,
        attrs: &HashMap<String, String>,
        source: &str,
    ) -> ProcessResult {
        let Some(title) = attrs.get("title") else {
            return ProcessResult::PassThrough;
        };
        if title.trim().is_empty() {
            self.warnings
                .push(format!("Empty title attribute on {language} code block"));
            return ProcessResult::PassThrough;
        }

        let html = format!(
            r#"<figure class="code-block"><figcaption>{}</figcaption><pre><code class="language-{}">{}</code></pre></figure>"#,
            escape_html(title.trim()),
            escape_html(language),
            escape_html(source)
        );
        ProcessResult::Inline(html)
    }

    fn warnings(&self) -> &[String] {
        &self.warnings
    }
}

/// Parse fence info string into language and attributes.
///
/// Format: `language [key=value ...]`. Values may be wrapped in single or
/// double quotes to include spaces.
#[must_use]
pub(crate) fn parse_fence_info(info: &str) -> (String, HashMap<String, String>) {
    let info = info.trim();
    let (language, mut rest) = info
        .split_once(char::is_whitespace)
        .unwrap_or((info, ""));

    let mut attrs = HashMap::new();
    loop {
        rest = rest.trim_start();
        if rest.is_empty() {
            break;
        }
        let token_end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        let Some(eq) = rest[..token_end].find('=') else {
            rest = &rest[token_end..];
            continue;
        };
        let key = &rest[..eq];
        let after = &rest[eq + 1..];
        let (value, remaining) = match after.chars().next() {
            Some(q @ ('"' | '\'')) => match after[1..].find(q) {
                Some(end) => (&after[1..=end], &after[end + 2..]),
                None => (&after[1..], ""),
            },
            _ => {
                let end = after.find(char::is_whitespace).unwrap_or(after.len());
                (&after[..end], &after[end..])
            }
        };
        if !key.is_empty() {
            attrs.insert(key.to_owned(), value.to_owned());
        }
        rest = remaining;
    }

    (language.to_owned(), attrs)
}
