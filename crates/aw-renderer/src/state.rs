//! State structs tracked while walking markdown events.

use std::collections::{HashMap, HashSet};

use pulldown_cmark::Alignment;

use crate::table::{TablePolicy, TableSummary, classify};

/// Code block rendering state.
#[derive(Default)]
pub(crate) struct CodeBlockState {
    active: bool,
    language: Option<String>,
    buffer: String,
}

impl CodeBlockState {
    pub fn start(&mut self, language: Option<String>) {
        self.active = true;
        self.language = language;
        self.buffer.clear();
    }

    /// End the current code block and return (language, content).
    pub fn end(&mut self) -> (Option<String>, String) {
        self.active = false;
        (self.language.take(), std::mem::take(&mut self.buffer))
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn push_str(&mut self, text: &str) {
        self.buffer.push_str(text);
    }
}

/// Table rendering state.
///
/// The `data-enhance` attribute depends on the number of body rows, which is
/// only known at the end of the table, so the insertion point is remembered.
#[derive(Default)]
pub(crate) struct TableState {
    in_head: bool,
    alignments: Vec<Alignment>,
    cell_index: usize,
    body_rows: usize,
    /// Output offset just after `<table`.
    attr_offset: usize,
}

impl TableState {
    pub fn start(&mut self, alignments: Vec<Alignment>, attr_offset: usize) {
        self.alignments = alignments;
        self.in_head = false;
        self.cell_index = 0;
        self.body_rows = 0;
        self.attr_offset = attr_offset;
    }

    pub fn start_head(&mut self) {
        self.in_head = true;
        self.cell_index = 0;
    }

    pub fn end_head(&mut self) {
        self.in_head = false;
    }

    pub fn start_row(&mut self) {
        self.cell_index = 0;
        self.body_rows += 1;
    }

    pub fn next_cell(&mut self) {
        self.cell_index += 1;
    }

    pub fn is_in_head(&self) -> bool {
        self.in_head
    }

    /// Finish the table, returning its summary and attribute insertion offset.
    pub fn finish(&self, policy: &TablePolicy) -> (TableSummary, usize) {
        let summary = TableSummary {
            rows: self.body_rows,
            class: classify(self.body_rows, policy),
        };
        (summary, self.attr_offset)
    }

    pub fn current_alignment_style(&self) -> &'static str {
        match self.alignments.get(self.cell_index) {
            Some(Alignment::Left) => r#" style="text-align:left""#,
            Some(Alignment::Center) => r#" style="text-align:center""#,
            Some(Alignment::Right) => r#" style="text-align:right""#,
            Some(Alignment::None) | None => "",
        }
    }
}

/// Image alt text capture state.
#[derive(Default)]
pub(crate) struct ImageState {
    active: bool,
    alt_text: String,
}

impl ImageState {
    pub fn start(&mut self) {
        self.active = true;
        self.alt_text.clear();
    }

    pub fn end(&mut self) -> String {
        self.active = false;
        std::mem::take(&mut self.alt_text)
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn push_str(&mut self, text: &str) {
        self.alt_text.push_str(text);
    }
}

/// Table of contents entry.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TocEntry {
    /// Heading level (1-6).
    pub level: u8,
    /// Heading text without markup.
    pub title: String,
    /// Anchor id, unique within the document.
    pub id: String,
}

/// Heading capture, anchor ids and title extraction.
#[derive(Default)]
pub(crate) struct HeadingState {
    /// Text of the first H1.
    title: Option<String>,
    current_level: Option<u8>,
    /// Plain text buffer (for the TOC and slug).
    text: String,
    /// HTML buffer (with inline formatting).
    html: String,
    toc: Vec<TocEntry>,
    taken: HashSet<String>,
    /// Next suffix to try per base id.
    next_suffix: HashMap<String, usize>,
}

impl HeadingState {
    pub fn is_active(&self) -> bool {
        self.current_level.is_some()
    }

    pub fn start_heading(&mut self, level: u8) {
        self.current_level = Some(level);
        self.text.clear();
        self.html.clear();
    }

    /// Complete the heading and record its TOC entry.
    ///
    /// Returns (level, id, html) or `None` if not in a heading.
    pub fn complete_heading(&mut self) -> Option<(u8, String, String)> {
        let level = self.current_level.take()?;
        let text = std::mem::take(&mut self.text);
        let html = std::mem::take(&mut self.html);
        let title = text.trim().to_owned();

        let id = self.generate_id(&title);
        if level == 1 && self.title.is_none() && !title.is_empty() {
            self.title = Some(title.clone());
        }
        self.toc.push(TocEntry {
            level,
            title,
            id: id.clone(),
        });

        Some((level, id, html))
    }

    /// Unique id for a heading: `base`, then `base-1`, `base-2`, ...
    /// skipping any id already assigned in this document.
    fn generate_id(&mut self, text: &str) -> String {
        let base = slugify(text);
        let mut id = base.clone();
        if self.taken.contains(&id) {
            let suffix = self.next_suffix.entry(base.clone()).or_insert(1);
            loop {
                id = format!("{base}-{suffix}");
                *suffix += 1;
                if !self.taken.contains(&id) {
                    break;
                }
            }
        }
        self.taken.insert(id.clone());
        id
    }

    pub fn push_text(&mut self, text: &str) {
        self.text.push_str(text);
    }

    pub fn push_html(&mut self, html: &str) {
        self.html.push_str(html);
    }

    pub fn take_title(&mut self) -> Option<String> {
        self.title.take()
    }

    pub fn take_toc(&mut self) -> Vec<TocEntry> {
        std::mem::take(&mut self.toc)
    }
}

/// Convert heading text to an anchor id.
///
/// Transliterates the text to ASCII, lower-cases it and collapses every run
/// of non-alphanumeric characters into a single `-`, trimming dashes at both
/// ends. Text without any alphanumeric character becomes `section`. The
/// result only ever contains `[a-z0-9-]`.
#[must_use]
pub fn slugify(text: &str) -> String {
    let ascii = deunicode::deunicode(text);
    let mut result = String::with_capacity(ascii.len());
    let mut pending_dash = false;

    for c in ascii.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !result.is_empty() {
                result.push('-');
            }
            pending_dash = false;
            result.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    if result.is_empty() {
        "section".to_owned()
    } else {
        result
    }
}

/// Escape HTML special characters.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}
