//! Event-driven markdown renderer.

use std::collections::HashMap;
use std::fmt::Write;

use pulldown_cmark::{BlockQuoteKind, CodeBlockKind, Event, Options, Parser, Tag, TagEnd};

use crate::code_block::{CodeBlockProcessor, ProcessResult, parse_fence_info};
use crate::state::{CodeBlockState, HeadingState, ImageState, TableState, TocEntry, escape_html};
use crate::table::{TablePolicy, TableSummary};
use crate::util::heading_level_to_num;

/// Markdown extensions enabled for every document.
#[must_use]
pub fn parser_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_GFM
}

/// Result of rendering markdown.
#[derive(Clone, Debug, Default)]
pub struct RenderResult {
    /// Rendered HTML fragment.
    pub html: String,
    /// Text of the first H1 heading.
    pub title: Option<String>,
    /// All headings in document order.
    pub toc: Vec<TocEntry>,
    /// Tables in document order.
    pub tables: Vec<TableSummary>,
    /// Warnings from code block processors.
    pub warnings: Vec<String>,
}

/// Markdown renderer producing an HTML fragment.
///
/// # Code Block Processors
///
/// Custom code block handling can be added via [`with_processor`](Self::with_processor).
/// Processors are checked in order; the first returning
/// [`ProcessResult::Inline`] wins.
pub struct MarkdownRenderer {
    output: String,
    code: CodeBlockState,
    table: TableState,
    table_policy: TablePolicy,
    tables: Vec<TableSummary>,
    image: ImageState,
    heading: HeadingState,
    /// Pending image data (src, title) waiting for alt text.
    pending_image: Option<(String, String)>,
    processors: Vec<Box<dyn CodeBlockProcessor>>,
    pending_attrs: HashMap<String, String>,
}

impl MarkdownRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            output: String::with_capacity(4096),
            code: CodeBlockState::default(),
            table: TableState::default(),
            table_policy: TablePolicy::default(),
            tables: Vec::new(),
            image: ImageState::default(),
            heading: HeadingState::default(),
            pending_image: None,
            processors: Vec::new(),
            pending_attrs: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_table_policy(mut self, policy: TablePolicy) -> Self {
        self.table_policy = policy;
        self
    }

    /// Add a code block processor.
    ///
    /// # Example
    ///
    /// ```
    /// use aw_renderer::{CodeTitleProcessor, MarkdownRenderer};
    ///
    /// let result = MarkdownRenderer::new()
    ///     .with_processor(CodeTitleProcessor::new())
    ///     .render_markdown("```rust title=\"main.rs\"\nfn main() {}\n```");
    ///
    /// assert!(result.html.contains("<figcaption>main.rs</figcaption>"));
    /// ```
    #[must_use]
    pub fn with_processor<P: CodeBlockProcessor + 'static>(mut self, processor: P) -> Self {
        self.processors.push(Box::new(processor));
        self
    }

    /// Parse and render markdown text with [`parser_options`].
    pub fn render_markdown(&mut self, markdown: &str) -> RenderResult {
        self.render(Parser::new_ext(markdown, parser_options()))
    }

    /// Render markdown events and return the result.
    pub fn render<'a, I>(&mut self, events: I) -> RenderResult
    where
        I: Iterator<Item = Event<'a>>,
    {
        for event in events {
            self.process_event(event);
        }

        RenderResult {
            html: std::mem::take(&mut self.output),
            title: self.heading.take_title(),
            toc: self.heading.take_toc(),
            tables: std::mem::take(&mut self.tables),
            warnings: self
                .processors
                .iter()
                .flat_map(|p| p.warnings())
                .cloned()
                .collect(),
        }
    }

    /// Push content to output or heading buffer based on context.
    ///
    /// Markup inside image alt text is dropped.
    fn push_inline(&mut self, content: &str) {
        if self.image.is_active() {
            return;
        }
        if self.heading.is_active() {
            self.heading.push_html(content);
        } else {
            self.output.push_str(content);
        }
    }

    fn process_event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => self.inline_code(&code),
            Event::Html(html) | Event::InlineHtml(html) => self.raw_html(&html),
            Event::SoftBreak => self.soft_break(),
            Event::HardBreak => self.push_inline("<br>"),
            Event::Rule => self.output.push_str("<hr>"),
            Event::TaskListMarker(checked) => self.output.push_str(if checked {
                r#"<input type="checkbox" checked disabled> "#
            } else {
                r#"<input type="checkbox" disabled> "#
            }),
            Event::FootnoteReference(_) | Event::InlineMath(_) | Event::DisplayMath(_) => {
                // Not supported
            }
        }
    }

    fn start_tag(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => self.output.push_str("<p>"),
            Tag::Heading { level, .. } => {
                // Opening tag is written in end_tag once the id is known.
                self.heading.start_heading(heading_level_to_num(level));
            }
            Tag::BlockQuote(kind) => match kind {
                Some(kind) => {
                    let (class, title) = alert_class_and_title(kind);
                    let _ = write!(
                        self.output,
                        r#"<div class="alert alert-{class}"><p class="alert-title">{title}</p>"#
                    );
                }
                None => self.output.push_str("<blockquote>"),
            },
            Tag::CodeBlock(kind) => {
                let (lang, attrs) = match kind {
                    CodeBlockKind::Fenced(ref info) if !info.trim().is_empty() => {
                        let (lang, attrs) = parse_fence_info(info);
                        (Some(lang), attrs)
                    }
                    _ => (None, HashMap::new()),
                };
                self.pending_attrs = attrs;
                self.code.start(lang);
            }
            Tag::List(start) => match start {
                Some(1) => self.output.push_str("<ol>"),
                Some(n) => {
                    let _ = write!(self.output, r#"<ol start="{n}">"#);
                }
                None => self.output.push_str("<ul>"),
            },
            Tag::Item => self.output.push_str("<li>"),
            Tag::FootnoteDefinition(_) | Tag::HtmlBlock | Tag::MetadataBlock(_) => {}
            Tag::DefinitionList => self.output.push_str("<dl>"),
            Tag::DefinitionListTitle => self.output.push_str("<dt>"),
            Tag::DefinitionListDefinition => self.output.push_str("<dd>"),
            Tag::Table(alignments) => {
                self.output.push_str(r#"<div class="table-wrapper"><table"#);
                self.table.start(alignments, self.output.len());
                self.output.push('>');
            }
            Tag::TableHead => {
                self.table.start_head();
                self.output.push_str("<thead><tr>");
            }
            Tag::TableRow => {
                self.table.start_row();
                self.output.push_str("<tr>");
            }
            Tag::TableCell => {
                let align = self.table.current_alignment_style();
                let tag = if self.table.is_in_head() { "th" } else { "td" };
                let _ = write!(self.output, "<{tag}{align}>");
            }
            Tag::Emphasis => self.push_inline("<em>"),
            Tag::Strong => self.push_inline("<strong>"),
            Tag::Strikethrough => self.push_inline("<s>"),
            Tag::Link {
                dest_url, title, ..
            } => {
                let link_tag = if title.is_empty() {
                    format!(r#"<a href="{}">"#, escape_html(&dest_url))
                } else {
                    format!(
                        r#"<a href="{}" title="{}">"#,
                        escape_html(&dest_url),
                        escape_html(&title)
                    )
                };
                self.push_inline(&link_tag);
            }
            Tag::Image {
                dest_url, title, ..
            } => {
                // Alt text arrives as text events; the tag is written in end_tag.
                self.image.start();
                self.pending_image = Some((dest_url.to_string(), title.to_string()));
            }
            Tag::Superscript => self.push_inline("<sup>"),
            Tag::Subscript => self.push_inline("<sub>"),
        }
    }

    fn end_tag(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => self.output.push_str("</p>"),
            TagEnd::Heading(_) => {
                if let Some((level, id, html)) = self.heading.complete_heading() {
                    let _ = write!(
                        self.output,
                        r#"<h{level} id="{}">{}</h{level}>"#,
                        escape_html(&id),
                        html.trim()
                    );
                }
            }
            TagEnd::BlockQuote(kind) => self.output.push_str(if kind.is_some() {
                "</div>"
            } else {
                "</blockquote>"
            }),
            TagEnd::CodeBlock => self.finish_code_block(),
            TagEnd::List(ordered) => self.output.push_str(if ordered { "</ol>" } else { "</ul>" }),
            TagEnd::Item => self.output.push_str("</li>"),
            TagEnd::FootnoteDefinition | TagEnd::HtmlBlock | TagEnd::MetadataBlock(_) => {}
            TagEnd::Image => {
                let alt = self.image.end();
                if let Some((src, title)) = self.pending_image.take() {
                    let title_attr = if title.is_empty() {
                        String::new()
                    } else {
                        format!(r#" title="{}""#, escape_html(&title))
                    };
                    let img = format!(
                        r#"<img src="{}" alt="{}"{title_attr}>"#,
                        escape_html(&src),
                        escape_html(&alt)
                    );
                    self.push_inline(&img);
                }
            }
            TagEnd::DefinitionList => self.output.push_str("</dl>"),
            TagEnd::DefinitionListTitle => self.output.push_str("</dt>"),
            TagEnd::DefinitionListDefinition => self.output.push_str("</dd>"),
            TagEnd::Table => {
                self.output.push_str("</tbody></table></div>");
                let (summary, offset) = self.table.finish(&self.table_policy);
                self.output.insert_str(
                    offset,
                    &format!(r#" data-enhance="{}""#, summary.class.as_str()),
                );
                self.tables.push(summary);
            }
            TagEnd::TableHead => {
                self.output.push_str("</tr></thead><tbody>");
                self.table.end_head();
            }
            TagEnd::TableRow => self.output.push_str("</tr>"),
            TagEnd::TableCell => {
                self.output.push_str(if self.table.is_in_head() {
                    "</th>"
                } else {
                    "</td>"
                });
                self.table.next_cell();
            }
            TagEnd::Emphasis => self.push_inline("</em>"),
            TagEnd::Strong => self.push_inline("</strong>"),
            TagEnd::Strikethrough => self.push_inline("</s>"),
            TagEnd::Link => self.push_inline("</a>"),
            TagEnd::Superscript => self.push_inline("</sup>"),
            TagEnd::Subscript => self.push_inline("</sub>"),
        }
    }

    fn finish_code_block(&mut self) {
        let (lang, content) = self.code.end();
        let attrs = std::mem::take(&mut self.pending_attrs);

        let processed = lang.as_deref().and_then(|lang| {
            self.processors
                .iter_mut()
                .find_map(|processor| match processor.process(lang, &attrs, &content) {
                    ProcessResult::Inline(html) => Some(html),
                    ProcessResult::PassThrough => None,
                })
        });

        if let Some(html) = processed {
            self.output.push_str(&html);
            return;
        }

        let _ = match lang {
            Some(lang) => write!(
                self.output,
                r#"<pre><code class="language-{}">{}</code></pre>"#,
                escape_html(&lang),
                escape_html(&content)
            ),
            None => write!(self.output, "<pre><code>{}</code></pre>", escape_html(&content)),
        };
    }

    fn text(&mut self, text: &str) {
        // Priority: code > image alt > heading > normal text
        if self.code.is_active() {
            self.code.push_str(text);
        } else if self.image.is_active() {
            self.image.push_str(text);
        } else if self.heading.is_active() {
            self.heading.push_text(text);
            self.heading.push_html(&escape_html(text));
        } else {
            self.output.push_str(&escape_html(text));
        }
    }

    fn inline_code(&mut self, code: &str) {
        if self.image.is_active() {
            self.image.push_str(code);
            return;
        }
        if self.heading.is_active() {
            self.heading.push_text(code);
        }
        self.push_inline(&format!("<code>{}</code>", escape_html(code)));
    }

    fn raw_html(&mut self, html: &str) {
        self.push_inline(html);
    }

    fn soft_break(&mut self) {
        if self.heading.is_active() {
            self.heading.push_text(" ");
            self.heading.push_html("\n");
        } else if !self.image.is_active() {
            self.output.push('\n');
        }
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn alert_class_and_title(kind: BlockQuoteKind) -> (&'static str, &'static str) {
    match kind {
        BlockQuoteKind::Note => ("note", "Note"),
        BlockQuoteKind::Tip => ("tip", "Tip"),
        BlockQuoteKind::Important => ("important", "Important"),
        BlockQuoteKind::Warning => ("warning", "Warning"),
        BlockQuoteKind::Caution => ("caution", "Caution"),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::code_block::CodeTitleProcessor;
    use crate::table::TableClass;

    fn render_html(markdown: &str) -> RenderResult {
        MarkdownRenderer::new().render_markdown(markdown)
    }

    #[test]
    fn test_basic_paragraph() {
        let result = render_html("Hello, world!");
        assert_eq!(result.html, "<p>Hello, world!</p>");
    }

    #[test]
    fn test_heading_with_id() {
        let result = render_html("## Section Title");
        assert_eq!(result.html, r#"<h2 id="section-title">Section Title</h2>"#);
        assert_eq!(
            result.toc,
            vec![TocEntry {
                level: 2,
                title: "Section Title".to_owned(),
                id: "section-title".to_owned(),
            }]
        );
    }

    #[test]
    fn test_title_from_first_h1_kept_in_toc() {
        let result = render_html("# My Title\n\nSome content\n\n## Section\n\n# Other");

        assert_eq!(result.title, Some("My Title".to_owned()));
        assert!(result.html.contains(r#"<h1 id="my-title">My Title</h1>"#));
        let levels: Vec<u8> = result.toc.iter().map(|e| e.level).collect();
        assert_eq!(levels, vec![1, 2, 1]);
    }

    #[test]
    fn test_no_h1_no_title() {
        let result = render_html("## Only a section");
        assert_eq!(result.title, None);
    }

    #[test]
    fn test_duplicate_heading_ids() {
        let result = render_html("## FAQ\n\n## FAQ\n\n## FAQ");
        let ids: Vec<&str> = result.toc.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["faq", "faq-1", "faq-2"]);
    }

    #[test]
    fn test_heading_with_inline_markup() {
        let result = render_html("## Install `npm` *now*");
        assert!(result.html.contains("<code>npm</code>"));
        assert!(result.html.contains("<em>now</em>"));
        assert_eq!(result.toc[0].title, "Install npm now");
        assert_eq!(result.toc[0].id, "install-npm-now");
    }

    #[test]
    fn test_symbol_only_heading() {
        let result = render_html("## ???");
        assert_eq!(result.toc[0].id, "section");
    }

    #[test]
    fn test_code_block() {
        let result = render_html("```rust\nfn main() {}\n```");
        assert_eq!(
            result.html,
            "<pre><code class=\"language-rust\">fn main() {}\n</code></pre>"
        );
    }

    #[test]
    fn test_code_block_without_language_escaped() {
        let result = render_html("```\n<b>&\n```");
        assert_eq!(result.html, "<pre><code>&lt;b&gt;&amp;\n</code></pre>");
    }

    #[test]
    fn test_code_title_processor() {
        let result = MarkdownRenderer::new()
            .with_processor(CodeTitleProcessor::new())
            .render_markdown("```sh title=\"Install\"\ncargo install\n```\n\n```sh\nls\n```");

        assert!(result.html.contains("<figcaption>Install</figcaption>"));
        assert!(result.html.contains(r#"<pre><code class="language-sh">ls"#));
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_processor_warnings_collected() {
        let result = MarkdownRenderer::new()
            .with_processor(CodeTitleProcessor::new())
            .render_markdown("```sh title=\"\"\nls\n```");

        assert_eq!(result.warnings, vec!["Empty title attribute on sh code block"]);
    }

    #[test]
    fn test_blockquote() {
        let result = render_html("> Note");
        assert_eq!(result.html, "<blockquote><p>Note</p></blockquote>");
    }

    #[test]
    fn test_alert() {
        let result = render_html("> [!WARNING]\n> Careful");
        assert!(
            result
                .html
                .starts_with(r#"<div class="alert alert-warning"><p class="alert-title">Warning</p>"#)
        );
        assert!(result.html.contains("Careful"));
        assert!(result.html.ends_with("</div>"));
    }

    #[test]
    fn test_image() {
        let result = render_html(r#"![Alt *text*](img/a.png "Caption")"#);
        assert_eq!(
            result.html,
            r#"<p><img src="img/a.png" alt="Alt text" title="Caption"></p>"#
        );
    }

    #[test]
    fn test_link_emitted_as_authored() {
        let result = render_html("[Guide](../guide.md#setup \"Go\")");
        assert_eq!(
            result.html,
            r#"<p><a href="../guide.md#setup" title="Go">Guide</a></p>"#
        );
    }

    #[test]
    fn test_link_href_escaped() {
        let result = render_html("[q](a.md?x=1&y=2)");
        assert!(result.html.contains(r#"href="a.md?x=1&amp;y=2""#));
    }

    #[test]
    fn test_table_plain() {
        let result = render_html("| A | B |\n|---|---|\n| 1 | 2 |\n| 3 | 4 |");

        assert!(
            result
                .html
                .starts_with(r#"<div class="table-wrapper"><table data-enhance="plain"><thead><tr><th>A</th>"#)
        );
        assert!(result.html.ends_with("</tbody></table></div>"));
        assert_eq!(
            result.tables,
            vec![TableSummary {
                rows: 2,
                class: TableClass::Plain
            }]
        );
    }

    #[test]
    fn test_table_eligible_at_three_rows() {
        let result = render_html("| A |\n|---|\n| 1 |\n| 2 |\n| 3 |");

        assert!(result.html.contains(r#"<table data-enhance="eligible">"#));
        assert_eq!(result.tables[0].rows, 3);
    }

    #[test]
    fn test_table_policy_threshold() {
        let result = MarkdownRenderer::new()
            .with_table_policy(TablePolicy { min_rows: 1 })
            .render_markdown("| A |\n|---|\n| 1 |");

        assert_eq!(result.tables[0].class, TableClass::Eligible);
    }

    #[test]
    fn test_multiple_tables_in_order() {
        let markdown = "| A |\n|---|\n| 1 |\n\ntext\n\n| B |\n|---|\n| 1 |\n| 2 |\n| 3 |\n| 4 |";
        let result = render_html(markdown);

        let rows: Vec<usize> = result.tables.iter().map(|t| t.rows).collect();
        assert_eq!(rows, vec![1, 4]);
        let first = result.html.find("data-enhance=\"plain\"").unwrap();
        let second = result.html.find("data-enhance=\"eligible\"").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_table_alignment() {
        let result = render_html("| A | B |\n|:--|--:|\n| 1 | 2 |");
        assert!(result.html.contains(r#"<th style="text-align:left">A</th>"#));
        assert!(result.html.contains(r#"<td style="text-align:right">2</td>"#));
    }

    #[test]
    fn test_emphasis_and_strikethrough() {
        let result = render_html("*italic* **bold** ~~gone~~");
        assert!(result.html.contains("<em>italic</em>"));
        assert!(result.html.contains("<strong>bold</strong>"));
        assert!(result.html.contains("<s>gone</s>"));
    }

    #[test]
    fn test_lists() {
        let result = render_html("- Item 1\n- Item 2");
        assert_eq!(result.html, "<ul><li>Item 1</li><li>Item 2</li></ul>");

        let result = render_html("3. Third\n4. Fourth");
        assert!(result.html.starts_with(r#"<ol start="3">"#));
    }

    #[test]
    fn test_task_list() {
        let result = render_html("- [ ] Todo\n- [x] Done");
        assert!(result.html.contains(r#"<input type="checkbox" disabled> Todo"#));
        assert!(result.html.contains(r#"<input type="checkbox" checked disabled> Done"#));
    }

    #[test]
    fn test_raw_html_passthrough() {
        let result = render_html("<div class=\"note\">hi</div>");
        assert!(result.html.contains(r#"<div class="note">hi</div>"#));
    }

    #[test]
    fn test_text_escaped() {
        let result = render_html("a < b & c");
        assert_eq!(result.html, "<p>a &lt; b &amp; c</p>");
    }

    #[test]
    fn test_default_renderer() {
        let mut renderer = MarkdownRenderer::default();
        let result = renderer.render_markdown("# One");
        assert_eq!(result.title, Some("One".to_owned()));
        assert_eq!(result.html, r#"<h1 id="one">One</h1>"#);
    }
}
