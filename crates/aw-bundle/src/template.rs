//! HTML markup for the single-page wiki.
//!
//! Mirrors the element structure the client script (`assets/wiki.js`)
//! expects: a sidebar tree of `data-doc` links, one `<template>` per
//! document, a TOC panel and a JSON data island.
//!
//! Page element ids all start with `wiki_`. Heading anchors never contain
//! `_`, so a cloned document cannot shadow the page's own elements.

use std::fmt::Write;

use aw_site::{Document, NavKind, NavNode, TagIndex};

use crate::AssemblerOptions;
use crate::theme::ThemeSettings;

const BASE_CSS: &str = include_str!("../assets/wiki.css");
const CLIENT_JS: &str = include_str!("../assets/wiki.js");

const PRISM_BASE: &str = "https://cdnjs.cloudflare.com/ajax/libs/prism/1.29.0";
const JQUERY_URL: &str = "https://code.jquery.com/jquery-3.7.1.min.js";
const DATATABLES_URL: &str = "https://cdn.datatables.net/1.13.7/js/jquery.dataTables.min.js";

/// Everything needed to render the page.
pub(crate) struct PageData<'a> {
    pub options: &'a AssemblerOptions,
    /// Load the table enhancement scripts.
    pub enhance_tables: bool,
    pub navigation: &'a [NavNode],
    pub documents: &'a [&'a Document],
    pub tags: &'a TagIndex,
    /// Serialized data island, already safe for embedding in `<script>`.
    pub data_json: &'a str,
}

pub(crate) fn render_page(page: &PageData<'_>) -> String {
    let options = page.options;
    let mut html = String::with_capacity(
        BASE_CSS.len()
            + CLIENT_JS.len()
            + page.data_json.len()
            + page.documents.iter().map(|d| d.html.len() + 256).sum::<usize>(),
    );

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    let _ = writeln!(html, "<title>{}</title>", escape(&options.title));
    let _ = writeln!(
        html,
        "<link rel=\"stylesheet\" href=\"{PRISM_BASE}/themes/prism-tomorrow.min.css\">"
    );
    let _ = writeln!(
        html,
        "<link rel=\"stylesheet\" href=\"{PRISM_BASE}/plugins/line-numbers/prism-line-numbers.min.css\">"
    );
    html.push_str("<style>\n");
    html.push_str(BASE_CSS);
    html.push_str(&options.theme.css_variables());
    html.push_str("</style>\n</head>\n");

    let mut body_class = String::from("wiki");
    if !options.table_of_contents {
        body_class.push_str(" no-toc");
    }
    let _ = writeln!(html, "<body class=\"{body_class}\">");
    html.push_str("<div class=\"container\">\n");

    render_sidebar(&mut html, page);
    render_settings(&mut html, &options.theme);

    html.push_str("<main class=\"main-content\" id=\"wiki_content\">\n");
    html.push_str("<noscript><p>This wiki needs JavaScript to switch between documents.</p></noscript>\n");
    html.push_str("</main>\n");

    if options.table_of_contents {
        html.push_str("<aside class=\"toc-panel\" id=\"wiki_toc_panel\">\n");
        html.push_str("<h3>Contents</h3>\n");
        html.push_str("<div id=\"wiki_toc_content\"><div class=\"toc-empty\">No headings found</div></div>\n");
        html.push_str("</aside>\n");
        html.push_str("<button class=\"toc-toggle\" id=\"wiki_toc_toggle\" type=\"button\" title=\"Toggle contents\">&#9776;</button>\n");
    }

    html.push_str("<div id=\"wiki_tag_popup\" class=\"tag-popup\" hidden></div>\n");
    html.push_str("</div>\n");

    for (n, doc) in page.documents.iter().enumerate() {
        render_document(&mut html, n, doc, page.tags, options);
    }

    html.push_str("<script type=\"application/json\" id=\"wiki_data\">");
    html.push_str(page.data_json);
    html.push_str("</script>\n");

    let _ = writeln!(html, "<script src=\"{PRISM_BASE}/components/prism-core.min.js\"></script>");
    let _ = writeln!(
        html,
        "<script src=\"{PRISM_BASE}/plugins/autoloader/prism-autoloader.min.js\"></script>"
    );
    let _ = writeln!(
        html,
        "<script src=\"{PRISM_BASE}/plugins/line-numbers/prism-line-numbers.min.js\"></script>"
    );
    if page.enhance_tables {
        let _ = writeln!(html, "<script src=\"{JQUERY_URL}\"></script>");
        let _ = writeln!(html, "<script src=\"{DATATABLES_URL}\"></script>");
    }
    html.push_str("<script>\n");
    html.push_str(CLIENT_JS);
    html.push_str("</script>\n</body>\n</html>\n");
    html
}

fn render_sidebar(html: &mut String, page: &PageData<'_>) {
    html.push_str("<nav class=\"sidebar\" id=\"wiki_sidebar\">\n");
    html.push_str("<div class=\"sidebar-nav\">\n");
    let _ = writeln!(html, "<h2 class=\"wiki-title\">{}</h2>", escape(&page.options.title));
    html.push_str("<ul class=\"nav-tree\">\n");
    render_nav_items(html, page.navigation);
    html.push_str("</ul>\n");

    if !page.tags.is_empty() {
        html.push_str("<section class=\"tag-index\">\n<h3>Tags</h3>\n<ul>\n");
        for entry in page.tags.entries() {
            html.push_str("<li>");
            render_tag_chip(html, &entry.name, entry.documents.len());
            html.push_str("</li>\n");
        }
        html.push_str("</ul>\n</section>\n");
    }

    html.push_str("</div>\n");
    html.push_str("<div class=\"sidebar-footer\">\n");
    html.push_str("<button class=\"settings-button\" id=\"wiki_settings_button\" type=\"button\">Settings</button>\n");
    html.push_str("</div>\n");
    html.push_str("</nav>\n");
}

fn render_nav_items(html: &mut String, items: &[NavNode]) {
    for item in items {
        match &item.kind {
            NavKind::Document { id } => {
                let _ = writeln!(
                    html,
                    "<li><a href=\"{}\" class=\"nav-link\" data-doc=\"{}\">{}</a></li>",
                    escape(&aw_site::doc_token(id)),
                    escape(id),
                    escape(&item.label),
                );
            }
            NavKind::Folder { path } => {
                let _ = writeln!(html, "<li class=\"folder-item\" data-folder=\"{}\">", escape(path));
                let _ = writeln!(
                    html,
                    "<button class=\"folder-header\" type=\"button\" aria-expanded=\"false\">\
                     <span class=\"folder-toggle\">&#9656;</span>\
                     <span class=\"folder-name\">{}</span></button>",
                    escape(&item.label),
                );
                html.push_str("<ul class=\"folder-contents\">\n");
                render_nav_items(html, &item.children);
                html.push_str("</ul>\n</li>\n");
            }
        }
    }
}

fn render_tag_chip(html: &mut String, tag: &str, count: usize) {
    let tag = escape(tag);
    let _ = write!(
        html,
        "<span class=\"tag\" data-tag=\"{tag}\">{tag} <span class=\"tag-count\">{count}</span></span>"
    );
}

fn render_settings(html: &mut String, theme: &ThemeSettings) {
    html.push_str("<div class=\"settings-modal\" id=\"wiki_settings_modal\" hidden>\n");
    html.push_str("<div class=\"settings-content\">\n");
    html.push_str("<div class=\"settings-header\"><h3>Settings</h3>");
    html.push_str("<button class=\"settings-close\" id=\"wiki_settings_close\" type=\"button\">&#10005;</button></div>\n");

    let families = theme.families();
    if !families.is_empty() {
        html.push_str("<div class=\"setting-group\">\n<label for=\"wiki_theme_family\">Theme</label>\n");
        html.push_str("<select id=\"wiki_theme_family\" class=\"theme-dropdown\">\n");
        for (key, name) in &families {
            let _ = writeln!(html, "<option value=\"{}\">{}</option>", escape(key), escape(name));
        }
        html.push_str("</select>\n</div>\n");
    }

    html.push_str("<div class=\"setting-group\">\n<label>Mode</label>\n<div class=\"mode-buttons\">\n");
    for (mode, label) in [("light", "Light"), ("dark", "Dark"), ("system", "System")] {
        let _ = writeln!(
            html,
            "<button class=\"mode-button\" type=\"button\" data-mode=\"{mode}\">{label}</button>"
        );
    }
    html.push_str("</div>\n</div>\n");
    html.push_str("</div>\n</div>\n");
}

fn render_document(
    html: &mut String,
    n: usize,
    doc: &Document,
    tags: &TagIndex,
    options: &AssemblerOptions,
) {
    let _ = writeln!(html, "<template id=\"wiki_doc_{n}\" data-doc=\"{}\">", escape(&doc.id));
    html.push_str("<article class=\"content-section\">\n");

    if options.show_file_titles {
        let _ = writeln!(
            html,
            "<div class=\"section-header\"><h1 class=\"section-title\">{}</h1></div>",
            escape(&doc.title)
        );
    }

    if options.show_frontmatter {
        if let Some(author) = doc.frontmatter.author() {
            let _ = writeln!(html, "<div class=\"frontmatter-author\">{}</div>", escape(author));
        }
        if !doc.tags.is_empty() {
            html.push_str("<div class=\"frontmatter-tags\">");
            for tag in &doc.tags {
                let count = tags.get(tag).map_or(0, |e| e.documents.len());
                render_tag_chip(html, tag, count);
            }
            html.push_str("</div>\n");
        }
    }

    html.push_str("<div class=\"section-content\">\n");
    html.push_str(&doc.html);
    html.push_str("\n</div>\n</article>\n</template>\n");
}

fn escape(s: &str) -> String {
    aw_site::escape_html(s)
}
