//! JSON data island read by the client script.

use aw_site::{Document, Navigation, TagIndex, TocNode, build_toc};
use serde::Serialize;

use crate::AssemblerOptions;
use crate::error::BundleError;
use crate::theme::ThemeConfig;

#[derive(Serialize)]
struct WikiData<'a> {
    documents: Vec<DocumentData<'a>>,
    navigation: &'a Navigation,
    tags: &'a TagIndex,
    config: ClientConfig<'a>,
}

#[derive(Serialize)]
struct DocumentData<'a> {
    id: &'a str,
    title: &'a str,
    tags: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    toc: Option<Vec<TocNode>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ClientConfig<'a> {
    title: &'a str,
    /// Document shown when the page opens without a `#/` token.
    home: Option<&'a str>,
    table_of_contents: bool,
    show_file_titles: bool,
    show_frontmatter: bool,
    enhanced_tables: bool,
    theme: ThemeConfig<'a>,
}

/// Serialize the island and make it safe inside a `<script>` element.
pub(crate) fn data_island(
    documents: &[&Document],
    navigation: &Navigation,
    tags: &TagIndex,
    options: &AssemblerOptions,
    enhance_tables: bool,
) -> Result<String, BundleError> {
    let data = WikiData {
        documents: documents
            .iter()
            .map(|doc| DocumentData {
                id: &doc.id,
                title: &doc.title,
                tags: &doc.tags,
                toc: options.table_of_contents.then(|| build_toc(&doc.toc)),
            })
            .collect(),
        navigation,
        tags,
        config: ClientConfig {
            title: &options.title,
            home: documents.first().map(|d| d.id.as_str()),
            table_of_contents: options.table_of_contents,
            show_file_titles: options.show_file_titles,
            show_frontmatter: options.show_frontmatter,
            enhanced_tables: enhance_tables,
            theme: options.theme.client_config(),
        },
    };
    let json = serde_json::to_string(&data)?;
    Ok(escape_script(&json))
}

/// Escape `<` so the JSON can never close its `<script>` element.
fn escape_script(json: &str) -> String {
    json.replace('<', "\\u003c")
}
