//! Resolved build settings for one wiki.

use std::path::{Path, PathBuf};

use aw_bundle::{AssemblerOptions, ThemeMode, ThemeSettings};
use aw_config::{ColorMode, Config, FolderOrder, TocVisibility};
use aw_site::{BuildOptions, FolderPlacement, TablePolicy, display_name};

const FALLBACK_TITLE: &str = "Wiki";

/// Everything a command needs to build the wiki.
#[derive(Debug)]
pub(crate) struct Project {
    pub(crate) source_dir: PathBuf,
    pub(crate) output_file: PathBuf,
    pub(crate) build: BuildOptions,
    pub(crate) assembler: AssemblerOptions,
}

impl Project {
    pub(crate) fn from_config(config: Config) -> Self {
        let title = match config.title {
            Some(title) => title,
            None => folder_title(&config.paths.source_dir),
        };

        let build = BuildOptions {
            table_policy: TablePolicy {
                min_rows: config.tables.min_rows,
            },
            folder_placement: match config.navigation.folders {
                FolderOrder::Before => FolderPlacement::Before,
                FolderOrder::After => FolderPlacement::After,
                FolderOrder::Mixed => FolderPlacement::Mixed,
            },
        };

        let assembler = AssemblerOptions {
            title,
            table_of_contents: config.features.table_of_contents == TocVisibility::Show,
            show_file_titles: config.features.show_file_titles,
            show_frontmatter: config.features.show_frontmatter,
            enhanced_tables: config.features.enhanced_tables,
            theme: ThemeSettings {
                default_family: config.styling.default_theme,
                default_mode: match config.styling.default_mode {
                    ColorMode::Light => ThemeMode::Light,
                    ColorMode::Dark => ThemeMode::Dark,
                    ColorMode::System => ThemeMode::System,
                },
                themes: config.themes,
            },
        };

        Self {
            source_dir: config.paths.source_dir,
            output_file: config.paths.output_file,
            build,
            assembler,
        }
    }
}

/// Title derived from the input folder name (`team-notes` is `Team Notes`).
fn folder_title(source_dir: &Path) -> String {
    let resolved = source_dir
        .canonicalize()
        .unwrap_or_else(|_| source_dir.to_path_buf());
    resolved
        .file_name()
        .and_then(|name| name.to_str())
        .map_or_else(|| FALLBACK_TITLE.to_owned(), display_name)
}
