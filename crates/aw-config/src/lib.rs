//! Configuration management for Atom Wiki.
//!
//! Parses `atomwiki.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! Every section is optional:
//!
//! ```toml
//! title = "My Wiki"
//!
//! [docs]
//! source_dir = "docs"
//!
//! [output]
//! file = "index.html"
//!
//! [features]
//! table_of_contents = "show"
//! show_file_titles = true
//! show_frontmatter = true
//! enhanced_tables = false
//!
//! [navigation]
//! folders = "after"
//!
//! [tables]
//! min_rows = 3
//!
//! [styling]
//! default_theme = "default"
//! default_mode = "system"
//!
//! [themes.light]
//! bg_primary = "#ffffff"
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override docs source directory.
    pub source_dir: Option<PathBuf>,
    /// Override output file.
    pub output_file: Option<PathBuf>,
    /// Override the table of contents visibility.
    pub table_of_contents: Option<TocVisibility>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "atomwiki.toml";

const DEFAULT_SOURCE_DIR: &str = "docs";
const DEFAULT_OUTPUT_FILE: &str = "index.html";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Wiki title. Defaults to the prettified input folder name.
    pub title: Option<String>,
    /// Documentation source (paths are relative strings from TOML).
    docs: DocsConfigRaw,
    /// Output artifact (paths are relative strings from TOML).
    output: OutputConfigRaw,
    /// Page features.
    pub features: FeaturesConfig,
    /// Sidebar navigation.
    pub navigation: NavigationConfig,
    /// Table classification.
    pub tables: TablesConfig,
    /// Initial theme selection.
    pub styling: StylingConfig,
    /// Theme palettes by name: variable name to CSS value.
    pub themes: BTreeMap<String, BTreeMap<String, String>>,

    /// Resolved paths (set after loading).
    #[serde(skip)]
    pub paths: PathsConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct DocsConfigRaw {
    source_dir: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct OutputConfigRaw {
    file: Option<String>,
}

/// Resolved input and output paths.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct PathsConfig {
    /// Folder holding the markdown files.
    pub source_dir: PathBuf,
    /// Generated HTML file.
    pub output_file: PathBuf,
}

/// Whether the table of contents is shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TocVisibility {
    #[default]
    Show,
    Hide,
}

/// Page feature flags.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct FeaturesConfig {
    pub table_of_contents: TocVisibility,
    /// Show each document's title above its content.
    pub show_file_titles: bool,
    /// Show frontmatter (author, tags) above each document.
    pub show_frontmatter: bool,
    /// Enhance large tables with sorting and search.
    pub enhanced_tables: bool,
}

impl Default for FeaturesConfig {
    fn default() -> Self {
        Self {
            table_of_contents: TocVisibility::Show,
            show_file_titles: true,
            show_frontmatter: true,
            enhanced_tables: false,
        }
    }
}

/// Folder position relative to documents in the sidebar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FolderOrder {
    Before,
    #[default]
    After,
    Mixed,
}

/// Navigation configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    pub folders: FolderOrder,
}

/// Table classification configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct TablesConfig {
    /// Minimum number of data rows for a table to be enhanced.
    pub min_rows: usize,
}

impl Default for TablesConfig {
    fn default() -> Self {
        Self { min_rows: 3 }
    }
}

/// Initial color mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    Light,
    Dark,
    #[default]
    System,
}

/// Theme selection configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct StylingConfig {
    /// Theme family selected on first visit.
    pub default_theme: String,
    pub default_mode: ColorMode,
}

impl Default for StylingConfig {
    fn default() -> Self {
        Self {
            default_theme: "default".to_owned(),
            default_mode: ColorMode::System,
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error, including unknown enum values.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a name usable in a CSS class or custom property.
fn require_css_identifier(value: &str, field: &str) -> Result<(), ConfigError> {
    require_non_empty(value, field)?;
    if !value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "{field} may only contain letters, digits, '_' and '-'"
        )));
    }
    Ok(())
}

/// Require a value that cannot escape its CSS declaration.
fn require_css_value(value: &str, field: &str) -> Result<(), ConfigError> {
    require_non_empty(value, field)?;
    if value.contains(['{', '}', ';', '<', '>']) {
        return Err(ConfigError::Validation(format!(
            "{field} cannot contain '{{', '}}', ';', '<' or '>'"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `atomwiki.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails or
    /// a value is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = std::env::current_dir()
            .ok()
            .and_then(|cwd| Self::discover_from(&cwd))
        {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(source_dir) = &settings.source_dir {
            self.paths.source_dir.clone_from(source_dir);
        }
        if let Some(output_file) = &settings.output_file {
            self.paths.output_file.clone_from(output_file);
        }
        if let Some(toc) = settings.table_of_contents {
            self.features.table_of_contents = toc;
        }
    }

    /// Search for a config file in `start` and its parents.
    fn discover_from(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.is_file() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            title: None,
            docs: DocsConfigRaw::default(),
            output: OutputConfigRaw::default(),
            features: FeaturesConfig::default(),
            navigation: NavigationConfig::default(),
            tables: TablesConfig::default(),
            styling: StylingConfig::default(),
            themes: BTreeMap::new(),
            paths: PathsConfig {
                source_dir: base.join(DEFAULT_SOURCE_DIR),
                output_file: base.join(DEFAULT_OUTPUT_FILE),
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(title) = &self.title {
            require_non_empty(title, "title")?;
        }
        if let Some(file) = &self.output.file {
            require_non_empty(file, "output.file")?;
        }
        if self.paths.output_file.file_name().is_none() {
            return Err(ConfigError::Validation(
                "output.file must name a file".to_owned(),
            ));
        }
        if self.tables.min_rows == 0 {
            return Err(ConfigError::Validation(
                "tables.min_rows must be greater than 0".to_owned(),
            ));
        }
        require_css_identifier(&self.styling.default_theme, "styling.default_theme")?;
        self.validate_themes()
    }

    fn validate_themes(&self) -> Result<(), ConfigError> {
        for (name, palette) in &self.themes {
            require_css_identifier(name, &format!("themes.{name}"))?;
            for (var, value) in palette {
                let field = format!("themes.{name}.{var}");
                require_css_identifier(var, &field)?;
                require_css_value(value, &field)?;
            }
        }
        Ok(())
    }

    /// Resolve relative paths against the config file's directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        self.paths = PathsConfig {
            source_dir: resolve(self.docs.source_dir.as_deref(), DEFAULT_SOURCE_DIR),
            output_file: resolve(self.output.file.as_deref(), DEFAULT_OUTPUT_FILE),
        };
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));

        assert_eq!(config.title, None);
        assert_eq!(config.paths.source_dir, PathBuf::from("/test/docs"));
        assert_eq!(config.paths.output_file, PathBuf::from("/test/index.html"));
        assert_eq!(config.features.table_of_contents, TocVisibility::Show);
        assert!(config.features.show_file_titles);
        assert!(config.features.show_frontmatter);
        assert!(!config.features.enhanced_tables);
        assert_eq!(config.navigation.folders, FolderOrder::After);
        assert_eq!(config.tables.min_rows, 3);
        assert_eq!(config.styling.default_theme, "default");
        assert_eq!(config.styling.default_mode, ColorMode::System);
        assert!(config.themes.is_empty());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();

        assert_eq!(config.tables.min_rows, 3);
        assert!(config.features.show_file_titles);
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r##"
title = "Team Wiki"

[features]
table_of_contents = "hide"
show_file_titles = false
enhanced_tables = true

[navigation]
folders = "mixed"

[tables]
min_rows = 5

[styling]
default_theme = "nord"
default_mode = "dark"

[themes.nord_dark]
bg_primary = "#2e3440"
text_primary = "#eceff4"
"##;
        let config: Config = toml::from_str(toml).unwrap();

        assert_eq!(config.title.as_deref(), Some("Team Wiki"));
        assert_eq!(config.features.table_of_contents, TocVisibility::Hide);
        assert!(!config.features.show_file_titles);
        assert!(config.features.show_frontmatter);
        assert!(config.features.enhanced_tables);
        assert_eq!(config.navigation.folders, FolderOrder::Mixed);
        assert_eq!(config.tables.min_rows, 5);
        assert_eq!(config.styling.default_theme, "nord");
        assert_eq!(config.styling.default_mode, ColorMode::Dark);
        assert_eq!(config.themes["nord_dark"]["bg_primary"], "#2e3440");
        config.validate().unwrap();
    }

    #[test]
    fn test_unknown_enum_value_is_parse_error() {
        let result: Result<Config, _> = toml::from_str("[navigation]\nfolders = \"sideways\"\n");

        assert!(result.is_err());

        let result: Result<Config, _> = toml::from_str("[styling]\ndefault_mode = \"dim\"\n");

        assert!(result.is_err());
    }

    #[test]
    fn test_resolve_paths() {
        let toml = r#"
[docs]
source_dir = "documentation"

[output]
file = "site/wiki.html"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(
            config.paths,
            PathsConfig {
                source_dir: PathBuf::from("/project/documentation"),
                output_file: PathBuf::from("/project/site/wiki.html"),
            }
        );
    }

    #[test]
    fn test_resolve_paths_defaults() {
        let mut config: Config = toml::from_str("").unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(config.paths.source_dir, PathBuf::from("/project/docs"));
        assert_eq!(config.paths.output_file, PathBuf::from("/project/index.html"));
    }

    #[test]
    fn test_validate_default_config_passes() {
        Config::default_with_base(Path::new("/test")).validate().unwrap();
    }

    #[test]
    fn test_validate_min_rows_zero() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.tables.min_rows = 0;

        let err = config.validate().unwrap_err();

        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("tables.min_rows"));
    }

    #[test]
    fn test_validate_empty_output_file() {
        let mut config: Config = toml::from_str("[output]\nfile = \"\"\n").unwrap();
        config.resolve_paths(Path::new("/project"));

        let err = config.validate().unwrap_err();

        assert!(err.to_string().contains("output.file"));
    }

    #[test]
    fn test_validate_output_file_without_name() {
        let mut config: Config = toml::from_str("[output]\nfile = \"..\"\n").unwrap();
        config.resolve_paths(Path::new("/project"));

        let err = config.validate().unwrap_err();

        assert!(err.to_string().contains("output.file must name a file"));
    }

    #[test]
    fn test_validate_empty_title() {
        let config: Config = toml::from_str("title = \"  \"\n").unwrap();

        let err = config.validate().unwrap_err();

        assert!(err.to_string().contains("title cannot be empty"));
    }

    #[test]
    fn test_validate_theme_names_and_values() {
        let bad_name: Config = toml::from_str("[themes.\"my theme\"]\nbg = \"#fff\"\n").unwrap();
        assert!(bad_name.validate().is_err());

        let bad_value: Config =
            toml::from_str("[themes.light]\nbg = \"red; } body { display: none\"\n").unwrap();
        let err = bad_value.validate().unwrap_err();
        assert!(err.to_string().contains("themes.light.bg"));

        let ok: Config =
            toml::from_str("[themes.light]\nbg = \"rgb(255 255 255 / 50%)\"\n").unwrap();
        ok.validate().unwrap();
    }

    #[test]
    fn test_apply_cli_settings() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            source_dir: Some(PathBuf::from("/custom/docs")),
            table_of_contents: Some(TocVisibility::Hide),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.paths.source_dir, PathBuf::from("/custom/docs"));
        assert_eq!(config.paths.output_file, PathBuf::from("/test/index.html"));
        assert_eq!(config.features.table_of_contents, TocVisibility::Hide);
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let mut config = Config::default_with_base(Path::new("/test"));

        config.apply_cli_settings(&CliSettings::default());

        assert_eq!(config.paths.source_dir, PathBuf::from("/test/docs"));
        assert_eq!(config.features.table_of_contents, TocVisibility::Show);
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wiki.toml");
        std::fs::write(&path, "title = \"Notes\"\n[docs]\nsource_dir = \"notes\"\n").unwrap();
        let overrides = CliSettings {
            output_file: Some(PathBuf::from("/tmp/out.html")),
            ..Default::default()
        };

        let config = Config::load(Some(&path), Some(&overrides)).unwrap();

        assert_eq!(config.title.as_deref(), Some("Notes"));
        assert_eq!(config.paths.source_dir, dir.path().join("notes"));
        assert_eq!(config.paths.output_file, PathBuf::from("/tmp/out.html"));
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let err = Config::load(Some(Path::new("/nonexistent/atomwiki.toml")), None).unwrap_err();

        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_invalid_file_fails_validation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("atomwiki.toml");
        std::fs::write(&path, "[tables]\nmin_rows = 0\n").unwrap();

        let err = Config::load(Some(&path), None).unwrap_err();

        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_discover_from_parent() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&config_path, "").unwrap();
        let nested = dir.path().join("a/b");
        std::fs::create_dir_all(&nested).unwrap();

        assert_eq!(Config::discover_from(&nested), Some(config_path));
    }
}
