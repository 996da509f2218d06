//! Theme CSS variables and client theme configuration.
//!
//! Themes are plain maps of variable name to CSS value. A theme named
//! `light` or `dark` belongs to the `default` family; `<family>_light` and
//! `<family>_dark` form any other family.

use std::collections::BTreeMap;
use std::fmt::Write;

use serde::Serialize;

/// CSS variable name to value.
pub type Palette = BTreeMap<String, String>;

/// Initial color mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    Dark,
    /// Follow the browser's `prefers-color-scheme`.
    #[default]
    System,
}

/// Theme selection and palettes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ThemeSettings {
    /// Family selected on first visit.
    pub default_family: String,
    /// Mode selected on first visit.
    pub default_mode: ThemeMode,
    /// Palettes by theme name.
    pub themes: BTreeMap<String, Palette>,
}

impl Default for ThemeSettings {
    fn default() -> Self {
        Self {
            default_family: DEFAULT_FAMILY.to_owned(),
            default_mode: ThemeMode::default(),
            themes: BTreeMap::new(),
        }
    }
}

const DEFAULT_FAMILY: &str = "default";

/// Theme data handed to the client script.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeConfig<'a> {
    pub default_family: &'a str,
    pub default_mode: ThemeMode,
    pub families: BTreeMap<String, String>,
}

impl ThemeSettings {
    /// CSS custom properties for every configured theme.
    ///
    /// The first light theme also fills `:root`, so the page renders with
    /// it before the client script picks a theme. Underscores in variable
    /// names become dashes (`bg_primary` is `--bg-primary`).
    #[must_use]
    pub fn css_variables(&self) -> String {
        let mut css = String::new();
        if let Some((_, palette)) = self.themes.iter().find(|(name, _)| is_light(name)) {
            write_block(&mut css, ":root", palette);
        }
        for (name, palette) in &self.themes {
            write_block(&mut css, &format!("body.theme-{name}"), palette);
        }
        css
    }

    /// Theme families by key, with display names.
    #[must_use]
    pub fn families(&self) -> BTreeMap<String, String> {
        let mut families = BTreeMap::new();
        for name in self.themes.keys() {
            if name == "light" || name == "dark" {
                families.insert(DEFAULT_FAMILY.to_owned(), "Default".to_owned());
            } else if let Some(family) = name
                .strip_suffix("_light")
                .or_else(|| name.strip_suffix("_dark"))
                .filter(|f| !f.is_empty())
            {
                families
                    .entry(family.to_owned())
                    .or_insert_with(|| title_case(family));
            }
        }
        families
    }

    #[must_use]
    pub fn client_config(&self) -> ThemeConfig<'_> {
        ThemeConfig {
            default_family: &self.default_family,
            default_mode: self.default_mode,
            families: self.families(),
        }
    }
}

fn is_light(name: &str) -> bool {
    name == "light" || name.ends_with("_light")
}

fn write_block(css: &mut String, selector: &str, palette: &Palette) {
    let _ = writeln!(css, "{selector} {{");
    for (var, value) in palette {
        let _ = writeln!(css, "  --{}: {value};", var.replace('_', "-"));
    }
    css.push_str("}\n");
}

/// `rose_pine` becomes `Rose Pine`.
fn title_case(s: &str) -> String {
    s.split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}
