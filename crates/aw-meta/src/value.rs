//! Normalized frontmatter values.

use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};
use serde_yaml::Value;

/// A frontmatter value, normalized once from YAML.
///
/// Numbers and booleans become [`MetaValue::Scalar`] strings, `null` becomes an
/// empty scalar and YAML tags are unwrapped to their inner value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum MetaValue {
    Scalar(String),
    Sequence(Vec<MetaValue>),
    Mapping(Frontmatter),
}

impl MetaValue {
    pub(crate) fn from_yaml(value: Value) -> Self {
        match value {
            Value::Null => Self::Scalar(String::new()),
            Value::Bool(b) => Self::Scalar(b.to_string()),
            Value::Number(n) => Self::Scalar(n.to_string()),
            Value::String(s) => Self::Scalar(s),
            Value::Sequence(items) => {
                Self::Sequence(items.into_iter().map(Self::from_yaml).collect())
            }
            Value::Mapping(mapping) => Self::Mapping(Frontmatter::from_mapping(mapping)),
            Value::Tagged(tagged) => Self::from_yaml(tagged.value),
        }
    }

    /// Scalar text, if this is a scalar.
    #[must_use]
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Self::Scalar(s) => Some(s),
            _ => None,
        }
    }
}

/// Ordered string-keyed frontmatter mapping.
///
/// Keys keep the order they were written in. Non-string YAML keys are
/// converted to their scalar text; keys that are themselves collections are
/// dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frontmatter {
    entries: Vec<(String, MetaValue)>,
}

impl Frontmatter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_mapping(mapping: serde_yaml::Mapping) -> Self {
        let entries = mapping
            .into_iter()
            .filter_map(|(key, value)| {
                let key = match MetaValue::from_yaml(key) {
                    MetaValue::Scalar(s) => s,
                    _ => return None,
                };
                Some((key, MetaValue::from_yaml(value)))
            })
            .collect();
        Self { entries }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&MetaValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetaValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Non-empty `title` scalar, trimmed.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.scalar_field("title")
    }

    /// Non-empty `author` scalar, trimmed.
    #[must_use]
    pub fn author(&self) -> Option<&str> {
        self.scalar_field("author")
    }

    /// Normalized `tags` (see [`normalize_tags`]).
    #[must_use]
    pub fn tags(&self) -> Vec<String> {
        self.get("tags").map(normalize_tags).unwrap_or_default()
    }

    fn scalar_field(&self, key: &str) -> Option<&str> {
        self.get(key)
            .and_then(MetaValue::as_scalar)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

impl Serialize for Frontmatter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Normalize a `tags` value into an ordered list of unique tags.
///
/// A scalar is split on commas; a sequence contributes each scalar item as
/// written. Values are trimmed, empty values dropped and duplicates removed
/// keeping the first occurrence.
#[must_use]
pub fn normalize_tags(value: &MetaValue) -> Vec<String> {
    let raw: Vec<&str> = match value {
        MetaValue::Scalar(s) => s.split(',').collect(),
        MetaValue::Sequence(items) => items.iter().filter_map(MetaValue::as_scalar).collect(),
        MetaValue::Mapping(_) => Vec::new(),
    };

    let mut tags: Vec<String> = Vec::with_capacity(raw.len());
    for tag in raw.into_iter().map(str::trim).filter(|t| !t.is_empty()) {
        if !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_owned());
        }
    }
    tags
}
