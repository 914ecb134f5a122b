//! Hierarchical metadata: per-file dictionaries merged with ancestor config
//! files and values contributed by mods at runtime.

use crate::data_api::DataLoader;
use crate::parser::ContentEntry;
use parking_lot::RwLock;
use serde_json::{Map, Value as JsonValue};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

/// Placeholder written in place of function values in the debug JSON view.
pub const FUNCTION_PLACEHOLDER: &str = "$$FUNCTION$$";

/// Source name reported for properties added by mods at runtime.
pub const MOD_SOURCE: &str = "AMod";

/// Computes a slug (or part of one) from the entry being processed.
pub type SlugFactory = Arc<dyn Fn(&ContentEntry) -> String + Send + Sync>;

/// A single metadata value.
///
/// Most values are plain JSON. Functions cannot round-trip through JSON, so
/// the two function shapes the pipeline understands get their own variants.
#[derive(Clone)]
pub enum MetaValue {
    /// Plain data.
    Json(JsonValue),
    /// A `getData` loader.
    Loader(DataLoader),
    /// A slug, `slug.path` or `slug.name` computed per entry.
    SlugFactory(SlugFactory),
}

impl MetaValue {
    /// The JSON value, if this is data.
    pub fn as_json(&self) -> Option<&JsonValue> {
        match self {
            MetaValue::Json(value) => Some(value),
            _ => None,
        }
    }

    /// The string value, if this is a JSON string.
    pub fn as_str(&self) -> Option<&str> {
        self.as_json().and_then(JsonValue::as_str)
    }

    /// True for loader and factory values.
    pub fn is_function(&self) -> bool {
        !matches!(self, MetaValue::Json(_))
    }

    /// JSON view of the value; functions become [`FUNCTION_PLACEHOLDER`] or
    /// `null`.
    pub fn to_json(&self, include_placeholders: bool) -> JsonValue {
        match self {
            MetaValue::Json(value) => value.clone(),
            _ if include_placeholders => JsonValue::String(FUNCTION_PLACEHOLDER.to_string()),
            _ => JsonValue::Null,
        }
    }
}

impl From<JsonValue> for MetaValue {
    fn from(value: JsonValue) -> Self {
        MetaValue::Json(value)
    }
}

impl From<&str> for MetaValue {
    fn from(value: &str) -> Self {
        MetaValue::Json(JsonValue::String(value.to_string()))
    }
}

impl From<String> for MetaValue {
    fn from(value: String) -> Self {
        MetaValue::Json(JsonValue::String(value))
    }
}

impl fmt::Debug for MetaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetaValue::Json(value) => write!(f, "Json({value})"),
            MetaValue::Loader(_) => f.write_str("Loader(..)"),
            MetaValue::SlugFactory(_) => f.write_str("SlugFactory(..)"),
        }
    }
}

/// Metadata dictionary read from one module, tagged with its path.
#[derive(Debug, Clone, Default)]
pub struct MetadataSource {
    /// Path of the module the values came from.
    pub path: String,
    /// The values themselves.
    pub values: BTreeMap<String, MetaValue>,
}

impl MetadataSource {
    /// Creates a source from a path and values.
    pub fn new(path: impl Into<String>, values: BTreeMap<String, MetaValue>) -> Self {
        Self {
            path: path.into(),
            values,
        }
    }
}

/// A metadata property together with where it came from.
#[derive(Debug, Clone, Copy)]
pub struct DescribedProperty<'a> {
    /// Property name.
    pub name: &'a str,
    /// Property value.
    pub value: &'a MetaValue,
    /// Path of the defining file, or [`MOD_SOURCE`].
    pub source: &'a str,
    /// 0 for runtime values, then 1 for the file itself and increasing with
    /// ancestor distance.
    pub priority: usize,
}

/// Priority-ordered view over a content file's metadata and its ancestors'.
#[derive(Debug, Clone, Default)]
pub struct CombinedMetadata {
    sources: Vec<Arc<MetadataSource>>,
    mod_properties: Option<BTreeMap<String, MetaValue>>,
}

impl CombinedMetadata {
    /// Creates a view from sources ordered closest first.
    pub fn new(sources: Vec<Arc<MetadataSource>>) -> Self {
        Self {
            sources,
            mod_properties: None,
        }
    }

    /// The file sources, closest first.
    pub fn sources(&self) -> &[Arc<MetadataSource>] {
        &self.sources
    }

    /// Adds or replaces a runtime property; runtime properties outrank every
    /// file.
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<MetaValue>) {
        self.mod_properties
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into());
    }

    /// Highest-priority value for `key`.
    pub fn get(&self, key: &str) -> Option<&MetaValue> {
        self.describe(key).map(|property| property.value)
    }

    /// Highest-priority value for `key`, if it is a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(MetaValue::as_str)
    }

    /// Highest-priority property for `key`.
    pub fn describe<'a>(&'a self, key: &str) -> Option<DescribedProperty<'a>> {
        self.describe_all(key).next()
    }

    /// Every property named `key`, runtime values first, then the file itself
    /// and its ancestors by increasing distance.
    pub fn describe_all<'a>(&'a self, key: &str) -> impl Iterator<Item = DescribedProperty<'a>> {
        let runtime = self
            .mod_properties
            .as_ref()
            .and_then(|properties| properties.get_key_value(key))
            .map(|(name, value)| DescribedProperty {
                name,
                value,
                source: MOD_SOURCE,
                priority: 0,
            });

        let files = self
            .sources
            .iter()
            .enumerate()
            .filter_map(move |(index, source)| {
                source
                    .values
                    .get_key_value(key)
                    .map(|(name, value)| DescribedProperty {
                        name,
                        value,
                        source: &source.path,
                        priority: index + 1,
                    })
            });

        runtime.into_iter().chain(files)
    }

    /// Flattened JSON view where the highest-priority value of each key wins.
    pub fn as_json(&self, include_placeholders: bool) -> JsonValue {
        let mut merged = Map::new();
        let layers = self
            .mod_properties
            .iter()
            .chain(self.sources.iter().map(|source| &source.values));

        for layer in layers {
            for (key, value) in layer {
                if !merged.contains_key(key) {
                    merged.insert(key.clone(), value.to_json(include_placeholders));
                }
            }
        }

        JsonValue::Object(merged)
    }
}

/// Parsed metadata dictionaries keyed by module path.
///
/// Directory metadata does not change during a discovery pass, so one cache
/// is meant to live as long as the plugin and be shared by every pass.
#[derive(Debug, Default)]
pub struct MetadataCache {
    entries: RwLock<HashMap<String, Arc<MetadataSource>>>,
}

impl MetadataCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached source for `path`, parsing it with `parse` on first
    /// use.
    pub fn get_or_parse(
        &self,
        path: &str,
        parse: impl FnOnce() -> MetadataSource,
    ) -> Arc<MetadataSource> {
        if let Some(cached) = self.entries.read().get(path) {
            return Arc::clone(cached);
        }

        let mut entries = self.entries.write();
        Arc::clone(
            entries
                .entry(path.to_string())
                .or_insert_with(|| Arc::new(parse())),
        )
    }

    /// Number of cached paths.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// True when nothing has been cached yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every cached entry.
    pub fn clear(&self) {
        self.entries.write().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn source(path: &str, values: JsonValue) -> Arc<MetadataSource> {
        let values = values
            .as_object()
            .map(|map| {
                map.iter()
                    .map(|(k, v)| (k.clone(), MetaValue::Json(v.clone())))
                    .collect()
            })
            .unwrap_or_default();
        Arc::new(MetadataSource::new(path, values))
    }

    fn layered() -> CombinedMetadata {
        CombinedMetadata::new(vec![
            source("content/a/b/post.md", json!({ "key": "own" })),
            source("content/a/b/_meta", json!({ "key": "b" })),
            source("content/a/_meta", json!({ "key": "a", "only_a": 1 })),
            source("content/_meta", json!({ "key": "root", "renderer": "preact" })),
        ])
    }

    #[test]
    fn describe_all_orders_closest_first() {
        let metadata = layered();
        let sources: Vec<_> = metadata
            .describe_all("key")
            .map(|p| (p.source, p.priority))
            .collect();

        assert_eq!(
            sources,
            [
                ("content/a/b/post.md", 1),
                ("content/a/b/_meta", 2),
                ("content/a/_meta", 3),
                ("content/_meta", 4),
            ]
        );
    }

    #[test]
    fn runtime_properties_come_first() {
        let mut metadata = layered();
        metadata.add("key", "runtime");

        let first = metadata.describe("key").unwrap();
        assert_eq!(first.source, MOD_SOURCE);
        assert_eq!(first.priority, 0);
        assert_eq!(first.value.as_str(), Some("runtime"));
        assert_eq!(metadata.describe_all("key").count(), 5);
    }

    #[test]
    fn get_returns_highest_priority() {
        let metadata = layered();
        assert_eq!(metadata.get_str("key"), Some("own"));
        assert_eq!(metadata.get_str("renderer"), Some("preact"));
        assert_eq!(metadata.get("only_a").and_then(MetaValue::as_json), Some(&json!(1)));
        assert!(metadata.get("missing").is_none());
    }

    #[test]
    fn as_json_replaces_functions() {
        let mut metadata = layered();
        metadata.add(
            "getData",
            MetaValue::SlugFactory(Arc::new(|_: &ContentEntry| String::new())),
        );

        let with = metadata.as_json(true);
        assert_eq!(with["getData"], FUNCTION_PLACEHOLDER);
        assert_eq!(with["key"], "own");
        assert_eq!(with["only_a"], 1);

        let without = metadata.as_json(false);
        assert_eq!(without["getData"], JsonValue::Null);
    }

    #[test]
    fn cache_parses_once() {
        let cache = MetadataCache::new();
        let mut parsed = 0;

        let first = cache.get_or_parse("content/_meta", || {
            parsed += 1;
            MetadataSource::new("content/_meta", BTreeMap::new())
        });
        let second = cache.get_or_parse("content/_meta", || {
            parsed += 1;
            MetadataSource::default()
        });

        assert_eq!(parsed, 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }
}
