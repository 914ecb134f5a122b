//! Raw content modules as handed over by content retrieval.

use crate::data_api::DataLoader;
use crate::error::Result;
use crate::frontmatter::{extract_frontmatter, parse_yaml_mapping};
use crate::metadata::MetaValue;
use serde_json::{Value as JsonValue, json};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Raw path to module, in discovery order.
pub type ModuleMap = BTreeMap<String, RawModule>;

/// One evaluated content module.
///
/// The payload is whatever the module exported, as JSON. Exports that are
/// functions (a `getData` loader, slug factories) cannot live in JSON and are
/// attached alongside it.
#[derive(Clone, Default)]
pub struct RawModule {
    payload: Arc<JsonValue>,
    meta_functions: BTreeMap<String, MetaValue>,
    data_loader: Option<DataLoader>,
}

impl RawModule {
    /// Wraps an evaluated payload.
    pub fn new(payload: JsonValue) -> Self {
        Self {
            payload: Arc::new(payload),
            meta_functions: BTreeMap::new(),
            data_loader: None,
        }
    }

    /// Payload for a markdown document: `{ frontmatter, body }`.
    pub fn from_markdown(source: &str) -> Result<Self> {
        let frontmatter = extract_frontmatter(source)?;
        Ok(Self::new(json!({
            "frontmatter": frontmatter.data,
            "body": &source[frontmatter.body_start..],
        })))
    }

    /// Payload for a YAML shared-metadata file: `{ meta }`.
    pub fn from_meta_yaml(source: &str) -> Result<Self> {
        let meta = parse_yaml_mapping(source)?;
        Ok(Self::new(json!({ "meta": meta })))
    }

    /// Adds a `meta` entry that is not plain JSON, such as a loader or slug
    /// factory. Overrides a JSON entry of the same name.
    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<MetaValue>) -> Self {
        self.meta_functions.insert(key.into(), value.into());
        self
    }

    /// Attaches a module-level data loader.
    pub fn with_data_loader(mut self, loader: DataLoader) -> Self {
        self.data_loader = Some(loader);
        self
    }

    /// The evaluated payload.
    pub fn payload(&self) -> &JsonValue {
        &self.payload
    }

    /// Shared handle to the payload.
    pub fn payload_arc(&self) -> Arc<JsonValue> {
        Arc::clone(&self.payload)
    }

    /// Module-level data loader, if any.
    pub fn data_loader(&self) -> Option<&DataLoader> {
        self.data_loader.as_ref()
    }

    /// The module's own metadata: the `meta` object of the payload (empty when
    /// absent or not an object) plus any attached function entries.
    pub fn meta_entries(&self) -> BTreeMap<String, MetaValue> {
        let mut entries: BTreeMap<String, MetaValue> = match self.payload.get("meta") {
            Some(JsonValue::Object(meta)) => meta
                .iter()
                .map(|(key, value)| (key.clone(), MetaValue::Json(value.clone())))
                .collect(),
            _ => BTreeMap::new(),
        };

        for (key, value) in &self.meta_functions {
            entries.insert(key.clone(), value.clone());
        }
        entries
    }
}

impl From<JsonValue> for RawModule {
    fn from(payload: JsonValue) -> Self {
        Self::new(payload)
    }
}

impl fmt::Debug for RawModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawModule")
            .field("payload", &self.payload)
            .field("meta_functions", &self.meta_functions.keys())
            .field("data_loader", &self.data_loader.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_api::data_loader;

    #[test]
    fn meta_object_becomes_entries() {
        let module = RawModule::new(json!({ "meta": { "title": "Hi", "renderer": "preact" } }));
        let entries = module.meta_entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries["title"].as_str(), Some("Hi"));
    }

    #[test]
    fn malformed_meta_is_empty() {
        assert!(RawModule::new(json!({ "meta": "nope" })).meta_entries().is_empty());
        assert!(RawModule::new(json!(null)).meta_entries().is_empty());
        assert!(RawModule::new(json!({ "default": {} })).meta_entries().is_empty());
    }

    #[test]
    fn function_entries_override_json() {
        let module = RawModule::new(json!({ "meta": { "getData": "not a function" } })).with_meta(
            "getData",
            MetaValue::Loader(data_loader(|_| async { Ok::<_, crate::error::SiteError>(json!({})) })),
        );
        assert!(module.meta_entries()["getData"].is_function());
    }

    #[test]
    fn markdown_payload() {
        let module = RawModule::from_markdown("---\ntitle: T\nslug: s\n---\nHello").unwrap();
        assert_eq!(module.payload()["frontmatter"]["title"], "T");
        assert_eq!(module.payload()["frontmatter"]["slug"], "s");
        assert_eq!(module.payload()["body"], "Hello");
    }

    #[test]
    fn meta_yaml_payload() {
        let module = RawModule::from_meta_yaml("renderer: preact\nlayout: post\n").unwrap();
        assert_eq!(module.meta_entries()["renderer"].as_str(), Some("preact"));
    }
}
