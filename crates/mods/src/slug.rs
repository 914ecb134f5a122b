//! Slugs chosen through the `slug` metadata property.
//!
//! - a string (or slug factory) replaces the whole slug
//! - `{ path }` replaces the directory: `child/name` with `parent/_` becomes
//!   `parent/_/name`
//! - `{ name }` replaces the final segment: `parent/child/name` with `test`
//!   becomes `parent/child/test`
//!
//! Every `slug` property in the metadata chain is applied, highest priority
//! first, each one seeing the slug left by the previous one.

use ssgmods_core::hooks::Priority;
use ssgmods_core::loader::{Mod, ModLoader};
use ssgmods_core::metadata::{MetaValue, SlugFactory};
use ssgmods_core::parser::{ContentEntry, SlugFlag};
use ssgmods_core::paths;

/// Applies `slug` metadata in the postprocess stage.
#[derive(Debug, Default, Clone, Copy)]
pub struct CustomizedSlugMod;

impl Mod for CustomizedSlugMod {
    fn name(&self) -> &str {
        "default.slug-specifier"
    }

    fn initialize(&self, loader: &mut ModLoader) {
        loader.on_postprocess(Priority::POST, apply_slug_metadata);
    }
}

#[derive(Clone)]
enum SlugPart {
    Text(String),
    Factory(SlugFactory),
}

impl SlugPart {
    fn resolve(&self, entry: &ContentEntry) -> String {
        match self {
            SlugPart::Text(text) => text.clone(),
            SlugPart::Factory(factory) => factory(entry),
        }
    }
}

enum SlugUpdate {
    Replace(SlugPart),
    Parts {
        path: Option<SlugPart>,
        name: Option<SlugPart>,
    },
}

impl SlugUpdate {
    fn from_value(value: &MetaValue) -> Option<Self> {
        match value {
            MetaValue::SlugFactory(factory) => {
                Some(SlugUpdate::Replace(SlugPart::Factory(factory.clone())))
            }
            MetaValue::Json(serde_json::Value::String(text)) => {
                Some(SlugUpdate::Replace(SlugPart::Text(text.clone())))
            }
            MetaValue::Json(serde_json::Value::Object(object)) => {
                let part = |key: &str| {
                    object
                        .get(key)
                        .and_then(|value| value.as_str())
                        .map(|text| SlugPart::Text(text.to_string()))
                };
                let (path, name) = (part("path"), part("name"));
                (path.is_some() || name.is_some()).then_some(SlugUpdate::Parts { path, name })
            }
            _ => None,
        }
    }
}

/// Apply every `slug` metadata property to the entry's slug.
pub fn apply_slug_metadata(entry: &mut ContentEntry) {
    let updates: Vec<SlugUpdate> = entry
        .metadata
        .describe_all("slug")
        .filter_map(|property| SlugUpdate::from_value(property.value))
        .collect();

    for update in updates {
        match update {
            SlugUpdate::Replace(part) => {
                let slug = part.resolve(entry);
                let data = &mut entry.content_data;
                data.set_slug(slug);
                data.mark(SlugFlag::NameModified);
                data.mark(SlugFlag::PathModified);
            }
            SlugUpdate::Parts { path, name } => {
                if let Some(path) = path {
                    let dir = path.resolve(entry);
                    let slug = current(entry).with_dir(dir).format();
                    entry.content_data.set_slug(slug);
                    entry.content_data.mark(SlugFlag::PathModified);
                }
                if let Some(name) = name {
                    let name = name.resolve(entry);
                    let slug = current(entry).with_name(name).format();
                    entry.content_data.set_slug(slug);
                    entry.content_data.mark(SlugFlag::NameModified);
                }
            }
        }
    }
}

fn current(entry: &ContentEntry) -> paths::ParsedPath {
    paths::parse(entry.content_data.slug().unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use ssgmods_core::metadata::{CombinedMetadata, MetadataSource};
    use std::collections::BTreeMap;
    use std::sync::Arc;

    fn source(path: &str, slug: serde_json::Value) -> Arc<MetadataSource> {
        let values = BTreeMap::from([("slug".to_string(), MetaValue::from(slug))]);
        Arc::new(MetadataSource::new(path, values))
    }

    fn slugged(slug: &str, sources: Vec<Arc<MetadataSource>>) -> ContentEntry {
        let mut entry = ContentEntry::detached("unused.md", json!({}))
            .with_metadata(CombinedMetadata::new(sources));
        entry.content_data.set_slug(slug);
        entry
    }

    #[test]
    fn string_replaces_everything() {
        let mut entry = slugged("a/b", vec![source("a/b.md", json!("x/y"))]);
        apply_slug_metadata(&mut entry);
        assert_eq!(entry.content_data.slug(), Some("x/y"));
        assert!(entry.content_data.is_marked(SlugFlag::NameModified));
        assert!(entry.content_data.is_marked(SlugFlag::PathModified));
    }

    #[test]
    fn path_and_name_replace_their_part() {
        let mut entry_path = slugged("child/name", vec![source("m", json!({ "path": "parent/_" }))]);
        apply_slug_metadata(&mut entry_path);
        assert_eq!(entry_path.content_data.slug(), Some("parent/_/name"));
        assert!(entry_path.content_data.is_marked(SlugFlag::PathModified));
        assert!(!entry_path.content_data.is_marked(SlugFlag::NameModified));

        let mut entry_name = slugged("parent/child/name", vec![source("m", json!({ "name": "test" }))]);
        apply_slug_metadata(&mut entry_name);
        assert_eq!(entry_name.content_data.slug(), Some("parent/child/test"));
        assert!(entry_name.content_data.is_marked(SlugFlag::NameModified));
        assert!(!entry_name.content_data.is_marked(SlugFlag::PathModified));
    }

    #[test]
    fn path_then_name_when_both_given() {
        let mut entry = slugged("a/b", vec![source("m", json!({ "path": "x", "name": "y" }))]);
        apply_slug_metadata(&mut entry);
        assert_eq!(entry.content_data.slug(), Some("x/y"));
    }

    #[test]
    fn applies_in_priority_order() {
        // closest file first: the directory override then sees the renamed slug
        let mut entry = slugged(
            "a/b",
            vec![
                source("a/b.md", json!({ "name": "renamed" })),
                source("a/_meta", json!({ "path": "moved" })),
            ],
        );
        apply_slug_metadata(&mut entry);
        assert_eq!(entry.content_data.slug(), Some("moved/renamed"));

        // runtime values outrank every file
        let mut entry = slugged("a/b", vec![source("a/b.md", json!({ "name": "renamed" }))]);
        entry.metadata.add("slug", json!({ "path": "runtime" }));
        apply_slug_metadata(&mut entry);
        assert_eq!(entry.content_data.slug(), Some("runtime/renamed"));
    }

    #[test]
    fn factories_see_the_entry() {
        let factory: SlugFactory = Arc::new(|entry: &ContentEntry| {
            format!("generated/{}", entry.content_data.slug().unwrap_or_default())
        });
        let values = BTreeMap::from([("slug".to_string(), MetaValue::SlugFactory(factory))]);
        let mut entry = slugged("a/b", vec![Arc::new(MetadataSource::new("m", values))]);
        apply_slug_metadata(&mut entry);
        assert_eq!(entry.content_data.slug(), Some("generated/a/b"));
    }

    #[test]
    fn ignores_unusable_values() {
        let mut entry = slugged(
            "a/b",
            vec![source("m", json!(42)), source("n", json!({ "other": "x" }))],
        );
        apply_slug_metadata(&mut entry);
        assert_eq!(entry.content_data.slug(), Some("a/b"));
        assert!(!entry.content_data.is_marked(SlugFlag::NameModified));
    }
}
