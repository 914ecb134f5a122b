//! Turns raw modules into content entries with resolved metadata.

use crate::data_api::{DataGetter, PageDataApi};
use crate::metadata::{CombinedMetadata, DescribedProperty, MetaValue, MetadataCache, MetadataSource};
use crate::module::{ModuleMap, RawModule};
use crate::paths::{dirname, join, normalize_path};
use crate::settings::ModSettings;
use regex::Regex;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::sync::Arc;

/// Upper bound on ancestor directories visited for one content path.
pub const MAX_ANCESTOR_DEPTH: usize = 128;

/// Markers a mod can set on an entry's slug.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlugFlag {
    /// The final segment was replaced.
    NameModified,
    /// The directory portion was replaced.
    PathModified,
    /// The slug was set verbatim and must not be rewritten further.
    Readonly,
}

/// Scratch values mods pass between pipeline stages for one entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentData {
    slug: Option<String>,
    slug_name_modified: bool,
    slug_path_modified: bool,
    readonly_slug: bool,
}

impl ContentData {
    /// Current slug, if one has been set.
    pub fn slug(&self) -> Option<&str> {
        self.slug.as_deref()
    }

    /// Sets the slug, normalizing separators and `.`/`..` segments.
    pub fn set_slug(&mut self, slug: impl AsRef<str>) {
        self.slug = Some(normalize_path(slug.as_ref()));
    }

    /// Sets a flag.
    pub fn mark(&mut self, flag: SlugFlag) {
        match flag {
            SlugFlag::NameModified => self.slug_name_modified = true,
            SlugFlag::PathModified => self.slug_path_modified = true,
            SlugFlag::Readonly => self.readonly_slug = true,
        }
    }

    /// Reads a flag.
    pub fn is_marked(&self, flag: SlugFlag) -> bool {
        match flag {
            SlugFlag::NameModified => self.slug_name_modified,
            SlugFlag::PathModified => self.slug_path_modified,
            SlugFlag::Readonly => self.readonly_slug,
        }
    }
}

/// One discovered content unit, alive for a single discovery pass.
#[derive(Debug, Clone)]
pub struct ContentEntry {
    /// True for shared metadata files; never turned into pages.
    pub is_config: bool,
    /// Key as reported by content retrieval.
    pub rooted_path: String,
    /// Path relative to the content root.
    pub content_path: String,
    /// Lazily evaluated page data.
    pub data_getter: Option<DataGetter>,
    /// Metadata of the file and its ancestors.
    pub metadata: CombinedMetadata,
    /// Values written by mods during the pipeline.
    pub content_data: ContentData,
    /// The evaluated module.
    pub module: Arc<JsonValue>,
}

impl ContentEntry {
    /// An entry with no inherited metadata.
    pub fn detached(content_path: impl Into<String>, module: JsonValue) -> Self {
        let content_path = content_path.into();
        Self {
            is_config: false,
            rooted_path: content_path.clone(),
            content_path,
            data_getter: None,
            metadata: CombinedMetadata::default(),
            content_data: ContentData::default(),
            module: Arc::new(module),
        }
    }

    /// Replaces the metadata view.
    pub fn with_metadata(mut self, metadata: CombinedMetadata) -> Self {
        self.metadata = metadata;
        self
    }
}

/// Reads metadata out of raw modules and walks ancestor directories for
/// shared config files.
pub struct ModuleParser<'a> {
    settings: &'a ModSettings,
    cache: &'a MetadataCache,
    api: Arc<dyn PageDataApi>,
    modules: ModuleMap,
    by_path: HashMap<String, String>,
    config_match: Option<Regex>,
}

impl<'a> ModuleParser<'a> {
    /// Creates a parser over one retrieval result.
    pub fn new(
        settings: &'a ModSettings,
        cache: &'a MetadataCache,
        api: Arc<dyn PageDataApi>,
        modules: ModuleMap,
    ) -> Self {
        let by_path = modules
            .keys()
            .map(|key| (normalize_path(key), key.clone()))
            .collect();

        Self {
            config_match: config_matcher(settings.config_filenames()),
            settings,
            cache,
            api,
            modules,
            by_path,
        }
    }

    /// Raw keys in discovery order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.modules.keys().map(String::as_str)
    }

    /// Every entry, in discovery order.
    pub fn entries(&self) -> impl Iterator<Item = ContentEntry> + '_ {
        self.modules.keys().filter_map(|key| self.entry(key))
    }

    /// Builds the entry for a raw key.
    pub fn entry(&self, key: &str) -> Option<ContentEntry> {
        let module = self.modules.get(key)?;
        let normalized = normalize_path(key);
        let content_path = normalized
            .strip_prefix(self.settings.content_path())
            .unwrap_or(&normalized)
            .to_string();

        let metadata = self.combined_metadata_for(&content_path);
        let data_getter = self.data_getter(key, &metadata, module);

        Some(ContentEntry {
            is_config: self.is_config(key),
            rooted_path: key.to_string(),
            content_path,
            data_getter,
            metadata,
            content_data: ContentData::default(),
            module: module.payload_arc(),
        })
    }

    /// True when `key` names a shared metadata file.
    pub fn is_config(&self, key: &str) -> bool {
        self.config_match
            .as_ref()
            .is_some_and(|matcher| matcher.is_match(key))
    }

    /// Metadata for a content path and each ancestor's config files, closest
    /// first.
    pub fn combined_metadata_for(&self, content_path: &str) -> CombinedMetadata {
        let content_root = self.settings.content_path();
        let mut sources = vec![self.module_metadata(&join([content_root, content_path]))];

        let mut dir = content_path.to_string();
        let mut times = 0;

        while !dir.is_empty() && dir != "." && times < MAX_ANCESTOR_DEPTH {
            let parent = dirname(&dir);
            if parent == dir {
                break;
            }
            dir = parent;
            times += 1;

            for filename in self.settings.config_filenames() {
                let config_path = join([content_root, dir.as_str(), filename.as_str()]);
                if self.by_path.contains_key(&config_path) {
                    sources.push(self.module_metadata(&config_path));
                }
            }
        }

        CombinedMetadata::new(sources)
    }

    fn module_metadata(&self, path: &str) -> Arc<MetadataSource> {
        self.cache.get_or_parse(path, || {
            let values = self
                .by_path
                .get(path)
                .and_then(|key| self.modules.get(key))
                .map(RawModule::meta_entries)
                .unwrap_or_default();
            MetadataSource::new(path, values)
        })
    }

    fn data_getter(
        &self,
        key: &str,
        metadata: &CombinedMetadata,
        module: &RawModule,
    ) -> Option<DataGetter> {
        let (source, loader) = match metadata.describe("getData") {
            Some(DescribedProperty {
                value: MetaValue::Loader(loader),
                source,
                ..
            }) => (source, loader),
            _ => (key, module.data_loader()?),
        };
        Some(DataGetter::new(source, Arc::clone(loader), Arc::clone(&self.api)))
    }
}

fn config_matcher(filenames: &[String]) -> Option<Regex> {
    if filenames.is_empty() {
        return None;
    }

    let alternatives = filenames
        .iter()
        .map(|name| regex::escape(name))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!("(?:^|/)(?:{alternatives})")).ok()
}
