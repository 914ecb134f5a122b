//! The content pipeline: raw modules in, page descriptors out.

use crate::data_api::{CachingPageDataApi, DataGetter, NoNetwork, PageDataApi};
use crate::error::{Result, SiteError};
use crate::loader::{ContentType, ModLoader};
use crate::metadata::{CombinedMetadata, MetadataCache};
use crate::module::ModuleMap;
use crate::parser::{ContentEntry, ModuleParser};
use crate::paths;
use crate::settings::ModSettings;
use log::debug;
use serde_json::{Value as JsonValue, json};
use std::sync::Arc;

/// Supplies the raw modules for one discovery pass.
pub trait ContentRetriever: Send + Sync {
    /// Every content module, keyed by path.
    fn retrieve(&self) -> Result<ModuleMap>;
}

impl<F> ContentRetriever for F
where
    F: Fn() -> Result<ModuleMap> + Send + Sync,
{
    fn retrieve(&self) -> Result<ModuleMap> {
        self()
    }
}

/// A finished page.
#[derive(Debug, Clone)]
pub struct PageDescriptor {
    /// Key the module was retrieved under.
    pub source: String,
    /// Path relative to the content root.
    pub content_path: String,
    /// URL path of the page, without a leading `/`.
    pub slug: String,
    /// Name of the renderer that draws the page.
    pub renderer: String,
    /// Lazily evaluated page data.
    pub data_getter: Option<DataGetter>,
    /// Metadata as left by the pipeline.
    pub metadata: CombinedMetadata,
    /// The evaluated module.
    pub module: Arc<JsonValue>,
}

impl PageDescriptor {
    /// Debug view; metadata functions show as placeholders.
    pub fn to_json(&self) -> JsonValue {
        json!({
            "hasData": self.data_getter.is_some(),
            "metadata": self.metadata.as_json(true),
            "module": self.module.as_ref(),
            "renderer": self.renderer,
            "slug": self.slug,
            "source": self.source,
        })
    }

    #[cfg(test)]
    pub(crate) fn for_tests(slug: &str, renderer: &str) -> Self {
        Self {
            source: format!("{slug}.md"),
            content_path: format!("{slug}.md"),
            slug: slug.to_string(),
            renderer: renderer.to_string(),
            data_getter: None,
            metadata: CombinedMetadata::default(),
            module: Arc::new(JsonValue::Null),
        }
    }
}

/// Runs every retrieved module through the mod hooks.
///
/// The metadata cache and data API are shared by every pass, so a provider
/// is meant to live as long as the plugin.
pub struct ContentProvider {
    settings: Arc<ModSettings>,
    loader: Arc<ModLoader>,
    cache: Arc<MetadataCache>,
    api: Arc<dyn PageDataApi>,
    retriever: Box<dyn ContentRetriever>,
}

impl ContentProvider {
    /// Creates a provider with a fresh cache and a data API without network
    /// access.
    pub fn new(
        settings: impl Into<Arc<ModSettings>>,
        loader: impl Into<Arc<ModLoader>>,
        retriever: impl ContentRetriever + 'static,
    ) -> Self {
        Self {
            settings: settings.into(),
            loader: loader.into(),
            cache: Arc::new(MetadataCache::new()),
            api: Arc::new(CachingPageDataApi::new(Arc::new(NoNetwork))),
            retriever: Box::new(retriever),
        }
    }

    /// Share a metadata cache with other providers.
    pub fn with_cache(mut self, cache: Arc<MetadataCache>) -> Self {
        self.cache = cache;
        self
    }

    /// Data API handed to page data loaders.
    pub fn with_data_api(mut self, api: Arc<dyn PageDataApi>) -> Self {
        self.api = api;
        self
    }

    /// Settings in use.
    pub fn settings(&self) -> &ModSettings {
        &self.settings
    }

    /// Mod loader in use.
    pub fn loader(&self) -> &ModLoader {
        &self.loader
    }

    /// Metadata cache in use.
    pub fn cache(&self) -> &MetadataCache {
        &self.cache
    }

    /// Start a discovery pass.
    ///
    /// Retrieval happens now; every other stage runs as the returned iterator
    /// is advanced, one entry at a time.
    pub fn pages(&self) -> Result<Pages<'_>> {
        let modules = self.retriever.retrieve()?;
        let keys = modules.keys().cloned().collect::<Vec<_>>();
        let parser = ModuleParser::new(&self.settings, &self.cache, Arc::clone(&self.api), modules);

        Ok(Pages {
            provider: self,
            parser,
            keys: keys.into_iter(),
        })
    }

    /// Every page of one discovery pass.
    pub fn get_all_content(&self) -> Result<Vec<PageDescriptor>> {
        self.pages()?.collect()
    }

    /// The page whose slug equals `slug`, if any.
    pub fn get_content(&self, slug: &str) -> Result<Option<PageDescriptor>> {
        for page in self.pages()? {
            let page = page?;
            if page.slug == slug {
                return Ok(Some(page));
            }
        }
        Ok(None)
    }

    fn process(&self, mut entry: ContentEntry) -> Result<Option<PageDescriptor>> {
        if entry.is_config {
            debug!("Skipping config file {}", entry.rooted_path);
            return Ok(None);
        }

        let loader = &self.loader;
        let Some(content_type) = loader.determine_content_type.first_some(|hook| hook(&entry)) else {
            debug!("No mod claimed {}", entry.rooted_path);
            return Ok(None);
        };

        let default_slug = paths::parse(&entry.content_path).without_ext().format();
        entry.content_data.set_slug(default_slug);

        loader.contribute_data.invoke_all(|hook| hook(&mut entry));
        loader.preprocess.invoke_all(|hook| hook(&mut entry));
        loader.slug_normalization.invoke_all(|hook| hook(&mut entry));

        let renderer = self
            .renderer_name(&entry)
            .ok_or_else(|| SiteError::MissingRendererName {
                path: entry.content_path.clone(),
            })?;

        loader.postprocess.invoke_all(|hook| hook(&mut entry));

        let slug = match entry.content_data.slug() {
            Some(slug) if !slug.is_empty() => slug.to_string(),
            _ => {
                debug!("Dropping {} ({content_type:?}) with an empty slug", entry.rooted_path);
                return Ok(None);
            }
        };

        Ok(Some(PageDescriptor {
            source: entry.rooted_path,
            content_path: entry.content_path,
            slug,
            renderer,
            data_getter: entry.data_getter,
            metadata: entry.metadata,
            module: entry.module,
        }))
    }

    /// The closest of `$renderer` and `renderer`; `$renderer` wins when both
    /// come from the same file.
    fn renderer_name(&self, entry: &ContentEntry) -> Option<String> {
        let named = |key: &str| {
            let property = entry.metadata.describe(key)?;
            Some((property.priority, property.value.as_str()?))
        };

        let closest = match (named("$renderer"), named("renderer")) {
            (Some(forced), Some(plain)) if plain.0 < forced.0 => Some(plain.1),
            (Some(forced), _) => Some(forced.1),
            (None, plain) => plain.map(|(_, name)| name),
        };

        closest
            .filter(|name| !name.is_empty())
            .or(self.settings.default_renderer())
            .map(str::to_string)
    }
}

/// One lazy discovery pass; see [`ContentProvider::pages`].
pub struct Pages<'a> {
    provider: &'a ContentProvider,
    parser: ModuleParser<'a>,
    keys: std::vec::IntoIter<String>,
}

impl Iterator for Pages<'_> {
    type Item = Result<PageDescriptor>;

    fn next(&mut self) -> Option<Self::Item> {
        for key in self.keys.by_ref() {
            let Some(entry) = self.parser.entry(&key) else {
                continue;
            };
            match self.provider.process(entry) {
                Ok(Some(page)) => return Some(Ok(page)),
                Ok(None) => {}
                Err(err) => return Some(Err(err)),
            }
        }
        None
    }
}
