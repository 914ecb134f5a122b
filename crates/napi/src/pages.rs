//! The stateful page discovery handle.

use crate::renderer::JsRenderersMod;
use crate::types::*;
use crate::utils::{convert_error, modules_from_json};
use napi::{Error, Status};
use napi_derive::napi;
use serde_json::Value as JsonValue;
use ssgmods_core::{
    ContentProvider, MetadataCache, ModLoader, ModSettings, ModuleMap,
    PassthroughHost, SiteEntry, SiteError, SiteOptions,
};
use ssgmods_mods::ModsConfig;
use std::sync::Arc;

impl SiteConfig {
    fn split(self) -> napi::Result<(SiteOptions, ModsConfig, Vec<String>)> {
        let mut options = SiteOptions::for_directory(self.content_directory);
        if let Some(glob) = self.content_glob {
            options.content.glob = glob;
        }
        options.config_filenames = self.config_filenames.unwrap_or_default();
        options.default_renderer = self.default_renderer;

        let mods = match self.mods {
            Some(value) => serde_json::from_value(value).map_err(|err| {
                Error::new(Status::InvalidArg, format!("Invalid mods configuration: {err}"))
            })?,
            None => ModsConfig::default(),
        };

        let mut renderers = self.renderers.unwrap_or_default();
        if let Some(default) = &options.default_renderer
            && !renderers.contains(default)
        {
            renderers.push(default.clone());
        }

        Ok((options, mods, renderers))
    }
}

/// Page discovery bound to one set of options and mods.
///
/// Parsed directory metadata is cached across calls; call
/// `clearMetadataCache` after a shared meta file changes.
#[napi]
pub struct SitePages {
    settings: Arc<ModSettings>,
    loader: Arc<ModLoader>,
    cache: Arc<MetadataCache>,
}

#[napi]
impl SitePages {
    #[napi(constructor)]
    /// Builds the mod loader from the configuration.
    pub fn new(config: SiteConfig) -> napi::Result<Self> {
        let (options, mods, renderers) = config.split()?;

        let mut installed = mods.build();
        installed.push(Arc::new(JsRenderersMod::new(renderers)));

        Ok(Self {
            settings: Arc::new(ModSettings::new(options)),
            loader: Arc::new(ModLoader::new(installed)),
            cache: Arc::new(MetadataCache::new()),
        })
    }

    /// Glob the host should load content with.
    #[napi(getter, js_name = "contentGlob")]
    pub fn content_glob(&self) -> String {
        self.settings.content_glob().to_string()
    }

    /// Every page among `modules` (an object keyed by path).
    #[napi]
    pub fn discover(&self, modules: JsonValue) -> napi::Result<Vec<PageInfo>> {
        let pages = self
            .provider(modules_from_json(modules)?)
            .get_all_content()
            .map_err(convert_error)?;
        Ok(pages.iter().map(PageInfo::from).collect())
    }

    /// Build inputs (`slug.html` to entry point) for every page.
    #[napi(js_name = "staticInputs")]
    pub fn static_inputs(&self, modules: JsonValue) -> napi::Result<Vec<StaticInput>> {
        let entry = SiteEntry::new(self.provider(modules_from_json(modules)?), Arc::new(PassthroughHost));
        let inputs = entry.handle_static().map_err(convert_error)?;
        Ok(inputs.into_iter().map(StaticInput::from).collect())
    }

    /// The page whose slug equals `slug`.
    #[napi(js_name = "findPage")]
    pub fn find_page(&self, modules: JsonValue, slug: String) -> napi::Result<Option<PageInfo>> {
        let page = self
            .provider(modules_from_json(modules)?)
            .get_content(&slug)
            .map_err(convert_error)?;
        Ok(page.as_ref().map(PageInfo::from))
    }

    /// JSON listing served at the debug path.
    #[napi(js_name = "debugListing")]
    pub fn debug_listing(&self, modules: JsonValue) -> napi::Result<String> {
        let entry = SiteEntry::new(self.provider(modules_from_json(modules)?), Arc::new(PassthroughHost));
        entry.debug_listing().map_err(convert_error)
    }

    /// Forget cached directory metadata.
    #[napi(js_name = "clearMetadataCache")]
    pub fn clear_metadata_cache(&self) {
        self.cache.clear();
    }
}

impl SitePages {
    fn provider(&self, modules: ModuleMap) -> ContentProvider {
        ContentProvider::new(
            Arc::clone(&self.settings),
            Arc::clone(&self.loader),
            move || Ok::<_, SiteError>(modules.clone()),
        )
        .with_cache(Arc::clone(&self.cache))
    }
}
