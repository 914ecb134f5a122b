//! NAPI-exposed data structures.

use napi_derive::napi;
use serde_json::Value as JsonValue;
use ssgmods_core::{PageDescriptor, StaticEntry, VirtualModuleId};

/// Parsed frontmatter document plus any parser errors.
#[napi(object)]
#[derive(Debug, Clone)]
pub struct FrontmatterResult {
    /// Structured frontmatter data represented as JSON.
    pub frontmatter: JsonValue,
    /// Any syntax or parsing errors surfaced by the extractor.
    pub errors: Vec<String>,
}

/// Options passed to the `SitePages` constructor.
#[napi(object)]
#[derive(Debug, Clone, Default)]
pub struct SiteConfig {
    /// Content root, relative to the project.
    pub content_directory: String,
    /// Glob relative to the content root (defaults to `**/*`).
    pub content_glob: Option<String>,
    /// Shared metadata file names, in lookup order.
    pub config_filenames: Option<Vec<String>>,
    /// Renderer used when no metadata names one.
    pub default_renderer: Option<String>,
    /// Renderers implemented on the JavaScript side.
    pub renderers: Option<Vec<String>>,
    /// Built-in mod selection (see `ModsConfig`); out-of-box defaults when
    /// omitted.
    pub mods: Option<JsonValue>,
}

/// A discovered page.
#[napi(object)]
#[derive(Debug, Clone)]
pub struct PageInfo {
    /// Key the module was retrieved under.
    pub source: String,
    /// Path relative to the content root.
    pub content_path: String,
    /// URL path without a leading `/`.
    pub slug: String,
    /// Renderer name.
    pub renderer: String,
    /// Whether a data loader is attached.
    pub has_data: bool,
    /// Metadata with functions shown as placeholders.
    pub metadata: JsonValue,
}

impl From<&PageDescriptor> for PageInfo {
    fn from(page: &PageDescriptor) -> Self {
        Self {
            source: page.source.clone(),
            content_path: page.content_path.clone(),
            slug: page.slug.clone(),
            renderer: page.renderer.clone(),
            has_data: page.data_getter.is_some(),
            metadata: page.metadata.as_json(true),
        }
    }
}

/// One static build input.
#[napi(object)]
#[derive(Debug, Clone)]
pub struct StaticInput {
    /// Output html file.
    pub filename: String,
    /// Module the bundler builds the page from.
    pub entry_point: String,
}

impl From<StaticEntry> for StaticInput {
    fn from(entry: StaticEntry) -> Self {
        Self {
            filename: entry.filename,
            entry_point: entry.entry_point,
        }
    }
}

/// A decoded virtual module id.
#[napi(object)]
#[derive(Debug, Clone)]
pub struct VirtualModuleInfo {
    /// Renderer that generated the id.
    pub renderer: String,
    /// Properties the renderer attached.
    pub props: JsonValue,
}

impl From<VirtualModuleId> for VirtualModuleInfo {
    fn from(id: VirtualModuleId) -> Self {
        Self {
            renderer: id.renderer,
            props: id.props,
        }
    }
}

/// Identifiers shared with the JavaScript plugin.
#[napi(object)]
#[derive(Debug, Clone)]
pub struct PluginConstants {
    /// Plugin name.
    pub plugin_name: String,
    /// Prefix of every virtual module id.
    pub virtual_prefix: String,
    /// Virtual module exposing the content glob.
    pub virtual_content_id: String,
    /// Prefix of generated page modules.
    pub generated_page_prefix: String,
    /// Token replaced with styles in static html.
    pub style_replacement_token: String,
    /// Dev-server path of the page listing.
    pub debug_path: String,
}
