#![deny(missing_docs)]
//! ssgmods core: hook registry, metadata resolution, mod loading and the
//! content pipeline of a static site generator plugin.

/// Plugin-wide identifiers.
pub mod constants;
/// Page data loaders and the caching fetch layer behind them.
pub mod data_api;
/// URL-safe JSON encoding.
pub mod encoding;
/// Host entry points.
pub mod entry;
/// Core error types.
pub mod error;
/// YAML frontmatter extraction helpers.
pub mod frontmatter;
/// Priority-ordered hook lists.
pub mod hooks;
/// Mod contract and loader.
pub mod loader;
/// Hierarchical metadata.
pub mod metadata;
/// Raw content modules.
pub mod module;
/// Content entries and the metadata resolver.
pub mod parser;
/// Posix path helpers.
pub mod paths;
/// The content pipeline.
pub mod provider;
/// Renderer contract.
pub mod renderer;
/// Plugin options.
pub mod settings;
/// Virtual module ids.
pub mod virtual_id;

pub use data_api::{
    BoxFuture, CachingPageDataApi, DataGetter, DataLoader, JsonFetcher, NoNetwork, PageDataApi,
    data_loader, fetch_typed,
};
#[cfg(feature = "http")]
pub use data_api::ReqwestFetcher;
pub use encoding::{decode_json_for_url, encode_json_for_url};
pub use entry::{DynamicResponse, SiteEntry, StaticEntry};
pub use error::{Result, SiteError};
pub use frontmatter::{Frontmatter, FrontmatterError, extract_frontmatter};
pub use hooks::{CallbackList, Priority};
pub use loader::{ContentType, ContentTypeHook, EntryHook, Mod, ModLoader};
pub use metadata::{
    CombinedMetadata, DescribedProperty, MetaValue, MetadataCache, MetadataSource, SlugFactory,
};
pub use module::{ModuleMap, RawModule};
pub use parser::{ContentData, ContentEntry, ModuleParser, SlugFlag};
pub use provider::{ContentProvider, ContentRetriever, PageDescriptor, Pages};
pub use renderer::{HostBridge, PageRenderResult, PassthroughHost, Renderer, RendererUtils};
pub use settings::{ContentOptions, ModSettings, SiteOptions};
pub use virtual_id::{VirtualModuleId, generate_virtual_id, parse_virtual_id};
