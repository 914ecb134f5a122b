#![deny(missing_docs)]
//! Node.js bindings that surface ssgmods page discovery.

use napi_derive::napi;
use serde_json::Value as JsonValue;
use ssgmods_core::constants;
use ssgmods_core::extract_frontmatter;

/// The page discovery class.
pub mod pages;
/// Renderers backed by JavaScript.
mod renderer;
/// NAPI-exposed data structures.
pub mod types;
/// Conversion helpers.
mod utils;

pub use pages::SitePages;
pub use types::*;
use utils::{convert_error, empty_frontmatter};

/// Extracts YAML frontmatter without evaluating the rest of the document.
#[napi]
pub fn parse_frontmatter(content: String) -> napi::Result<FrontmatterResult> {
    match extract_frontmatter(&content) {
        Ok(result) => Ok(FrontmatterResult {
            frontmatter: result.data,
            errors: Vec::new(),
        }),
        Err(err) => Ok(FrontmatterResult {
            frontmatter: empty_frontmatter(),
            errors: vec![err.to_string()],
        }),
    }
}

/// Encodes JSON as unpadded base64url for use in a query string.
#[napi(js_name = "encodeJsonForUrl")]
pub fn encode_json_for_url(value: JsonValue) -> String {
    ssgmods_core::encode_json_for_url(&value)
}

/// Decodes a value produced by `encodeJsonForUrl`; `""` decodes to `{}`.
#[napi(js_name = "decodeJsonForUrl")]
pub fn decode_json_for_url(value: String) -> napi::Result<JsonValue> {
    ssgmods_core::decode_json_for_url(&value).map_err(convert_error)
}

/// Splits a generated virtual module id into renderer name and props.
#[napi(js_name = "parseVirtualModuleId")]
pub fn parse_virtual_module_id(id: String) -> napi::Result<VirtualModuleInfo> {
    ssgmods_core::parse_virtual_id(&id)
        .map(VirtualModuleInfo::from)
        .map_err(convert_error)
}

/// Builds the virtual module id a renderer uses for `props`.
#[napi(js_name = "generateVirtualImport")]
pub fn generate_virtual_import(renderer: String, props: JsonValue) -> String {
    ssgmods_core::generate_virtual_id(&renderer, &props)
}

/// Identifiers shared with the JavaScript plugin.
#[napi(js_name = "pluginConstants")]
pub fn plugin_constants() -> PluginConstants {
    PluginConstants {
        plugin_name: constants::PLUGIN_NAME.to_string(),
        virtual_prefix: constants::VIRTUAL_PREFIX.to_string(),
        virtual_content_id: constants::VIRTUAL_CONTENT_ID.to_string(),
        generated_page_prefix: constants::GENERATED_PAGE_PREFIX.to_string(),
        style_replacement_token: constants::STYLE_REPLACEMENT_TOKEN.to_string(),
        debug_path: constants::DEBUG_PATH.to_string(),
    }
}
