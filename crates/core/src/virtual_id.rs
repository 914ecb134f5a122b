//! Identifiers for modules that renderers generate on demand.
//!
//! An id looks like `virtual:vite-plugin-ssg-pages:generated-page?renderer=preact&props=e30`
//! where `props` is a JSON object encoded with [`encode_json_for_url`].

use crate::constants::GENERATED_PAGE_PREFIX;
use crate::encoding::{decode_json_for_url, encode_json_for_url};
use crate::error::{Result, SiteError};
use serde_json::Value as JsonValue;

/// A decoded virtual module id.
#[derive(Debug, Clone, PartialEq)]
pub struct VirtualModuleId {
    /// Renderer that generated the id.
    pub renderer: String,
    /// Properties the renderer attached.
    pub props: JsonValue,
}

/// Query string carrying a renderer name and its encoded props, with the
/// leading `?`.
pub fn props_search(renderer: &str, props: &JsonValue) -> String {
    format!(
        "?renderer={}&props={}",
        urlencoding::encode(renderer),
        encode_json_for_url(props)
    )
}

/// Id of the generated page for `renderer` and `props`.
pub fn generate_virtual_id(renderer: &str, props: &JsonValue) -> String {
    format!("{GENERATED_PAGE_PREFIX}{}", props_search(renderer, props))
}

/// Decode an id as handed to a host's module loader.
///
/// Hosts may prefix resolved ids with a NUL byte; it is ignored. A missing
/// `props` parameter decodes to an empty object.
pub fn parse_virtual_id(id: &str) -> Result<VirtualModuleId> {
    let (_, query) = id
        .split_once('?')
        .ok_or_else(|| SiteError::invalid_virtual_id(id, "missing query string"))?;

    let mut renderer = None;
    let mut props = None;

    for pair in query.split('&').filter(|pair| !pair.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        let value = decode_component(value)
            .map_err(|reason| SiteError::invalid_virtual_id(id, reason))?;

        match decode_component(key).as_deref() {
            Ok("renderer") => renderer = Some(value),
            Ok("props") => props = Some(value),
            _ => {}
        }
    }

    let renderer = renderer
        .filter(|name| !name.is_empty())
        .ok_or_else(|| SiteError::invalid_virtual_id(id, "missing renderer parameter"))?;
    let props = decode_json_for_url(props.as_deref().unwrap_or_default())?;

    Ok(VirtualModuleId { renderer, props })
}

fn decode_component(value: &str) -> std::result::Result<String, String> {
    urlencoding::decode(&value.replace('+', " "))
        .map(|decoded| decoded.into_owned())
        .map_err(|err| err.to_string())
}
