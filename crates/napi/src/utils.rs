//! Conversions between JavaScript values and pipeline types.

use napi::{Error, Status};
use serde_json::Value as JsonValue;
use ssgmods_core::{ModuleMap, RawModule, SiteError};

pub(crate) fn empty_frontmatter() -> JsonValue {
    JsonValue::Object(Default::default())
}

/// Treat a `{ path: module }` object as retrieved content.
pub(crate) fn modules_from_json(modules: JsonValue) -> napi::Result<ModuleMap> {
    match modules {
        JsonValue::Object(entries) => Ok(entries
            .into_iter()
            .map(|(path, payload)| (path, RawModule::new(payload)))
            .collect()),
        other => Err(Error::new(
            Status::InvalidArg,
            format!("Expected an object of modules keyed by path, got {other}"),
        )),
    }
}

pub(crate) fn convert_error(err: SiteError) -> Error {
    match err {
        SiteError::InvalidVirtualId { .. } | SiteError::UrlJson(_) => {
            Error::new(Status::InvalidArg, err.to_string())
        }
        other => Error::from_reason(other.to_string()),
    }
}
