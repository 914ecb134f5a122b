//! JSON values carried inside URLs as unpadded base64url.

use crate::error::{Result, SiteError};
use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use serde_json::Value as JsonValue;

const URL_JSON: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Serialize `value` and encode it for use in a query string.
pub fn encode_json_for_url(value: &JsonValue) -> String {
    URL_JSON.encode(value.to_string())
}

/// Decode a value produced by [`encode_json_for_url`].
///
/// An empty string decodes to an empty object.
pub fn decode_json_for_url(encoded: &str) -> Result<JsonValue> {
    if encoded.is_empty() {
        return Ok(JsonValue::Object(Default::default()));
    }

    let bytes = URL_JSON
        .decode(encoded)
        .map_err(|err| SiteError::UrlJson(err.to_string()))?;
    serde_json::from_slice(&bytes).map_err(|err| SiteError::UrlJson(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn nested_values_survive() {
        let value = json!({
            "title": "Hello",
            "tags": ["a", "b"],
            "draft": false,
            "order": 3,
            "nested": { "deep": { "x": 1.5 } },
        });
        assert_eq!(decode_json_for_url(&encode_json_for_url(&value)).unwrap(), value);
        assert_eq!(decode_json_for_url(&encode_json_for_url(&json!({}))).unwrap(), json!({}));
    }

    #[test]
    fn empty_string_is_empty_object() {
        assert_eq!(decode_json_for_url("").unwrap(), json!({}));
    }

    #[test]
    fn output_is_url_safe() {
        let encoded = encode_json_for_url(&json!({ "q": "\u{fbff}?>~~~" }));
        assert!(!encoded.contains(['+', '/', '=']));
    }

    #[test]
    fn accepts_padded_input() {
        assert_eq!(decode_json_for_url("e30=").unwrap(), json!({}));
        assert_eq!(decode_json_for_url("e30").unwrap(), json!({}));
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(decode_json_for_url("!!"), Err(SiteError::UrlJson(_))));
        // valid base64url, not JSON
        assert!(matches!(decode_json_for_url("bm9wZQ"), Err(SiteError::UrlJson(_))));
    }
}
