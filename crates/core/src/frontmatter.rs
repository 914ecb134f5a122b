//! YAML extraction for markdown content and shared meta files.

use serde_json::Value as JsonValue;
use thiserror::Error;

/// Frontmatter split off a markdown document.
#[derive(Debug)]
pub struct Frontmatter {
    /// Parsed frontmatter as a JSON object (empty when absent).
    pub data: JsonValue,
    /// Byte offset where the markdown body begins.
    pub body_start: usize,
}

impl Frontmatter {
    fn empty() -> Self {
        Self {
            data: JsonValue::Object(Default::default()),
            body_start: 0,
        }
    }
}

/// Errors emitted while reading YAML out of a content source.
#[derive(Debug, Error)]
pub enum FrontmatterError {
    /// Opening `---` fence without a closing one.
    #[error("Unterminated YAML frontmatter block: expected closing '---'")]
    Unterminated,
    /// YAML failed to parse.
    #[error("Frontmatter parse error: {0}")]
    Parse(String),
    /// Top-level YAML node was not a mapping.
    #[error("Frontmatter must be a YAML mapping at the top level")]
    InvalidRootType,
}

/// Splits YAML frontmatter off a markdown document.
pub fn extract_frontmatter(input: &str) -> Result<Frontmatter, FrontmatterError> {
    match find_yaml_block(input)? {
        Some((block, body_start)) => Ok(Frontmatter {
            data: parse_yaml_mapping(block)?,
            body_start,
        }),
        None => Ok(Frontmatter::empty()),
    }
}

/// Parses a YAML document that must be a mapping; empty or null documents
/// yield an empty object.
pub fn parse_yaml_mapping(block: &str) -> Result<JsonValue, FrontmatterError> {
    if block.trim().is_empty() {
        return Ok(JsonValue::Object(Default::default()));
    }

    let yaml: serde_yaml::Value =
        serde_yaml::from_str(block).map_err(|err| FrontmatterError::Parse(err.to_string()))?;
    let json =
        serde_json::to_value(yaml).map_err(|err| FrontmatterError::Parse(err.to_string()))?;

    match json {
        JsonValue::Null => Ok(JsonValue::Object(Default::default())),
        JsonValue::Object(_) => Ok(json),
        _ => Err(FrontmatterError::InvalidRootType),
    }
}

fn find_yaml_block(input: &str) -> Result<Option<(&str, usize)>, FrontmatterError> {
    let (content, bom_len) = match input.strip_prefix('\u{feff}') {
        Some(stripped) => (stripped, '\u{feff}'.len_utf8()),
        None => (input, 0),
    };

    let mut cursor = 0usize;
    let block_start = loop {
        let Some((line, next)) = next_line(content, cursor) else {
            return Ok(None);
        };
        if line.trim().is_empty() {
            cursor = next;
            continue;
        }
        if !is_fence(line) {
            return Ok(None);
        }
        break next;
    };

    let mut scan = block_start;
    while let Some((line, next)) = next_line(content, scan) {
        if is_fence(line) {
            let block = content[block_start..scan].trim_end_matches(['\r', '\n']);
            return Ok(Some((block, bom_len + next)));
        }
        scan = next;
    }

    Err(FrontmatterError::Unterminated)
}

fn next_line(input: &str, start: usize) -> Option<(&str, usize)> {
    if start >= input.len() {
        return None;
    }

    match input[start..].find('\n') {
        Some(pos) => Some((&input[start..start + pos], start + pos + 1)),
        None => Some((&input[start..], input.len())),
    }
}

fn is_fence(line: &str) -> bool {
    line.trim_end_matches('\r') == "---"
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(input: &str) -> Frontmatter {
        extract_frontmatter(input).expect("frontmatter extraction should succeed")
    }

    #[test]
    fn no_frontmatter() {
        let result = extract("# Title\nBody");
        assert_eq!(result.body_start, 0);
        assert_eq!(result.data, JsonValue::Object(Default::default()));
    }

    #[test]
    fn parses_slug_and_title() {
        let input = "---\ntitle: Example\nslug: custom/path\n---\n# Content";
        let result = extract(input);
        assert_eq!(result.body_start, input.find("# Content").unwrap());
        assert_eq!(result.data["title"], "Example");
        assert_eq!(result.data["slug"], "custom/path");
    }

    #[test]
    fn empty_block_is_empty_object() {
        let input = "---\n---\nBody";
        let result = extract(input);
        assert_eq!(result.data, JsonValue::Object(Default::default()));
        assert_eq!(result.body_start, input.find("Body").unwrap());
    }

    #[test]
    fn skips_bom_and_blank_lines() {
        let input = "\u{feff}\n  \n---\r\nfoo: bar\r\n---\r\nBody";
        let result = extract(input);
        assert_eq!(result.data["foo"], "bar");
        assert_eq!(result.body_start, input.find("Body").unwrap());
    }

    #[test]
    fn invalid_yaml() {
        let err = extract_frontmatter("---\ninvalid: [unterminated\n---\n").unwrap_err();
        assert!(matches!(err, FrontmatterError::Parse(_)), "{err:?}");
    }

    #[test]
    fn unterminated_block() {
        let err = extract_frontmatter("---\ntitle: test").unwrap_err();
        assert!(matches!(err, FrontmatterError::Unterminated));
    }

    #[test]
    fn mapping_required() {
        let err = parse_yaml_mapping("- a\n- b").unwrap_err();
        assert!(matches!(err, FrontmatterError::InvalidRootType));
        assert_eq!(
            parse_yaml_mapping("~").unwrap(),
            JsonValue::Object(Default::default())
        );
    }
}
