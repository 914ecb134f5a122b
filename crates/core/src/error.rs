use crate::frontmatter::FrontmatterError;
use thiserror::Error;

/// Result alias used throughout the pipeline.
pub type Result<T, E = SiteError> = std::result::Result<T, E>;

/// Errors raised while discovering, classifying, or rendering content.
///
/// Entries that no mod claims, or that end up without a slug, are not errors;
/// they are filtered out of the page sequence instead.
#[derive(Debug, Error)]
pub enum SiteError {
    /// No renderer is registered under the requested name.
    #[error("No renderer with the name '{name}' found!{context}")]
    MissingRenderer {
        /// Renderer name that was looked up.
        name: String,
        /// Caller supplied hint, appended verbatim.
        context: String,
    },
    /// A classified page has no renderer in its metadata or settings.
    #[error("No renderer found for {path}")]
    MissingRendererName {
        /// Content path of the offending entry.
        path: String,
    },
    /// A virtual module id could not be decoded.
    #[error("Invalid virtual module id '{id}': {reason}")]
    InvalidVirtualId {
        /// The id as received from the host.
        id: String,
        /// What was wrong with it.
        reason: String,
    },
    /// base64url or JSON decoding of URL-carried props failed.
    #[error("Could not decode url json: {0}")]
    UrlJson(String),
    /// The fetch facility failed to produce JSON for a url.
    #[error("Request to {url} failed: {message}")]
    Fetch {
        /// Requested url.
        url: String,
        /// Underlying failure.
        message: String,
    },
    /// A page data loader failed.
    #[error("Loading data for {source_path} failed: {message}")]
    DataLoader {
        /// Content path or metadata source that owns the loader.
        source_path: String,
        /// Underlying failure.
        message: String,
    },
    /// A renderer does not implement an optional capability.
    #[error("Renderer '{renderer}' does not support {operation}")]
    Unsupported {
        /// Renderer name.
        renderer: String,
        /// Capability that was requested.
        operation: &'static str,
    },
    /// A JSON listing could not be serialized.
    #[error("Could not serialize json: {0}")]
    Serialize(#[from] serde_json::Error),
    /// The host bridge failed to transform html.
    #[error("Host transform failed: {0}")]
    Host(String),
    /// Payload extraction from a markdown or meta source failed.
    #[error(transparent)]
    Frontmatter(#[from] FrontmatterError),
}

impl SiteError {
    /// Create a missing-renderer error with a context hint.
    pub fn missing_renderer(name: impl Into<String>, context: impl Into<String>) -> Self {
        Self::MissingRenderer {
            name: name.into(),
            context: context.into(),
        }
    }

    /// Create an invalid virtual id error.
    pub fn invalid_virtual_id(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidVirtualId {
            id: id.into(),
            reason: reason.into(),
        }
    }

    /// Create a fetch error.
    pub fn fetch(url: impl Into<String>, message: impl ToString) -> Self {
        Self::Fetch {
            url: url.into(),
            message: message.to_string(),
        }
    }
}
