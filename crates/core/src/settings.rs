//! Plugin options as given by the user, and their normalized form.

use crate::paths::normalize_path;
use serde::{Deserialize, Serialize};

/// Where content lives and which files to pick up.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentOptions {
    /// Content root, relative to the project.
    pub directory: String,
    /// Glob (relative to `directory`) handed to the host's discovery.
    #[serde(default = "default_glob")]
    pub glob: String,
}

fn default_glob() -> String {
    "**/*".to_string()
}

/// Options for the static site plugin.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteOptions {
    /// Content location.
    pub content: ContentOptions,
    /// File names whose metadata is inherited by everything beneath their
    /// directory (e.g. `_meta.ts`).
    #[serde(default)]
    pub config_filenames: Vec<String>,
    /// Renderer used when no metadata names one.
    #[serde(default)]
    pub default_renderer: Option<String>,
}

impl SiteOptions {
    /// Options for a content directory with default everything else.
    pub fn for_directory(directory: impl Into<String>) -> Self {
        Self {
            content: ContentOptions {
                directory: directory.into(),
                glob: default_glob(),
            },
            config_filenames: Vec::new(),
            default_renderer: None,
        }
    }
}

/// User options normalized for the pipeline.
#[derive(Debug, Clone)]
pub struct ModSettings {
    content_path: String,
    content_glob: String,
    config_filenames: Vec<String>,
    default_renderer: Option<String>,
}

impl ModSettings {
    /// Normalizes the content directory to forward slashes with a trailing `/`.
    pub fn new(options: SiteOptions) -> Self {
        let mut content_path = normalize_path(&options.content.directory);
        if content_path == "." {
            content_path.clear();
        }
        if !content_path.is_empty() && !content_path.ends_with('/') {
            content_path.push('/');
        }

        let content_glob = format!("{content_path}{}", options.content.glob);

        Self {
            content_path,
            content_glob,
            config_filenames: options.config_filenames,
            default_renderer: options.default_renderer,
        }
    }

    /// Content root ending in `/`, or empty for the project root.
    pub fn content_path(&self) -> &str {
        &self.content_path
    }

    /// Glob covering every content file.
    pub fn content_glob(&self) -> &str {
        &self.content_glob
    }

    /// Shared metadata file names, in lookup order.
    pub fn config_filenames(&self) -> &[String] {
        &self.config_filenames
    }

    /// Fallback renderer name.
    pub fn default_renderer(&self) -> Option<&str> {
        self.default_renderer.as_deref()
    }
}

impl From<SiteOptions> for ModSettings {
    fn from(options: SiteOptions) -> Self {
        Self::new(options)
    }
}
