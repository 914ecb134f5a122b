//! Serde options for the built-in mods.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Options for [`PagesMod`](crate::PagesMod).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PagesOptions {
    /// Name suffixes that mark a page, without the dot; `page` matches
    /// `blog/post.page.tsx`.
    pub page_suffixes: Vec<String>,
    /// Extensions that are always pages, without the dot; `md` matches
    /// `blog/post.md`.
    #[serde(default)]
    pub page_extensions: Vec<String>,
    /// Fold `some/sub/(child)` into `some/sub`.
    #[serde(default)]
    pub enable_index_slugs: bool,
}

/// Module properties to copy into metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum CopyProperties {
    /// Dotted paths; each lands under its last segment (`a.b.c` → `c`).
    List(Vec<String>),
    /// Dotted path to target property name.
    Map(BTreeMap<String, String>),
}

impl CopyProperties {
    /// `(from, to)` pairs; `to` is `None` when the last segment is used.
    pub fn pairs(&self) -> Vec<(&str, Option<&str>)> {
        match self {
            CopyProperties::List(paths) => paths.iter().map(|from| (from.as_str(), None)).collect(),
            CopyProperties::Map(map) => map
                .iter()
                .map(|(from, to)| (from.as_str(), Some(to.as_str())))
                .collect(),
        }
    }
}

impl Default for CopyProperties {
    fn default() -> Self {
        CopyProperties::List(Vec::new())
    }
}

/// Options for [`ModuleDataMod`](crate::ModuleDataMod).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ModuleDataOptions {
    /// Properties to copy.
    #[serde(default)]
    pub copy_module_properties: CopyProperties,
}

/// Which built-in mods to install, as configured from JavaScript.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModsConfig {
    /// Install [`OutOfBoxDefaultsMod`](crate::OutOfBoxDefaultsMod).
    #[serde(default = "default_true")]
    pub out_of_box_defaults: bool,
    /// Install a pages classifier with these options.
    #[serde(default)]
    pub pages: Option<PagesOptions>,
    /// Install a module data copier with these options.
    #[serde(default)]
    pub module_data: Option<ModuleDataOptions>,
    /// Install the metadata slug customizer.
    #[serde(default)]
    pub customized_slugs: bool,
    /// Install the standalone index folding mod.
    #[serde(default)]
    pub index_page: bool,
}

fn default_true() -> bool {
    true
}

impl Default for ModsConfig {
    fn default() -> Self {
        Self {
            out_of_box_defaults: true,
            pages: None,
            module_data: None,
            customized_slugs: false,
            index_page: false,
        }
    }
}
