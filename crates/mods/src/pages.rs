//! Classifies page files by suffix or extension.

use crate::index_page::fold_entry_slug;
use crate::options::PagesOptions;
use ssgmods_core::hooks::Priority;
use ssgmods_core::loader::{ContentType, Mod, ModLoader};
use ssgmods_core::parser::ContentEntry;
use ssgmods_core::paths;
use std::sync::Arc;

/// Marks `*.page.*` files (or whichever suffixes are configured) and files
/// with page extensions as pages, and strips the suffix from their slug.
#[derive(Debug, Clone)]
pub struct PagesMod {
    inner: Arc<PageMatcher>,
    enable_index_slugs: bool,
}

#[derive(Debug)]
struct PageMatcher {
    suffixes: Vec<String>,
    extensions: Vec<String>,
}

impl PagesMod {
    /// Creates the mod.
    pub fn new(options: PagesOptions) -> Self {
        let matcher = PageMatcher {
            suffixes: options.page_suffixes.iter().map(|it| format!(".{it}")).collect(),
            extensions: options.page_extensions.iter().map(|it| format!(".{it}")).collect(),
        };

        Self {
            inner: Arc::new(matcher),
            enable_index_slugs: options.enable_index_slugs,
        }
    }

    /// Whether the file at `content_path` is a page.
    pub fn classify(&self, content_path: &str) -> Option<ContentType> {
        self.inner.classify(content_path)
    }
}

impl PageMatcher {
    fn classify(&self, content_path: &str) -> Option<ContentType> {
        let parsed = paths::parse(content_path);

        let is_page = self.extensions.contains(&parsed.ext)
            || self.suffixes.iter().any(|suffix| parsed.name.ends_with(suffix.as_str()));
        is_page.then_some(ContentType::Page)
    }

    /// Strip a page suffix the slug still carries from the file name. Files
    /// matched by extension only lose the extension.
    fn strip_suffix(&self, entry: &mut ContentEntry) {
        let parsed = paths::parse(&entry.content_path);
        if self.extensions.contains(&parsed.ext) {
            return;
        }
        let name = parsed.name;
        let Some(slug) = entry.content_data.slug() else {
            return;
        };

        let stripped = self
            .suffixes
            .iter()
            .find(|suffix| name.ends_with(suffix.as_str()) && slug.ends_with(suffix.as_str()))
            .map(|suffix| slug[..slug.len() - suffix.len()].to_string());

        if let Some(stripped) = stripped {
            entry.content_data.set_slug(stripped);
        }
    }
}

impl Mod for PagesMod {
    fn name(&self) -> &str {
        "Pages"
    }

    fn initialize(&self, loader: &mut ModLoader) {
        let matcher = Arc::clone(&self.inner);
        loader.on_determine_content_type(Priority::NORMAL, move |entry: &ContentEntry| {
            matcher.classify(&entry.content_path)
        });

        let matcher = Arc::clone(&self.inner);
        loader.on_slug_normalization(Priority::NORMAL, move |entry: &mut ContentEntry| {
            matcher.strip_suffix(entry)
        });

        if self.enable_index_slugs {
            loader.on_postprocess(Priority::LAST, fold_entry_slug);
        }
    }
}
