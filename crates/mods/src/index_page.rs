//! Folding of parenthesized slugs into their parent directory.

use ssgmods_core::hooks::Priority;
use ssgmods_core::loader::{Mod, ModLoader};
use ssgmods_core::parser::{ContentEntry, SlugFlag};
use ssgmods_core::paths::{self, ParsedPath};

/// Rewrite a slug whose last segment is wrapped in parentheses so that the
/// parent directory becomes the last segment.
///
/// Returns `None` when the slug has no parenthesized last segment.
///
/// ```
/// use ssgmods_mods::fold_index_slug;
///
/// assert_eq!(fold_index_slug("blog/sub/(sub)").as_deref(), Some("blog/sub"));
/// assert_eq!(fold_index_slug("(root)").as_deref(), Some("index"));
/// assert_eq!(fold_index_slug("blog/post"), None);
/// ```
pub fn fold_index_slug(slug: &str) -> Option<String> {
    let parsed = paths::parse(slug);
    let base = parsed.base();
    if base.len() < 2 || !base.starts_with('(') || !base.ends_with(')') {
        return None;
    }

    let mut name = paths::basename(&parsed.dir);
    let dir = paths::dirname(&parsed.dir);

    // the web root has no parent directory to promote
    if dir == "." && name.is_empty() {
        name = "index".to_string();
    }

    let folded = ParsedPath {
        root: parsed.root,
        dir,
        name,
        ext: String::new(),
    }
    .format();
    Some(paths::normalize_path(&folded))
}

/// Hook body shared by [`IndexPageMod`] and [`PagesMod`](crate::PagesMod).
pub(crate) fn fold_entry_slug(entry: &mut ContentEntry) {
    let data = &mut entry.content_data;
    if data.is_marked(SlugFlag::Readonly) || data.is_marked(SlugFlag::NameModified) {
        return;
    }

    if let Some(folded) = data.slug().and_then(fold_index_slug) {
        data.set_slug(folded);
    }
}

/// Folds `some/sub/(child)` slugs into `some/sub`, after every other slug
/// update.
#[derive(Debug, Default, Clone, Copy)]
pub struct IndexPageMod;

impl Mod for IndexPageMod {
    fn name(&self) -> &str {
        "IndexPage"
    }

    fn order(&self) -> Priority {
        Priority::LAST
    }

    fn initialize(&self, loader: &mut ModLoader) {
        loader.on_postprocess(Priority::LAST, fold_entry_slug);
    }
}
