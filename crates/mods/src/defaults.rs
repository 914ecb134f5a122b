//! The out-of-box set of mods.

use crate::module_data::ModuleDataMod;
use crate::options::{CopyProperties, ModuleDataOptions, PagesOptions};
use crate::pages::PagesMod;
use crate::slug::CustomizedSlugMod;
use log::debug;
use ssgmods_core::loader::{Mod, ModLoader};
use std::sync::Arc;

/// Installs the pages classifier, the module data copier and the slug
/// customizer, skipping any the user already supplied under the same name.
///
/// | Mod | Configuration |
/// |-----|---------------|
/// | `Pages` | suffix `page`, extension `md`, index slugs on |
/// | `default.module-data` | copies `frontmatter` and `frontmatter.slug` |
/// | `default.slug-specifier` | |
#[derive(Debug, Default, Clone, Copy)]
pub struct OutOfBoxDefaultsMod;

/// The mods [`OutOfBoxDefaultsMod`] installs, in order.
pub fn default_mods() -> Vec<Arc<dyn Mod>> {
    vec![
        Arc::new(PagesMod::new(PagesOptions {
            page_suffixes: vec!["page".to_string()],
            page_extensions: vec!["md".to_string()],
            enable_index_slugs: true,
        })),
        Arc::new(ModuleDataMod::new(ModuleDataOptions {
            copy_module_properties: CopyProperties::List(vec![
                "frontmatter".to_string(),
                "frontmatter.slug".to_string(),
            ]),
        })),
        Arc::new(CustomizedSlugMod),
    ]
}

impl Mod for OutOfBoxDefaultsMod {
    fn name(&self) -> &str {
        "default.out-of-box"
    }

    fn initialize(&self, loader: &mut ModLoader) {
        let missing: Vec<_> = default_mods()
            .into_iter()
            .filter(|it| !loader.has_mod(it.name()))
            .collect();

        for item in missing {
            debug!("Adding default mod {}", item.name());
            item.initialize(loader);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_names() {
        let names: Vec<_> = default_mods().iter().map(|it| it.name().to_string()).collect();
        assert_eq!(names, ["Pages", "default.module-data", "default.slug-specifier"]);
    }

    #[test]
    fn installs_every_default_hook() {
        let loader = ModLoader::new(vec![Arc::new(OutOfBoxDefaultsMod)]);
        assert_eq!(loader.determine_content_type.len(), 1);
        assert_eq!(loader.contribute_data.len(), 1);
        assert_eq!(loader.slug_normalization.len(), 1);
        // slug customizer and index folding
        assert_eq!(loader.postprocess.len(), 2);
    }

    #[test]
    fn user_mods_replace_defaults_by_name() {
        let user_pages = PagesMod::new(PagesOptions {
            page_suffixes: vec!["route".to_string()],
            ..PagesOptions::default()
        });
        let loader = ModLoader::new(vec![Arc::new(OutOfBoxDefaultsMod), Arc::new(user_pages)]);

        // one classifier from the user, none from the defaults
        assert_eq!(loader.determine_content_type.len(), 1);
        // the user's pages mod has no index folding
        assert_eq!(loader.postprocess.len(), 1);
    }
}
