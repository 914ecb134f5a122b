#![deny(missing_docs)]
//! Built-in ssgmods mods: page classification, index folding, metadata slugs,
//! module data copying and the out-of-box defaults bundle.

/// Out-of-box defaults.
pub mod defaults;
/// Index slug folding.
pub mod index_page;
/// Module data copier.
pub mod module_data;
/// Serde options for the built-in mods.
pub mod options;
/// Page classifier.
pub mod pages;
/// Metadata-driven slugs.
pub mod slug;

use ssgmods_core::loader::Mod;
use std::sync::Arc;

pub use defaults::{OutOfBoxDefaultsMod, default_mods};
pub use index_page::{IndexPageMod, fold_index_slug};
pub use module_data::ModuleDataMod;
pub use options::{CopyProperties, ModuleDataOptions, ModsConfig, PagesOptions};
pub use pages::PagesMod;
pub use slug::{CustomizedSlugMod, apply_slug_metadata};

impl ModsConfig {
    /// The configured mods, explicit ones first.
    pub fn build(&self) -> Vec<Arc<dyn Mod>> {
        let mut mods: Vec<Arc<dyn Mod>> = Vec::new();

        if let Some(pages) = &self.pages {
            mods.push(Arc::new(PagesMod::new(pages.clone())));
        }
        if let Some(module_data) = &self.module_data {
            mods.push(Arc::new(ModuleDataMod::new(module_data.clone())));
        }
        if self.customized_slugs {
            mods.push(Arc::new(CustomizedSlugMod));
        }
        if self.index_page {
            mods.push(Arc::new(IndexPageMod));
        }
        if self.out_of_box_defaults {
            mods.push(Arc::new(OutOfBoxDefaultsMod));
        }

        mods
    }
}
