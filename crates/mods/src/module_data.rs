//! Copies module properties into metadata.

use crate::options::{CopyProperties, ModuleDataOptions};
use serde_json::Value as JsonValue;
use ssgmods_core::hooks::Priority;
use ssgmods_core::loader::{Mod, ModLoader};
use ssgmods_core::parser::ContentEntry;
use std::sync::Arc;

/// Copies configured module properties (e.g. `frontmatter`) into each entry's
/// metadata during data contribution.
#[derive(Debug, Clone)]
pub struct ModuleDataMod {
    properties: Arc<CopyProperties>,
}

impl ModuleDataMod {
    /// Creates the mod.
    pub fn new(options: ModuleDataOptions) -> Self {
        Self {
            properties: Arc::new(options.copy_module_properties),
        }
    }

    /// Copy every configured property of `entry.module` that is present.
    pub fn copy_properties(properties: &CopyProperties, entry: &mut ContentEntry) {
        for (from, to) in properties.pairs() {
            let Some((name, value)) = module_property(&entry.module, from) else {
                continue;
            };
            let value = value.clone();
            let target = to.unwrap_or(name).to_string();
            entry.metadata.add(target, value);
        }
    }
}

impl Mod for ModuleDataMod {
    fn name(&self) -> &str {
        "default.module-data"
    }

    fn initialize(&self, loader: &mut ModLoader) {
        let properties = Arc::clone(&self.properties);
        loader.on_contribute_data(Priority::NORMAL, move |entry: &mut ContentEntry| {
            ModuleDataMod::copy_properties(&properties, entry)
        });
    }
}

/// Walk a dotted path through `module`; any missing or null step yields
/// `None`. Returns the last segment alongside the value.
fn module_property<'a, 'p>(module: &'a JsonValue, path: &'p str) -> Option<(&'p str, &'a JsonValue)> {
    let mut value = module;
    let mut name = path;

    for part in path.split('.') {
        let next = match value {
            JsonValue::Array(items) => part.parse::<usize>().ok().and_then(|index| items.get(index)),
            _ => value.get(part),
        };
        value = match next {
            None | Some(JsonValue::Null) => return None,
            Some(next) => next,
        };
        name = part;
    }

    Some((name, value))
}
