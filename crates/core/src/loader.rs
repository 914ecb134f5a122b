//! Mods and the loader that wires them into the pipeline.

use crate::error::{Result, SiteError};
use crate::hooks::{CallbackList, Priority};
use crate::parser::ContentEntry;
use crate::renderer::Renderer;
use log::{debug, trace, warn};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// What a mod decided a content entry is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentType {
    /// A page that gets a slug and a renderer.
    Page,
    /// A content kind defined by a mod.
    Named(String),
}

/// Classification hook; the first `Some` wins.
pub type ContentTypeHook = dyn Fn(&ContentEntry) -> Option<ContentType> + Send + Sync;

/// Hook that may update an entry's metadata or scratch data.
pub type EntryHook = dyn Fn(&mut ContentEntry) + Send + Sync;

/// A pluggable unit of behavior.
pub trait Mod: Send + Sync {
    /// Name used to detect duplicates.
    fn name(&self) -> &str;

    /// Mods initialize in ascending order; ties keep their given order.
    fn order(&self) -> Priority {
        Priority::NORMAL
    }

    /// Register hooks and renderers.
    fn initialize(&self, loader: &mut ModLoader);
}

/// Installed mods, their hooks, and the renderers they registered.
#[derive(Default)]
pub struct ModLoader {
    mods: Vec<Arc<dyn Mod>>,
    renderers: HashMap<String, Arc<dyn Renderer>>,
    /// Decides whether an entry takes part in the pipeline at all.
    pub determine_content_type: CallbackList<ContentTypeHook>,
    /// Copies or derives metadata onto an entry.
    pub contribute_data: CallbackList<EntryHook>,
    /// Runs after data contribution.
    pub preprocess: CallbackList<EntryHook>,
    /// Cleans up the default slug before the renderer is resolved.
    pub slug_normalization: CallbackList<EntryHook>,
    /// Runs with a resolved renderer; slug customization lives here.
    pub postprocess: CallbackList<EntryHook>,
}

impl ModLoader {
    /// Sort `mods` by order and initialize each one.
    pub fn new(mods: Vec<Arc<dyn Mod>>) -> Self {
        let mut ordered = mods;
        ordered.sort_by_key(|it| it.order());

        let mut loader = Self {
            mods: ordered.clone(),
            ..Self::default()
        };

        for item in &ordered {
            debug!("Initializing mod {} (order {})", item.name(), item.order().0);
            item.initialize(&mut loader);
        }

        loader
    }

    /// Installed mods in initialization order.
    pub fn mods(&self) -> &[Arc<dyn Mod>] {
        &self.mods
    }

    /// True when a mod named `name` was supplied.
    pub fn has_mod(&self, name: &str) -> bool {
        self.mods.iter().any(|it| it.name() == name)
    }

    /// Register a renderer; a later registration under the same name
    /// replaces the earlier one.
    pub fn add_renderer(&mut self, name: impl Into<String>, renderer: Arc<dyn Renderer>) {
        let name = name.into();
        trace!("Registering renderer {name}");
        if self.renderers.insert(name.clone(), renderer).is_some() {
            warn!("Renderer {name} was registered twice; keeping the latest");
        }
    }

    /// Look up a renderer; `context` is appended to the error message.
    pub fn get_renderer(&self, name: &str, context: &str) -> Result<Arc<dyn Renderer>> {
        self.renderers
            .get(name)
            .cloned()
            .ok_or_else(|| SiteError::missing_renderer(name, context))
    }

    /// Registered renderer names, sorted.
    pub fn renderer_names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.renderers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Add a classification hook.
    pub fn on_determine_content_type<F>(&mut self, priority: Priority, hook: F)
    where
        F: Fn(&ContentEntry) -> Option<ContentType> + Send + Sync + 'static,
    {
        self.determine_content_type.add(Arc::new(hook), priority);
    }

    /// Add a data contribution hook.
    pub fn on_contribute_data<F>(&mut self, priority: Priority, hook: F)
    where
        F: Fn(&mut ContentEntry) + Send + Sync + 'static,
    {
        self.contribute_data.add(Arc::new(hook), priority);
    }

    /// Add a preprocess hook.
    pub fn on_preprocess<F>(&mut self, priority: Priority, hook: F)
    where
        F: Fn(&mut ContentEntry) + Send + Sync + 'static,
    {
        self.preprocess.add(Arc::new(hook), priority);
    }

    /// Add a slug normalization hook.
    pub fn on_slug_normalization<F>(&mut self, priority: Priority, hook: F)
    where
        F: Fn(&mut ContentEntry) + Send + Sync + 'static,
    {
        self.slug_normalization.add(Arc::new(hook), priority);
    }

    /// Add a postprocess hook.
    pub fn on_postprocess<F>(&mut self, priority: Priority, hook: F)
    where
        F: Fn(&mut ContentEntry) + Send + Sync + 'static,
    {
        self.postprocess.add(Arc::new(hook), priority);
    }
}

impl fmt::Debug for ModLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModLoader")
            .field("mods", &self.mods.iter().map(|it| it.name()).collect::<Vec<_>>())
            .field("renderers", &self.renderer_names())
            .field("determine_content_type", &self.determine_content_type)
            .field("contribute_data", &self.contribute_data)
            .field("preprocess", &self.preprocess)
            .field("slug_normalization", &self.slug_normalization)
            .field("postprocess", &self.postprocess)
            .finish()
    }
}
