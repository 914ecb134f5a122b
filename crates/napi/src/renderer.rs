//! Renderers whose output is produced by the JavaScript side.

use serde_json::json;
use ssgmods_core::{
    BoxFuture, Mod, ModLoader, PageDescriptor, PageRenderResult, Priority, Renderer,
    RendererUtils, Result, SiteError,
};
use std::sync::Arc;

/// Points every static page at a generated virtual module carrying the
/// page's source and slug; the JavaScript renderer resolves it.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct VirtualImportRenderer;

impl Renderer for VirtualImportRenderer {
    fn render_for_dev_mode<'a>(
        &'a self,
        utils: &'a RendererUtils<'_>,
        _page: &'a PageDescriptor,
    ) -> BoxFuture<'a, Result<PageRenderResult>> {
        let renderer = utils.renderer_name().to_string();
        Box::pin(async move {
            Err(SiteError::Unsupported {
                renderer,
                operation: "dev mode rendering",
            })
        })
    }

    fn generate_import_for_static_page(
        &self,
        utils: &RendererUtils<'_>,
        page: &PageDescriptor,
    ) -> Result<String> {
        Ok(utils.generate_virtual_import(&json!({
            "source": page.source,
            "slug": page.slug,
        })))
    }
}

/// Registers [`VirtualImportRenderer`] under each JavaScript renderer name.
pub(crate) struct JsRenderersMod {
    names: Vec<String>,
}

impl JsRenderersMod {
    pub(crate) fn new(names: Vec<String>) -> Self {
        Self { names }
    }
}

impl Mod for JsRenderersMod {
    fn name(&self) -> &str {
        "napi.js-renderers"
    }

    fn order(&self) -> Priority {
        Priority::FIRST
    }

    fn initialize(&self, loader: &mut ModLoader) {
        for name in &self.names {
            loader.add_renderer(name.clone(), Arc::new(VirtualImportRenderer));
        }
    }
}
