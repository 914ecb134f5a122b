//! The renderer contract and the helpers renderers receive.

use crate::data_api::BoxFuture;
use crate::error::{Result, SiteError};
use crate::provider::PageDescriptor;
use crate::virtual_id::{generate_virtual_id, props_search};
use serde::Serialize;
use serde_json::Value as JsonValue;

/// Output of a development-mode render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageRenderResult {
    /// MIME type of `body`.
    #[serde(rename = "type")]
    pub content_type: String,
    /// Response body.
    pub body: String,
}

impl PageRenderResult {
    /// An html response.
    pub fn html(body: impl Into<String>) -> Self {
        Self {
            content_type: "text/html".to_string(),
            body: body.into(),
        }
    }

    /// A plain text response.
    pub fn text(body: impl Into<String>) -> Self {
        Self {
            content_type: "text/plain".to_string(),
            body: body.into(),
        }
    }
}

/// Operations the dev server host exposes to renderers.
pub trait HostBridge: Send + Sync {
    /// Run the host's index html transforms for a page served at `url`.
    fn transform_index_html<'a>(&'a self, url: &'a str, html: String)
    -> BoxFuture<'a, Result<String>>;
}

/// Host that returns html untouched.
#[derive(Debug, Default, Clone, Copy)]
pub struct PassthroughHost;

impl HostBridge for PassthroughHost {
    fn transform_index_html<'a>(
        &'a self,
        _url: &'a str,
        html: String,
    ) -> BoxFuture<'a, Result<String>> {
        Box::pin(async move { Ok(html) })
    }
}

/// Helpers bound to one renderer name.
#[derive(Clone, Copy)]
pub struct RendererUtils<'a> {
    host: &'a dyn HostBridge,
    renderer_name: &'a str,
}

impl<'a> RendererUtils<'a> {
    /// Bind the helpers to `renderer_name`.
    pub fn new(host: &'a dyn HostBridge, renderer_name: &'a str) -> Self {
        Self {
            host,
            renderer_name,
        }
    }

    /// Name the renderer was registered under.
    pub fn renderer_name(&self) -> &'a str {
        self.renderer_name
    }

    /// The host.
    pub fn host(&self) -> &'a dyn HostBridge {
        self.host
    }

    /// Import id for a module this renderer will generate from `props`.
    ///
    /// The host later hands the id back through virtual module resolution.
    pub fn generate_virtual_import(&self, props: &JsonValue) -> String {
        generate_virtual_id(self.renderer_name, props)
    }

    /// Run `html` through the host's transforms under a url derived from
    /// `props`, so identical props share the host's cached index.
    pub async fn transform_html_response(
        &self,
        props: &JsonValue,
        html: String,
    ) -> Result<PageRenderResult> {
        let url = format!("$/renderers{}", props_search(self.renderer_name, props));
        let body = self.host.transform_index_html(&url, html).await?;
        Ok(PageRenderResult::html(body))
    }
}

/// Turns pages into html, both for the dev server and for static builds.
pub trait Renderer: Send + Sync {
    /// Render `page` for the development server.
    fn render_for_dev_mode<'a>(
        &'a self,
        utils: &'a RendererUtils<'_>,
        page: &'a PageDescriptor,
    ) -> BoxFuture<'a, Result<PageRenderResult>>;

    /// Import that produces `page` during a static build; usually a
    /// [virtual import](RendererUtils::generate_virtual_import).
    fn generate_import_for_static_page(
        &self,
        utils: &RendererUtils<'_>,
        page: &PageDescriptor,
    ) -> Result<String>;

    /// Source for a virtual module this renderer generated earlier.
    fn resolve_virtual(&self, utils: &RendererUtils<'_>, props: &JsonValue) -> Result<String> {
        let _ = props;
        Err(SiteError::Unsupported {
            renderer: utils.renderer_name().to_string(),
            operation: "virtual module resolution",
        })
    }
}
