//! Entry points the host calls: static input discovery, dev-server requests
//! and virtual module loading.

use crate::constants::DEBUG_PATH;
use crate::error::Result;
use crate::provider::ContentProvider;
use crate::renderer::{HostBridge, RendererUtils};
use crate::virtual_id::parse_virtual_id;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

/// One static build input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StaticEntry {
    /// Output file, `slug + ".html"`.
    pub filename: String,
    /// Module the bundler builds the page from.
    pub entry_point: String,
}

/// Response to a dev-server request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DynamicResponse {
    /// HTTP status.
    pub status: u16,
    /// MIME type of `body`.
    #[serde(rename = "type")]
    pub content_type: String,
    /// Response body.
    pub body: String,
}

impl DynamicResponse {
    fn not_found(path: &str) -> Self {
        Self {
            status: 404,
            content_type: "text/plain".to_string(),
            body: format!("404 does not exist - {path}"),
        }
    }
}

/// Binds a content provider to a host.
pub struct SiteEntry {
    provider: ContentProvider,
    host: Arc<dyn HostBridge>,
}

impl SiteEntry {
    /// Creates an entry.
    pub fn new(provider: ContentProvider, host: Arc<dyn HostBridge>) -> Self {
        Self { provider, host }
    }

    /// The provider.
    pub fn provider(&self) -> &ContentProvider {
        &self.provider
    }

    /// Build inputs for every page.
    pub fn handle_static(&self) -> Result<Vec<StaticEntry>> {
        let loader = self.provider.loader();
        let mut inputs = Vec::new();

        for page in self.provider.pages()? {
            let page = page?;
            let renderer =
                loader.get_renderer(&page.renderer, &format!(" This is for file: {}", page.source))?;
            let utils = RendererUtils::new(self.host.as_ref(), &page.renderer);
            let entry_point = renderer.generate_import_for_static_page(&utils, &page)?;

            inputs.push(StaticEntry {
                filename: format!("{}.html", page.slug),
                entry_point,
            });
        }

        Ok(inputs)
    }

    /// Serve `path` (the request pathname, starting with `/`).
    ///
    /// [`DEBUG_PATH`] lists every page as JSON. Anything else is matched
    /// exactly against page slugs.
    pub async fn handle_dynamic(&self, path: &str) -> Result<DynamicResponse> {
        if path == DEBUG_PATH {
            return Ok(DynamicResponse {
                status: 200,
                content_type: "text/plain".to_string(),
                body: self.debug_listing()?,
            });
        }

        let slug = path.strip_prefix('/').unwrap_or(path);
        let Some(page) = self.provider.get_content(slug)? else {
            return Ok(DynamicResponse::not_found(path));
        };

        let renderer = self
            .provider
            .loader()
            .get_renderer(&page.renderer, &format!(" This is for file: {}", page.source))?;
        let utils = RendererUtils::new(self.host.as_ref(), &page.renderer);
        let rendered = renderer.render_for_dev_mode(&utils, &page).await?;

        Ok(DynamicResponse {
            status: 200,
            content_type: rendered.content_type,
            body: rendered.body,
        })
    }

    /// Source of a virtual module a renderer generated.
    pub fn handle_virtual(&self, id: &str) -> Result<String> {
        let parsed = parse_virtual_id(id)?;
        let renderer = self
            .provider
            .loader()
            .get_renderer(&parsed.renderer, " This is while looking for a virtual renderer")?;
        let utils = RendererUtils::new(self.host.as_ref(), &parsed.renderer);
        renderer.resolve_virtual(&utils, &parsed.props)
    }

    /// Pretty-printed JSON listing of every page.
    pub fn debug_listing(&self) -> Result<String> {
        let content = self
            .provider
            .pages()?
            .map(|page| page.map(|page| page.to_json()))
            .collect::<Result<Vec<_>>>()?;
        Ok(serde_json::to_string_pretty(&json!({ "content": content }))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_api::BoxFuture;
    use crate::error::SiteError;
    use crate::hooks::Priority;
    use crate::loader::{ContentType, Mod, ModLoader};
    use crate::module::{ModuleMap, RawModule};
    use crate::parser::ContentEntry;
    use crate::provider::PageDescriptor;
    use crate::renderer::{PageRenderResult, PassthroughHost, Renderer};
    use crate::settings::{ModSettings, SiteOptions};
    use insta::assert_snapshot;
    use serde_json::Value as JsonValue;

    struct Echo;

    impl Renderer for Echo {
        fn render_for_dev_mode<'a>(
            &'a self,
            utils: &'a RendererUtils<'_>,
            page: &'a PageDescriptor,
        ) -> BoxFuture<'a, Result<PageRenderResult>> {
            Box::pin(async move {
                let html = format!("<h1>{}</h1>", page.slug);
                utils.transform_html_response(&json!({ "slug": page.slug }), html).await
            })
        }

        fn generate_import_for_static_page(
            &self,
            utils: &RendererUtils<'_>,
            page: &PageDescriptor,
        ) -> Result<String> {
            Ok(utils.generate_virtual_import(&json!({ "slug": page.slug })))
        }

        fn resolve_virtual(&self, _utils: &RendererUtils<'_>, props: &JsonValue) -> Result<String> {
            Ok(format!("export default {props}"))
        }
    }

    struct Site;

    impl Mod for Site {
        fn name(&self) -> &str {
            "site"
        }

        fn initialize(&self, loader: &mut ModLoader) {
            loader.add_renderer("echo", Arc::new(Echo));
            loader.on_determine_content_type(Priority::NORMAL, |_: &ContentEntry| {
                Some(ContentType::Page)
            });
        }
    }

    fn site() -> SiteEntry {
        let mut options = SiteOptions::for_directory("content");
        options.default_renderer = Some("echo".to_string());
        let modules: ModuleMap = [
            ("content/about.md", RawModule::new(json!({}))),
            ("content/blog/first.md", RawModule::new(json!({}))),
        ]
        .into_iter()
        .map(|(key, module)| (key.to_string(), module))
        .collect();

        let provider = ContentProvider::new(
            ModSettings::new(options),
            ModLoader::new(vec![Arc::new(Site)]),
            move || Ok::<_, SiteError>(modules.clone()),
        );
        SiteEntry::new(provider, Arc::new(PassthroughHost))
    }

    #[test]
    fn static_inputs_use_slug_html() {
        let inputs = site().handle_static().unwrap();
        let filenames: Vec<_> = inputs.iter().map(|it| it.filename.as_str()).collect();
        assert_eq!(filenames, ["about.html", "blog/first.html"]);

        let id = parse_virtual_id(&inputs[1].entry_point).unwrap();
        assert_eq!(id.renderer, "echo");
        assert_eq!(id.props, json!({ "slug": "blog/first" }));
    }

    #[tokio::test]
    async fn dynamic_requests_render_by_slug() {
        let response = site().handle_dynamic("/blog/first").await.unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.content_type, "text/html");
        assert_eq!(response.body, "<h1>blog/first</h1>");
    }

    #[tokio::test]
    async fn unknown_slug_is_404() {
        let response = site().handle_dynamic("/nope").await.unwrap();
        assert_eq!(
            response,
            DynamicResponse {
                status: 404,
                content_type: "text/plain".to_string(),
                body: "404 does not exist - /nope".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn debug_path_lists_pages() {
        let response = site().handle_dynamic(DEBUG_PATH).await.unwrap();
        let listing: JsonValue = serde_json::from_str(&response.body).unwrap();
        let slugs: Vec<_> = listing["content"]
            .as_array()
            .unwrap()
            .iter()
            .map(|page| page["slug"].as_str().unwrap())
            .collect();
        assert_eq!(slugs, ["about", "blog/first"]);
    }

    #[test]
    fn debug_listing_shows_every_page() {
        assert_snapshot!(site().debug_listing().unwrap(), @r#"
        {
          "content": [
            {
              "hasData": false,
              "metadata": {},
              "module": {},
              "renderer": "echo",
              "slug": "about",
              "source": "content/about.md"
            },
            {
              "hasData": false,
              "metadata": {},
              "module": {},
              "renderer": "echo",
              "slug": "blog/first",
              "source": "content/blog/first.md"
            }
          ]
        }
        "#);
    }

    #[test]
    fn virtual_ids_reach_their_renderer() {
        let site = site();
        let id = RendererUtils::new(&PassthroughHost, "echo").generate_virtual_import(&json!({ "a": 1 }));
        assert_eq!(site.handle_virtual(&id).unwrap(), r#"export default {"a":1}"#);

        let unknown = RendererUtils::new(&PassthroughHost, "ghost").generate_virtual_import(&json!({}));
        let err = site.handle_virtual(&unknown).unwrap_err();
        assert_eq!(
            err.to_string(),
            "No renderer with the name 'ghost' found! This is while looking for a virtual renderer"
        );
    }
}
