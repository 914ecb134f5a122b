//! End-to-end discovery with the built-in mods.

use insta::assert_snapshot;
use once_cell::sync::Lazy;
use serde_json::json;
use ssgmods_core::data_api::data_loader;
use ssgmods_core::{
    ContentProvider, MetaValue, ModLoader, ModSettings, ModuleMap, PageDescriptor,
    PassthroughHost, RawModule, SiteEntry, SiteError, SiteOptions,
};
use ssgmods_mods::{CustomizedSlugMod, IndexPageMod, ModsConfig, OutOfBoxDefaultsMod};
use std::sync::Arc;

static OPTIONS: Lazy<SiteOptions> = Lazy::new(|| {
    let mut options = SiteOptions::for_directory("content");
    options.config_filenames = vec!["_meta".to_string(), "_meta.yaml".to_string()];
    options.default_renderer = Some("preact".to_string());
    options
});

fn modules(entries: Vec<(&str, RawModule)>) -> ModuleMap {
    entries
        .into_iter()
        .map(|(key, module)| (key.to_string(), module))
        .collect()
}

fn provider(loader: ModLoader, modules: ModuleMap) -> ContentProvider {
    ContentProvider::new(ModSettings::new(OPTIONS.clone()), loader, move || {
        Ok::<_, SiteError>(modules.clone())
    })
}

fn defaults() -> ModLoader {
    ModLoader::new(vec![Arc::new(OutOfBoxDefaultsMod)])
}

fn slugs(pages: &[PageDescriptor]) -> Vec<&str> {
    pages.iter().map(|page| page.slug.as_str()).collect()
}

#[test]
fn index_and_named_slugs() {
    let provider = provider(
        defaults(),
        modules(vec![
            ("content/a/(index).page.tsx", RawModule::new(json!({}))),
            (
                "content/a/b.page.tsx",
                RawModule::new(json!({ "meta": { "slug": { "name": "custom" } } })),
            ),
        ]),
    );

    let pages = provider.get_all_content().unwrap();
    assert_eq!(slugs(&pages), ["a", "a/custom"]);
    assert!(pages.iter().all(|page| page.renderer == "preact"));
}

#[test]
fn suffix_classification() {
    let provider = provider(
        defaults(),
        modules(vec![
            ("content/x/y/article.page.tsx", RawModule::new(json!({}))),
            ("content/x/y/article.tsx", RawModule::new(json!({}))),
            ("content/x/y/notes.md", RawModule::new(json!({}))),
        ]),
    );

    let pages = provider.get_all_content().unwrap();
    assert_eq!(slugs(&pages), ["x/y/article", "x/y/notes"]);
}

#[test]
fn extension_pages_only_lose_their_extension() {
    let provider = provider(
        defaults(),
        modules(vec![("content/x/y/article.page.md", RawModule::new(json!({})))]),
    );

    let pages = provider.get_all_content().unwrap();
    assert_eq!(slugs(&pages), ["x/y/article.page"]);
}

#[test]
fn root_index_becomes_index() {
    let provider = provider(
        defaults(),
        modules(vec![("content/(root).page.tsx", RawModule::new(json!({})))]),
    );
    assert_eq!(slugs(&provider.get_all_content().unwrap()), ["index"]);
}

#[test]
fn frontmatter_is_copied_and_slug_applied() {
    let provider = provider(
        defaults(),
        modules(vec![
            (
                "content/blog/hello.md",
                RawModule::from_markdown("---\ntitle: Hello\nslug: greetings\n---\n# Hello\n").unwrap(),
            ),
            (
                "content/blog/plain.md",
                RawModule::from_markdown("# No frontmatter\n").unwrap(),
            ),
        ]),
    );

    let pages = provider.get_all_content().unwrap();
    assert_eq!(slugs(&pages), ["greetings", "blog/plain"]);

    let hello = &pages[0];
    assert_eq!(
        hello.metadata.get("frontmatter").and_then(MetaValue::as_json),
        Some(&json!({ "title": "Hello", "slug": "greetings" }))
    );
    assert_eq!(hello.metadata.get_str("slug"), Some("greetings"));

    // an empty frontmatter object is still copied, but has no slug
    assert!(pages[1].metadata.get("slug").is_none());
}

#[test]
fn shared_meta_files_apply_to_descendants() {
    let provider = provider(
        defaults(),
        modules(vec![
            (
                "content/docs/_meta.yaml",
                RawModule::from_meta_yaml("renderer: docs\nslug:\n  path: guide\n").unwrap(),
            ),
            ("content/docs/intro.md", RawModule::new(json!({}))),
            ("content/docs/(index).page.tsx", RawModule::new(json!({}))),
            ("content/other.md", RawModule::new(json!({}))),
        ]),
    );

    let pages = provider.get_all_content().unwrap();
    let summary: Vec<_> = pages
        .iter()
        .map(|page| (page.slug.as_str(), page.renderer.as_str()))
        .collect();
    // `docs/(index)` moves to `guide/(index)` and then folds into `guide`
    assert_eq!(
        summary,
        [("guide", "docs"), ("guide/intro", "docs"), ("other", "preact")]
    );
}

#[test]
fn slug_priority_follows_metadata_chain() {
    let provider = provider(
        defaults(),
        modules(vec![
            (
                "content/a/_meta",
                RawModule::new(json!({ "meta": { "slug": { "path": "shared" } } })),
            ),
            (
                "content/a/b/post.md",
                RawModule::new(json!({ "meta": { "slug": { "name": "own" } } })),
            ),
        ]),
    );

    let pages = provider.get_all_content().unwrap();
    let sources: Vec<_> = pages[0]
        .metadata
        .describe_all("slug")
        .map(|property| property.source)
        .collect();
    assert_eq!(sources, ["content/a/b/post.md", "content/a/_meta"]);
    assert_eq!(slugs(&pages), ["shared/own"]);
}

#[test]
fn explicit_mods_are_not_duplicated() {
    let loader = ModLoader::new(vec![
        Arc::new(OutOfBoxDefaultsMod),
        Arc::new(CustomizedSlugMod),
        Arc::new(IndexPageMod),
    ]);

    // customizer once from the user, index folding from both pages and the
    // standalone mod
    assert_eq!(loader.postprocess.len(), 3);
    assert_eq!(loader.contribute_data.len(), 1);

    let provider = provider(
        loader,
        modules(vec![("content/blog/(index).page.tsx", RawModule::new(json!({})))]),
    );
    assert_eq!(slugs(&provider.get_all_content().unwrap()), ["blog"]);
}

#[test]
fn configured_mods_from_json() {
    let config: ModsConfig = serde_json::from_value(json!({
        "outOfBoxDefaults": false,
        "pages": { "pageSuffixes": ["route"], "enableIndexSlugs": true },
        "customizedSlugs": true,
    }))
    .unwrap();

    let provider = provider(
        ModLoader::new(config.build()),
        modules(vec![
            ("content/team/(index).route.tsx", RawModule::new(json!({}))),
            ("content/team/join.page.tsx", RawModule::new(json!({}))),
            ("content/notes.md", RawModule::new(json!({}))),
        ]),
    );
    assert_eq!(slugs(&provider.get_all_content().unwrap()), ["team"]);
}

#[test]
fn debug_listing() {
    let provider = provider(
        defaults(),
        modules(vec![(
            "content/about.md",
            RawModule::new(json!({ "frontmatter": { "title": "About" } })).with_meta(
                "getData",
                MetaValue::Loader(data_loader(|_| async { Ok::<_, SiteError>(json!({})) })),
            ),
        )]),
    );
    let site = SiteEntry::new(provider, Arc::new(PassthroughHost));

    assert_snapshot!(site.debug_listing().unwrap(), @r#"
    {
      "content": [
        {
          "hasData": true,
          "metadata": {
            "frontmatter": {
              "title": "About"
            },
            "getData": "$$FUNCTION$$"
          },
          "module": {
            "frontmatter": {
              "title": "About"
            }
          },
          "renderer": "preact",
          "slug": "about",
          "source": "content/about.md"
        }
      ]
    }
    "#);
}
