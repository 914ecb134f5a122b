//! Names shared with the JavaScript side of the plugin.

/// Plugin name as registered with the dev server.
pub const PLUGIN_NAME: &str = "vite-plugin-ssg-pages";
/// Prefix of every virtual module id the plugin owns.
pub const VIRTUAL_PREFIX: &str = "virtual:vite-plugin-ssg-pages";
/// Virtual module exposing the eager content glob.
pub const VIRTUAL_CONTENT_ID: &str = "virtual:vite-plugin-ssg-pages:content";
/// Prefix of renderer-generated page modules.
pub const GENERATED_PAGE_PREFIX: &str = "virtual:vite-plugin-ssg-pages:generated-page";
/// Token replaced with collected styles in statically generated html.
pub const STYLE_REPLACEMENT_TOKEN: &str = "STYLES_GO_HERE";
/// Dev-server path serving the JSON listing of every page.
pub const DEBUG_PATH: &str = "/$/debug";
