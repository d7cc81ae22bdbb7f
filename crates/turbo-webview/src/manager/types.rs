use crate::script::adapter_script;

/// Configuration for creating the shared web view.
#[derive(Debug, Clone)]
pub struct WebViewConfig {
    /// Name of the page-side channel the adapter posts through. `wry`
    /// exposes `window.ipc`.
    pub message_handler: String,
    pub transparent: bool,
    pub devtools: bool,
    pub user_agent: Option<String>,
    /// URL prefixes the web view may load in place.
    pub allowed_origins: Vec<String>,
    pub clipboard: bool,
    pub autoplay: bool,
}

impl Default for WebViewConfig {
    fn default() -> Self {
        Self {
            message_handler: "ipc".to_string(),
            transparent: false,
            devtools: cfg!(debug_assertions),
            user_agent: Some("TurboBridge/0.1".to_string()),
            allowed_origins: Vec::new(),
            clipboard: true,
            autoplay: true,
        }
    }
}

impl WebViewConfig {
    /// The initialization script installed into every page.
    pub fn initialization_script(&self) -> String {
        adapter_script(&self.message_handler)
    }
}
