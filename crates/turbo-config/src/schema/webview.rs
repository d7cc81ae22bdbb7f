use serde::{Deserialize, Serialize};

/// Settings for the shared web view.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebViewSettings {
    pub user_agent: Option<String>,
    /// Enable dev tools (always on in debug builds by default).
    pub devtools: bool,
    pub transparent: bool,
    /// URL prefixes the web view may load in place. Empty allows any
    /// http(s) location.
    pub allowed_origins: Vec<String>,
}

impl Default for WebViewSettings {
    fn default() -> Self {
        Self {
            user_agent: Some("TurboBridge/0.1".to_string()),
            devtools: cfg!(debug_assertions),
            transparent: false,
            allowed_origins: Vec::new(),
        }
    }
}
