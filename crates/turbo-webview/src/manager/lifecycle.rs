use std::sync::Arc;

use tracing::debug;
use wry::raw_window_handle;
use wry::WebViewBuilder;

use super::handle::WebViewHandle;
use super::types::WebViewConfig;
use super::WebViewManager;

impl WebViewManager {
    /// Create the web view as a child of the given window.
    ///
    /// The web view starts on a blank page; the session's first cold-boot
    /// visit loads the real location through [`WebViewHandle`].
    pub fn create<W: raw_window_handle::HasWindowHandle>(
        &self,
        window: &W,
        bounds: wry::Rect,
        config: WebViewConfig,
    ) -> Result<WebViewHandle, wry::Error> {
        let adapter = config.initialization_script();

        let mut builder = WebViewBuilder::new()
            .with_bounds(bounds)
            .with_transparent(config.transparent)
            .with_devtools(config.devtools)
            .with_clipboard(config.clipboard)
            .with_autoplay(config.autoplay)
            .with_initialization_script(&adapter)
            .with_html("<html><body></body></html>");

        if let Some(ua) = &config.user_agent {
            builder = builder.with_user_agent(ua);
        }

        // Page -> host messages
        builder = Self::attach_ipc_handler(builder, Arc::clone(&self.events));

        builder = Self::attach_page_load_handler(
            builder,
            Arc::clone(&self.events),
            Arc::clone(&self.loads),
            Arc::clone(&self.gate),
        );

        builder = Self::attach_title_handler(builder, Arc::clone(&self.events));

        builder = Self::attach_navigation_handler(
            builder,
            Arc::clone(&self.events),
            Arc::clone(&self.gate),
            config.allowed_origins.clone(),
        );

        let webview = builder.build_as_child(window)?;

        debug!(handler = %config.message_handler, "web view created");

        Ok(WebViewHandle {
            webview,
            events: Arc::clone(&self.events),
            loads: Arc::clone(&self.loads),
            gate: Arc::clone(&self.gate),
            current_url: "about:blank".to_string(),
            current_title: String::new(),
        })
    }
}
