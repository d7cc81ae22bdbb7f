use std::sync::{Arc, Mutex};

use tracing::{debug, warn};
use turbo_common::TurboError;
use url::Url;
use wry::WebView;

use crate::bridge::WebViewHost;
use crate::events::{LoadTracker, NavigationId, WebViewEvent};

use super::handlers::NavigationGate;

/// Handle to the shared web view. Implements [`WebViewHost`] so the
/// session's bridge can drive it.
pub struct WebViewHandle {
    pub(super) webview: WebView,
    pub(super) events: Arc<Mutex<Vec<WebViewEvent>>>,
    pub(super) loads: Arc<LoadTracker>,
    pub(super) gate: Arc<NavigationGate>,
    /// Current URL (best-effort tracking).
    pub(super) current_url: String,
    pub(super) current_title: String,
}

impl WebViewHandle {
    pub fn current_url(&self) -> &str {
        &self.current_url
    }

    pub fn current_title(&self) -> &str {
        &self.current_title
    }

    pub fn set_title(&mut self, title: String) {
        self.current_title = title;
    }

    /// Set the web view bounds (position + size) within the parent window.
    pub fn set_bounds(&self, bounds: wry::Rect) -> Result<(), wry::Error> {
        self.webview.set_bounds(bounds)
    }

    pub fn set_visible(&self, visible: bool) -> Result<(), wry::Error> {
        self.webview.set_visible(visible)
    }

    pub fn focus(&self) -> Result<(), wry::Error> {
        self.webview.focus()
    }

    /// Open devtools (if enabled).
    pub fn open_devtools(&self) {
        self.webview.open_devtools();
    }

    pub fn inner(&self) -> &WebView {
        &self.webview
    }
}

impl WebViewHost for WebViewHandle {
    fn evaluate_script(&mut self, function: &str, script: &str) -> turbo_common::Result<()> {
        let events = Arc::clone(&self.events);
        let function_name = function.to_string();
        self.webview
            .evaluate_script_with_callback(script, move |result| {
                if let Ok(mut evts) = events.lock() {
                    evts.push(WebViewEvent::ScriptResult {
                        function: function_name.clone(),
                        result,
                    });
                }
            })
            .map_err(|e| TurboError::WebView(e.to_string()))
    }

    fn load_url(&mut self, url: &Url) -> turbo_common::Result<NavigationId> {
        let navigation = self.loads.begin(url);
        self.gate.open();
        self.webview.load_url(url.as_str()).map_err(|e| {
            self.gate.close();
            TurboError::WebView(e.to_string())
        })?;
        self.current_url = url.to_string();
        debug!(%navigation, url = %url, "native load requested");
        Ok(navigation)
    }

    fn stop_loading(&mut self) {
        self.gate.close();
        if let Err(e) = self.webview.evaluate_script("window.stop()") {
            warn!(error = %e, "failed to stop page load");
        }
    }
}
