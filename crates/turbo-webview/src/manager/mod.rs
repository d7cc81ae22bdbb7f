//! `wry`-backed web view host.
//!
//! `WebViewManager` builds the single shared `wry::WebView` the session
//! drives. Everything the web view reports (script messages, page loads,
//! navigation requests, script results) is pushed into a shared queue that
//! the event loop drains and feeds to the session.

use std::sync::{Arc, Mutex};

use crate::events::{LoadTracker, WebViewEvent};

mod handle;
pub mod handlers;
mod lifecycle;
mod types;

pub use handle::WebViewHandle;
pub use handlers::NavigationGate;
pub use types::WebViewConfig;

/// Owns the event queue shared by every handler of the web view.
pub struct WebViewManager {
    /// Event sink. Handlers push here, the main event loop drains.
    pub(crate) events: Arc<Mutex<Vec<WebViewEvent>>>,
    /// Attributes page-load reports to host-initiated loads.
    pub(crate) loads: Arc<LoadTracker>,
    pub(crate) gate: Arc<NavigationGate>,
}

impl WebViewManager {
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
            loads: Arc::new(LoadTracker::new()),
            gate: Arc::new(NavigationGate::default()),
        }
    }

    /// Drain all pending events.
    pub fn drain_events(&self) -> Vec<WebViewEvent> {
        match self.events.lock() {
            Ok(mut events) => std::mem::take(&mut *events),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl Default for WebViewManager {
    fn default() -> Self {
        Self::new()
    }
}
