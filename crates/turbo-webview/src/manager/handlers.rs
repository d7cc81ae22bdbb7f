use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tracing::{debug, warn};
use url::Url;
use wry::WebViewBuilder;

use crate::events::{LoadTracker, PageLoadState, WebViewEvent};
use crate::navigation::{is_navigation_allowed, NavigationAction, NavigationType};

use super::WebViewManager;

// =============================================================================
// NAVIGATION GATE
// =============================================================================

/// Tracks whether a host-initiated page load is in flight.
///
/// While open, main-frame navigations on the allowlist load in place (the
/// requested URL and any redirects). While closed, every native navigation
/// is the page trying to leave the controller's hands and is reported as
/// [`WebViewEvent::NavigationRequested`] instead.
#[derive(Debug, Default)]
pub struct NavigationGate {
    open: AtomicBool,
}

impl NavigationGate {
    pub fn open(&self) {
        self.open.store(true, Ordering::SeqCst);
    }

    pub fn close(&self) {
        self.open.store(false, Ordering::SeqCst);
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    /// Decide a native navigation to `url`. `Ok(())` loads in place,
    /// `Err(action)` cancels it and hands `action` to the session.
    pub fn check(&self, url: &str, allowed: &[String]) -> Result<(), Option<NavigationAction>> {
        if url == "about:blank" {
            return Ok(());
        }
        if self.is_open() && is_navigation_allowed(url, allowed) {
            return Ok(());
        }
        let action = Url::parse(url).ok().map(|url| NavigationAction {
            url,
            navigation_type: NavigationType::Other,
            main_frame: true,
        });
        Err(action)
    }
}

// =============================================================================
// HANDLER ATTACHMENTS
// =============================================================================

fn push(events: &Mutex<Vec<WebViewEvent>>, event: WebViewEvent) {
    if let Ok(mut evts) = events.lock() {
        evts.push(event);
    }
}

impl WebViewManager {
    pub(super) fn attach_ipc_handler<'a>(
        builder: WebViewBuilder<'a>,
        events: Arc<Mutex<Vec<WebViewEvent>>>,
    ) -> WebViewBuilder<'a> {
        builder.with_ipc_handler(move |request| {
            let body = request.body().to_string();

            if serde_json::from_str::<serde_json::Value>(&body).is_err() {
                warn!(body_len = body.len(), "script message rejected: invalid JSON");
                return;
            }

            debug!(body_len = body.len(), "script message from page");
            push(&events, WebViewEvent::ScriptMessage { body });
        })
    }

    pub(super) fn attach_page_load_handler<'a>(
        builder: WebViewBuilder<'a>,
        events: Arc<Mutex<Vec<WebViewEvent>>>,
        loads: Arc<LoadTracker>,
        gate: Arc<NavigationGate>,
    ) -> WebViewBuilder<'a> {
        builder.with_on_page_load_handler(move |event, url| {
            let state = PageLoadState::from(event);
            let event = match state {
                PageLoadState::Started => loads.started(&url),
                PageLoadState::Finished => loads.finished(),
            };
            let Some(event) = event else {
                debug!(?state, url = %url, "page load ignored: not a requested load");
                return;
            };
            debug!(navigation = %event.navigation(), ?state, url = %url, "page load");

            // A newer load may still need the gate to pass its navigation.
            if state == PageLoadState::Finished && !loads.has_pending() {
                gate.close();
            }
            push(&events, WebViewEvent::Navigation(event));
        })
    }

    pub(super) fn attach_title_handler<'a>(
        builder: WebViewBuilder<'a>,
        events: Arc<Mutex<Vec<WebViewEvent>>>,
    ) -> WebViewBuilder<'a> {
        builder.with_document_title_changed_handler(move |title| {
            debug!(title = %title, "title changed");
            push(&events, WebViewEvent::TitleChanged { title });
        })
    }

    pub(super) fn attach_navigation_handler<'a>(
        builder: WebViewBuilder<'a>,
        events: Arc<Mutex<Vec<WebViewEvent>>>,
        gate: Arc<NavigationGate>,
        allowed: Vec<String>,
    ) -> WebViewBuilder<'a> {
        builder.with_navigation_handler(move |url| match gate.check(&url, &allowed) {
            Ok(()) => {
                debug!(url = %url, "navigation allowed");
                true
            }
            Err(Some(action)) => {
                debug!(url = %url, "navigation handed to session");
                push(&events, WebViewEvent::NavigationRequested(action));
                false
            }
            Err(None) => {
                warn!(url = %url, "navigation blocked: unparseable URL");
                false
            }
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================
