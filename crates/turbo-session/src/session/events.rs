//! Web view input: script messages, script results, native loads and
//! navigation requests.

use tracing::{debug, info, warn};
use turbo_common::{BridgeError, VisitAction, VisitState};
use turbo_webview::{
    NavigationAction, NavigationDecision, NavigationEvent, NavigationPolicy, PageLoadDelegate,
    VisitEventDelegate, WebViewDelegate, WebViewEvent, WebViewHost,
};
use url::Url;

use super::{Session, SessionDelegate, Slot, VisitableHost};
use crate::visit::Visit;

impl<W: WebViewHost, H: VisitableHost + SessionDelegate> Session<W, H> {
    /// Route one queued web view event.
    pub fn handle_webview_event(&mut self, event: WebViewEvent) {
        match event {
            WebViewEvent::ScriptMessage { body } => self.receive_script_message(&body),
            WebViewEvent::ScriptResult { function, result } => {
                self.receive_script_result(&function, &result)
            }
            WebViewEvent::Navigation(event) => self.handle_navigation_event(&event),
            WebViewEvent::NavigationRequested(action) => {
                let policy = self.decide_navigation(&action);
                debug!(url = %action.url, ?policy, "navigation request handled");
            }
            WebViewEvent::TitleChanged { title } => debug!(title = %title, "title changed"),
        }
    }

    /// One raw message posted by the in-page adapter.
    pub fn receive_script_message(&mut self, body: &str) {
        if let Some(message) = self.bridge.receive_message(body) {
            message.dispatch(self);
        }
        self.drain_faults();
    }

    pub fn receive_script_result(&mut self, function: &str, raw: &str) {
        self.bridge.receive_script_result(function, raw);
    }

    /// Native page-load progress, relevant to a cold boot in flight.
    pub fn handle_navigation_event(&mut self, event: &NavigationEvent) {
        self.with_visit(Slot::Current, |visit, ctx| {
            visit.handle_navigation_event(ctx, event)
        });
        self.drain_faults();
    }

    /// Decide a navigation the web view is about to perform natively.
    ///
    /// A cold boot owns the web view until it settles; otherwise the
    /// in-page controller handles navigation and anything reaching the
    /// native layer leaves the application.
    pub fn decide_navigation(&mut self, action: &NavigationAction) -> NavigationPolicy {
        let booting = self
            .visits
            .get(Slot::Current)
            .is_some_and(|v| v.is_cold_boot() && v.state() == VisitState::Started);
        if booting {
            return NavigationPolicy::Allow;
        }

        let decision = NavigationDecision::new(action);
        if let Some(url) = &decision.externally_openable_url {
            info!(url = %url, "opening externally");
            self.core.host.open_external_url(url);
        } else if decision.should_reload_page {
            self.reload_topmost();
        }
        self.drain_faults();
        decision.policy
    }

    fn forward(&mut self, f: impl FnOnce(&mut Visit, &mut crate::visit::VisitContext<'_>)) {
        if !self.with_visit(Slot::Current, f) {
            debug!("visit event ignored: no current visit");
        }
    }
}

impl<W: WebViewHost, H: VisitableHost + SessionDelegate> WebViewDelegate for Session<W, H> {
    fn did_propose_visit(&mut self, location: Url, action: VisitAction) {
        debug!(location = %location, %action, "visit proposed");
        self.core.host.did_propose_visit(location, action);
    }

    fn did_invalidate_page(&mut self) {
        let Some(visitable) = self.topmost_visitable() else {
            return;
        };
        warn!(%visitable, "page invalidated, reloading");
        self.core.host.update_screenshot(visitable);
        self.core.host.show_screenshot(visitable);
        self.core.host.show_activity_indicator(visitable);
        self.reload_topmost();
    }

    /// The in-page controller can no longer be trusted: demote to a cold
    /// boot of the current visit's surface.
    fn did_fail_script_evaluation(&mut self, error: &BridgeError) {
        if !error.is_structural() || !self.core.initialized {
            return;
        }
        let Some(visitable) = self.current_visit().map(Visit::visitable) else {
            return;
        };
        warn!(%visitable, error = %error, "in-page controller lost, falling back to cold boot");
        self.core.initialized = false;
        self.with_visit(Slot::Current, |visit, ctx| visit.cancel(ctx));
        self.visit_visitable(visitable, VisitAction::Advance);
    }
}

impl<W: WebViewHost, H: VisitableHost + SessionDelegate> PageLoadDelegate for Session<W, H> {
    fn did_load_page(&mut self, restoration_identifier: String) {
        self.forward(|visit, ctx| visit.page_loaded(ctx, restoration_identifier));
    }
}

impl<W: WebViewHost, H: VisitableHost + SessionDelegate> VisitEventDelegate for Session<W, H> {
    fn did_start_visit(&mut self, identifier: &str, has_cached_snapshot: bool) {
        self.forward(|visit, ctx| visit.did_start_visit(ctx, identifier, has_cached_snapshot));
    }

    fn did_start_request(&mut self, identifier: &str) {
        self.forward(|visit, ctx| visit.did_start_request(ctx, identifier));
    }

    fn did_complete_request(&mut self, identifier: &str) {
        self.forward(|visit, ctx| visit.did_complete_request(ctx, identifier));
    }

    fn did_fail_request(&mut self, identifier: &str, status_code: u16) {
        self.forward(|visit, ctx| visit.did_fail_request(ctx, identifier, status_code));
    }

    fn did_finish_request(&mut self, identifier: &str) {
        self.forward(|visit, ctx| visit.did_finish_request(ctx, identifier));
    }

    fn did_render(&mut self, identifier: &str) {
        self.forward(|visit, ctx| visit.did_render(ctx, identifier));
    }

    fn did_complete_visit(&mut self, identifier: &str, restoration_identifier: String) {
        self.forward(|visit, ctx| visit.did_complete_visit(ctx, identifier, restoration_identifier));
    }
}
