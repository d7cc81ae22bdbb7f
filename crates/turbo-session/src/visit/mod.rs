//! One navigation attempt.
//!
//! A [`Visit`] owns the guarded transitions shared by both strategies:
//!
//! - overall state moves `Initialized -> Started -> {Canceled | Failed | Completed}`
//!   and every transition fires its side effects at most once
//! - request bookkeeping (`start_request` / `finish_request`) is tracked
//!   separately and notifies at most once each
//! - navigation completion opens the visit's [`Lock`], releasing deferred
//!   page mutations in order
//!
//! The strategy-specific hooks live in `cold_boot.rs` and `script.rs`.
//! Visits never own their collaborators: every operation takes a
//! [`VisitContext`] borrowing the driver (the bridge) and the delegate (the
//! session) for the duration of the call.

mod cold_boot;
mod script;


use tracing::{debug, info};
use turbo_common::{VisitAction, VisitError, VisitId, VisitState, VisitableId};
use turbo_webview::{NavigationId, WebViewBridge, WebViewHost};
use url::Url;

use crate::lock::Lock;

// =============================================================================
// COLLABORATORS
// =============================================================================

/// Commands a visit issues to the web view.
pub trait VisitDriver {
    /// Full native page load.
    fn load_page(&mut self, location: &Url) -> turbo_common::Result<NavigationId>;
    fn stop_loading(&mut self);
    fn visit_location(
        &mut self,
        location: &Url,
        action: VisitAction,
        restoration_identifier: Option<&str>,
    );
    fn issue_request(&mut self, identifier: &str);
    fn change_history(&mut self, identifier: &str);
    fn restore_snapshot(&mut self, identifier: &str);
    fn load_response(&mut self, identifier: &str);
    fn cancel_visit(&mut self, identifier: &str);
}

impl<W: WebViewHost> VisitDriver for WebViewBridge<W> {
    fn load_page(&mut self, location: &Url) -> turbo_common::Result<NavigationId> {
        WebViewBridge::load_page(self, location)
    }

    fn stop_loading(&mut self) {
        WebViewBridge::stop_loading(self);
    }

    fn visit_location(
        &mut self,
        location: &Url,
        action: VisitAction,
        restoration_identifier: Option<&str>,
    ) {
        WebViewBridge::visit_location(self, location, action, restoration_identifier);
    }

    fn issue_request(&mut self, identifier: &str) {
        WebViewBridge::issue_request(self, identifier);
    }

    fn change_history(&mut self, identifier: &str) {
        WebViewBridge::change_history(self, identifier);
    }

    fn restore_snapshot(&mut self, identifier: &str) {
        WebViewBridge::restore_snapshot(self, identifier);
    }

    fn load_response(&mut self, identifier: &str) {
        WebViewBridge::load_response(self, identifier);
    }

    fn cancel_visit(&mut self, identifier: &str) {
        WebViewBridge::cancel_visit(self, identifier);
    }
}

/// Lifecycle notifications a visit sends to its owner.
pub trait VisitDelegate {
    /// Before the state flips to `Started`.
    fn visit_will_start(&mut self, visit: &Visit);
    fn visit_did_start(&mut self, visit: &Visit);
    fn visit_did_complete(&mut self, visit: &Visit);
    fn visit_did_fail(&mut self, visit: &Visit);
    /// After `visit_did_complete` or `visit_did_fail`.
    fn visit_did_finish(&mut self, visit: &Visit);
    /// Just before the in-page controller swaps in the new response.
    fn visit_will_load_response(&mut self, visit: &Visit);
    fn visit_did_render(&mut self, visit: &Visit);
    /// A cold boot finished and the in-page controller is ready.
    fn visit_did_initialize_web_view(&mut self, visit: &Visit);
    fn visit_request_did_start(&mut self, visit: &Visit);
    fn visit_request_did_fail(&mut self, visit: &Visit, error: &VisitError);
    fn visit_request_did_finish(&mut self, visit: &Visit);
}

/// Borrowed collaborators for one visit operation.
pub struct VisitContext<'a> {
    pub driver: &'a mut dyn VisitDriver,
    pub delegate: &'a mut dyn VisitDelegate,
}

// =============================================================================
// STATE
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestState {
    #[default]
    NotStarted,
    Started,
    Finished,
}

/// Page mutation deferred until navigation completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AfterNavigation {
    /// Push/replace the history entry, then show a cached snapshot if any.
    ChangeHistory { identifier: String },
    /// Swap the loaded response into the page.
    LoadResponse { identifier: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Strategy {
    /// Full page load; `navigation` is known once the load starts.
    ColdBoot { navigation: Option<NavigationId> },
    /// Delegated to the in-page controller; `identifier` is assigned by it.
    ScriptDriven { identifier: Option<String> },
}

#[derive(Debug)]
pub struct Visit {
    id: VisitId,
    visitable: VisitableId,
    location: Url,
    action: VisitAction,
    state: VisitState,
    strategy: Strategy,
    restoration_identifier: Option<String>,
    has_cached_snapshot: bool,
    request: RequestState,
    navigation_completed: bool,
    navigation_lock: Lock<AfterNavigation>,
    error: Option<VisitError>,
}

impl Visit {
    /// A visit performed with a full page load.
    pub fn cold_boot(visitable: VisitableId, location: Url, action: VisitAction) -> Self {
        Self::new(
            visitable,
            location,
            action,
            Strategy::ColdBoot { navigation: None },
            None,
        )
    }

    /// A visit delegated to an initialized in-page controller.
    /// `restoration_identifier` lets the controller look for a cached
    /// snapshot of the surface.
    pub fn script_driven(
        visitable: VisitableId,
        location: Url,
        action: VisitAction,
        restoration_identifier: Option<String>,
    ) -> Self {
        Self::new(
            visitable,
            location,
            action,
            Strategy::ScriptDriven { identifier: None },
            restoration_identifier,
        )
    }

    fn new(
        visitable: VisitableId,
        location: Url,
        action: VisitAction,
        strategy: Strategy,
        restoration_identifier: Option<String>,
    ) -> Self {
        Self {
            id: VisitId::new(),
            visitable,
            location,
            action,
            state: VisitState::Initialized,
            strategy,
            restoration_identifier,
            has_cached_snapshot: false,
            request: RequestState::NotStarted,
            navigation_completed: false,
            navigation_lock: Lock::new(),
            error: None,
        }
    }

    // -- Accessors --

    pub fn id(&self) -> &VisitId {
        &self.id
    }

    pub fn visitable(&self) -> VisitableId {
        self.visitable
    }

    pub fn location(&self) -> &Url {
        &self.location
    }

    pub fn action(&self) -> VisitAction {
        self.action
    }

    pub fn state(&self) -> VisitState {
        self.state
    }

    pub fn is_cold_boot(&self) -> bool {
        matches!(self.strategy, Strategy::ColdBoot { .. })
    }

    /// Identifier assigned by the in-page controller (script-driven only).
    pub fn identifier(&self) -> Option<&str> {
        match &self.strategy {
            Strategy::ScriptDriven { identifier } => identifier.as_deref(),
            Strategy::ColdBoot { .. } => None,
        }
    }

    /// Native load backing a cold boot, once started.
    pub fn navigation(&self) -> Option<NavigationId> {
        match &self.strategy {
            Strategy::ColdBoot { navigation } => *navigation,
            Strategy::ScriptDriven { .. } => None,
        }
    }

    pub fn restoration_identifier(&self) -> Option<&str> {
        self.restoration_identifier.as_deref()
    }

    pub fn has_cached_snapshot(&self) -> bool {
        self.has_cached_snapshot
    }

    pub fn request_state(&self) -> RequestState {
        self.request
    }

    pub fn is_navigation_completed(&self) -> bool {
        self.navigation_completed
    }

    /// Deferred page mutations waiting for navigation completion.
    pub fn pending_after_navigation(&self) -> &[AfterNavigation] {
        self.navigation_lock.pending()
    }

    /// The classified request failure, once the visit has failed.
    pub fn error(&self) -> Option<&VisitError> {
        self.error.as_ref()
    }

    fn kind(&self) -> &'static str {
        match self.strategy {
            Strategy::ColdBoot { .. } => "cold_boot",
            Strategy::ScriptDriven { .. } => "script",
        }
    }

    // -- Transitions --

    pub fn start(&mut self, ctx: &mut VisitContext<'_>) {
        if self.state != VisitState::Initialized {
            return;
        }
        info!(
            visit = %self.id,
            kind = self.kind(),
            action = %self.action,
            location = %self.location,
            "visit starting"
        );
        ctx.delegate.visit_will_start(self);
        self.state = VisitState::Started;
        match self.strategy {
            Strategy::ColdBoot { .. } => self.start_cold_boot(ctx),
            Strategy::ScriptDriven { .. } => self.start_script(ctx),
        }
    }

    /// Abort a started visit. Reports no completion or failure.
    pub fn cancel(&mut self, ctx: &mut VisitContext<'_>) {
        if self.state != VisitState::Started {
            return;
        }
        info!(visit = %self.id, "visit canceled");
        self.state = VisitState::Canceled;
        match self.strategy {
            Strategy::ColdBoot { .. } => self.cancel_cold_boot(ctx),
            Strategy::ScriptDriven { .. } => self.cancel_script(ctx),
        }
    }

    fn complete(&mut self, ctx: &mut VisitContext<'_>) {
        if self.state != VisitState::Started {
            return;
        }
        info!(visit = %self.id, restoration = ?self.restoration_identifier, "visit completed");
        self.state = VisitState::Completed;
        if let Strategy::ColdBoot { .. } = self.strategy {
            self.complete_cold_boot(ctx);
        }
        ctx.delegate.visit_did_complete(self);
        ctx.delegate.visit_did_finish(self);
    }

    fn fail(&mut self, ctx: &mut VisitContext<'_>, error: VisitError) {
        if self.state != VisitState::Started {
            return;
        }
        info!(visit = %self.id, error = %error, "visit failed");
        self.state = VisitState::Failed;
        ctx.delegate.visit_request_did_fail(self, &error);
        self.error = Some(error);
        // Both strategies only need to settle request bookkeeping here.
        self.finish_request(ctx);
        ctx.delegate.visit_did_fail(self);
        ctx.delegate.visit_did_finish(self);
    }

    /// The host finished the visual transition to this visit's surface.
    /// Releases deferred page mutations; a second call does nothing.
    pub fn complete_navigation(&mut self, ctx: &mut VisitContext<'_>) {
        if self.state != VisitState::Started || self.navigation_completed {
            return;
        }
        debug!(visit = %self.id, "navigation completed");
        self.navigation_completed = true;

        for deferred in self.navigation_lock.unlock() {
            if self.state == VisitState::Canceled {
                debug!(visit = %self.id, ?deferred, "deferred work skipped: visit canceled");
                continue;
            }
            self.run_after_navigation(ctx, deferred);
        }
    }

    fn after_navigation_completion(&mut self, ctx: &mut VisitContext<'_>, deferred: AfterNavigation) {
        if let Some(deferred) = self.navigation_lock.after_unlock(deferred) {
            if self.state != VisitState::Canceled {
                self.run_after_navigation(ctx, deferred);
            }
        }
    }

    fn run_after_navigation(&mut self, ctx: &mut VisitContext<'_>, deferred: AfterNavigation) {
        match deferred {
            AfterNavigation::ChangeHistory { identifier } => {
                ctx.driver.change_history(&identifier);
                ctx.driver.restore_snapshot(&identifier);
            }
            AfterNavigation::LoadResponse { identifier } => {
                ctx.delegate.visit_will_load_response(self);
                ctx.driver.load_response(&identifier);
            }
        }
    }

    // -- Request bookkeeping --

    fn start_request(&mut self, ctx: &mut VisitContext<'_>) {
        if self.request == RequestState::NotStarted {
            self.request = RequestState::Started;
            ctx.delegate.visit_request_did_start(self);
        }
    }

    fn finish_request(&mut self, ctx: &mut VisitContext<'_>) {
        if self.request == RequestState::Started {
            self.request = RequestState::Finished;
            ctx.delegate.visit_request_did_finish(self);
        }
    }
}
