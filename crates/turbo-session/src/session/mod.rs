//! Session orchestration.
//!
//! A [`Session`] owns the web view bridge and at most one current and one
//! topmost [`Visit`]. Every entry point runs to completion on the caller's
//! thread: the application feeds it host callbacks (surface appearance,
//! reload requests) and web view events (script messages, native loads,
//! navigation requests) one at a time.
//!
//! Internally the session is split so a visit can borrow the bridge as its
//! [`VisitDriver`](crate::VisitDriver) and the session state as its
//! [`VisitDelegate`](crate::VisitDelegate) at the same time:
//!
//! - `bridge` drives the web view
//! - `core` holds flags, the restoration map and the surface host
//! - `visits` holds the current and topmost visits by id

mod appearance;
mod delegate;
mod events;
mod host;

#[cfg(test)]
mod tests;

pub use host::{SessionDelegate, VisitableHost};

use std::collections::HashMap;

use tracing::{debug, info, warn};
use turbo_common::{VisitAction, VisitId, VisitableId};
use turbo_webview::{WebViewBridge, WebViewDelegate, WebViewHost};

use crate::visit::{Visit, VisitContext};

/// Session state a visit reports to.
pub(crate) struct SessionCore<H> {
    host: H,
    /// The in-page controller finished a cold boot and accepts script visits.
    initialized: bool,
    refreshing: bool,
    /// Surface currently holding the shared web view.
    activated: Option<VisitableId>,
    restoration_identifiers: HashMap<VisitableId, String>,
}

impl<H: VisitableHost> SessionCore<H> {
    /// Give the shared web view to `visitable`, screenshotting whichever
    /// surface held it before.
    fn activate(&mut self, visitable: VisitableId) {
        if self.activated == Some(visitable) {
            return;
        }
        if let Some(previous) = self.activated {
            self.deactivate(previous, true);
        }
        debug!(%visitable, "web view activated");
        self.host.activate_web_view(visitable);
        self.activated = Some(visitable);
    }

    fn deactivate(&mut self, visitable: VisitableId, show_screenshot: bool) {
        if self.activated != Some(visitable) {
            return;
        }
        if show_screenshot {
            self.host.update_screenshot(visitable);
            self.host.show_screenshot(visitable);
        }
        debug!(%visitable, "web view deactivated");
        self.host.deactivate_web_view(visitable);
        self.activated = None;
    }
}

#[derive(Debug, Clone, Copy)]
enum Slot {
    Current,
    Topmost,
}

/// Current and topmost visits. Anything else is dropped.
#[derive(Debug, Default)]
struct Visits {
    arena: HashMap<VisitId, Visit>,
    current: Option<VisitId>,
    topmost: Option<VisitId>,
}

impl Visits {
    fn key(&self, slot: Slot) -> Option<&VisitId> {
        match slot {
            Slot::Current => self.current.as_ref(),
            Slot::Topmost => self.topmost.as_ref(),
        }
    }

    fn get(&self, slot: Slot) -> Option<&Visit> {
        self.key(slot).and_then(|id| self.arena.get(id))
    }

    fn install(&mut self, visit: Visit) {
        let id = visit.id().clone();
        self.arena.insert(id.clone(), visit);
        self.current = Some(id);
        self.prune();
    }

    /// The current visit's surface is now the one on screen.
    fn promote_current(&mut self) {
        self.topmost = self.current.clone();
        self.prune();
    }

    fn prune(&mut self) {
        let (current, topmost) = (&self.current, &self.topmost);
        self.arena
            .retain(|id, _| Some(id) == current.as_ref() || Some(id) == topmost.as_ref());
    }
}

pub struct Session<W, H> {
    bridge: WebViewBridge<W>,
    core: SessionCore<H>,
    visits: Visits,
}

impl<W: WebViewHost, H: VisitableHost + SessionDelegate> Session<W, H> {
    pub fn new(webview: W, host: H) -> Self {
        Self {
            bridge: WebViewBridge::new(webview),
            core: SessionCore {
                host,
                initialized: false,
                refreshing: false,
                activated: None,
                restoration_identifiers: HashMap::new(),
            },
            visits: Visits::default(),
        }
    }

    // -- Accessors --

    pub fn is_initialized(&self) -> bool {
        self.core.initialized
    }

    pub fn is_refreshing(&self) -> bool {
        self.core.refreshing
    }

    pub fn current_visit(&self) -> Option<&Visit> {
        self.visits.get(Slot::Current)
    }

    /// The visit whose rendering is on screen.
    pub fn topmost_visit(&self) -> Option<&Visit> {
        self.visits.get(Slot::Topmost)
    }

    pub fn topmost_visitable(&self) -> Option<VisitableId> {
        self.topmost_visit().map(Visit::visitable)
    }

    pub fn activated_visitable(&self) -> Option<VisitableId> {
        self.core.activated
    }

    pub fn restoration_identifier(&self, visitable: VisitableId) -> Option<&str> {
        self.core
            .restoration_identifiers
            .get(&visitable)
            .map(String::as_str)
    }

    pub fn host(&self) -> &H {
        &self.core.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.core.host
    }

    pub fn bridge(&self) -> &WebViewBridge<W> {
        &self.bridge
    }

    pub fn webview(&self) -> &W {
        self.bridge.host()
    }

    pub fn webview_mut(&mut self) -> &mut W {
        self.bridge.host_mut()
    }

    // -- Visits --

    /// Navigate `visitable` to its location with an `advance` action.
    pub fn visit(&mut self, visitable: VisitableId) {
        self.visit_visitable(visitable, VisitAction::Advance);
        self.drain_faults();
    }

    /// Cold-boot the topmost surface again.
    pub fn reload(&mut self) {
        self.reload_topmost();
        self.drain_faults();
    }

    /// Drop what the session knows about a torn-down surface.
    pub fn forget_visitable(&mut self, visitable: VisitableId) {
        self.core.deactivate(visitable, false);
        if self.core.restoration_identifiers.remove(&visitable).is_some() {
            debug!(%visitable, "restoration identifier forgotten");
        }
    }

    fn visit_visitable(&mut self, visitable: VisitableId, action: VisitAction) {
        let Some(location) = self.core.host.visitable_location(visitable) else {
            warn!(%visitable, "visit ignored: surface has no location");
            return;
        };

        let visit = if self.core.initialized {
            let restoration_identifier = self.core.restoration_identifiers.get(&visitable).cloned();
            Visit::script_driven(visitable, location, action, restoration_identifier)
        } else {
            Visit::cold_boot(visitable, location, action)
        };

        self.with_visit(Slot::Current, |current, ctx| current.cancel(ctx));
        self.visits.install(visit);
        self.with_visit(Slot::Current, |visit, ctx| visit.start(ctx));
    }

    fn reload_topmost(&mut self) {
        let Some(visitable) = self.topmost_visitable() else {
            return;
        };
        info!(%visitable, "reloading");
        self.core.initialized = false;
        self.visit_visitable(visitable, VisitAction::Advance);
        self.visits.promote_current();
    }

    fn complete_navigation_for_current_visit(&mut self) {
        if self.visits.current.is_none() {
            return;
        }
        self.visits.promote_current();
        self.with_visit(Slot::Current, |visit, ctx| visit.complete_navigation(ctx));
    }

    /// Run `f` on the visit in `slot` with the bridge and session state as
    /// its collaborators. Returns false if the slot is empty.
    fn with_visit(&mut self, slot: Slot, f: impl FnOnce(&mut Visit, &mut VisitContext<'_>)) -> bool {
        let Some(id) = self.visits.key(slot).cloned() else {
            return false;
        };
        let Some(visit) = self.visits.arena.get_mut(&id) else {
            return false;
        };
        let mut ctx = VisitContext {
            driver: &mut self.bridge,
            delegate: &mut self.core,
        };
        f(visit, &mut ctx);
        true
    }

    /// Feed evaluation failures collected by the bridge back into the
    /// session. A fallback can itself fail to evaluate, so repeat until the
    /// bridge reports nothing new.
    fn drain_faults(&mut self) {
        loop {
            let faults = self.bridge.take_faults();
            if faults.is_empty() {
                break;
            }
            for fault in &faults {
                self.did_fail_script_evaluation(fault);
            }
        }
    }
}
