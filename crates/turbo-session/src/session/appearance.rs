//! Reconciling visits with what the host actually shows.

use tracing::debug;
use turbo_common::{VisitAction, VisitState, VisitableId};
use turbo_webview::WebViewHost;

use super::{Session, SessionDelegate, Slot, VisitableHost};
use crate::visit::Visit;

impl<W: WebViewHost, H: VisitableHost + SessionDelegate> Session<W, H> {
    /// A surface is about to appear.
    ///
    /// `gesture_cancelled` is set when the surface reappears because an
    /// interactive back gesture was abandoned.
    pub fn visitable_view_will_appear(&mut self, visitable: VisitableId, gesture_cancelled: bool) {
        let (Some(topmost), Some(current)) = (
            self.visits.get(Slot::Topmost),
            self.visits.get(Slot::Current),
        ) else {
            return;
        };
        let (topmost_visitable, topmost_state) = (topmost.visitable(), topmost.state());
        let (current_visitable, current_state) = (current.visitable(), current.state());

        if visitable == topmost_visitable && gesture_cancelled {
            if topmost_state == VisitState::Completed {
                debug!(%visitable, "back gesture abandoned, dropping pending visit");
                self.with_visit(Slot::Current, |visit, ctx| visit.cancel(ctx));
            } else {
                debug!(%visitable, "back gesture abandoned mid-visit, visiting again");
                self.visit_visitable(visitable, VisitAction::Advance);
            }
        } else if visitable == current_visitable && current_state == VisitState::Started {
            // Forward navigation is finishing.
            self.complete_navigation_for_current_visit();
        } else if visitable != topmost_visitable {
            // Backward navigation.
            self.visit_visitable(visitable, VisitAction::Restore);
        }

        self.drain_faults();
    }

    /// A surface finished appearing.
    pub fn visitable_view_did_appear(&mut self, visitable: VisitableId) {
        let current = self.visits.get(Slot::Current).map(Visit::visitable);
        let topmost_completed = self
            .visits
            .get(Slot::Topmost)
            .is_some_and(|v| v.visitable() == visitable && v.state() == VisitState::Completed);

        if current == Some(visitable) {
            self.complete_navigation_for_current_visit();
            let failed = self
                .visits
                .get(Slot::Current)
                .is_some_and(|v| v.state() == VisitState::Failed);
            if !failed {
                self.core.activate(visitable);
            }
        } else if topmost_completed {
            // Reappearing after a canceled navigation.
            self.core.host.hide_screenshot(visitable);
            self.core.host.hide_activity_indicator(visitable);
            self.core.activate(visitable);
        }

        self.drain_faults();
    }

    /// Only the topmost surface may reload.
    pub fn visitable_did_request_reload(&mut self, visitable: VisitableId) {
        if self.topmost_visitable() == Some(visitable) {
            self.reload_topmost();
        }
        self.drain_faults();
    }

    pub fn visitable_did_request_refresh(&mut self, visitable: VisitableId) {
        if self.topmost_visitable() == Some(visitable) {
            self.core.refreshing = true;
            self.core.host.will_refresh(visitable);
            self.reload_topmost();
        }
        self.drain_faults();
    }
}
