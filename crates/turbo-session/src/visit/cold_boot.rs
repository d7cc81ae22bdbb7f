//! Cold boot: a full native page load of the visit's location.

use tracing::{debug, warn};
use turbo_common::{VisitError, VisitState};
use turbo_webview::NavigationEvent;

use super::{Strategy, Visit, VisitContext};

impl Visit {
    pub(super) fn start_cold_boot(&mut self, ctx: &mut VisitContext<'_>) {
        match ctx.driver.load_page(&self.location) {
            Ok(navigation) => {
                self.strategy = Strategy::ColdBoot {
                    navigation: Some(navigation),
                };
                ctx.delegate.visit_did_start(self);
                self.start_request(ctx);
            }
            Err(e) => {
                warn!(visit = %self.id, error = %e, "page load could not start");
                self.fail(ctx, VisitError::Network(e.to_string()));
            }
        }
    }

    pub(super) fn cancel_cold_boot(&mut self, ctx: &mut VisitContext<'_>) {
        ctx.driver.stop_loading();
        self.finish_request(ctx);
    }

    pub(super) fn complete_cold_boot(&mut self, ctx: &mut VisitContext<'_>) {
        ctx.delegate.visit_did_initialize_web_view(self);
        // The page can report readiness before the native load finishes.
        self.finish_request(ctx);
    }

    /// Progress of the native load. Events for other loads, or arriving
    /// once the visit is over, are ignored.
    pub fn handle_navigation_event(&mut self, ctx: &mut VisitContext<'_>, event: &NavigationEvent) {
        let Strategy::ColdBoot {
            navigation: Some(expected),
        } = self.strategy
        else {
            return;
        };
        if self.state != VisitState::Started || event.navigation() != expected {
            debug!(visit = %self.id, ?event, "navigation event ignored");
            return;
        }

        match event {
            NavigationEvent::Started { .. } => {}
            // Content is arriving: the request part of the visit is over.
            NavigationEvent::Committed { .. } => self.finish_request(ctx),
            NavigationEvent::ResponseReceived {
                status_code: Some(status_code),
                ..
            } => {
                if let Some(error) = VisitError::from_status(*status_code) {
                    self.fail(ctx, error);
                }
            }
            NavigationEvent::ResponseReceived {
                status_code: None, ..
            } => self.fail(ctx, VisitError::unknown_response()),
            NavigationEvent::Finished { .. } => self.finish_request(ctx),
            NavigationEvent::Failed { error, .. } => {
                self.fail(ctx, VisitError::Network(error.clone()))
            }
        }
    }

    /// The in-page controller booted on the loaded page.
    pub fn page_loaded(&mut self, ctx: &mut VisitContext<'_>, restoration_identifier: String) {
        if !self.is_cold_boot() || self.state != VisitState::Started {
            debug!(visit = %self.id, "page load ignored");
            return;
        }
        self.restoration_identifier = Some(restoration_identifier);
        ctx.delegate.visit_did_render(self);
        self.complete(ctx);
    }
}
