use tracing::debug;
use turbo_common::VisitError;

use super::{SessionCore, SessionDelegate, VisitableHost};
use crate::visit::{Visit, VisitDelegate};

impl<H: VisitableHost + SessionDelegate> VisitDelegate for SessionCore<H> {
    fn visit_will_start(&mut self, visit: &Visit) {
        self.host.show_screenshot(visit.visitable());
        self.activate(visit.visitable());
    }

    fn visit_did_start(&mut self, visit: &Visit) {
        if !visit.has_cached_snapshot() {
            self.host.show_activity_indicator(visit.visitable());
        }
    }

    fn visit_did_complete(&mut self, visit: &Visit) {
        if let Some(restoration_identifier) = visit.restoration_identifier() {
            debug!(
                visitable = %visit.visitable(),
                restoration_identifier,
                "restoration identifier stored"
            );
            self.restoration_identifiers
                .insert(visit.visitable(), restoration_identifier.to_string());
        }
    }

    fn visit_did_fail(&mut self, visit: &Visit) {
        self.host.clear_screenshot(visit.visitable());
        self.host.show_screenshot(visit.visitable());
    }

    fn visit_did_finish(&mut self, visit: &Visit) {
        if self.refreshing {
            self.refreshing = false;
            self.host.did_refresh(visit.visitable());
        }
    }

    fn visit_will_load_response(&mut self, visit: &Visit) {
        self.host.update_screenshot(visit.visitable());
        self.host.show_screenshot(visit.visitable());
    }

    fn visit_did_render(&mut self, visit: &Visit) {
        self.host.hide_screenshot(visit.visitable());
        self.host.hide_activity_indicator(visit.visitable());
        self.host.did_render(visit.visitable());
    }

    fn visit_did_initialize_web_view(&mut self, visit: &Visit) {
        self.initialized = true;
        self.host.did_load_web_view();
        self.host.did_render(visit.visitable());
    }

    fn visit_request_did_start(&mut self, _visit: &Visit) {
        self.host.did_start_request();
    }

    fn visit_request_did_fail(&mut self, visit: &Visit, error: &VisitError) {
        self.host.did_fail_request(visit.visitable(), error);
    }

    fn visit_request_did_finish(&mut self, _visit: &Visit) {
        self.host.did_finish_request();
    }
}
