//! Script-driven visits: the in-page controller runs the visit and reports
//! back through the bridge, keyed by the identifier it assigns.

use tracing::debug;
use turbo_common::{VisitError, VisitState};

use super::{AfterNavigation, Strategy, Visit, VisitContext};

impl Visit {
    pub(super) fn start_script(&mut self, ctx: &mut VisitContext<'_>) {
        ctx.driver.visit_location(
            &self.location,
            self.action,
            self.restoration_identifier.as_deref(),
        );
    }

    pub(super) fn cancel_script(&mut self, ctx: &mut VisitContext<'_>) {
        if let Some(identifier) = self.identifier().map(str::to_string) {
            ctx.driver.cancel_visit(&identifier);
        }
        self.finish_request(ctx);
    }

    fn is_script_visit(&self, identifier: &str) -> bool {
        self.state == VisitState::Started && self.identifier() == Some(identifier)
    }

    pub fn did_start_visit(
        &mut self,
        ctx: &mut VisitContext<'_>,
        identifier: &str,
        has_cached_snapshot: bool,
    ) {
        let Strategy::ScriptDriven { identifier: current } = &mut self.strategy else {
            return;
        };
        if self.state != VisitState::Started {
            return;
        }
        let first = current.is_none();
        *current = Some(identifier.to_string());
        self.has_cached_snapshot = has_cached_snapshot;
        debug!(visit = %self.id, identifier, has_cached_snapshot, "in-page visit started");

        if first {
            ctx.delegate.visit_did_start(self);
        }
        ctx.driver.issue_request(identifier);
        self.after_navigation_completion(
            ctx,
            AfterNavigation::ChangeHistory {
                identifier: identifier.to_string(),
            },
        );
    }

    pub fn did_start_request(&mut self, ctx: &mut VisitContext<'_>, identifier: &str) {
        if self.is_script_visit(identifier) {
            self.start_request(ctx);
        }
    }

    pub fn did_complete_request(&mut self, ctx: &mut VisitContext<'_>, identifier: &str) {
        if self.is_script_visit(identifier) {
            self.after_navigation_completion(
                ctx,
                AfterNavigation::LoadResponse {
                    identifier: identifier.to_string(),
                },
            );
        }
    }

    pub fn did_fail_request(&mut self, ctx: &mut VisitContext<'_>, identifier: &str, status_code: u16) {
        if self.is_script_visit(identifier) {
            self.fail(ctx, VisitError::from_script_status(status_code));
        }
    }

    pub fn did_finish_request(&mut self, ctx: &mut VisitContext<'_>, identifier: &str) {
        if self.is_script_visit(identifier) {
            self.finish_request(ctx);
        }
    }

    /// Rendering is reported after the next repaint and may trail the
    /// completion message.
    pub fn did_render(&mut self, ctx: &mut VisitContext<'_>, identifier: &str) {
        let live = matches!(self.state, VisitState::Started | VisitState::Completed);
        if live && self.identifier() == Some(identifier) {
            ctx.delegate.visit_did_render(self);
        }
    }

    pub fn did_complete_visit(
        &mut self,
        ctx: &mut VisitContext<'_>,
        identifier: &str,
        restoration_identifier: String,
    ) {
        if self.is_script_visit(identifier) {
            self.restoration_identifier = Some(restoration_identifier);
            self.complete(ctx);
        }
    }
}
