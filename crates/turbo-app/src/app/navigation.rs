//! Page stack navigation: turning proposals and back requests into
//! surface appearances the session can reconcile.

use turbo_common::{VisitAction, VisitableId};
use url::Url;

use super::core::{AppSession, TurboApp};

impl TurboApp {
    /// Open the start location as the root page.
    pub(super) fn present_root(&mut self) {
        let location = self.start_location.clone();
        self.present(location, VisitAction::Advance);
    }

    /// Show `location` according to `action`.
    pub(super) fn present(&mut self, location: Url, action: VisitAction) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        tracing::info!(%location, %action, "presenting page");

        match action {
            VisitAction::Advance => {
                let id = session.host_mut().push(location);
                session.visit(id);
                appear(session, id);
            }
            VisitAction::Replace => {
                let (removed, id) = session.host_mut().replace_top(location);
                if let Some(removed) = removed {
                    session.forget_visitable(removed);
                }
                session.visit(id);
                appear(session, id);
            }
            VisitAction::Restore => {
                match session.host().position_below_top(&location) {
                    Some(index) => {
                        let removed = session.host_mut().truncate_above(index);
                        reveal(session, removed);
                    }
                    None => self.present(location, VisitAction::Advance),
                }
            }
        }
        self.update_window_title();
    }

    /// Go back one page.
    pub(super) fn pop_page(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let Some(removed) = session.host_mut().pop() else {
            tracing::debug!("back ignored: already at the root page");
            return;
        };
        reveal(session, vec![removed]);
        self.update_window_title();
    }

    /// Ask the session to refresh the page on screen.
    pub(super) fn refresh_top(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if let Some(top) = session.host().top().map(|p| p.id) {
            session.visitable_did_request_refresh(top);
        }
    }
}

fn appear(session: &mut AppSession, visitable: VisitableId) {
    session.visitable_view_will_appear(visitable, false);
    session.visitable_view_did_appear(visitable);
}

/// Tear down `removed` pages and bring back whatever is now on top.
fn reveal(session: &mut AppSession, removed: Vec<VisitableId>) {
    for id in removed {
        session.forget_visitable(id);
    }
    if let Some(top) = session.host().top().map(|p| p.id) {
        appear(session, top);
    }
}
