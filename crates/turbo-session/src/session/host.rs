use turbo_common::{VisitAction, VisitError, VisitableId};
use url::Url;

/// The surfaces a session renders into, addressed by id.
///
/// Surfaces are owned by the application. The session only holds ids, so a
/// torn-down surface is simply one the host no longer knows about.
pub trait VisitableHost {
    /// Location the surface shows, or `None` if the surface is gone.
    fn visitable_location(&self, visitable: VisitableId) -> Option<Url>;

    /// Attach the shared web view to the surface.
    fn activate_web_view(&mut self, visitable: VisitableId);
    /// Detach the shared web view from the surface.
    fn deactivate_web_view(&mut self, visitable: VisitableId);

    /// Capture the current web content as the surface's placeholder.
    fn update_screenshot(&mut self, visitable: VisitableId);
    fn show_screenshot(&mut self, visitable: VisitableId);
    fn hide_screenshot(&mut self, visitable: VisitableId);
    fn clear_screenshot(&mut self, visitable: VisitableId);

    fn show_activity_indicator(&mut self, visitable: VisitableId);
    fn hide_activity_indicator(&mut self, visitable: VisitableId);

    fn will_refresh(&mut self, _visitable: VisitableId) {}
    fn did_refresh(&mut self, _visitable: VisitableId) {}

    /// New content is on screen.
    fn did_render(&mut self, visitable: VisitableId);
}

/// Application-level callbacks.
pub trait SessionDelegate {
    /// The page asked to navigate. The application decides which surface
    /// to present and calls [`crate::Session::visit`].
    fn did_propose_visit(&mut self, location: Url, action: VisitAction);

    fn did_fail_request(&mut self, visitable: VisitableId, error: &VisitError);

    /// A navigation left the application's pages.
    fn open_external_url(&mut self, url: &Url);

    fn did_load_web_view(&mut self) {}
    fn did_start_request(&mut self) {}
    fn did_finish_request(&mut self) {}
}
