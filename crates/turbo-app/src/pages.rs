//! The application's page stack.
//!
//! Every page is a visitable surface sharing the one web view. The stack
//! keeps per-page presentation state the session asks for (placeholder
//! screenshot, activity indicator) and queues application commands for the
//! event loop to act on once the session call that raised them returns.

use turbo_common::{VisitAction, VisitError, VisitableId};
use turbo_session::{SessionDelegate, VisitableHost};
use url::Url;

/// Work the session hands back to the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCommand {
    /// The page asked to navigate.
    Propose { location: Url, action: VisitAction },
    /// Leave the application for the system browser.
    OpenExternal(Url),
    /// A visit's request failed; show it to the user.
    RequestFailed { visitable: VisitableId, message: String },
}

#[derive(Debug, Clone)]
pub struct Page {
    pub id: VisitableId,
    pub location: Url,
    pub title: String,
    pub loading: bool,
    /// A placeholder has been captured for this page.
    pub has_screenshot: bool,
    pub screenshot_visible: bool,
}

impl Page {
    fn new(location: Url) -> Self {
        Self {
            id: VisitableId::new(),
            location,
            title: String::new(),
            loading: false,
            has_screenshot: false,
            screenshot_visible: false,
        }
    }
}

#[derive(Debug, Default)]
pub struct PageStack {
    pages: Vec<Page>,
    /// Page currently holding the web view.
    active: Option<VisitableId>,
    commands: Vec<HostCommand>,
    requests_in_flight: usize,
}

impl PageStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn top(&self) -> Option<&Page> {
        self.pages.last()
    }

    pub fn get(&self, id: VisitableId) -> Option<&Page> {
        self.pages.iter().find(|p| p.id == id)
    }

    fn get_mut(&mut self, id: VisitableId) -> Option<&mut Page> {
        self.pages.iter_mut().find(|p| p.id == id)
    }

    pub fn is_busy(&self) -> bool {
        self.requests_in_flight > 0
    }

    /// Push a page for `location` and return its id.
    pub fn push(&mut self, location: Url) -> VisitableId {
        let page = Page::new(location);
        let id = page.id;
        self.pages.push(page);
        id
    }

    /// Swap the top page for one showing `location`. Returns the removed
    /// page's id and the new page's id.
    pub fn replace_top(&mut self, location: Url) -> (Option<VisitableId>, VisitableId) {
        let removed = self.pages.pop().map(|p| p.id);
        (removed, self.push(location))
    }

    /// Remove the top page, keeping at least one. Returns the removed id.
    pub fn pop(&mut self) -> Option<VisitableId> {
        if self.pages.len() <= 1 {
            return None;
        }
        self.pages.pop().map(|p| p.id)
    }

    /// Index of the topmost page below the top showing `location`.
    pub fn position_below_top(&self, location: &Url) -> Option<usize> {
        let below = self.pages.len().checked_sub(1)?;
        self.pages[..below].iter().rposition(|p| &p.location == location)
    }

    /// Drop every page above `index`. Returns the removed ids, top first.
    pub fn truncate_above(&mut self, index: usize) -> Vec<VisitableId> {
        let mut removed = Vec::new();
        while self.pages.len() > index + 1 {
            if let Some(page) = self.pages.pop() {
                removed.push(page.id);
            }
        }
        removed
    }

    /// Record the title the web view reports for whichever page holds it.
    pub fn set_active_title(&mut self, title: String) {
        if let Some(id) = self.active {
            if let Some(page) = self.get_mut(id) {
                page.title = title;
            }
        }
    }

    pub fn take_commands(&mut self) -> Vec<HostCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Text for the window title bar.
    pub fn display_title(&self) -> String {
        let Some(top) = self.top() else {
            return "Turbo".to_string();
        };
        let name = if top.title.is_empty() {
            top.location.as_str()
        } else {
            top.title.as_str()
        };
        if top.loading || self.is_busy() {
            format!("Turbo — {name} (loading)")
        } else {
            format!("Turbo — {name}")
        }
    }
}

impl VisitableHost for PageStack {
    fn visitable_location(&self, visitable: VisitableId) -> Option<Url> {
        self.get(visitable).map(|p| p.location.clone())
    }

    fn activate_web_view(&mut self, visitable: VisitableId) {
        tracing::debug!(%visitable, "page holds the web view");
        self.active = Some(visitable);
    }

    fn deactivate_web_view(&mut self, visitable: VisitableId) {
        if self.active == Some(visitable) {
            self.active = None;
        }
    }

    fn update_screenshot(&mut self, visitable: VisitableId) {
        if let Some(page) = self.get_mut(visitable) {
            page.has_screenshot = true;
        }
    }

    fn show_screenshot(&mut self, visitable: VisitableId) {
        if let Some(page) = self.get_mut(visitable) {
            page.screenshot_visible = page.has_screenshot;
        }
    }

    fn hide_screenshot(&mut self, visitable: VisitableId) {
        if let Some(page) = self.get_mut(visitable) {
            page.screenshot_visible = false;
        }
    }

    fn clear_screenshot(&mut self, visitable: VisitableId) {
        if let Some(page) = self.get_mut(visitable) {
            page.has_screenshot = false;
            page.screenshot_visible = false;
        }
    }

    fn show_activity_indicator(&mut self, visitable: VisitableId) {
        if let Some(page) = self.get_mut(visitable) {
            page.loading = true;
        }
    }

    fn hide_activity_indicator(&mut self, visitable: VisitableId) {
        if let Some(page) = self.get_mut(visitable) {
            page.loading = false;
        }
    }

    fn did_render(&mut self, visitable: VisitableId) {
        tracing::trace!(%visitable, "page rendered");
    }
}

impl SessionDelegate for PageStack {
    fn did_propose_visit(&mut self, location: Url, action: VisitAction) {
        self.commands.push(HostCommand::Propose { location, action });
    }

    fn did_fail_request(&mut self, visitable: VisitableId, error: &VisitError) {
        self.commands.push(HostCommand::RequestFailed {
            visitable,
            message: error.to_string(),
        });
    }

    fn open_external_url(&mut self, url: &Url) {
        self.commands.push(HostCommand::OpenExternal(url.clone()));
    }

    fn did_load_web_view(&mut self) {
        tracing::info!("in-page controller ready");
    }

    fn did_start_request(&mut self) {
        self.requests_in_flight += 1;
    }

    fn did_finish_request(&mut self) {
        self.requests_in_flight = self.requests_in_flight.saturating_sub(1);
    }
}

// =============================================================================
// TESTS
// =============================================================================
