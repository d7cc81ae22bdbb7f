//! Recording fakes for visit and session tests.
//!
//! Every fake appends to a shared [`Log`] so tests can assert on the exact
//! interleaving of web view commands and host callbacks.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use turbo_common::{TurboError, VisitAction, VisitError, VisitableId};
use turbo_webview::{NavigationId, WebViewHost};
use url::Url;

use crate::session::{SessionDelegate, VisitableHost};
use crate::visit::{Visit, VisitDelegate, VisitDriver};

pub type Log = Rc<RefCell<Vec<String>>>;

pub fn new_log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

pub fn take(log: &Log) -> Vec<String> {
    std::mem::take(&mut *log.borrow_mut())
}

pub fn url(s: &str) -> Url {
    Url::parse(s).unwrap()
}

fn short(function: &str) -> &str {
    function.trim_start_matches("webView.")
}

// =============================================================================
// VISIT COLLABORATORS
// =============================================================================

pub struct RecordingDriver {
    pub log: Log,
    pub fail_load: bool,
    loads: u64,
}

impl RecordingDriver {
    pub fn new(log: &Log) -> Self {
        Self {
            log: Rc::clone(log),
            fail_load: false,
            loads: 0,
        }
    }

    fn push(&self, entry: String) {
        self.log.borrow_mut().push(entry);
    }
}

impl VisitDriver for RecordingDriver {
    fn load_page(&mut self, location: &Url) -> turbo_common::Result<NavigationId> {
        if self.fail_load {
            return Err(TurboError::WebView("no web view".into()));
        }
        self.loads += 1;
        self.push(format!("load {location}"));
        Ok(NavigationId(self.loads))
    }

    fn stop_loading(&mut self) {
        self.push("stop".into());
    }

    fn visit_location(
        &mut self,
        location: &Url,
        action: VisitAction,
        restoration_identifier: Option<&str>,
    ) {
        self.push(format!(
            "visit_location {location} {action} {}",
            restoration_identifier.unwrap_or("-")
        ));
    }

    fn issue_request(&mut self, identifier: &str) {
        self.push(format!("issue_request {identifier}"));
    }

    fn change_history(&mut self, identifier: &str) {
        self.push(format!("change_history {identifier}"));
    }

    fn restore_snapshot(&mut self, identifier: &str) {
        self.push(format!("restore_snapshot {identifier}"));
    }

    fn load_response(&mut self, identifier: &str) {
        self.push(format!("load_response {identifier}"));
    }

    fn cancel_visit(&mut self, identifier: &str) {
        self.push(format!("cancel_visit {identifier}"));
    }
}

pub struct RecordingDelegate {
    pub log: Log,
}

impl RecordingDelegate {
    pub fn new(log: &Log) -> Self {
        Self {
            log: Rc::clone(log),
        }
    }

    fn push(&self, entry: impl Into<String>) {
        self.log.borrow_mut().push(entry.into());
    }
}

impl VisitDelegate for RecordingDelegate {
    fn visit_will_start(&mut self, _visit: &Visit) {
        self.push("will_start");
    }
    fn visit_did_start(&mut self, _visit: &Visit) {
        self.push("did_start");
    }
    fn visit_did_complete(&mut self, _visit: &Visit) {
        self.push("did_complete");
    }
    fn visit_did_fail(&mut self, _visit: &Visit) {
        self.push("did_fail");
    }
    fn visit_did_finish(&mut self, _visit: &Visit) {
        self.push("did_finish");
    }
    fn visit_will_load_response(&mut self, _visit: &Visit) {
        self.push("will_load_response");
    }
    fn visit_did_render(&mut self, _visit: &Visit) {
        self.push("did_render");
    }
    fn visit_did_initialize_web_view(&mut self, _visit: &Visit) {
        self.push("did_initialize");
    }
    fn visit_request_did_start(&mut self, _visit: &Visit) {
        self.push("request_start");
    }
    fn visit_request_did_fail(&mut self, _visit: &Visit, error: &VisitError) {
        self.push(format!("request_fail {error}"));
    }
    fn visit_request_did_finish(&mut self, _visit: &Visit) {
        self.push("request_finish");
    }
}

// =============================================================================
// SESSION COLLABORATORS
// =============================================================================

/// Web view that records every load and evaluated function.
pub struct RecordingWebView {
    pub log: Log,
    pub fail_evaluation: bool,
    loads: u64,
}

impl RecordingWebView {
    pub fn new(log: &Log) -> Self {
        Self {
            log: Rc::clone(log),
            fail_evaluation: false,
            loads: 0,
        }
    }
}

impl WebViewHost for RecordingWebView {
    fn evaluate_script(&mut self, function: &str, script: &str) -> turbo_common::Result<()> {
        if self.fail_evaluation {
            self.log.borrow_mut().push(format!("eval-failed {}", short(function)));
            return Err(TurboError::WebView("web view process terminated".into()));
        }
        // Keep the call's argument list for assertions.
        let arguments = script
            .split_once(&format!("{function}("))
            .and_then(|(_, rest)| rest.split_once(")\n"))
            .map(|(args, _)| args.replace('"', ""))
            .unwrap_or_default();
        self.log
            .borrow_mut()
            .push(format!("{} {arguments}", short(function)));
        Ok(())
    }

    fn load_url(&mut self, url: &Url) -> turbo_common::Result<NavigationId> {
        self.loads += 1;
        self.log.borrow_mut().push(format!("load {url}"));
        Ok(NavigationId(self.loads))
    }

    fn stop_loading(&mut self) {
        self.log.borrow_mut().push("stop".into());
    }
}

/// Surfaces and application callbacks, recorded by surface label.
pub struct RecordingHost {
    pub log: Log,
    pages: HashMap<VisitableId, (String, Url)>,
}

impl RecordingHost {
    pub fn new(log: &Log) -> Self {
        Self {
            log: Rc::clone(log),
            pages: HashMap::new(),
        }
    }

    pub fn add_page(&mut self, label: &str, location: &str) -> VisitableId {
        let id = VisitableId::new();
        self.pages.insert(id, (label.to_string(), url(location)));
        id
    }

    pub fn remove_page(&mut self, id: VisitableId) {
        self.pages.remove(&id);
    }

    fn label(&self, id: VisitableId) -> String {
        self.pages
            .get(&id)
            .map(|(label, _)| label.clone())
            .unwrap_or_else(|| "?".into())
    }

    fn record(&self, id: VisitableId, what: &str) {
        let entry = format!("{}: {what}", self.label(id));
        self.log.borrow_mut().push(entry);
    }
}

impl VisitableHost for RecordingHost {
    fn visitable_location(&self, visitable: VisitableId) -> Option<Url> {
        self.pages.get(&visitable).map(|(_, url)| url.clone())
    }
    fn activate_web_view(&mut self, visitable: VisitableId) {
        self.record(visitable, "activate");
    }
    fn deactivate_web_view(&mut self, visitable: VisitableId) {
        self.record(visitable, "deactivate");
    }
    fn update_screenshot(&mut self, visitable: VisitableId) {
        self.record(visitable, "update_screenshot");
    }
    fn show_screenshot(&mut self, visitable: VisitableId) {
        self.record(visitable, "show_screenshot");
    }
    fn hide_screenshot(&mut self, visitable: VisitableId) {
        self.record(visitable, "hide_screenshot");
    }
    fn clear_screenshot(&mut self, visitable: VisitableId) {
        self.record(visitable, "clear_screenshot");
    }
    fn show_activity_indicator(&mut self, visitable: VisitableId) {
        self.record(visitable, "show_indicator");
    }
    fn hide_activity_indicator(&mut self, visitable: VisitableId) {
        self.record(visitable, "hide_indicator");
    }
    fn will_refresh(&mut self, visitable: VisitableId) {
        self.record(visitable, "will_refresh");
    }
    fn did_refresh(&mut self, visitable: VisitableId) {
        self.record(visitable, "did_refresh");
    }
    fn did_render(&mut self, visitable: VisitableId) {
        self.record(visitable, "did_render");
    }
}

impl SessionDelegate for RecordingHost {
    fn did_propose_visit(&mut self, location: Url, action: VisitAction) {
        self.log
            .borrow_mut()
            .push(format!("propose {location} {action}"));
    }
    fn did_fail_request(&mut self, visitable: VisitableId, error: &VisitError) {
        self.record(visitable, &format!("request_failed {error}"));
    }
    fn open_external_url(&mut self, url: &Url) {
        self.log.borrow_mut().push(format!("open_external {url}"));
    }
    fn did_load_web_view(&mut self) {
        self.log.borrow_mut().push("did_load_web_view".into());
    }
    fn did_start_request(&mut self) {
        self.log.borrow_mut().push("request_started".into());
    }
    fn did_finish_request(&mut self) {
        self.log.borrow_mut().push("request_finished".into());
    }
}
