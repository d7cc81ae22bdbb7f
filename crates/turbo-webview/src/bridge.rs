//! Typed proxy over the native <-> script channel.
//!
//! Outbound, [`WebViewBridge`] turns typed commands into wrapped function
//! calls on the in-page adapter. Inbound, it parses posted messages, drops
//! malformed or stale ones, and hands the rest to
//! [`ScriptMessage::dispatch`] for delivery to typed delegate callbacks.

use serde::Serialize;
use tracing::{debug, error, warn};
use turbo_common::{BridgeError, VisitAction};
use url::Url;

use crate::events::NavigationId;
use crate::message::ScriptMessage;
use crate::script::{
    script_for_call, ScriptResult, CANCEL_VISIT, CHANGE_HISTORY, ISSUE_REQUEST, LOAD_RESPONSE,
    RESTORE_SNAPSHOT, VISIT_LOCATION,
};

/// The native web view, as far as the bridge is concerned.
pub trait WebViewHost {
    /// Evaluate `script` in the page. `function` names the wrapped call so
    /// the host can report its result later. An error means the script
    /// could not be evaluated at all.
    fn evaluate_script(&mut self, function: &str, script: &str) -> turbo_common::Result<()>;

    /// Start a full page load of `url`.
    fn load_url(&mut self, url: &Url) -> turbo_common::Result<NavigationId>;

    /// Abort the in-flight page load, if any.
    fn stop_loading(&mut self);
}

/// Page-level callbacks.
pub trait WebViewDelegate {
    /// The page proposed a navigation.
    fn did_propose_visit(&mut self, location: Url, action: VisitAction);
    /// The in-page controller can no longer serve the current page.
    fn did_invalidate_page(&mut self);
    /// A host -> page call could not be evaluated.
    fn did_fail_script_evaluation(&mut self, error: &BridgeError);
    /// An uncaught error was raised in the page. Already logged.
    fn did_raise_error(&mut self, _error: &str) {}
}

/// Delivered when a full page load has booted the in-page controller.
pub trait PageLoadDelegate {
    fn did_load_page(&mut self, restoration_identifier: String);
}

/// Lifecycle of a script-driven visit, keyed by its in-page identifier.
pub trait VisitEventDelegate {
    fn did_start_visit(&mut self, identifier: &str, has_cached_snapshot: bool);
    fn did_start_request(&mut self, identifier: &str);
    fn did_complete_request(&mut self, identifier: &str);
    fn did_fail_request(&mut self, identifier: &str, status_code: u16);
    fn did_finish_request(&mut self, identifier: &str);
    fn did_render(&mut self, identifier: &str);
    fn did_complete_visit(&mut self, identifier: &str, restoration_identifier: String);
}

/// Everything a parsed message can be dispatched to.
pub trait BridgeDelegate: WebViewDelegate + PageLoadDelegate + VisitEventDelegate {}

impl<T: WebViewDelegate + PageLoadDelegate + VisitEventDelegate> BridgeDelegate for T {}

impl ScriptMessage {
    /// Deliver this message to the matching typed callback.
    pub fn dispatch<D: BridgeDelegate + ?Sized>(self, delegate: &mut D) {
        match self {
            Self::PageLoaded {
                restoration_identifier,
            } => delegate.did_load_page(restoration_identifier),
            Self::PageInvalidated {} => delegate.did_invalidate_page(),
            Self::ErrorRaised { error } => delegate.did_raise_error(&error),
            Self::VisitProposed { location, action } => delegate.did_propose_visit(location, action),
            Self::VisitStarted {
                identifier,
                has_cached_snapshot,
            } => delegate.did_start_visit(&identifier, has_cached_snapshot),
            Self::VisitRequestStarted { identifier } => delegate.did_start_request(&identifier),
            Self::VisitRequestCompleted { identifier } => delegate.did_complete_request(&identifier),
            Self::VisitRequestFailed {
                identifier,
                status_code,
            } => delegate.did_fail_request(&identifier, status_code),
            Self::VisitRequestFinished { identifier } => delegate.did_finish_request(&identifier),
            Self::VisitRendered { identifier } => delegate.did_render(&identifier),
            Self::VisitCompleted {
                identifier,
                restoration_identifier,
            } => delegate.did_complete_visit(&identifier, restoration_identifier),
        }
    }
}

/// Host-side end of the bridge.
pub struct WebViewBridge<W> {
    host: W,
    /// Identifier announced by the latest `visitStarted`.
    active_identifier: Option<String>,
    /// Evaluation failures not yet collected by the session.
    faults: Vec<BridgeError>,
}

impl<W: WebViewHost> WebViewBridge<W> {
    pub fn new(host: W) -> Self {
        Self {
            host,
            active_identifier: None,
            faults: Vec::new(),
        }
    }

    pub fn host(&self) -> &W {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut W {
        &mut self.host
    }

    /// The in-page visit identifier commands are currently accepted for.
    pub fn active_identifier(&self) -> Option<&str> {
        self.active_identifier.as_deref()
    }

    // -- Commands --

    pub fn visit_location(
        &mut self,
        location: &Url,
        action: VisitAction,
        restoration_identifier: Option<&str>,
    ) {
        // Whatever visit the page was running is superseded.
        self.active_identifier = None;
        self.call_function(
            VISIT_LOCATION,
            &(location.as_str(), action, restoration_identifier),
        );
    }

    pub fn issue_request(&mut self, identifier: &str) {
        self.call_for_visit(ISSUE_REQUEST, identifier);
    }

    pub fn change_history(&mut self, identifier: &str) {
        self.call_for_visit(CHANGE_HISTORY, identifier);
    }

    pub fn restore_snapshot(&mut self, identifier: &str) {
        self.call_for_visit(RESTORE_SNAPSHOT, identifier);
    }

    pub fn load_response(&mut self, identifier: &str) {
        self.call_for_visit(LOAD_RESPONSE, identifier);
    }

    pub fn cancel_visit(&mut self, identifier: &str) {
        if self.call_for_visit(CANCEL_VISIT, identifier) {
            self.active_identifier = None;
        }
    }

    /// Full native page load. Resets the in-page controller.
    pub fn load_page(&mut self, location: &Url) -> turbo_common::Result<NavigationId> {
        self.active_identifier = None;
        let navigation = self.host.load_url(location)?;
        debug!(%navigation, location = %location, "page load started");
        Ok(navigation)
    }

    pub fn stop_loading(&mut self) {
        self.host.stop_loading();
    }

    // -- Inbound --

    /// Parse one posted message. Malformed messages and visit messages for
    /// a superseded identifier are dropped.
    pub fn receive_message(&mut self, body: &str) -> Option<ScriptMessage> {
        let Some(message) = ScriptMessage::parse(body) else {
            warn!(body_len = body.len(), "script message dropped: failed to parse");
            return None;
        };

        debug!(kind = %message.kind(), identifier = ?message.identifier(), "script message");

        match &message {
            ScriptMessage::VisitStarted { identifier, .. } => {
                self.active_identifier = Some(identifier.clone());
            }
            ScriptMessage::PageLoaded { .. } => {
                self.active_identifier = None;
            }
            ScriptMessage::ErrorRaised { error } => {
                warn!(error = %error, "JavaScript error");
            }
            other => {
                if let Some(identifier) = other.identifier() {
                    if self.active_identifier.as_deref() != Some(identifier) {
                        debug!(
                            kind = %other.kind(),
                            identifier,
                            active = ?self.active_identifier,
                            "script message dropped: stale visit"
                        );
                        return None;
                    }
                }
            }
        }

        Some(message)
    }

    /// Record the reported outcome of a wrapped call.
    pub fn receive_script_result(&mut self, function: &str, raw: &str) {
        match ScriptResult::parse(raw).map(|r| r.into_result(function)) {
            Some(Ok(_)) => debug!(function, "in-page function returned"),
            Some(Err(BridgeError::Exception { error, stack, .. })) => {
                warn!(function, error = %error, stack = ?stack, "in-page function raised");
            }
            Some(Err(e)) => warn!(function, error = %e, "in-page function failed"),
            None => debug!(function, raw_len = raw.len(), "unrecognized script result"),
        }
    }

    /// Evaluation failures since the last call.
    pub fn take_faults(&mut self) -> Vec<BridgeError> {
        std::mem::take(&mut self.faults)
    }

    fn call_for_visit(&mut self, function: &'static str, identifier: &str) -> bool {
        if self.active_identifier.as_deref() != Some(identifier) {
            debug!(
                function,
                identifier,
                active = ?self.active_identifier,
                "call dropped: stale visit"
            );
            return false;
        }
        self.call_function(function, &(identifier,));
        true
    }

    fn call_function<A: Serialize>(&mut self, function: &'static str, arguments: &A) {
        let script = match script_for_call(function, arguments) {
            Ok(script) => script,
            Err(e) => {
                error!(error = %e, "error encoding arguments for in-page function");
                return;
            }
        };

        debug!(function, "calling in-page function");
        if let Err(e) = self.host.evaluate_script(function, &script) {
            let fault = BridgeError::Evaluation {
                function: function.to_string(),
                message: e.to_string(),
            };
            error!(error = %fault, "script evaluation failed");
            self.faults.push(fault);
        }
    }
}
