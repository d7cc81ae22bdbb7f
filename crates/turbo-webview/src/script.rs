//! Host -> in-page calls.
//!
//! The host drives the in-page controller by calling functions on the
//! adapter object installed as `window.webView`. Every call is wrapped so
//! that a thrown exception is captured and returned as
//! `{"error": ..., "stack": ...}` instead of escaping into the host.

use serde::{Deserialize, Serialize};
use turbo_common::BridgeError;

pub const VISIT_LOCATION: &str = "webView.visitLocationWithActionAndRestorationIdentifier";
pub const ISSUE_REQUEST: &str = "webView.issueRequestForVisitWithIdentifier";
pub const CHANGE_HISTORY: &str = "webView.changeHistoryForVisitWithIdentifier";
pub const RESTORE_SNAPSHOT: &str = "webView.loadCachedSnapshotForVisitWithIdentifier";
pub const LOAD_RESPONSE: &str = "webView.loadResponseForVisitWithIdentifier";
pub const CANCEL_VISIT: &str = "webView.cancelVisitWithIdentifier";

/// Encode positional arguments as a JavaScript argument list.
///
/// `arguments` is serialized as a JSON array (tuples serialize that way)
/// and the surrounding brackets are removed. `None` encodes as `null`.
pub fn encode_arguments<A: Serialize>(function: &str, arguments: &A) -> Result<String, BridgeError> {
    let encode_error = |message: String| BridgeError::Encode {
        function: function.to_string(),
        message,
    };

    let json = serde_json::to_string(arguments).map_err(|e| encode_error(e.to_string()))?;
    json.strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .map(str::to_string)
        .ok_or_else(|| encode_error(format!("arguments did not encode as a list: {json}")))
}

/// Build the script that calls `function` with `arguments` and reports the
/// outcome as an object.
pub fn script_for_call<A: Serialize>(function: &str, arguments: &A) -> Result<String, BridgeError> {
    let encoded = encode_arguments(function, arguments)?;
    Ok(format!(
        "(function(result) {{\n  try {{\n    result.value = {function}({encoded})\n  }} catch (error) {{\n    result.error = error.toString()\n    result.stack = error.stack\n  }}\n  return result\n}})({{}})"
    ))
}

/// The outcome object a wrapped call evaluates to.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ScriptResult {
    #[serde(default)]
    pub value: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub stack: Option<String>,
}

impl ScriptResult {
    /// Parse the JSON the host reports for an evaluated call.
    pub fn parse(raw: &str) -> Option<Self> {
        serde_json::from_str(raw).ok()
    }

    /// Turn a reported exception into a [`BridgeError::Exception`].
    pub fn into_result(self, function: &str) -> Result<Option<serde_json::Value>, BridgeError> {
        match self.error {
            Some(error) => Err(BridgeError::Exception {
                function: function.to_string(),
                error,
                stack: self.stack,
            }),
            None => Ok(self.value),
        }
    }
}

/// The in-page adapter.
///
/// Installed as an initialization script. Once the document is ready it
/// attaches to `Turbolinks.controller`, exposes the host-callable functions
/// under `window.webView`, and posts `{name, data}` messages through
/// `window[<handler>].postMessage`.
pub fn adapter_script(message_handler: &str) -> String {
    let handler = serde_json::to_string(message_handler).unwrap_or_else(|_| "\"ipc\"".to_string());
    ADAPTER_TEMPLATE.replace("__HANDLER__", &handler)
}

const ADAPTER_TEMPLATE: &str = r#"
(function() {
    var handlerName = __HANDLER__;

    function post(name, data) {
        var channel = window[handlerName];
        if (channel && channel.postMessage) {
            channel.postMessage(JSON.stringify({ name: name, data: data || {} }));
        }
    }

    function afterNextRepaint(callback) {
        requestAnimationFrame(function() { requestAnimationFrame(callback); });
    }

    function WebView(controller) {
        this.controller = controller;
        this.currentVisit = null;
        controller.adapter = this;
    }

    WebView.prototype = {
        // Host -> page
        visitLocationWithActionAndRestorationIdentifier: function(location, action, restorationIdentifier) {
            this.controller.startVisitToLocationWithAction(location, action, restorationIdentifier);
        },
        issueRequestForVisitWithIdentifier: function(identifier) {
            if (this.isCurrent(identifier)) this.currentVisit.issueRequest();
        },
        changeHistoryForVisitWithIdentifier: function(identifier) {
            if (this.isCurrent(identifier)) this.currentVisit.changeHistory();
        },
        loadCachedSnapshotForVisitWithIdentifier: function(identifier) {
            if (this.isCurrent(identifier)) this.currentVisit.loadCachedSnapshot();
        },
        loadResponseForVisitWithIdentifier: function(identifier) {
            if (this.isCurrent(identifier)) this.currentVisit.loadResponse();
        },
        cancelVisitWithIdentifier: function(identifier) {
            if (this.isCurrent(identifier)) this.currentVisit.cancel();
        },
        isCurrent: function(identifier) {
            return this.currentVisit && this.currentVisit.identifier == identifier;
        },

        // Controller adapter interface -> host
        pageLoaded: function() {
            var restorationIdentifier = this.controller.restorationIdentifier;
            afterNextRepaint(function() {
                post("pageLoaded", { restorationIdentifier: restorationIdentifier });
            });
        },
        pageInvalidated: function() {
            post("pageInvalidated");
        },
        visitProposedToLocationWithAction: function(location, action) {
            post("visitProposed", { location: location.absoluteURL || String(location), action: action });
        },
        visitStarted: function(visit) {
            this.currentVisit = visit;
            post("visitStarted", { identifier: visit.identifier, hasCachedSnapshot: visit.hasCachedSnapshot() });
        },
        visitRequestStarted: function(visit) {
            post("visitRequestStarted", { identifier: visit.identifier });
        },
        visitRequestCompleted: function(visit) {
            post("visitRequestCompleted", { identifier: visit.identifier });
        },
        visitRequestFailedWithStatusCode: function(visit, statusCode) {
            post("visitRequestFailed", { identifier: visit.identifier, statusCode: statusCode || 0 });
        },
        visitRequestFinished: function(visit) {
            post("visitRequestFinished", { identifier: visit.identifier });
        },
        visitRendered: function(visit) {
            afterNextRepaint(function() {
                post("visitRendered", { identifier: visit.identifier });
            });
        },
        visitCompleted: function(visit) {
            post("visitCompleted", { identifier: visit.identifier, restorationIdentifier: visit.restorationIdentifier });
        }
    };

    function install() {
        if (!window.Turbolinks || !window.Turbolinks.controller) {
            post("errorRaised", { error: "in-page controller not found" });
            return;
        }
        window.webView = new WebView(window.Turbolinks.controller);
        window.addEventListener("error", function(event) {
            post("errorRaised", {
                error: event.message + " (" + event.filename + ":" + event.lineno + ":" + event.colno + ")"
            });
        }, false);
        window.webView.pageLoaded();
    }

    if (document.readyState === "loading") {
        document.addEventListener("DOMContentLoaded", install, false);
    } else {
        install();
    }
})();
"#;
