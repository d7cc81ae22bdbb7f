use serde_json::json;
use turbo_common::{VisitAction, VisitState, VisitableId};
use turbo_webview::{NavigationAction, NavigationEvent, NavigationId, NavigationPolicy, NavigationType};

use super::*;
use crate::testing::{new_log, take, url, Log, RecordingHost, RecordingWebView};

struct Fixture {
    log: Log,
    session: Session<RecordingWebView, RecordingHost>,
    a: VisitableId,
    b: VisitableId,
}

fn fixture() -> Fixture {
    let log = new_log();
    let mut host = RecordingHost::new(&log);
    let a = host.add_page("A", "https://example.com/a");
    let b = host.add_page("B", "https://example.com/b");
    Fixture {
        session: Session::new(RecordingWebView::new(&log), host),
        log,
        a,
        b,
    }
}

impl Fixture {
    fn send(&mut self, message: serde_json::Value) {
        self.session.receive_script_message(&message.to_string());
    }

    fn take(&self) -> Vec<String> {
        take(&self.log)
    }

    /// Cold-boot A and let it appear.
    fn boot(&mut self) {
        self.session.visit(self.a);
        self.send(json!({ "name": "pageLoaded", "data": { "restorationIdentifier": "rA" } }));
        self.session.visitable_view_did_appear(self.a);
        self.take();
    }

    /// Start a script visit to B, have the page assign `v1`, and finish
    /// the forward transition. The visit is still Started.
    fn visit_b(&mut self) {
        self.session.visit(self.b);
        self.send(json!({ "name": "visitStarted", "data": { "identifier": "v1", "hasCachedSnapshot": false } }));
        self.session.visitable_view_will_appear(self.b, false);
        self.take();
    }

    fn finish_b(&mut self) {
        self.send(json!({ "name": "visitRequestCompleted", "data": { "identifier": "v1" } }));
        self.send(json!({ "name": "visitCompleted", "data": { "identifier": "v1", "restorationIdentifier": "rB" } }));
        self.session.visitable_view_did_appear(self.b);
        self.take();
    }
}

fn position(log: &[String], entry: &str) -> usize {
    log.iter()
        .position(|e| e == entry)
        .unwrap_or_else(|| panic!("{entry:?} not in {log:#?}"))
}

fn has(log: &[String], entry: &str) -> bool {
    log.iter().any(|e| e == entry)
}

// =============================================================================
// COLD BOOT
// =============================================================================

#[test]
fn first_visit_is_a_cold_boot() {
    let mut fx = fixture();
    fx.session.visit(fx.a);

    let visit = fx.session.current_visit().unwrap();
    assert!(visit.is_cold_boot());
    assert_eq!(visit.state(), VisitState::Started);
    assert_eq!(
        fx.take(),
        vec![
            "A: show_screenshot",
            "A: activate",
            "load https://example.com/a",
            "A: show_indicator",
            "request_started",
        ]
    );
}

#[test]
fn page_loaded_initializes_and_topmost_waits_for_navigation_completion() {
    let mut fx = fixture();
    fx.session.visit(fx.a);
    fx.send(json!({ "name": "pageLoaded", "data": { "restorationIdentifier": "rA" } }));

    assert!(fx.session.is_initialized());
    assert_eq!(
        fx.session.current_visit().map(Visit::state),
        Some(VisitState::Completed)
    );
    assert!(fx.session.topmost_visit().is_none());
    assert_eq!(fx.session.restoration_identifier(fx.a), Some("rA"));
    assert!(has(&fx.take(), "did_load_web_view"));

    fx.session.visitable_view_did_appear(fx.a);
    assert_eq!(fx.session.topmost_visitable(), Some(fx.a));
    assert_eq!(
        fx.session.topmost_visit().map(Visit::state),
        Some(VisitState::Completed)
    );
}

#[test]
fn cold_boot_404_reports_http_failure() {
    let mut fx = fixture();
    fx.session.visit(fx.a);
    fx.take();

    fx.session.handle_navigation_event(&NavigationEvent::ResponseReceived {
        navigation: NavigationId(1),
        status_code: Some(404),
    });
    assert_eq!(
        fx.take(),
        vec![
            "A: request_failed HTTP request failed with status 404",
            "request_finished",
            "A: clear_screenshot",
            "A: show_screenshot",
        ]
    );
    assert!(!fx.session.is_initialized());

    // A failed visit's surface is not re-activated on appearance.
    fx.session.forget_visitable(fx.a);
    fx.take();
    fx.session.visitable_view_did_appear(fx.a);
    assert!(!has(&fx.take(), "A: activate"));
}

#[test]
fn cold_boot_owns_native_navigation() {
    let mut fx = fixture();
    fx.session.visit(fx.a);
    fx.take();
    let policy = fx.session.decide_navigation(&NavigationAction {
        url: url("https://example.com/redirected"),
        navigation_type: NavigationType::Other,
        main_frame: true,
    });
    assert_eq!(policy, NavigationPolicy::Allow);
    assert!(fx.take().is_empty());
}

// =============================================================================
// SCRIPT-DRIVEN VISITS
// =============================================================================

#[test]
fn visit_after_boot_is_script_driven() {
    let mut fx = fixture();
    fx.boot();
    fx.session.visit(fx.b);

    assert!(!fx.session.current_visit().unwrap().is_cold_boot());
    assert_eq!(
        fx.take(),
        vec![
            "B: show_screenshot",
            "A: update_screenshot",
            "A: show_screenshot",
            "A: deactivate",
            "B: activate",
            "visitLocationWithActionAndRestorationIdentifier https://example.com/b,advance,null",
        ]
    );
    assert_eq!(fx.session.activated_visitable(), Some(fx.b));
}

#[test]
fn script_visit_defers_page_changes_until_navigation_completes() {
    let mut fx = fixture();
    fx.boot();
    fx.session.visit(fx.b);
    fx.send(json!({ "name": "visitStarted", "data": { "identifier": "v1", "hasCachedSnapshot": false } }));
    fx.send(json!({ "name": "visitRequestCompleted", "data": { "identifier": "v1" } }));
    let before = fx.take();
    assert!(has(&before, "issueRequestForVisitWithIdentifier v1"));
    assert!(!has(&before, "loadResponseForVisitWithIdentifier v1"));

    fx.session.visitable_view_will_appear(fx.b, false);
    assert_eq!(fx.session.topmost_visitable(), Some(fx.b));
    assert_eq!(
        fx.take(),
        vec![
            "changeHistoryForVisitWithIdentifier v1",
            "loadCachedSnapshotForVisitWithIdentifier v1",
            "B: update_screenshot",
            "B: show_screenshot",
            "loadResponseForVisitWithIdentifier v1",
        ]
    );
}

#[test]
fn completed_visit_stores_restoration_identifier_for_restore() {
    let mut fx = fixture();
    fx.boot();
    fx.visit_b();
    fx.finish_b();
    assert_eq!(fx.session.restoration_identifier(fx.b), Some("rB"));

    // Navigating back to A restores it with A's identifier.
    fx.session.visitable_view_will_appear(fx.a, false);
    let visit = fx.session.current_visit().unwrap();
    assert_eq!(visit.action(), VisitAction::Restore);
    assert_eq!(visit.visitable(), fx.a);
    assert!(has(
        &fx.take(),
        "visitLocationWithActionAndRestorationIdentifier https://example.com/a,restore,rA"
    ));
}

#[test]
fn new_visit_cancels_the_previous_one_first() {
    let mut fx = fixture();
    fx.boot();
    fx.session.visit(fx.b);
    fx.send(json!({ "name": "visitStarted", "data": { "identifier": "v1", "hasCachedSnapshot": true } }));
    fx.send(json!({ "name": "visitRequestStarted", "data": { "identifier": "v1" } }));
    fx.take();

    fx.session.visit(fx.a);
    let log = fx.take();
    let cancels = log
        .iter()
        .filter(|e| e.starts_with("cancelVisitWithIdentifier"))
        .count();
    assert_eq!(cancels, 1);
    assert!(
        position(&log, "cancelVisitWithIdentifier v1")
            < position(
                &log,
                "visitLocationWithActionAndRestorationIdentifier https://example.com/a,advance,rA"
            )
    );
    assert!(position(&log, "request_finished") < position(&log, "A: show_screenshot"));
}

#[test]
fn cached_snapshot_skips_activity_indicator() {
    let mut fx = fixture();
    fx.boot();
    fx.session.visit(fx.b);
    fx.take();
    fx.send(json!({ "name": "visitStarted", "data": { "identifier": "v1", "hasCachedSnapshot": true } }));
    assert!(!has(&fx.take(), "B: show_indicator"));
}

#[test]
fn script_status_zero_reports_network_failure() {
    let mut fx = fixture();
    fx.boot();
    fx.visit_b();
    fx.send(json!({ "name": "visitRequestFailed", "data": { "identifier": "v1", "statusCode": 0 } }));
    assert!(has(
        &fx.take(),
        "B: request_failed network error: A network error occurred."
    ));
    assert_eq!(
        fx.session.current_visit().map(Visit::state),
        Some(VisitState::Failed)
    );
}

#[test]
fn stale_visit_messages_do_not_reach_the_new_visit() {
    let mut fx = fixture();
    fx.boot();
    fx.visit_b();
    fx.session.visit(fx.a);
    fx.send(json!({ "name": "visitStarted", "data": { "identifier": "v2", "hasCachedSnapshot": false } }));
    fx.take();

    fx.send(json!({ "name": "visitCompleted", "data": { "identifier": "v1", "restorationIdentifier": "stale" } }));
    assert!(fx.take().is_empty());
    assert_eq!(
        fx.session.current_visit().map(Visit::state),
        Some(VisitState::Started)
    );
}

#[test]
fn malformed_messages_have_no_effect() {
    let mut fx = fixture();
    fx.boot();
    fx.session.receive_script_message("\"foo\"");
    fx.send(json!({ "name": "pageLoaded", "data": {} }));
    assert!(fx.take().is_empty());
}

// =============================================================================
// BACK NAVIGATION
// =============================================================================

#[test]
fn abandoned_back_gesture_mid_visit_visits_again() {
    let mut fx = fixture();
    fx.boot();
    fx.visit_b();
    assert_eq!(fx.session.topmost_visitable(), Some(fx.b));

    // The back gesture begins: A starts to appear and is restored.
    fx.session.visitable_view_will_appear(fx.a, false);
    assert_eq!(
        fx.session.topmost_visit().map(Visit::state),
        Some(VisitState::Canceled)
    );
    fx.take();

    // The gesture is abandoned: B reappears.
    fx.session.visitable_view_will_appear(fx.b, true);
    let visit = fx.session.current_visit().unwrap();
    assert_eq!(visit.visitable(), fx.b);
    assert_eq!(visit.action(), VisitAction::Advance);
    assert_eq!(visit.state(), VisitState::Started);
    assert!(has(
        &fx.take(),
        "visitLocationWithActionAndRestorationIdentifier https://example.com/b,advance,null"
    ));
}

#[test]
fn abandoned_back_gesture_after_completion_cancels_restore() {
    let mut fx = fixture();
    fx.boot();
    fx.visit_b();
    fx.finish_b();

    fx.session.visitable_view_will_appear(fx.a, false);
    assert_eq!(fx.session.current_visit().map(Visit::visitable), Some(fx.a));
    fx.take();

    fx.session.visitable_view_will_appear(fx.b, true);
    assert_eq!(
        fx.session.current_visit().map(Visit::state),
        Some(VisitState::Canceled)
    );
    assert!(!has(&fx.take(), "B: show_screenshot"));

    fx.session.visitable_view_did_appear(fx.b);
    assert_eq!(
        fx.take(),
        vec![
            "B: hide_screenshot",
            "B: hide_indicator",
            "A: update_screenshot",
            "A: show_screenshot",
            "A: deactivate",
            "B: activate",
        ]
    );
    assert_eq!(fx.session.activated_visitable(), Some(fx.b));
}

#[test]
fn will_appear_without_visits_is_ignored() {
    let mut fx = fixture();
    fx.session.visitable_view_will_appear(fx.a, true);
    fx.session.visitable_view_did_appear(fx.a);
    assert!(fx.take().is_empty());
}

// =============================================================================
// RELOAD, REFRESH, FALLBACK
// =============================================================================

#[test]
fn refresh_reloads_topmost_and_clears_when_finished() {
    let mut fx = fixture();
    fx.boot();

    fx.session.visitable_did_request_refresh(fx.a);
    assert!(fx.session.is_refreshing());
    assert!(!fx.session.is_initialized());
    let log = fx.take();
    assert!(position(&log, "A: will_refresh") < position(&log, "load https://example.com/a"));
    assert_eq!(
        fx.session.topmost_visit().map(Visit::state),
        Some(VisitState::Started)
    );

    fx.send(json!({ "name": "pageLoaded", "data": { "restorationIdentifier": "rA2" } }));
    assert!(!fx.session.is_refreshing());
    assert!(has(&fx.take(), "A: did_refresh"));
    assert_eq!(fx.session.restoration_identifier(fx.a), Some("rA2"));
}

#[test]
fn reload_requests_from_hidden_surfaces_are_ignored() {
    let mut fx = fixture();
    fx.boot();
    fx.session.visitable_did_request_reload(fx.b);
    fx.session.visitable_did_request_refresh(fx.b);
    assert!(fx.take().is_empty());
    assert!(fx.session.is_initialized());
}

#[test]
fn page_invalidation_reloads_topmost() {
    let mut fx = fixture();
    fx.boot();
    fx.send(json!({ "name": "pageInvalidated", "data": {} }));
    let log = fx.take();
    assert_eq!(
        &log[..3],
        &["A: update_screenshot", "A: show_screenshot", "A: show_indicator"]
    );
    assert!(has(&log, "load https://example.com/a"));
    assert!(fx.session.current_visit().unwrap().is_cold_boot());
}

#[test]
fn evaluation_failure_falls_back_to_cold_boot() {
    let mut fx = fixture();
    fx.boot();
    fx.session.webview_mut().fail_evaluation = true;

    fx.session.visit(fx.b);
    let visit = fx.session.current_visit().unwrap();
    assert!(visit.is_cold_boot());
    assert_eq!(visit.visitable(), fx.b);
    assert_eq!(visit.state(), VisitState::Started);
    assert!(!fx.session.is_initialized());

    let log = fx.take();
    assert!(
        position(
            &log,
            "eval-failed visitLocationWithActionAndRestorationIdentifier"
        ) < position(&log, "load https://example.com/b")
    );
}

#[test]
fn evaluation_failure_before_boot_is_only_logged() {
    let mut fx = fixture();
    fx.session.webview_mut().fail_evaluation = true;
    fx.session.visit(fx.a);
    let before = fx.session.current_visit().map(|v| v.id().clone());
    fx.session.did_fail_script_evaluation(&turbo_common::BridgeError::Evaluation {
        function: "webView.issueRequestForVisitWithIdentifier".into(),
        message: "gone".into(),
    });
    assert_eq!(fx.session.current_visit().map(|v| v.id().clone()), before);
}

// =============================================================================
// PROPOSALS, NAVIGATION POLICY, SURFACES
// =============================================================================

#[test]
fn proposals_go_to_the_application() {
    let mut fx = fixture();
    fx.boot();
    fx.send(json!({
        "name": "visitProposed",
        "data": { "location": "https://example.com/c", "action": "replace" }
    }));
    assert_eq!(fx.take(), vec!["propose https://example.com/c replace"]);
}

#[test]
fn link_navigation_after_boot_opens_externally() {
    let mut fx = fixture();
    fx.boot();
    let policy = fx.session.decide_navigation(&NavigationAction {
        url: url("https://elsewhere.example/"),
        navigation_type: NavigationType::LinkActivated,
        main_frame: true,
    });
    assert_eq!(policy, NavigationPolicy::Cancel);
    assert_eq!(fx.take(), vec!["open_external https://elsewhere.example/"]);
}

#[test]
fn native_reload_after_boot_reloads_session() {
    let mut fx = fixture();
    fx.boot();
    let policy = fx.session.decide_navigation(&NavigationAction {
        url: url("https://example.com/a"),
        navigation_type: NavigationType::Reload,
        main_frame: true,
    });
    assert_eq!(policy, NavigationPolicy::Cancel);
    assert!(has(&fx.take(), "load https://example.com/a"));
    assert!(!fx.session.is_initialized());
}

#[test]
fn forgetting_a_surface_drops_its_state() {
    let mut fx = fixture();
    fx.boot();
    fx.session.forget_visitable(fx.a);
    assert_eq!(fx.session.restoration_identifier(fx.a), None);
    assert_eq!(fx.session.activated_visitable(), None);
    assert_eq!(fx.take(), vec!["A: deactivate"]);
}

#[test]
fn visit_to_unknown_surface_is_ignored() {
    let mut fx = fixture();
    let gone = VisitableId::new();
    fx.session.visit(gone);
    assert!(fx.session.current_visit().is_none());
    assert!(fx.take().is_empty());
}

#[test]
fn webview_events_are_routed() {
    let mut fx = fixture();
    fx.session.visit(fx.a);
    fx.take();
    fx.session.handle_webview_event(turbo_webview::WebViewEvent::Navigation(
        NavigationEvent::Finished {
            navigation: NavigationId(1),
        },
    ));
    fx.session
        .handle_webview_event(turbo_webview::WebViewEvent::ScriptMessage {
            body: json!({ "name": "pageLoaded", "data": { "restorationIdentifier": "rA" } })
                .to_string(),
        });
    let log = fx.take();
    assert_eq!(log.iter().filter(|e| *e == "request_finished").count(), 1);
    assert!(fx.session.is_initialized());
}
