//! Policy for native navigations the web view is about to perform.
//!
//! Once a page is loaded, in-page navigation is the controller's job; any
//! main-frame navigation that still reaches the native layer leaves the
//! application and is handed to the system instead.

use url::Url;

/// Why the web view wants to navigate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationType {
    LinkActivated,
    FormSubmitted,
    BackForward,
    Reload,
    FormResubmitted,
    Other,
}

/// A navigation the web view asks permission for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationAction {
    pub url: Url,
    pub navigation_type: NavigationType,
    /// Whether the navigation targets the main frame.
    pub main_frame: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationPolicy {
    Allow,
    Cancel,
}

/// What to do with a [`NavigationAction`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationDecision {
    pub policy: NavigationPolicy,
    /// Set when the URL should be opened outside the web view.
    pub externally_openable_url: Option<Url>,
    /// Set when the web view tried to reload itself.
    pub should_reload_page: bool,
}

impl NavigationDecision {
    pub fn new(action: &NavigationAction) -> Self {
        let link = action.navigation_type == NavigationType::LinkActivated;
        let policy = if link || action.main_frame {
            NavigationPolicy::Cancel
        } else {
            NavigationPolicy::Allow
        };
        let open_externally =
            link || (action.main_frame && action.navigation_type == NavigationType::Other);

        Self {
            policy,
            externally_openable_url: open_externally.then(|| action.url.clone()),
            should_reload_page: action.navigation_type == NavigationType::Reload,
        }
    }
}

/// Check whether `url` may be loaded in place given an origin allowlist.
///
/// An empty allowlist admits any http(s) URL. `about:blank` is always
/// allowed. Each entry admits URLs with the same origin (scheme, host and
/// port) whose path lies under the entry's path, segment by segment.
/// Entries that do not parse admit nothing.
pub fn is_navigation_allowed(url: &str, allowed: &[String]) -> bool {
    if url == "about:blank" {
        return true;
    }
    let Ok(candidate) = Url::parse(url) else {
        return false;
    };
    if !matches!(candidate.scheme(), "http" | "https") {
        return false;
    }
    if allowed.is_empty() {
        return true;
    }
    allowed
        .iter()
        .filter_map(|entry| Url::parse(entry).ok())
        .any(|entry| admits(&entry, &candidate))
}

fn admits(entry: &Url, candidate: &Url) -> bool {
    if entry.origin() != candidate.origin() {
        return false;
    }
    let base = entry.path().trim_end_matches('/');
    let path = candidate.path();
    base.is_empty()
        || path == base
        || path
            .strip_prefix(base)
            .is_some_and(|rest| rest.starts_with('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn action(navigation_type: NavigationType, main_frame: bool) -> NavigationAction {
        NavigationAction {
            url: Url::parse("https://elsewhere.example/page").unwrap(),
            navigation_type,
            main_frame,
        }
    }

    #[test]
    fn link_activation_is_cancelled_and_opened_externally() {
        let decision = NavigationDecision::new(&action(NavigationType::LinkActivated, false));
        assert_eq!(decision.policy, NavigationPolicy::Cancel);
        assert_eq!(
            decision.externally_openable_url.as_ref().map(Url::as_str),
            Some("https://elsewhere.example/page")
        );
        assert!(!decision.should_reload_page);
    }

    #[test]
    fn main_frame_other_is_opened_externally() {
        let decision = NavigationDecision::new(&action(NavigationType::Other, true));
        assert_eq!(decision.policy, NavigationPolicy::Cancel);
        assert!(decision.externally_openable_url.is_some());
    }

    #[test]
    fn sub_frame_loads_are_allowed() {
        let decision = NavigationDecision::new(&action(NavigationType::Other, false));
        assert_eq!(decision.policy, NavigationPolicy::Allow);
        assert!(decision.externally_openable_url.is_none());
    }

    #[test]
    fn main_frame_reload_is_cancelled_and_reloads() {
        let decision = NavigationDecision::new(&action(NavigationType::Reload, true));
        assert_eq!(decision.policy, NavigationPolicy::Cancel);
        assert!(decision.externally_openable_url.is_none());
        assert!(decision.should_reload_page);
    }

    #[test]
    fn main_frame_form_submission_is_cancelled_without_opening() {
        let decision = NavigationDecision::new(&action(NavigationType::FormSubmitted, true));
        assert_eq!(decision.policy, NavigationPolicy::Cancel);
        assert!(decision.externally_openable_url.is_none());
    }

    // -- Allowlist --

    #[test]
    fn empty_allowlist_admits_http_and_https_only() {
        assert!(is_navigation_allowed("https://example.com/", &[]));
        assert!(is_navigation_allowed("http://localhost:3000/", &[]));
        assert!(is_navigation_allowed("about:blank", &[]));
        assert!(!is_navigation_allowed("file:///etc/passwd", &[]));
        assert!(!is_navigation_allowed("javascript:alert(1)", &[]));
        assert!(!is_navigation_allowed("", &[]));
    }

    #[test]
    fn allowlist_restricts_to_prefixes() {
        let allowed = vec!["https://app.example.com/".to_string()];
        assert!(is_navigation_allowed("https://app.example.com/posts", &allowed));
        assert!(!is_navigation_allowed("https://evil.example.com/", &allowed));
        assert!(!is_navigation_allowed("https://app.example.com.evil.io/", &allowed));
        assert!(is_navigation_allowed("about:blank", &allowed));
    }

    #[test]
    fn bare_origin_entry_does_not_admit_lookalike_hosts() {
        let allowed = vec!["https://app.example.com".to_string()];
        assert!(is_navigation_allowed("https://app.example.com/posts", &allowed));
        assert!(is_navigation_allowed("https://app.example.com", &allowed));
        assert!(!is_navigation_allowed("https://app.example.com.evil.io/steal", &allowed));
        assert!(!is_navigation_allowed("https://app.example.com@evil.io/", &allowed));
    }

    #[test]
    fn allowlist_compares_scheme_and_port() {
        let allowed = vec!["https://app.example.com".to_string()];
        assert!(!is_navigation_allowed("http://app.example.com/", &allowed));
        assert!(!is_navigation_allowed("https://app.example.com:8443/", &allowed));
        assert!(is_navigation_allowed("https://app.example.com:443/", &allowed));
    }

    #[test]
    fn allowlist_path_matches_whole_segments() {
        let allowed = vec!["https://example.com/app".to_string()];
        assert!(is_navigation_allowed("https://example.com/app", &allowed));
        assert!(is_navigation_allowed("https://example.com/app/posts?page=2", &allowed));
        assert!(!is_navigation_allowed("https://example.com/application", &allowed));
        assert!(!is_navigation_allowed("https://example.com/", &allowed));
    }

    #[test]
    fn unparseable_allowlist_entries_admit_nothing() {
        let allowed = vec!["not a url".to_string()];
        assert!(!is_navigation_allowed("https://example.com/", &allowed));
    }
}
