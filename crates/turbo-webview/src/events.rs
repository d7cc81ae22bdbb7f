//! Events flowing from the native web view to the session.

use std::fmt;
use std::sync::{Mutex, PoisonError};

use url::Url;

use crate::navigation::NavigationAction;

/// Identity of one native page load, assigned by the host when it starts
/// loading a URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NavigationId(pub u64);

impl fmt::Display for NavigationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "nav-{}", self.0)
    }
}

/// Progress of a native (full page) load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationEvent {
    /// The provisional load began.
    Started { navigation: NavigationId },
    /// A response arrived. `status_code` is `None` when the response was not
    /// an HTTP response.
    ResponseReceived {
        navigation: NavigationId,
        status_code: Option<u16>,
    },
    /// Content started arriving for the main frame.
    Committed { navigation: NavigationId },
    /// The load finished.
    Finished { navigation: NavigationId },
    /// The load failed at the transport level.
    Failed {
        navigation: NavigationId,
        error: String,
    },
}

impl NavigationEvent {
    pub fn navigation(&self) -> NavigationId {
        match self {
            Self::Started { navigation }
            | Self::ResponseReceived { navigation, .. }
            | Self::Committed { navigation }
            | Self::Finished { navigation }
            | Self::Failed { navigation, .. } => *navigation,
        }
    }
}

/// Everything a web view host reports, queued for the event loop to drain.
#[derive(Debug, Clone)]
pub enum WebViewEvent {
    /// A raw message posted by the in-page adapter.
    ScriptMessage { body: String },
    /// The reported outcome of a host -> page function call.
    ScriptResult { function: String, result: String },
    /// Native page-load progress.
    Navigation(NavigationEvent),
    /// The web view was asked to navigate somewhere it may not load in place.
    NavigationRequested(NavigationAction),
    /// Document title changed.
    TitleChanged { title: String },
}

/// Attributes a host's page-load notifications to the load that caused them.
///
/// Some hosts (wry among them) report load progress with only a URL. A load
/// issued with [`LoadTracker::begin`] is claimed by the first `Started` for
/// its URL; a `Finished` belongs to whichever load claimed the last
/// `Started`. Anything unclaimed, such as the tail of a stopped load or the
/// web view's initial blank page, is dropped.
///
/// Two loads of the same URL issued before the first reports `Started`
/// cannot be told apart; the earlier one's events are credited to the later.
#[derive(Debug, Default)]
pub struct LoadTracker {
    state: Mutex<LoadState>,
}

#[derive(Debug, Default)]
struct LoadState {
    issued: u64,
    /// Issued but not yet started.
    requested: Option<(NavigationId, String)>,
    /// Started and not yet finished.
    in_progress: Option<NavigationId>,
}

impl LoadTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> std::sync::MutexGuard<'_, LoadState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a host-initiated load of `url` and return its id.
    pub fn begin(&self, url: &Url) -> NavigationId {
        let mut state = self.state();
        state.issued += 1;
        let navigation = NavigationId(state.issued);
        state.requested = Some((navigation, url.as_str().to_string()));
        navigation
    }

    /// The web view started loading `url`.
    pub fn started(&self, url: &str) -> Option<NavigationEvent> {
        let mut state = self.state();
        let claimed = match &state.requested {
            Some((navigation, requested)) if same_url(url, requested) => Some(*navigation),
            _ => None,
        };
        if claimed.is_some() {
            state.requested = None;
        }
        // An unclaimed start means the web view moved on to something else.
        state.in_progress = claimed;
        claimed.map(|navigation| NavigationEvent::Started { navigation })
    }

    /// A load was issued and the web view has not started it yet.
    pub fn has_pending(&self) -> bool {
        self.state().requested.is_some()
    }

    /// The web view finished its current load.
    pub fn finished(&self) -> Option<NavigationEvent> {
        self.state()
            .in_progress
            .take()
            .map(|navigation| NavigationEvent::Finished { navigation })
    }
}

fn same_url(reported: &str, requested: &str) -> bool {
    reported == requested || Url::parse(reported).is_ok_and(|url| url.as_str() == requested)
}

#[cfg(feature = "wry")]
mod page_load {
    /// State of a wry page load lifecycle.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum PageLoadState {
        Started,
        Finished,
    }

    impl From<wry::PageLoadEvent> for PageLoadState {
        fn from(e: wry::PageLoadEvent) -> Self {
            match e {
                wry::PageLoadEvent::Started => Self::Started,
                wry::PageLoadEvent::Finished => Self::Finished,
            }
        }
    }
}

#[cfg(feature = "wry")]
pub use page_load::PageLoadState;
