//! Core application state struct.

use std::sync::Arc;
use std::time::Instant;

use turbo_config::TurboConfig;
use turbo_session::Session;
use turbo_webview::{WebViewHandle, WebViewManager};
use url::Url;
use winit::keyboard::ModifiersState;
use winit::window::Window;

use crate::pages::PageStack;

pub(super) type AppSession = Session<WebViewHandle, PageStack>;

/// Top-level application state.
pub struct TurboApp {
    pub(super) config: TurboConfig,
    pub(super) start_location: Url,
    pub(super) window: Option<Arc<Window>>,
    pub(super) manager: WebViewManager,
    /// Created once the window and web view exist.
    pub(super) session: Option<AppSession>,
    pub(super) modifiers: ModifiersState,
    pub(super) last_poll: Instant,
    pub(super) should_exit: bool,
}

impl TurboApp {
    pub fn new(config: TurboConfig, start_location: Url) -> Self {
        Self {
            config,
            start_location,
            window: None,
            manager: WebViewManager::new(),
            session: None,
            modifiers: ModifiersState::empty(),
            last_poll: Instant::now(),
            should_exit: false,
        }
    }
}
