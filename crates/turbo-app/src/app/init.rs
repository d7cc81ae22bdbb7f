//! Window and web view creation.

use std::sync::Arc;

use turbo_session::Session;
use turbo_webview::WebViewConfig;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowAttributes};

use crate::pages::PageStack;

use super::core::TurboApp;
use super::types::DEFAULT_WINDOW_SIZE;

impl TurboApp {
    /// Create the window, the shared web view and the session.
    /// Returns `false` if initialization failed and the event loop should exit.
    pub(super) fn initialize_window(&mut self, event_loop: &ActiveEventLoop) -> bool {
        let (width, height) = DEFAULT_WINDOW_SIZE;
        let attrs = WindowAttributes::default()
            .with_title("Turbo")
            .with_transparent(self.config.webview.transparent)
            .with_inner_size(winit::dpi::LogicalSize::new(width, height));

        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                tracing::error!("Failed to create window: {e}");
                return false;
            }
        };

        let settings = &self.config.webview;
        let webview_config = WebViewConfig {
            message_handler: self.config.session.message_handler.clone(),
            transparent: settings.transparent,
            devtools: settings.devtools,
            user_agent: settings.user_agent.clone(),
            allowed_origins: settings.allowed_origins.clone(),
            ..WebViewConfig::default()
        };

        let handle = match self
            .manager
            .create(window.as_ref(), window_bounds(&window), webview_config)
        {
            Ok(handle) => handle,
            Err(e) => {
                tracing::error!("Failed to create web view: {e}");
                return false;
            }
        };
        tracing::info!("Web view created");

        self.session = Some(Session::new(handle, PageStack::new()));
        self.window = Some(window);
        true
    }

    /// Keep the web view covering the window's client area.
    pub(super) fn sync_webview_bounds(&mut self) {
        let (Some(window), Some(session)) = (&self.window, &self.session) else {
            return;
        };
        if let Err(e) = session.webview().set_bounds(window_bounds(window)) {
            tracing::warn!(error = %e, "Failed to update webview bounds");
        }
    }
}

/// The window's client area in logical coordinates.
fn window_bounds(window: &Window) -> wry::Rect {
    let size = window.inner_size().to_logical::<f64>(window.scale_factor());
    wry::Rect {
        position: wry::dpi::Position::Logical(wry::dpi::LogicalPosition::new(0.0, 0.0)),
        size: wry::dpi::Size::Logical(wry::dpi::LogicalSize::new(size.width, size.height)),
    }
}
