//! Adaptive polling of web view events and application commands.

use std::time::Instant;

use turbo_webview::WebViewEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow};

use crate::pages::HostCommand;

use super::core::TurboApp;
use super::types::POLL_INTERVAL;

impl TurboApp {
    /// Run polling and schedule the next wake-up.
    pub(super) fn poll_and_schedule(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();

        if now.duration_since(self.last_poll) >= POLL_INTERVAL {
            self.last_poll = now;
            let handled = self.poll_webview_events();
            self.poll_host_commands();
            if handled > 0 {
                self.update_window_title();
            }
        }

        event_loop.set_control_flow(ControlFlow::WaitUntil(Instant::now() + POLL_INTERVAL));
    }

    /// Feed queued web view events to the session. Returns how many ran.
    fn poll_webview_events(&mut self) -> usize {
        let Some(session) = self.session.as_mut() else {
            return 0;
        };
        let events = self.manager.drain_events();
        let count = events.len();
        for event in events {
            if let WebViewEvent::TitleChanged { title } = &event {
                session.webview_mut().set_title(title.clone());
                session.host_mut().set_active_title(title.clone());
            }
            session.handle_webview_event(event);
        }
        count
    }

    /// Act on what the session asked of the application. Presenting a page
    /// can queue further commands, so keep going until none are left.
    fn poll_host_commands(&mut self) {
        loop {
            let commands = match self.session.as_mut() {
                Some(session) => session.host_mut().take_commands(),
                None => return,
            };
            if commands.is_empty() {
                break;
            }
            for command in commands {
                self.run_host_command(command);
            }
        }
    }

    fn run_host_command(&mut self, command: HostCommand) {
        match command {
            HostCommand::Propose { location, action } => self.present(location, action),
            HostCommand::OpenExternal(url) => {
                tracing::info!(%url, "opening in system browser");
                if let Err(e) = open::that(url.as_str()) {
                    tracing::warn!(%url, error = %e, "Failed to open external URL");
                }
            }
            HostCommand::RequestFailed { visitable, message } => {
                tracing::error!(%visitable, "Request failed: {message}");
                if let Some(window) = &self.window {
                    window.set_title(&format!("Turbo — {message}"));
                }
            }
        }
    }
}
