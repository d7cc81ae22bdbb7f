//! `ApplicationHandler` implementation for the winit event loop.

use winit::application::ApplicationHandler;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::{Key, NamedKey};
use winit::window::WindowId;

use super::core::TurboApp;

impl ApplicationHandler for TurboApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if !self.initialize_window(event_loop) {
            event_loop.exit();
            return;
        }

        self.present_root();
        self.update_window_title();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                tracing::info!("Window close requested");
                self.should_exit = true;
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if size.width > 0 && size.height > 0 {
                    self.sync_webview_bounds();
                }
            }

            WindowEvent::ModifiersChanged(new_modifiers) => {
                self.modifiers = new_modifiers.state();
            }

            WindowEvent::KeyboardInput { event, .. } => {
                self.handle_keyboard_input(event);
            }

            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.should_exit {
            event_loop.exit();
            return;
        }
        self.poll_and_schedule(event_loop);
    }
}

impl TurboApp {
    /// Alt+Left goes back, F5 or Ctrl+R refreshes, F12 opens devtools.
    fn handle_keyboard_input(&mut self, event: KeyEvent) {
        let KeyEvent {
            logical_key, state, ..
        } = event;
        if state != ElementState::Pressed {
            return;
        }

        match &logical_key {
            Key::Named(NamedKey::ArrowLeft) if self.modifiers.alt_key() => self.pop_page(),
            Key::Named(NamedKey::BrowserBack) => self.pop_page(),
            Key::Named(NamedKey::F5) => self.refresh_top(),
            Key::Character(c) if self.modifiers.control_key() && c.as_str() == "r" => {
                self.refresh_top()
            }
            Key::Named(NamedKey::F12) if self.config.webview.devtools => {
                if let Some(session) = &self.session {
                    session.webview().open_devtools();
                }
            }
            _ => {}
        }
    }
}
