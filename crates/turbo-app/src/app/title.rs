//! Window title management: reflects the top page.

use super::core::TurboApp;

impl TurboApp {
    /// Format: "Turbo — {page title or location}"
    pub(super) fn update_window_title(&self) {
        let (Some(window), Some(session)) = (&self.window, &self.session) else {
            return;
        };
        window.set_title(&session.host().display_title());
    }
}
