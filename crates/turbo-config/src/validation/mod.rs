//! Full configuration validation.
//!
//! Each section has its own submodule; this orchestrator calls them all
//! and collects errors into a single `ConfigError`.

mod helpers;
mod session;
mod webview;


use crate::schema::TurboConfig;
use turbo_common::ConfigError;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &TurboConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    session::validate_session(&mut errors, config);
    webview::validate_webview(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}
