//! Default TOML config template with inline documentation comments.

use crate::schema::CONFIG_SCHEMA_VERSION;

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    format!(
        r##"# Turbo bridge configuration
# Schema version {CONFIG_SCHEMA_VERSION}
# Only override what you want to change -- missing fields use defaults.

[session]
# Location loaded by the first (cold boot) visit.
# start_location = "https://example.com/"
# Script message channel the in-page adapter posts to.
# message_handler = "ipc"

[webview]
# user_agent = "TurboBridge/0.1"
# devtools = false
# transparent = false
# Origins (optionally with a path) the web view may load in place;
# empty allows any http(s) URL.
# allowed_origins = ["https://example.com"]

[logging]
# level = "info"         # trace | debug | info | warn | error
"##
    )
}
