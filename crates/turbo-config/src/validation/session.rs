use super::helpers::{validate_http_url, validate_js_identifier};
use crate::schema::TurboConfig;

pub(crate) fn validate_session(errors: &mut Vec<String>, config: &TurboConfig) {
    validate_http_url(
        errors,
        "session.start_location",
        &config.session.start_location,
    );
    validate_js_identifier(
        errors,
        "session.message_handler",
        &config.session.message_handler,
    );
}
