use super::helpers::validate_http_url;
use crate::schema::TurboConfig;

pub(crate) fn validate_webview(errors: &mut Vec<String>, config: &TurboConfig) {
    for (i, origin) in config.webview.allowed_origins.iter().enumerate() {
        validate_http_url(errors, &format!("webview.allowed_origins[{i}]"), origin);
    }

    if let Some(ua) = &config.webview.user_agent {
        if ua.trim().is_empty() {
            errors.push("webview.user_agent must not be blank".to_string());
        }
    }
}
