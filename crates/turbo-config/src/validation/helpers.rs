//! Shared helpers used by the section validators.

use url::Url;

/// Push an error unless `value` is an absolute http(s) URL.
pub(crate) fn validate_http_url(errors: &mut Vec<String>, name: &str, value: &str) {
    match Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        Ok(url) => errors.push(format!(
            "{name} = {value:?} must use http or https, not {}",
            url.scheme()
        )),
        Err(e) => errors.push(format!("{name} = {value:?} is not a valid URL: {e}")),
    }
}

/// Push an error unless `value` is usable as a JavaScript identifier.
pub(crate) fn validate_js_identifier(errors: &mut Vec<String>, name: &str, value: &str) {
    let mut chars = value.chars();
    let valid = match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' || first == '$' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        }
        _ => false,
    };
    if !valid {
        errors.push(format!("{name} = {value:?} is not a valid identifier"));
    }
}
