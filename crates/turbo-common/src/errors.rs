use std::path::PathBuf;

/// Description used when the script side reports a failed request without
/// an HTTP status (status code `0`).
pub const SCRIPT_NETWORK_ERROR: &str = "A network error occurred.";

/// Description used when a native load produced a response that carries no
/// HTTP status at all.
pub const UNKNOWN_RESPONSE_ERROR: &str = "An unknown error occurred.";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

/// Classified failure of a visit's request.
///
/// This is the single error object that travels Visit -> Session ->
/// application delegate. Cancellation is never represented here.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VisitError {
    #[error("HTTP request failed with status {status_code}")]
    Http { status_code: u16 },

    #[error("network error: {0}")]
    Network(String),
}

impl VisitError {
    /// Classify an HTTP status. Statuses in `[200, 300)` are successes.
    pub fn from_status(status_code: u16) -> Option<Self> {
        if (200..300).contains(&status_code) {
            None
        } else {
            Some(Self::Http { status_code })
        }
    }

    /// Classify a failure status reported by the in-page controller.
    ///
    /// `0` carries no status semantics across the script boundary and is
    /// reported as a network failure.
    pub fn from_script_status(status_code: u16) -> Self {
        if status_code == 0 {
            Self::Network(SCRIPT_NETWORK_ERROR.to_string())
        } else {
            Self::Http { status_code }
        }
    }

    /// A response arrived but it was not an HTTP response.
    pub fn unknown_response() -> Self {
        Self::Network(UNKNOWN_RESPONSE_ERROR.to_string())
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Http { status_code } => Some(*status_code),
            Self::Network(_) => None,
        }
    }

    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}

/// Faults on the host <-> script channel. Always logged, never surfaced as
/// a visit failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BridgeError {
    #[error("failed to encode arguments for `{function}`: {message}")]
    Encode { function: String, message: String },

    #[error("failed to evaluate `{function}`: {message}")]
    Evaluation { function: String, message: String },

    #[error("`{function}` raised {error}")]
    Exception {
        function: String,
        error: String,
        stack: Option<String>,
    },
}

impl BridgeError {
    pub fn function(&self) -> &str {
        match self {
            Self::Encode { function, .. }
            | Self::Evaluation { function, .. }
            | Self::Exception { function, .. } => function,
        }
    }

    /// Whether the fault means the in-page controller can no longer be
    /// trusted and the session should fall back to a cold boot.
    pub fn is_structural(&self) -> bool {
        matches!(self, Self::Evaluation { .. })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TurboError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Visit(#[from] VisitError),

    #[error(transparent)]
    Bridge(#[from] BridgeError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("webview error: {0}")]
    WebView(String),

    #[error("{0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = ConfigError::FileNotFound(PathBuf::from("/tmp/missing.toml"));
        assert_eq!(err.to_string(), "config file not found: /tmp/missing.toml");

        let err = ConfigError::ParseError("unexpected token".into());
        assert_eq!(err.to_string(), "config parse error: unexpected token");

        let err = ConfigError::ValidationError("session.start_location".into());
        assert_eq!(
            err.to_string(),
            "config validation error: session.start_location"
        );
    }

    #[test]
    fn success_statuses_do_not_classify_as_failures() {
        assert_eq!(VisitError::from_status(200), None);
        assert_eq!(VisitError::from_status(204), None);
        assert_eq!(VisitError::from_status(299), None);
    }

    #[test]
    fn non_success_statuses_classify_as_http_failures() {
        assert_eq!(
            VisitError::from_status(404),
            Some(VisitError::Http { status_code: 404 })
        );
        assert_eq!(
            VisitError::from_status(300),
            Some(VisitError::Http { status_code: 300 })
        );
        assert_eq!(
            VisitError::from_status(199),
            Some(VisitError::Http { status_code: 199 })
        );
    }

    #[test]
    fn script_status_zero_is_network_failure() {
        let err = VisitError::from_script_status(0);
        assert!(err.is_network());
        assert_eq!(err.status_code(), None);
        assert_eq!(err.to_string(), "network error: A network error occurred.");
    }

    #[test]
    fn script_status_nonzero_is_http_failure() {
        let err = VisitError::from_script_status(500);
        assert_eq!(err.status_code(), Some(500));
        assert_eq!(err.to_string(), "HTTP request failed with status 500");
    }

    #[test]
    fn only_evaluation_faults_are_structural() {
        let eval = BridgeError::Evaluation {
            function: "webView.cancelVisitWithIdentifier".into(),
            message: "web view is gone".into(),
        };
        let thrown = BridgeError::Exception {
            function: "webView.cancelVisitWithIdentifier".into(),
            error: "TypeError: x is undefined".into(),
            stack: None,
        };
        assert!(eval.is_structural());
        assert!(!thrown.is_structural());
        assert_eq!(thrown.function(), "webView.cancelVisitWithIdentifier");
    }

    #[test]
    fn turbo_error_from_visit() {
        let err: TurboError = VisitError::Http { status_code: 503 }.into();
        assert!(matches!(err, TurboError::Visit(_)));
        assert!(err.to_string().contains("503"));
    }

    #[test]
    fn turbo_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: TurboError = io_err.into();
        assert!(matches!(err, TurboError::Io(_)));
        assert!(err.to_string().contains("file missing"));
    }
}
