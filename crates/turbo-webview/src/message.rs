//! Script message protocol between the in-page controller and the host.
//!
//! Every message the in-page adapter posts has the shape
//! `{"name": <kind>, "data": {...}}`. Parsing is strict: an unknown `name`,
//! a `data` member missing a required field, or a body that is not a JSON
//! object yields no message at all.

use serde::{Deserialize, Serialize};
use std::fmt;
use turbo_common::VisitAction;
use url::Url;

/// A message from the in-page controller to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "name",
    content = "data",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum ScriptMessage {
    /// The adapter finished a full page load and the controller is ready.
    PageLoaded { restoration_identifier: String },
    /// The controller cannot continue on the current page.
    PageInvalidated {},
    /// An uncaught error was raised in the page.
    ErrorRaised { error: String },
    /// The page wants to navigate; the host decides how.
    VisitProposed { location: Url, action: VisitAction },
    VisitStarted {
        identifier: String,
        #[serde(alias = "hasSnapshot")]
        has_cached_snapshot: bool,
    },
    VisitRequestStarted { identifier: String },
    VisitRequestCompleted { identifier: String },
    VisitRequestFailed { identifier: String, status_code: u16 },
    VisitRequestFinished { identifier: String },
    #[serde(alias = "visitResponseLoaded")]
    VisitRendered { identifier: String },
    VisitCompleted {
        identifier: String,
        restoration_identifier: String,
    },
}

/// The `name` of a [`ScriptMessage`], without its data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    PageLoaded,
    PageInvalidated,
    ErrorRaised,
    VisitProposed,
    VisitStarted,
    VisitRequestStarted,
    VisitRequestCompleted,
    VisitRequestFailed,
    VisitRequestFinished,
    VisitRendered,
    VisitCompleted,
}

impl MessageKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PageLoaded => "pageLoaded",
            Self::PageInvalidated => "pageInvalidated",
            Self::ErrorRaised => "errorRaised",
            Self::VisitProposed => "visitProposed",
            Self::VisitStarted => "visitStarted",
            Self::VisitRequestStarted => "visitRequestStarted",
            Self::VisitRequestCompleted => "visitRequestCompleted",
            Self::VisitRequestFailed => "visitRequestFailed",
            Self::VisitRequestFinished => "visitRequestFinished",
            Self::VisitRendered => "visitRendered",
            Self::VisitCompleted => "visitCompleted",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ScriptMessage {
    /// Parse a message from the raw JSON string posted by the page.
    pub fn parse(body: &str) -> Option<Self> {
        serde_json::from_str(body).ok().and_then(Self::from_value)
    }

    /// Parse a message from an already-decoded JSON value.
    pub fn from_value(value: serde_json::Value) -> Option<Self> {
        serde_json::from_value(value).ok()
    }

    pub fn kind(&self) -> MessageKind {
        match self {
            Self::PageLoaded { .. } => MessageKind::PageLoaded,
            Self::PageInvalidated {} => MessageKind::PageInvalidated,
            Self::ErrorRaised { .. } => MessageKind::ErrorRaised,
            Self::VisitProposed { .. } => MessageKind::VisitProposed,
            Self::VisitStarted { .. } => MessageKind::VisitStarted,
            Self::VisitRequestStarted { .. } => MessageKind::VisitRequestStarted,
            Self::VisitRequestCompleted { .. } => MessageKind::VisitRequestCompleted,
            Self::VisitRequestFailed { .. } => MessageKind::VisitRequestFailed,
            Self::VisitRequestFinished { .. } => MessageKind::VisitRequestFinished,
            Self::VisitRendered { .. } => MessageKind::VisitRendered,
            Self::VisitCompleted { .. } => MessageKind::VisitCompleted,
        }
    }

    /// The in-page visit identifier, for messages scoped to a visit.
    pub fn identifier(&self) -> Option<&str> {
        match self {
            Self::VisitStarted { identifier, .. }
            | Self::VisitRequestStarted { identifier }
            | Self::VisitRequestCompleted { identifier }
            | Self::VisitRequestFailed { identifier, .. }
            | Self::VisitRequestFinished { identifier }
            | Self::VisitRendered { identifier }
            | Self::VisitCompleted { identifier, .. } => Some(identifier),
            Self::PageLoaded { .. }
            | Self::PageInvalidated {}
            | Self::ErrorRaised { .. }
            | Self::VisitProposed { .. } => None,
        }
    }
}
