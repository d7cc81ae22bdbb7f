use serde::{Deserialize, Serialize};
use std::fmt;

/// How a visit affects the navigation history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisitAction {
    /// Push a new history entry.
    Advance,
    /// Replace the current history entry.
    Replace,
    /// Back/forward navigation, rendered from a cached snapshot when one exists.
    Restore,
}

impl VisitAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Advance => "advance",
            Self::Replace => "replace",
            Self::Restore => "restore",
        }
    }
}

impl fmt::Display for VisitAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Overall state of a visit.
///
/// Moves `Initialized -> Started -> {Canceled | Failed | Completed}` and
/// never leaves a terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VisitState {
    Initialized,
    Started,
    Canceled,
    Failed,
    Completed,
}

impl VisitState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Canceled | Self::Failed | Self::Completed)
    }
}
