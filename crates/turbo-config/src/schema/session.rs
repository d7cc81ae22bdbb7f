use serde::{Deserialize, Serialize};

/// Session behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Location the first (cold boot) visit loads.
    pub start_location: String,
    /// Name of the script message channel the in-page adapter posts to.
    pub message_handler: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            start_location: "https://example.com/".into(),
            message_handler: "ipc".into(),
        }
    }
}
