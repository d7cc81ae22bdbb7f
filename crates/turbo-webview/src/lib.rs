//! Host side of the native <-> in-page navigation bridge.
//!
//! Provides:
//! - The script message codec (`ScriptMessage`)
//! - Script-call encoding and the in-page adapter script
//! - `WebViewBridge`, the typed command/callback proxy over a `WebViewHost`
//! - Native navigation events and the navigation-action policy
//! - A `wry`-backed host (feature `wry`)

pub mod bridge;
pub mod events;
pub mod message;
pub mod navigation;
pub mod script;

#[cfg(feature = "wry")]
pub mod manager;

pub use bridge::{
    BridgeDelegate, PageLoadDelegate, VisitEventDelegate, WebViewBridge, WebViewDelegate,
    WebViewHost,
};
pub use events::{LoadTracker, NavigationEvent, NavigationId, WebViewEvent};
pub use message::{MessageKind, ScriptMessage};
pub use navigation::{NavigationAction, NavigationDecision, NavigationPolicy, NavigationType};
pub use script::{adapter_script, ScriptResult};

#[cfg(feature = "wry")]
pub use manager::{WebViewConfig, WebViewHandle, WebViewManager};
