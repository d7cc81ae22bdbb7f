use std::time::Duration;

/// How often queued web view events are drained (~120 Hz).
pub(super) const POLL_INTERVAL: Duration = Duration::from_millis(8);

/// Initial window size in logical pixels.
pub(super) const DEFAULT_WINDOW_SIZE: (f64, f64) = (1024.0, 768.0);
