//! Visit lifecycle and session orchestration.
//!
//! A [`Session`] owns the web view bridge and the current/topmost
//! [`Visit`]. Visits are either cold boots (a full native page load) or
//! script-driven (delegated to the in-page controller). History changes and
//! response loading are deferred behind a single-release [`Lock`] until the
//! host confirms the visual transition finished.

pub mod lock;
pub mod session;
pub mod visit;

#[cfg(test)]
mod testing;

pub use lock::Lock;
pub use session::{Session, SessionDelegate, VisitableHost};
pub use visit::{AfterNavigation, RequestState, Visit, VisitContext, VisitDelegate, VisitDriver};
