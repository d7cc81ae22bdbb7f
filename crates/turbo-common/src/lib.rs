pub mod errors;
pub mod id;
pub mod types;

pub use errors::{BridgeError, ConfigError, TurboError, VisitError};
pub use id::{new_correlation_id, VisitId, VisitableId};
pub use types::{VisitAction, VisitState};

pub type Result<T> = std::result::Result<T, TurboError>;
