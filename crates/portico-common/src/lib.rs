pub mod errors;
pub mod events;
pub mod id;
pub mod types;

pub use errors::{BindError, ConfigError, EngineError, HostError};
pub use events::{EventBus, HostEvent};
pub use id::{new_correlation_id, BrowserId, HandlerKind, SET_RENDER_HANDLER};
pub use types::{Point, Size};

pub type Result<T> = std::result::Result<T, HostError>;
