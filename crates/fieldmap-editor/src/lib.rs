//! Field Planning Map Editor
//!
//! Interaction controller for the map editor. The map widget and the
//! property sidebar call into an [`EditorSession`] and get structured
//! results back. Only one create or edit flow is open at a time, so edges
//! are only derived from settled geometry.

pub mod actions;
pub mod config;
pub mod error;
pub mod session;
pub mod state;

pub use actions::{ActionOutcome, EditorAction};
pub use config::{ConfigError, ConfigManager, EditorConfig, SharedConfig, create_shared_config};
pub use error::{PreconditionError, SessionError};
pub use session::*;
pub use state::*;
