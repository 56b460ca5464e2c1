// Public modules
pub mod clean;
pub mod config;
pub mod confirm;
pub mod error;
pub mod paths;
pub mod registry;
pub mod release;
pub mod stage;

// Re-export common types for convenience
pub use error::{Error, ErrorCode, Result};
pub use stage::Stage;
