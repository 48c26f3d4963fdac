//! Configuration module for Ahorra
//!
//! - Path resolution for the data directory
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::LedgerPaths;
pub use settings::{AlertSettings, EnforcementMode, Settings};
