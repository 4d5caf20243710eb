//! cashcast-config
//!
//! Persistent CLI preferences for the projection tool.
//! Owns the Config data structure plus disk persistence and backup helpers.
//! The projection engine never reads configuration; only the CLI does.

pub mod error;
pub mod manager;
pub mod model;

pub use error::ConfigError;
pub use manager::ConfigManager;
pub use model::{Config, OutputFormat};
