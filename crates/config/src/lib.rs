//! Node configuration for the checkpointing module.

pub mod checkpointing;
pub mod config;
mod errors;

pub use checkpointing::CheckpointingParams;
pub use config::{Config, LoggingConfig};
pub use errors::ConfigError;
