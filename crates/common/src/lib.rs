//! Utilities shared by services embedding the checkpointing module.

pub mod logging;
