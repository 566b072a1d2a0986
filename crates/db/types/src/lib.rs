//! Database interfaces for checkpoint records and validator BLS keys.
//!
//! Storage engines are external to the checkpointing core; it only talks to
//! the traits defined here.

pub mod errors;
#[cfg(feature = "stubs")]
pub mod stubs;
pub mod traits;

pub use errors::DbError;

pub type DbResult<T> = anyhow::Result<T, DbError>;
