//! Epoch checkpointing with BLS quorum signatures.
//!
//! Validators co-sign each epoch's `(epoch, app_hash)` checkpoint. Partial
//! signatures are accumulated until more than the quorum share of the epoch's
//! voting power has signed, at which point the checkpoint is sealed and can be
//! embedded in the external chain. Checkpoints read back from the external
//! chain are re-verified against local state, and a validly signed checkpoint
//! for a different app hash is reported as a conflict.
//!
//! Everything runs inside the host chain's deterministic state transition, so
//! nothing here spawns threads, blocks, or reads the wall clock.

#[cfg(test)]
use anchor_common as _;

mod accumulator;
mod epoch;
mod errors;
mod hooks;
mod keeper;
mod lifecycle;
mod registry;
mod store;
mod verifier;

pub use epoch::{EpochProvider, StaticEpochProvider};
pub use errors::{CheckpointingError, CheckpointingResult, ErrorClass, InvalidCheckpointReason};
pub use hooks::CheckpointingHooks;
pub use keeper::CheckpointKeeper;
pub use lifecycle::{SkipReason, TransitionOutcome};
pub use registry::ValidatorRegistry;
pub use store::CheckpointStore;
