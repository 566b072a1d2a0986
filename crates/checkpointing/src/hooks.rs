use anchor_checkpoint_types::{CheckpointRecord, RawCheckpoint};

/// Observer of checkpoint events, installed once on the keeper.
///
/// Hooks run synchronously inside the state transition that caused them and
/// cannot fail. Implementations must be deterministic given the same event
/// sequence. Every method defaults to a no-op.
pub trait CheckpointingHooks: Send + Sync {
    /// The checkpoint reached quorum.
    fn on_sealed(&self, _record: &CheckpointRecord) {}

    /// The checkpoint was included in the external chain.
    fn on_submitted(&self, _record: &CheckpointRecord) {}

    fn on_confirmed(&self, _record: &CheckpointRecord) {}

    fn on_finalized(&self, _record: &CheckpointRecord) {}

    /// External inclusion was found invalid and the checkpoint is back to
    /// `Sealed`.
    fn on_forgotten(&self, _record: &CheckpointRecord) {}

    /// A checkpoint read back from the external chain passed verification.
    fn on_externally_reverified(&self, _ckpt: &RawCheckpoint) {}

    /// A validly signed external checkpoint disagrees with the local record.
    fn on_conflict(&self, _candidate: &RawCheckpoint, _local: &CheckpointRecord) {}
}
