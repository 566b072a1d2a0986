use anchor_checkpoint_types::{CheckpointRecord, PayloadError, RawCheckpoint};
use anchor_config::ConfigError;
use anchor_db_types::DbError;
use anchor_primitives::{AppHash, Epoch, ValAddress};
use thiserror::Error;

pub type CheckpointingResult<T> = Result<T, CheckpointingError>;

/// How the caller must react to a [`CheckpointingError`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorClass {
    /// The input was rejected and state is unchanged. Safe to continue.
    Rejected,

    /// Two validly signed checkpoints exist for one epoch. The host must halt.
    SafetyViolation,

    /// A setup or persistence invariant was broken at the call site.
    Invariant,
}

/// Why an externally observed checkpoint failed verification.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InvalidCheckpointReason {
    #[error("structural check failed: {0}")]
    Structural(String),

    /// Signed power did not exceed the quorum share of the total.
    #[error("insufficient voting power: {signed} of {total}")]
    InsufficientPower { signed: u64, total: u64 },

    #[error("multi-signature does not verify")]
    InvalidMultiSig,
}

#[derive(Debug, Error)]
pub enum CheckpointingError {
    #[error("no checkpoint for epoch {0}")]
    UnknownEpoch(Epoch),

    #[error("app hash mismatch for epoch {epoch}: expected {expected}, got {got}")]
    AppHashMismatch {
        epoch: Epoch,
        expected: AppHash,
        got: AppHash,
    },

    #[error("signer {0} has no registered BLS key")]
    UnregisteredSigner(ValAddress),

    #[error("signer {signer} is not in the validator set of epoch {epoch}")]
    SignerNotInEpoch { epoch: Epoch, signer: ValAddress },

    #[error("invalid partial signature from {0}")]
    InvalidSignature(ValAddress),

    #[error("malformed checkpoint payload: {0}")]
    MalformedPayload(#[from] PayloadError),

    #[error("invalid checkpoint: {0}")]
    InvalidCheckpoint(#[from] InvalidCheckpointReason),

    #[error("checkpoint for epoch {0} not found")]
    NotFound(Epoch),

    #[error("bitmap selects index {index} but the validator set has {size} members")]
    BitmapOutOfRange { index: usize, size: usize },

    /// A validly signed checkpoint commits to a different app hash than the
    /// local record. Carries both so the host can report them before halting.
    #[error("conflicting checkpoint for epoch {epoch}: external {} vs local {}", .candidate.app_hash, .local.app_hash())]
    ConflictingCheckpoint {
        epoch: Epoch,
        candidate: Box<RawCheckpoint>,
        local: Box<CheckpointRecord>,
    },

    #[error("checkpoint for epoch {0} already exists")]
    AlreadyExists(Epoch),

    #[error("validator {0} already registered a BLS key")]
    AlreadyRegistered(ValAddress),

    #[error("BLS key is already registered by {0}")]
    BlsKeyAlreadyRegistered(ValAddress),

    #[error("no BLS key registered for {0}")]
    BlsKeyNotFound(ValAddress),

    #[error("hooks already installed")]
    HooksAlreadySet,

    #[error("no validator set for epoch {0}")]
    MissingValidatorSet(Epoch),

    #[error("invalid checkpointing params: {0}")]
    InvalidParams(#[from] ConfigError),

    #[error("db: {0}")]
    Db(#[from] DbError),
}

impl CheckpointingError {
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::ConflictingCheckpoint { .. } => ErrorClass::SafetyViolation,
            Self::AlreadyExists(_)
            | Self::AlreadyRegistered(_)
            | Self::BlsKeyAlreadyRegistered(_)
            | Self::HooksAlreadySet
            | Self::MissingValidatorSet(_)
            | Self::InvalidParams(_)
            | Self::Db(_) => ErrorClass::Invariant,
            _ => ErrorClass::Rejected,
        }
    }

    /// Whether the caller must stop instead of dropping the offending input.
    pub fn is_fatal(&self) -> bool {
        self.class() != ErrorClass::Rejected
    }
}
