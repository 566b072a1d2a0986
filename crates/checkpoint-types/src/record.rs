use anchor_crypto::BlsSignature;
use anchor_primitives::{AppHash, Epoch};
use arbitrary::Arbitrary;
use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use crate::{
    sign_bytes, BitmapError, CheckpointStatus, CheckpointTypesError, QuorumThreshold,
    SignerBitmap, SIGN_BYTES_LEN,
};

/// An `(epoch, app_hash)` pair with the aggregate signature of the validators
/// marked in `bitmap`.
#[derive(
    Clone, Debug, PartialEq, Eq, Arbitrary, BorshSerialize, BorshDeserialize, Serialize, Deserialize,
)]
pub struct RawCheckpoint {
    pub epoch: Epoch,
    pub app_hash: AppHash,
    pub bitmap: SignerBitmap,
    pub multi_sig: BlsSignature,
}

impl RawCheckpoint {
    pub fn new(
        epoch: Epoch,
        app_hash: AppHash,
        bitmap: SignerBitmap,
        multi_sig: BlsSignature,
    ) -> Self {
        Self {
            epoch,
            app_hash,
            bitmap,
            multi_sig,
        }
    }

    /// A checkpoint nobody has signed yet.
    pub fn new_unsigned(epoch: Epoch, app_hash: AppHash) -> Self {
        Self::new(
            epoch,
            app_hash,
            SignerBitmap::new_empty(),
            BlsSignature::identity(),
        )
    }

    /// Message the validators sign for this checkpoint.
    pub fn sign_bytes(&self) -> [u8; SIGN_BYTES_LEN] {
        sign_bytes(self.epoch, &self.app_hash)
    }

    /// Checks the structure of a checkpoint received from outside, without
    /// touching any signature or validator set.
    pub fn validate_basic(&self) -> Result<(), CheckpointTypesError> {
        if self.bitmap.is_empty() {
            return Err(CheckpointTypesError::Malformed("empty signer bitmap"));
        }
        if self.multi_sig.is_identity() {
            return Err(CheckpointTypesError::Malformed("identity multi-signature"));
        }
        Ok(())
    }
}

/// Deterministic native-chain context of a state transition.
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    PartialEq,
    Eq,
    Arbitrary,
    BorshSerialize,
    BorshDeserialize,
    Serialize,
    Deserialize,
)]
pub struct BlockContext {
    pub height: u64,
    /// Block time, in unix seconds.
    pub timestamp: u64,
}

impl BlockContext {
    pub fn new(height: u64, timestamp: u64) -> Self {
        Self { height, timestamp }
    }
}

/// One entry of a checkpoint's audit trail.
#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    Arbitrary,
    BorshSerialize,
    BorshDeserialize,
    Serialize,
    Deserialize,
)]
pub struct LifecycleEntry {
    pub status: CheckpointStatus,
    pub height: u64,
    pub timestamp: u64,
}

/// Result of folding a signature into a record.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AccumulateOutcome {
    /// The signature was folded in. `sealed` is set if this signature brought
    /// the record to quorum.
    Added { sealed: bool },
    /// The signer was already counted; nothing changed.
    AlreadySigned,
}

/// A checkpoint plus its status, signed power and lifecycle history.
#[derive(
    Clone, Debug, PartialEq, Eq, Arbitrary, BorshSerialize, BorshDeserialize, Serialize, Deserialize,
)]
pub struct CheckpointRecord {
    pub ckpt: RawCheckpoint,
    pub status: CheckpointStatus,
    /// Voting power of the validators in `ckpt.bitmap`.
    pub power_sum: u64,
    pub lifecycle: Vec<LifecycleEntry>,
}

impl CheckpointRecord {
    /// Creates the record for a freshly built checkpoint in `Accumulating`.
    pub fn new_accumulating(epoch: Epoch, app_hash: AppHash, ctx: &BlockContext) -> Self {
        let mut record = Self {
            ckpt: RawCheckpoint::new_unsigned(epoch, app_hash),
            status: CheckpointStatus::Accumulating,
            power_sum: 0,
            lifecycle: Vec::new(),
        };
        record.push_lifecycle(CheckpointStatus::Accumulating, ctx);
        record
    }

    pub fn epoch(&self) -> Epoch {
        self.ckpt.epoch
    }

    pub fn app_hash(&self) -> &AppHash {
        &self.ckpt.app_hash
    }

    pub fn is_accumulating(&self) -> bool {
        self.status == CheckpointStatus::Accumulating
    }

    /// Folds one validator's already verified signature into the aggregate.
    ///
    /// Once the signed power exceeds `quorum` of `total_power` the record is
    /// moved to `Sealed` and a lifecycle entry is appended.
    pub fn accumulate(
        &mut self,
        signer_index: usize,
        sig: &BlsSignature,
        signer_power: u64,
        total_power: u64,
        quorum: &QuorumThreshold,
        ctx: &BlockContext,
    ) -> Result<AccumulateOutcome, BitmapError> {
        if !self.ckpt.bitmap.try_set(signer_index)? {
            return Ok(AccumulateOutcome::AlreadySigned);
        }

        self.ckpt.multi_sig = self.ckpt.multi_sig.combine(sig);
        self.power_sum = self.power_sum.saturating_add(signer_power);

        let sealed = self.is_accumulating() && quorum.is_met(self.power_sum, total_power);
        if sealed {
            self.record_state_update(CheckpointStatus::Sealed, ctx);
        }

        Ok(AccumulateOutcome::Added { sealed })
    }

    /// Sets the status and appends the corresponding lifecycle entry.
    ///
    /// Does not check that the transition is legal; callers do.
    pub fn record_state_update(&mut self, status: CheckpointStatus, ctx: &BlockContext) {
        self.status = status;
        self.push_lifecycle(status, ctx);
    }

    fn push_lifecycle(&mut self, status: CheckpointStatus, ctx: &BlockContext) {
        self.lifecycle.push(LifecycleEntry {
            status,
            height: ctx.height,
            timestamp: ctx.timestamp,
        });
    }
}
