//! Re-verification of checkpoints read back from the external chain.

use anchor_checkpoint_types::{
    payload::decode_checkpoint, CheckpointRecord, CheckpointTypesError, RawCheckpoint,
};
use anchor_crypto::multisig::{verify_multisig, BlsScheme};
use anchor_db_types::traits::{BlsKeyDatabase, CheckpointDatabase};
use tracing::*;

use crate::{
    CheckpointKeeper, CheckpointingError, CheckpointingResult, EpochProvider,
    InvalidCheckpointReason,
};

impl<C, K, P> CheckpointKeeper<C, K, P>
where
    C: CheckpointDatabase,
    K: BlsKeyDatabase,
    P: EpochProvider,
{
    /// Verifies a checkpoint payload recovered from the external chain against
    /// local state and returns the matching local record.
    ///
    /// If the local checkpoint is already past accumulation and commits to the
    /// same app hash, the payload is accepted without checking its signature.
    /// Otherwise the bitmap, signed power and aggregate signature are checked
    /// against the epoch's validator set.
    ///
    /// A correctly signed payload for a different app hash is reported as
    /// [`CheckpointingError::ConflictingCheckpoint`], which the host must treat
    /// as fatal. This never modifies stored state.
    pub fn verify_external(&self, payload: &[u8]) -> CheckpointingResult<CheckpointRecord> {
        let candidate = decode_checkpoint(payload)?;
        candidate
            .validate_basic()
            .map_err(|e| InvalidCheckpointReason::Structural(e.to_string()))?;

        let epoch = candidate.epoch;
        let local = self.store.get(epoch)?;

        if candidate.app_hash == *local.app_hash() && !local.is_accumulating() {
            debug!(%epoch, "external checkpoint matches local record");
            self.notify(|h| h.on_externally_reverified(&candidate));
            return Ok(local);
        }

        self.verify_signatures(&candidate)?;
        self.notify(|h| h.on_externally_reverified(&candidate));

        if candidate.app_hash == *local.app_hash() {
            return Ok(local);
        }

        error!(
            %epoch,
            external = %candidate.app_hash,
            local = %local.app_hash(),
            "conflicting checkpoint, two app hashes signed for one epoch"
        );
        self.notify(|h| h.on_conflict(&candidate, &local));
        Err(CheckpointingError::ConflictingCheckpoint {
            epoch,
            candidate: Box::new(candidate),
            local: Box::new(local),
        })
    }

    /// Checks that the candidate's signers hold more than the quorum share of
    /// the epoch's total power and that their aggregate key verifies the
    /// signature.
    ///
    /// Every member of the epoch's validator set must have a registered key.
    fn verify_signatures(&self, candidate: &RawCheckpoint) -> CheckpointingResult<()> {
        let epoch = candidate.epoch;
        let vals = self.validator_set(epoch)?;
        let signers = vals.find_subset(&candidate.bitmap).map_err(|e| match e {
            CheckpointTypesError::BitmapOutOfRange { index, size } => {
                CheckpointingError::BitmapOutOfRange { index, size }
            }
            other => InvalidCheckpointReason::Structural(other.to_string()).into(),
        })?;

        let signed = signers
            .iter()
            .fold(0u64, |acc, v| acc.saturating_add(v.power));
        let total = self.total_power(epoch)?;
        if !self.params.quorum.is_met(signed, total) {
            warn!(%epoch, signed, total, "external checkpoint lacks quorum");
            return Err(InvalidCheckpointReason::InsufficientPower { signed, total }.into());
        }

        let keys = self
            .get_bls_pubkey_set(epoch)?
            .into_iter()
            .map(|v| v.bls_key)
            .collect::<Vec<_>>();
        verify_multisig::<BlsScheme>(
            &keys,
            candidate.bitmap.as_bitslice(),
            &candidate.sign_bytes(),
            &candidate.multi_sig,
        )
        .map_err(|err| {
            warn!(%epoch, %err, "external checkpoint multi-signature does not verify");
            InvalidCheckpointReason::InvalidMultiSig
        })?;

        Ok(())
    }
}
