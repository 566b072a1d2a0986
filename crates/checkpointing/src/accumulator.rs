//! Folding validators' partial signatures into the epoch checkpoint.

use anchor_checkpoint_types::{AccumulateOutcome, BitmapError, BlockContext, PartialBlsSig};
use anchor_db_types::traits::{BlsKeyDatabase, CheckpointDatabase};
use tracing::*;

use crate::{CheckpointKeeper, CheckpointingError, CheckpointingResult, EpochProvider};

impl<C, K, P> CheckpointKeeper<C, K, P>
where
    C: CheckpointDatabase,
    K: BlsKeyDatabase,
    P: EpochProvider,
{
    /// Verifies a validator's partial signature and folds it into the epoch's
    /// checkpoint, sealing it once the quorum is reached.
    ///
    /// Signatures for checkpoints that are no longer accumulating are ignored.
    /// On any error the stored record is left untouched.
    pub fn add_partial_sig(&self, sig: &PartialBlsSig, ctx: &BlockContext) -> CheckpointingResult<()> {
        let epoch = sig.epoch;
        let mut record = self
            .store
            .get_opt(epoch)?
            .ok_or(CheckpointingError::UnknownEpoch(epoch))?;

        if !record.is_accumulating() {
            debug!(%epoch, signer = %sig.signer, status = %record.status, "ignoring late signature");
            return Ok(());
        }

        if sig.app_hash != *record.app_hash() {
            return Err(CheckpointingError::AppHashMismatch {
                epoch,
                expected: *record.app_hash(),
                got: sig.app_hash,
            });
        }

        let bls_key = self
            .registry
            .get(sig.signer)?
            .ok_or(CheckpointingError::UnregisteredSigner(sig.signer))?;

        let vals = self.validator_set(epoch)?;
        let not_in_epoch = || CheckpointingError::SignerNotInEpoch {
            epoch,
            signer: sig.signer,
        };
        let index = vals.find_index(&sig.signer).ok_or_else(not_in_epoch)?;
        let power = vals.get(index).ok_or_else(not_in_epoch)?.power;
        let total = self.total_power(epoch)?;

        if !bls_key.verify(&sig.sign_bytes(), &sig.signature) {
            debug!(%epoch, signer = %sig.signer, "partial signature does not verify");
            return Err(CheckpointingError::InvalidSignature(sig.signer));
        }

        let outcome = record
            .accumulate(
                index,
                &sig.signature,
                power,
                total,
                &self.params.quorum,
                ctx,
            )
            .map_err(|e| match e {
                BitmapError::IndexOutOfRange { index, max } => {
                    CheckpointingError::BitmapOutOfRange { index, size: max }
                }
                BitmapError::InvalidLength { .. } => CheckpointingError::BitmapOutOfRange {
                    index,
                    size: vals.len(),
                },
            })?;

        match outcome {
            AccumulateOutcome::AlreadySigned => {
                trace!(%epoch, signer = %sig.signer, "signer already counted");
            }
            AccumulateOutcome::Added { sealed } => {
                self.store.update(record.clone())?;
                trace!(%epoch, signer = %sig.signer, power_sum = record.power_sum, "added signature");
                if sealed {
                    info!(%epoch, power_sum = record.power_sum, "checkpoint sealed");
                    self.notify(|h| h.on_sealed(&record));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::BTreeSet, sync::Arc};

    use anchor_checkpoint_types::{CheckpointStatus, PartialBlsSig};
    use anchor_crypto::BlsSignature;
    use anchor_db_types::stubs::StubCheckpointDb;
    use anchor_test_utils::{gen_validators, ArbitraryGenerator};
    use proptest::prelude::*;

    use crate::{
        hooks::test_hooks::HookEvent,
        keeper::test_fixture::*,
        CheckpointingError,
    };

    #[test]
    fn test_seals_on_quorum() {
        let f = fixture(&[10, 10, 10, 10], &[1]);
        f.keeper.build_checkpoint(1, app_hash(1), &ctx(5)).unwrap();

        f.keeper
            .add_partial_sig(&f.vals[0].partial_sig(1, app_hash(1)), &ctx(6))
            .unwrap();
        let record = f.keeper.get_checkpoint(1).unwrap();
        assert_eq!(record.status, CheckpointStatus::Accumulating);
        assert_eq!(record.power_sum, 10);
        assert!(f.hooks.events().is_empty());

        f.keeper
            .add_partial_sig(&f.vals[1].partial_sig(1, app_hash(1)), &ctx(7))
            .unwrap();
        let record = f.keeper.get_checkpoint(1).unwrap();
        assert_eq!(record.status, CheckpointStatus::Sealed);
        assert_eq!(record.power_sum, 20);
        assert_eq!(record.lifecycle.len(), 2);
        assert_eq!(record.lifecycle[1].height, 7);
        assert_eq!(f.hooks.events(), vec![HookEvent::Sealed(1)]);

        let expected = BlsSignature::aggregate(&[
            f.vals[0].sign(1, &app_hash(1)),
            f.vals[1].sign(1, &app_hash(1)),
        ]);
        assert_eq!(record.ckpt.multi_sig, expected);
    }

    #[test]
    fn test_exactly_one_third_does_not_seal() {
        let f = fixture(&[1, 1, 1], &[1]);
        f.keeper.build_checkpoint(1, app_hash(1), &ctx(1)).unwrap();
        f.keeper
            .add_partial_sig(&f.vals[2].partial_sig(1, app_hash(1)), &ctx(2))
            .unwrap();
        assert_eq!(
            f.keeper.get_status(1).unwrap(),
            CheckpointStatus::Accumulating
        );
    }

    #[test]
    fn test_duplicate_signer_is_noop() {
        let f = fixture(&[1, 1, 1, 1, 1, 1], &[2]);
        f.keeper.build_checkpoint(2, app_hash(2), &ctx(1)).unwrap();

        let sig = f.vals[3].partial_sig(2, app_hash(2));
        f.keeper.add_partial_sig(&sig, &ctx(2)).unwrap();
        let before = f.keeper.get_checkpoint(2).unwrap();
        f.keeper.add_partial_sig(&sig, &ctx(3)).unwrap();
        assert_eq!(f.keeper.get_checkpoint(2).unwrap(), before);
        assert_eq!(before.ckpt.bitmap.signer_count(), 1);
    }

    #[test]
    fn test_late_signature_ignored() {
        let f = fixture(&[1, 1, 1, 1], &[1]);
        f.keeper.build_checkpoint(1, app_hash(1), &ctx(1)).unwrap();
        for v in &f.vals[..2] {
            f.keeper
                .add_partial_sig(&v.partial_sig(1, app_hash(1)), &ctx(2))
                .unwrap();
        }
        let sealed = f.keeper.get_checkpoint(1).unwrap();
        assert_eq!(sealed.status, CheckpointStatus::Sealed);

        // Even a bogus signature for a sealed checkpoint is not an error.
        let mut late = f.vals[2].partial_sig(1, app_hash(1));
        late.signature = f.vals[2].sign(1, &app_hash(9));
        f.keeper.add_partial_sig(&late, &ctx(3)).unwrap();
        assert_eq!(f.keeper.get_checkpoint(1).unwrap(), sealed);
        assert_eq!(f.hooks.events(), vec![HookEvent::Sealed(1)]);
    }

    #[test]
    fn test_rejections_leave_record_untouched() {
        let f = fixture(&[1, 1, 1, 1], &[1]);
        f.keeper.build_checkpoint(1, app_hash(1), &ctx(1)).unwrap();
        let initial = f.keeper.get_checkpoint(1).unwrap();

        // Unknown epoch.
        let err = f
            .keeper
            .add_partial_sig(&f.vals[0].partial_sig(2, app_hash(1)), &ctx(2))
            .unwrap_err();
        assert!(matches!(err, CheckpointingError::UnknownEpoch(2)));

        // Wrong app hash.
        let err = f
            .keeper
            .add_partial_sig(&f.vals[0].partial_sig(1, app_hash(7)), &ctx(2))
            .unwrap_err();
        assert!(matches!(err, CheckpointingError::AppHashMismatch { epoch: 1, .. }));

        // Signature by someone else's key.
        let mut forged = f.vals[0].partial_sig(1, app_hash(1));
        forged.signature = f.vals[1].sign(1, &app_hash(1));
        let err = f.keeper.add_partial_sig(&forged, &ctx(2)).unwrap_err();
        assert!(matches!(err, CheckpointingError::InvalidSignature(a) if a == f.vals[0].address));
        assert!(!err.is_fatal());

        assert_eq!(f.keeper.get_checkpoint(1).unwrap(), initial);
    }

    #[test]
    fn test_unregistered_and_foreign_signers() {
        let f = fixture(&[1, 1], &[1]);
        f.keeper.build_checkpoint(1, app_hash(1), &ctx(1)).unwrap();

        let outsider = &gen_validators(&[1], 99)[0];
        let err = f
            .keeper
            .add_partial_sig(&outsider.partial_sig(1, app_hash(1)), &ctx(2))
            .unwrap_err();
        assert!(matches!(err, CheckpointingError::UnregisteredSigner(_)));

        // Registered, but not part of the epoch's validator set.
        f.keeper
            .register_bls_key(outsider.address, outsider.pubkey)
            .unwrap();
        let err = f
            .keeper
            .add_partial_sig(&outsider.partial_sig(1, app_hash(1)), &ctx(2))
            .unwrap_err();
        assert!(matches!(
            err,
            CheckpointingError::SignerNotInEpoch { epoch: 1, signer } if signer == outsider.address
        ));
    }

    #[test]
    fn test_random_signature_rejected() {
        let f = fixture(&[1, 1], &[1]);
        f.keeper.build_checkpoint(1, app_hash(1), &ctx(1)).unwrap();

        let signature: BlsSignature = ArbitraryGenerator::new_seeded(4).generate();
        let sig = PartialBlsSig::new(1, app_hash(1), f.vals[0].address, signature);
        assert!(matches!(
            f.keeper.add_partial_sig(&sig, &ctx(2)),
            Err(CheckpointingError::InvalidSignature(_))
        ));
    }

    #[test]
    fn test_quorum_measured_against_reported_total() {
        // Four listed validators of power 1, but the epoch carries 12 power in
        // total: all four together hold exactly a third.
        let vals = test_validators(&[1, 1, 1, 1]);
        let epochs = ReportedTotalEpochs::new(static_epochs(&vals, &[1]), 12);
        let f = fixture_with(Arc::new(StubCheckpointDb::new()), epochs, vals);
        f.keeper.build_checkpoint(1, app_hash(1), &ctx(1)).unwrap();
        for (i, v) in f.vals.iter().enumerate() {
            f.keeper
                .add_partial_sig(&v.partial_sig(1, app_hash(1)), &ctx(2 + i as u64))
                .unwrap();
        }
        let record = f.keeper.get_checkpoint(1).unwrap();
        assert_eq!(record.power_sum, 4);
        assert_eq!(record.status, CheckpointStatus::Accumulating);
        assert!(f.hooks.events().is_empty());

        let vals = test_validators(&[1, 1, 1, 1]);
        let epochs = ReportedTotalEpochs::new(static_epochs(&vals, &[1]), 11);
        let f = fixture_with(Arc::new(StubCheckpointDb::new()), epochs, vals);
        f.keeper.build_checkpoint(1, app_hash(1), &ctx(1)).unwrap();
        for v in &f.vals[..3] {
            f.keeper
                .add_partial_sig(&v.partial_sig(1, app_hash(1)), &ctx(2))
                .unwrap();
        }
        assert_eq!(
            f.keeper.get_status(1).unwrap(),
            CheckpointStatus::Accumulating
        );
        f.keeper
            .add_partial_sig(&f.vals[3].partial_sig(1, app_hash(1)), &ctx(3))
            .unwrap();
        assert_eq!(f.keeper.get_status(1).unwrap(), CheckpointStatus::Sealed);
    }

    /// Validator powers plus a signing order that may repeat signers.
    fn powers_and_order() -> impl Strategy<Value = (Vec<u64>, Vec<usize>)> {
        prop::collection::vec(1u64..100, 1..6).prop_flat_map(|powers| {
            let n = powers.len();
            (Just(powers), prop::collection::vec(0..n, 1..2 * n))
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(12))]

        #[test]
        fn prop_sealed_once_quorum_reached((powers, order) in powers_and_order()) {
            let f = fixture(&powers, &[1]);
            f.keeper.build_checkpoint(1, app_hash(1), &ctx(0)).unwrap();
            let total: u64 = f.vals.iter().map(|v| v.power).sum();

            let mut counted = BTreeSet::new();
            let mut was_sealed = false;
            for (step, &i) in order.iter().enumerate() {
                f.keeper
                    .add_partial_sig(&f.vals[i].partial_sig(1, app_hash(1)), &ctx(step as u64 + 1))
                    .unwrap();
                if !was_sealed {
                    counted.insert(i);
                }

                let record = f.keeper.get_checkpoint(1).unwrap();
                let signed: u64 = counted.iter().map(|&j| f.vals[j].power).sum();
                if record.is_accumulating() {
                    prop_assert!(!was_sealed, "sealed checkpoint went back to accumulating");
                    prop_assert!(signed * 3 <= total);
                } else {
                    prop_assert_eq!(record.status, CheckpointStatus::Sealed);
                    prop_assert!(signed * 3 > total);
                    was_sealed = true;
                }
                prop_assert_eq!(record.power_sum, signed);
                prop_assert_eq!(record.ckpt.bitmap.signer_count(), counted.len());
            }

            let sealed_events = f
                .hooks
                .events()
                .into_iter()
                .filter(|e| *e == HookEvent::Sealed(1))
                .count();
            prop_assert_eq!(sealed_events, usize::from(was_sealed));
        }
    }
}
