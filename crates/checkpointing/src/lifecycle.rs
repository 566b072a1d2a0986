//! Forced status transitions driven by external-chain observations.

use anchor_checkpoint_types::{BlockContext, CheckpointRecord, CheckpointStatus};
use anchor_db_types::traits::{BlsKeyDatabase, CheckpointDatabase};
use anchor_primitives::Epoch;
use tracing::*;

use crate::{CheckpointKeeper, CheckpointingHooks, CheckpointingResult, EpochProvider};

/// Why a forced transition was not applied.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// There is no checkpoint for the epoch.
    Missing,

    /// The checkpoint is not in the status the transition starts from.
    StatusMismatch {
        expected: CheckpointStatus,
        actual: CheckpointStatus,
    },
}

/// Result of a forced transition.
///
/// A transition whose precondition does not hold is a logged no-op, not an
/// error. Errors are reserved for persistence failures.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// The transition was applied and persisted. Holds the updated record.
    Applied(CheckpointRecord),

    Skipped { epoch: Epoch, reason: SkipReason },
}

impl TransitionOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }
}

type Notify = fn(&dyn CheckpointingHooks, &CheckpointRecord);

impl<C, K, P> CheckpointKeeper<C, K, P>
where
    C: CheckpointDatabase,
    K: BlsKeyDatabase,
    P: EpochProvider,
{
    /// `Sealed -> Submitted`: the checkpoint was included in the external chain.
    pub fn mark_submitted(
        &self,
        epoch: Epoch,
        ctx: &BlockContext,
    ) -> CheckpointingResult<TransitionOutcome> {
        self.force_transition(
            epoch,
            CheckpointStatus::Sealed,
            CheckpointStatus::Submitted,
            ctx,
            |h, r| h.on_submitted(r),
        )
    }

    /// `Submitted -> Confirmed`.
    pub fn mark_confirmed(
        &self,
        epoch: Epoch,
        ctx: &BlockContext,
    ) -> CheckpointingResult<TransitionOutcome> {
        self.force_transition(
            epoch,
            CheckpointStatus::Submitted,
            CheckpointStatus::Confirmed,
            ctx,
            |h, r| h.on_confirmed(r),
        )
    }

    /// `Confirmed -> Finalized`.
    pub fn mark_finalized(
        &self,
        epoch: Epoch,
        ctx: &BlockContext,
    ) -> CheckpointingResult<TransitionOutcome> {
        self.force_transition(
            epoch,
            CheckpointStatus::Confirmed,
            CheckpointStatus::Finalized,
            ctx,
            |h, r| h.on_finalized(r),
        )
    }

    /// `Submitted -> Sealed`: the external inclusion turned out to be invalid,
    /// e.g. it was reorged out.
    pub fn mark_forgotten(
        &self,
        epoch: Epoch,
        ctx: &BlockContext,
    ) -> CheckpointingResult<TransitionOutcome> {
        self.force_transition(
            epoch,
            CheckpointStatus::Submitted,
            CheckpointStatus::Sealed,
            ctx,
            |h, r| h.on_forgotten(r),
        )
    }

    /// Applies an external-chain observation of the epoch's checkpoint.
    ///
    /// `depth` is the number of external blocks on top of the one holding the
    /// checkpoint, or `None` if it is no longer on the external chain. Each
    /// step is a regular forced transition, so steps whose precondition fails
    /// are reported as skipped.
    pub fn observe_external_depth(
        &self,
        epoch: Epoch,
        depth: Option<u64>,
        ctx: &BlockContext,
    ) -> CheckpointingResult<Vec<TransitionOutcome>> {
        let Some(status) = self.store.get_opt(epoch)?.map(|r| r.status) else {
            return Ok(vec![self.skip(epoch, SkipReason::Missing)]);
        };

        let Some(depth) = depth else {
            return Ok(vec![self.mark_forgotten(epoch, ctx)?]);
        };

        let mut outcomes = Vec::new();
        let mut status = status;

        if status <= CheckpointStatus::Sealed {
            let out = self.mark_submitted(epoch, ctx)?;
            status = applied_status(&out).unwrap_or(status);
            outcomes.push(out);
        }

        if status == CheckpointStatus::Submitted && depth >= self.params.confirmation_depth {
            let out = self.mark_confirmed(epoch, ctx)?;
            status = applied_status(&out).unwrap_or(status);
            outcomes.push(out);
        }

        if status == CheckpointStatus::Confirmed && depth >= self.params.finalization_depth {
            outcomes.push(self.mark_finalized(epoch, ctx)?);
        }

        Ok(outcomes)
    }

    fn force_transition(
        &self,
        epoch: Epoch,
        from: CheckpointStatus,
        to: CheckpointStatus,
        ctx: &BlockContext,
        hook: Notify,
    ) -> CheckpointingResult<TransitionOutcome> {
        let Some(mut record) = self.store.get_opt(epoch)? else {
            return Ok(self.skip(epoch, SkipReason::Missing));
        };

        if record.status != from {
            return Ok(self.skip(
                epoch,
                SkipReason::StatusMismatch {
                    expected: from,
                    actual: record.status,
                },
            ));
        }
        debug_assert!(from.can_transition_to(to));

        record.record_state_update(to, ctx);
        self.store.update(record.clone())?;
        info!(%epoch, %from, %to, height = ctx.height, "checkpoint status changed");
        self.notify(|h| hook(h, &record));

        Ok(TransitionOutcome::Applied(record))
    }

    fn skip(&self, epoch: Epoch, reason: SkipReason) -> TransitionOutcome {
        warn!(%epoch, ?reason, "skipping checkpoint status transition");
        TransitionOutcome::Skipped { epoch, reason }
    }
}

fn applied_status(out: &TransitionOutcome) -> Option<CheckpointStatus> {
    match out {
        TransitionOutcome::Applied(r) => Some(r.status),
        TransitionOutcome::Skipped { .. } => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{hooks::test_hooks::HookEvent, keeper::test_fixture::*};

    /// Fixture with epoch 1 sealed by validators 0 and 1.
    fn sealed_fixture() -> Fixture {
        let f = fixture(&[1, 1, 1, 1], &[1]);
        f.keeper.build_checkpoint(1, app_hash(1), &ctx(1)).unwrap();
        for v in &f.vals[..2] {
            f.keeper
                .add_partial_sig(&v.partial_sig(1, app_hash(1)), &ctx(2))
                .unwrap();
        }
        f
    }

    fn statuses(record: &CheckpointRecord) -> Vec<CheckpointStatus> {
        record.lifecycle.iter().map(|e| e.status).collect()
    }

    #[test]
    fn test_full_lifecycle() {
        let f = sealed_fixture();

        assert!(f.keeper.mark_submitted(1, &ctx(10)).unwrap().is_applied());
        assert!(f.keeper.mark_confirmed(1, &ctx(11)).unwrap().is_applied());
        let out = f.keeper.mark_finalized(1, &ctx(12)).unwrap();

        let record = match out {
            TransitionOutcome::Applied(record) => record,
            other => panic!("finalization skipped: {other:?}"),
        };
        assert_eq!(record.status, CheckpointStatus::Finalized);
        assert_eq!(
            statuses(&record),
            vec![
                CheckpointStatus::Accumulating,
                CheckpointStatus::Sealed,
                CheckpointStatus::Submitted,
                CheckpointStatus::Confirmed,
                CheckpointStatus::Finalized,
            ]
        );
        assert_eq!(record.lifecycle[4].height, 12);
        assert_eq!(f.keeper.get_checkpoint(1).unwrap(), record);
        assert_eq!(
            f.hooks.events(),
            vec![
                HookEvent::Sealed(1),
                HookEvent::Submitted(1),
                HookEvent::Confirmed(1),
                HookEvent::Finalized(1),
            ]
        );
    }

    #[test]
    fn test_precondition_unmet_is_skipped() {
        let f = sealed_fixture();
        let before = f.keeper.get_checkpoint(1).unwrap();

        for out in [
            f.keeper.mark_confirmed(1, &ctx(3)).unwrap(),
            f.keeper.mark_finalized(1, &ctx(3)).unwrap(),
            f.keeper.mark_forgotten(1, &ctx(3)).unwrap(),
        ] {
            assert!(matches!(
                out,
                TransitionOutcome::Skipped {
                    epoch: 1,
                    reason: SkipReason::StatusMismatch {
                        actual: CheckpointStatus::Sealed,
                        ..
                    }
                }
            ));
        }
        assert_eq!(f.keeper.get_checkpoint(1).unwrap(), before);

        assert_eq!(
            f.keeper.mark_submitted(5, &ctx(3)).unwrap(),
            TransitionOutcome::Skipped {
                epoch: 5,
                reason: SkipReason::Missing
            }
        );
    }

    #[test]
    fn test_forgotten_rolls_back_to_sealed() {
        let f = sealed_fixture();
        f.keeper.mark_submitted(1, &ctx(10)).unwrap();
        let out = f.keeper.mark_forgotten(1, &ctx(11)).unwrap();
        assert!(out.is_applied());
        assert_eq!(f.keeper.get_status(1).unwrap(), CheckpointStatus::Sealed);

        // It can be submitted again afterwards.
        assert!(f.keeper.mark_submitted(1, &ctx(12)).unwrap().is_applied());
        let history = statuses(&f.keeper.get_checkpoint(1).unwrap());
        assert_eq!(
            history[2..],
            [
                CheckpointStatus::Submitted,
                CheckpointStatus::Sealed,
                CheckpointStatus::Submitted,
            ]
        );
        assert!(f.hooks.events().contains(&HookEvent::Forgotten(1)));
    }

    #[test]
    fn test_observe_external_depth() {
        let f = sealed_fixture();
        let params = f.keeper.params().clone();

        let outs = f.keeper.observe_external_depth(1, Some(1), &ctx(20)).unwrap();
        assert_eq!(outs.len(), 1);
        assert_eq!(f.keeper.get_status(1).unwrap(), CheckpointStatus::Submitted);

        let outs = f
            .keeper
            .observe_external_depth(1, Some(params.confirmation_depth), &ctx(21))
            .unwrap();
        assert_eq!(outs.len(), 1);
        assert_eq!(f.keeper.get_status(1).unwrap(), CheckpointStatus::Confirmed);

        let outs = f
            .keeper
            .observe_external_depth(1, Some(params.finalization_depth), &ctx(22))
            .unwrap();
        assert_eq!(outs.len(), 1);
        assert_eq!(f.keeper.get_status(1).unwrap(), CheckpointStatus::Finalized);

        // Finalized checkpoints do not move any more.
        let outs = f.keeper.observe_external_depth(1, None, &ctx(23)).unwrap();
        assert!(!outs[0].is_applied());
        assert_eq!(f.keeper.get_status(1).unwrap(), CheckpointStatus::Finalized);
    }

    #[test]
    fn test_observe_deep_inclusion_at_once() {
        let f = sealed_fixture();
        let depth = f.keeper.params().finalization_depth;
        let outs = f.keeper.observe_external_depth(1, Some(depth), &ctx(20)).unwrap();
        assert_eq!(outs.len(), 3);
        assert!(outs.iter().all(TransitionOutcome::is_applied));
        assert_eq!(f.keeper.get_status(1).unwrap(), CheckpointStatus::Finalized);
    }

    #[test]
    fn test_observe_reorg_and_missing() {
        let f = sealed_fixture();
        f.keeper.observe_external_depth(1, Some(2), &ctx(20)).unwrap();
        let outs = f.keeper.observe_external_depth(1, None, &ctx(21)).unwrap();
        assert!(outs[0].is_applied());
        assert_eq!(f.keeper.get_status(1).unwrap(), CheckpointStatus::Sealed);

        assert_eq!(
            f.keeper.observe_external_depth(4, Some(3), &ctx(22)).unwrap(),
            vec![TransitionOutcome::Skipped {
                epoch: 4,
                reason: SkipReason::Missing
            }]
        );
    }

    #[test]
    fn test_observe_accumulating_is_skipped() {
        let f = fixture(&[1, 1], &[1]);
        f.keeper.build_checkpoint(1, app_hash(1), &ctx(1)).unwrap();
        let outs = f.keeper.observe_external_depth(1, Some(500), &ctx(2)).unwrap();
        assert_eq!(
            outs,
            vec![TransitionOutcome::Skipped {
                epoch: 1,
                reason: SkipReason::StatusMismatch {
                    expected: CheckpointStatus::Sealed,
                    actual: CheckpointStatus::Accumulating,
                }
            }]
        );
    }
}
