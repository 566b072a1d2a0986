use std::collections::BTreeMap;

use anchor_checkpoint_types::ValidatorSet;
use anchor_primitives::Epoch;

/// Source of per-epoch validator sets, owned by the host chain.
///
/// The set returned for an epoch must not change once it has been queried.
pub trait EpochProvider {
    /// Validator set of `epoch`, or `None` if the host does not know it.
    fn validator_set(&self, epoch: Epoch) -> Option<ValidatorSet>;

    /// Total voting power of `epoch`'s validator set.
    fn total_voting_power(&self, epoch: Epoch) -> Option<u64> {
        self.validator_set(epoch).map(|vals| vals.total_power())
    }
}

/// [`EpochProvider`] over a fixed map of validator sets.
#[derive(Clone, Debug, Default)]
pub struct StaticEpochProvider {
    sets: BTreeMap<Epoch, ValidatorSet>,
}

impl StaticEpochProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, epoch: Epoch, set: ValidatorSet) {
        self.sets.insert(epoch, set);
    }

    pub fn with_epoch(mut self, epoch: Epoch, set: ValidatorSet) -> Self {
        self.insert(epoch, set);
        self
    }
}

impl EpochProvider for StaticEpochProvider {
    fn validator_set(&self, epoch: Epoch) -> Option<ValidatorSet> {
        self.sets.get(&epoch).cloned()
    }
}
