use std::fmt;

use arbitrary::Arbitrary;
use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

/// Lifecycle status of an epoch checkpoint.
///
/// The only legal edges are `Accumulating -> Sealed -> Submitted -> Confirmed
/// -> Finalized` plus the rollback `Submitted -> Sealed`.
#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Arbitrary,
    BorshSerialize,
    BorshDeserialize,
    Serialize,
    Deserialize,
)]
pub enum CheckpointStatus {
    /// Collecting partial signatures.
    Accumulating,
    /// Signed by a quorum, not yet seen on the external chain.
    Sealed,
    /// Included in the external chain.
    Submitted,
    /// Buried deep enough on the external chain to be considered confirmed.
    Confirmed,
    /// Buried deep enough that it will not be reverted.
    Finalized,
}

impl CheckpointStatus {
    /// Returns whether moving from `self` to `next` is a legal transition.
    pub fn can_transition_to(self, next: CheckpointStatus) -> bool {
        use CheckpointStatus::*;
        matches!(
            (self, next),
            (Accumulating, Sealed)
                | (Sealed, Submitted)
                | (Submitted, Confirmed)
                | (Confirmed, Finalized)
                | (Submitted, Sealed)
        )
    }
}

impl fmt::Display for CheckpointStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Accumulating => "accumulating",
            Self::Sealed => "sealed",
            Self::Submitted => "submitted",
            Self::Confirmed => "confirmed",
            Self::Finalized => "finalized",
        };
        f.write_str(s)
    }
}
