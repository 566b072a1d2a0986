use std::io;

use anchor_crypto::BlsPubKey;
use anchor_primitives::ValAddress;
use arbitrary::Arbitrary;
use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use crate::{CheckpointTypesError, SignerBitmap, MAX_VALIDATORS};

/// A validator's membership in an epoch's validator set.
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
pub struct ValidatorEntry {
    pub address: ValAddress,
    pub power: u64,
}

impl ValidatorEntry {
    pub fn new(address: ValAddress, power: u64) -> Self {
        Self { address, power }
    }
}

/// A validator together with its registered BLS key.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorWithBlsKey {
    pub address: ValAddress,
    pub bls_key: BlsPubKey,
    pub power: u64,
}

/// The validators of one epoch, in deterministic index order.
///
/// Validators are kept sorted by address, so a validator's index (and thus its
/// bit in a [`SignerBitmap`]) is the same on every node.
#[derive(Clone, Debug, Default, PartialEq, Eq, BorshSerialize)]
pub struct ValidatorSet {
    validators: Vec<ValidatorEntry>,
}

impl BorshDeserialize for ValidatorSet {
    fn deserialize_reader<R: io::Read>(reader: &mut R) -> io::Result<Self> {
        let validators = Vec::<ValidatorEntry>::deserialize_reader(reader)?;
        Self::try_new(validators).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

impl ValidatorSet {
    /// Builds a set from unordered entries.
    ///
    /// # Errors
    ///
    /// - `DuplicateValidator` if an address appears more than once
    /// - `TooManyValidators` if the set cannot be addressed by the signer bitmap
    pub fn try_new(mut validators: Vec<ValidatorEntry>) -> Result<Self, CheckpointTypesError> {
        if validators.len() > MAX_VALIDATORS {
            return Err(CheckpointTypesError::TooManyValidators(validators.len()));
        }

        validators.sort_by_key(|v| v.address);
        if validators.windows(2).any(|w| w[0].address == w[1].address) {
            return Err(CheckpointTypesError::DuplicateValidator);
        }

        Ok(Self { validators })
    }

    /// Returns the index of `address`, if it is a member.
    pub fn find_index(&self, address: &ValAddress) -> Option<usize> {
        self.validators
            .binary_search_by(|v| v.address.cmp(address))
            .ok()
    }

    pub fn get(&self, idx: usize) -> Option<&ValidatorEntry> {
        self.validators.get(idx)
    }

    /// Resolves the validators selected by `bitmap`, in index order.
    ///
    /// Fails if a set bit lies beyond the end of the set.
    pub fn find_subset(
        &self,
        bitmap: &SignerBitmap,
    ) -> Result<Vec<&ValidatorEntry>, CheckpointTypesError> {
        bitmap
            .signer_indices()
            .map(|index| {
                self.validators
                    .get(index)
                    .ok_or(CheckpointTypesError::BitmapOutOfRange {
                        index,
                        size: self.validators.len(),
                    })
            })
            .collect()
    }

    /// Sum of all members' voting power.
    pub fn total_power(&self) -> u64 {
        self.validators
            .iter()
            .fold(0u64, |acc, v| acc.saturating_add(v.power))
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidatorEntry> + '_ {
        self.validators.iter()
    }
}
