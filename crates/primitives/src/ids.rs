//! Identifiers used across the checkpointing crates.

use arbitrary::Arbitrary;
use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use crate::buf::{Buf20, Buf32};

/// Epoch number on the native chain.
pub type Epoch = u64;

/// State commitment attested by a checkpoint.
#[derive(
    Copy,
    Clone,
    Eq,
    Default,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    Arbitrary,
    BorshSerialize,
    BorshDeserialize,
    Serialize,
    Deserialize,
)]
pub struct AppHash(Buf32);

impl_buf_wrapper!(AppHash, Buf32, 32);

impl AppHash {
    pub const LEN: usize = Buf32::LEN;

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

/// Native-chain address of a validator.
///
/// Addresses order lexicographically over their bytes, which fixes the
/// validator index order within an epoch.
#[derive(
    Copy,
    Clone,
    Eq,
    Default,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    Arbitrary,
    BorshSerialize,
    BorshDeserialize,
    Serialize,
    Deserialize,
)]
pub struct ValAddress(Buf20);

impl_buf_wrapper!(ValAddress, Buf20, 20);

impl ValAddress {
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}
