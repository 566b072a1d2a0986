use anchor_crypto::BlsSignature;
use anchor_primitives::{AppHash, Epoch, ValAddress};
use arbitrary::Arbitrary;
use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

/// Length of the message validators sign for a checkpoint.
pub const SIGN_BYTES_LEN: usize = 8 + AppHash::LEN;

/// Canonical message signed for the checkpoint of `epoch`: the epoch as 8
/// big-endian bytes followed by the app hash.
pub fn sign_bytes(epoch: Epoch, app_hash: &AppHash) -> [u8; SIGN_BYTES_LEN] {
    let mut out = [0u8; SIGN_BYTES_LEN];
    out[..8].copy_from_slice(&epoch.to_be_bytes());
    out[8..].copy_from_slice(app_hash.as_bytes());
    out
}

/// One validator's signature over an epoch checkpoint.
#[derive(
    Clone, Debug, PartialEq, Eq, Arbitrary, BorshSerialize, BorshDeserialize, Serialize, Deserialize,
)]
pub struct PartialBlsSig {
    pub epoch: Epoch,
    pub app_hash: AppHash,
    pub signer: ValAddress,
    pub signature: BlsSignature,
}

impl PartialBlsSig {
    pub fn new(epoch: Epoch, app_hash: AppHash, signer: ValAddress, signature: BlsSignature) -> Self {
        Self {
            epoch,
            app_hash,
            signer,
            signature,
        }
    }

    pub fn sign_bytes(&self) -> [u8; SIGN_BYTES_LEN] {
        sign_bytes(self.epoch, &self.app_hash)
    }
}
