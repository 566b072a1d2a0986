//! Deterministic validator fixtures with real BLS keys.

use anchor_checkpoint_types::{
    sign_bytes, PartialBlsSig, RawCheckpoint, SignerBitmap, ValidatorEntry, ValidatorSet,
};
use anchor_crypto::{BlsPubKey, BlsSecretKey, BlsSignature};
use anchor_primitives::{AppHash, Epoch, ValAddress};
use rand_chacha::{rand_core::SeedableRng, ChaCha20Rng};
use rand_core::RngCore;

/// A validator with its BLS key pair and voting power.
#[derive(Debug, Clone)]
pub struct TestValidator {
    pub address: ValAddress,
    pub secret: BlsSecretKey,
    pub pubkey: BlsPubKey,
    pub power: u64,
}

impl TestValidator {
    /// Signs the checkpoint message for `(epoch, app_hash)`.
    pub fn sign(&self, epoch: Epoch, app_hash: &AppHash) -> BlsSignature {
        self.secret.sign(&sign_bytes(epoch, app_hash))
    }

    /// Builds this validator's partial signature message.
    pub fn partial_sig(&self, epoch: Epoch, app_hash: AppHash) -> PartialBlsSig {
        PartialBlsSig::new(epoch, app_hash, self.address, self.sign(epoch, &app_hash))
    }

    pub fn entry(&self) -> ValidatorEntry {
        ValidatorEntry::new(self.address, self.power)
    }
}

/// Generates one validator per entry of `powers`, seeded by `seed`.
///
/// The result is sorted by address, so position `i` in the returned vector is
/// the validator's index in the epoch's [`ValidatorSet`].
pub fn gen_validators(powers: &[u64], seed: u64) -> Vec<TestValidator> {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    let mut vals: Vec<_> = powers
        .iter()
        .map(|&power| {
            let mut raw = [0u8; 20];
            rng.fill_bytes(&mut raw);
            let secret = BlsSecretKey::generate(&mut rng);
            let pubkey = secret.public_key();
            TestValidator {
                address: ValAddress::from(raw),
                secret,
                pubkey,
                power,
            }
        })
        .collect();
    vals.sort_by_key(|v| v.address);
    vals
}

/// Builds the validator set of the fixtures.
pub fn validator_set(vals: &[TestValidator]) -> ValidatorSet {
    ValidatorSet::try_new(vals.iter().map(TestValidator::entry).collect())
        .expect("test: fixture validator set")
}

/// Builds a checkpoint signed by the validators at `signers` (indices into
/// `vals`).
pub fn sign_checkpoint(
    vals: &[TestValidator],
    signers: &[usize],
    epoch: Epoch,
    app_hash: AppHash,
) -> RawCheckpoint {
    let mut bitmap = SignerBitmap::new_empty();
    let mut sigs = Vec::with_capacity(signers.len());
    for &idx in signers {
        bitmap.try_set(idx).expect("test: signer index in range");
        sigs.push(vals[idx].sign(epoch, &app_hash));
    }
    RawCheckpoint::new(epoch, app_hash, bitmap, BlsSignature::aggregate(&sigs))
}
