//! Cryptographic primitives for checkpoint attestation.
//!
//! BLS signatures over BLS12-381 in the minimal-public-key-size layout
//! (signatures in G1, public keys in G2), plus the multisig verification
//! seam used by checkpoint verification.

pub mod bls;
pub mod multisig;

pub use bls::{BlsError, BlsPubKey, BlsSecretKey, BlsSignature};
