use std::fmt;

use ark_bls12_381::{Bls12_381, Fr, G2Affine, G2Projective};
use ark_ec::{pairing::Pairing, AffineRepr, CurveGroup};
use ark_ff::{PrimeField, Zero};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::UniformRand;
use arbitrary::{Arbitrary, Unstructured};
use rand_core::{CryptoRng, RngCore};

use super::{errors::BlsError, hash::hash_to_g1, signature::BlsSignature};

/// BLS secret key, a scalar of the BLS12-381 group order.
#[derive(Clone)]
pub struct BlsSecretKey(Fr);

impl BlsSecretKey {
    /// Samples a fresh secret key.
    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        Self(Fr::rand(rng))
    }

    /// Derives the G2 public key.
    pub fn public_key(&self) -> BlsPubKey {
        BlsPubKey((G2Affine::generator() * self.0).into_affine())
    }

    /// Signs `msg`, producing a G1 signature.
    pub fn sign(&self, msg: &[u8]) -> BlsSignature {
        BlsSignature::from_point((hash_to_g1(msg) * self.0).into_affine())
    }
}

impl fmt::Debug for BlsSecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BlsSecretKey(<redacted>)")
    }
}

impl<'a> Arbitrary<'a> for BlsSecretKey {
    fn arbitrary(u: &mut Unstructured<'a>) -> arbitrary::Result<Self> {
        let mut bytes = [0u8; 32];
        u.fill_buffer(&mut bytes)?;
        let mut scalar = Fr::from_le_bytes_mod_order(&bytes);
        if scalar.is_zero() {
            scalar = Fr::from(1u64);
        }
        Ok(Self(scalar))
    }
}

/// BLS public key, a point in G2.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct BlsPubKey(G2Affine);

impl_point_codecs!(BlsPubKey, 96);

impl BlsPubKey {
    /// Length of the compressed encoding.
    pub const LEN: usize = 96;

    /// Sums a set of public keys into the key that verifies their aggregate
    /// signature over a common message.
    pub fn aggregate<'k>(keys: impl IntoIterator<Item = &'k BlsPubKey>) -> Result<Self, BlsError> {
        let mut acc = G2Projective::zero();
        let mut count = 0usize;
        for key in keys {
            acc += key.0;
            count += 1;
        }
        if count == 0 {
            return Err(BlsError::EmptyAggregate);
        }
        Ok(Self(acc.into_affine()))
    }

    /// Checks `sig` over `msg`.
    ///
    /// The identity key never verifies anything.
    pub fn verify(&self, msg: &[u8], sig: &BlsSignature) -> bool {
        if self.0.is_zero() {
            return false;
        }
        let hashed = hash_to_g1(msg);
        Bls12_381::pairing(sig.as_point(), G2Affine::generator())
            == Bls12_381::pairing(hashed, self.0)
    }

    pub fn is_identity(&self) -> bool {
        self.0.is_zero()
    }

    /// Compressed encoding.
    pub fn to_bytes(&self) -> [u8; Self::LEN] {
        let mut out = [0u8; Self::LEN];
        // The compressed encoding of any G2 point is exactly `LEN` bytes, so
        // writing into a buffer of that size cannot fail.
        self.0
            .serialize_compressed(&mut out[..])
            .expect("bls: compressed G2 point fits in buffer");
        out
    }

    /// Decodes a compressed key, checking that it lies in the G2 subgroup.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, BlsError> {
        if bytes.len() != Self::LEN {
            return Err(BlsError::InvalidLength {
                expected: Self::LEN,
                actual: bytes.len(),
            });
        }
        G2Affine::deserialize_compressed(bytes)
            .map(Self)
            .map_err(|e| BlsError::InvalidPoint(e.to_string()))
    }
}

impl<'a> Arbitrary<'a> for BlsPubKey {
    fn arbitrary(u: &mut Unstructured<'a>) -> arbitrary::Result<Self> {
        Ok(BlsSecretKey::arbitrary(u)?.public_key())
    }
}
