use ark_bls12_381::{G1Affine, G1Projective};
use ark_ec::{AffineRepr, CurveGroup};
use ark_ff::Zero;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use arbitrary::{Arbitrary, Unstructured};

use super::{errors::BlsError, keys::BlsSecretKey};

/// BLS signature, a point in G1.
///
/// Both individual and aggregate signatures use this type. The identity point
/// is the aggregate of zero signatures.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct BlsSignature(G1Affine);

impl_point_codecs!(BlsSignature, 48);

impl BlsSignature {
    /// Length of the compressed encoding.
    pub const LEN: usize = 48;

    pub(crate) fn from_point(point: G1Affine) -> Self {
        Self(point)
    }

    pub(crate) fn as_point(&self) -> G1Affine {
        self.0
    }

    /// The empty aggregate.
    pub fn identity() -> Self {
        Self(G1Projective::zero().into_affine())
    }

    pub fn is_identity(&self) -> bool {
        self.0.is_zero()
    }

    /// Sums a set of signatures.
    pub fn aggregate<'a>(sigs: impl IntoIterator<Item = &'a BlsSignature>) -> Self {
        let mut acc = G1Projective::zero();
        for sig in sigs {
            acc += sig.0;
        }
        Self(acc.into_affine())
    }

    /// Adds `other` into this aggregate.
    pub fn combine(&self, other: &BlsSignature) -> Self {
        Self((self.0.into_group() + other.0).into_affine())
    }

    /// Compressed encoding.
    pub fn to_bytes(&self) -> [u8; Self::LEN] {
        let mut out = [0u8; Self::LEN];
        // Compressed G1 points are always exactly `LEN` bytes.
        self.0
            .serialize_compressed(&mut out[..])
            .expect("bls: compressed G1 point fits in buffer");
        out
    }

    /// Decodes a compressed signature, checking that it lies in the G1 subgroup.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, BlsError> {
        if bytes.len() != Self::LEN {
            return Err(BlsError::InvalidLength {
                expected: Self::LEN,
                actual: bytes.len(),
            });
        }
        G1Affine::deserialize_compressed(bytes)
            .map(Self)
            .map_err(|e| BlsError::InvalidPoint(e.to_string()))
    }
}

impl<'a> Arbitrary<'a> for BlsSignature {
    fn arbitrary(u: &mut Unstructured<'a>) -> arbitrary::Result<Self> {
        let sk = BlsSecretKey::arbitrary(u)?;
        let mut msg = [0u8; 32];
        u.fill_buffer(&mut msg)?;
        Ok(sk.sign(&msg))
    }
}
