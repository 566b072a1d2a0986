//! Fixed-size signer bitmap.

use std::io;

use arbitrary::Arbitrary;
use bitvec::prelude::*;
use borsh::{BorshDeserialize, BorshSerialize};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::BitmapError;

/// Size of the signer bitmap in bytes.
pub const BITMAP_LEN: usize = 13;

/// Number of validator slots addressable by the signer bitmap.
pub const MAX_VALIDATORS: usize = BITMAP_LEN * 8;

/// Bitmap over validator indices recording which validators contributed to a
/// checkpoint's aggregate signature.
///
/// Bit `i` corresponds to the validator at index `i` of the epoch's validator
/// set. The bitmap always has [`BITMAP_LEN`] bytes, least significant bit
/// first within each byte, so its encoding is identical on every node.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct SignerBitmap {
    bits: BitVec<u8, Lsb0>,
}

impl BorshSerialize for SignerBitmap {
    fn serialize<W: io::Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&self.to_bytes())
    }
}

impl BorshDeserialize for SignerBitmap {
    fn deserialize_reader<R: io::Read>(reader: &mut R) -> io::Result<Self> {
        let mut bytes = [0u8; BITMAP_LEN];
        reader.read_exact(&mut bytes)?;
        Ok(Self::from(bytes))
    }
}

impl Serialize for SignerBitmap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bytes(&self.to_bytes())
    }
}

impl<'de> Deserialize<'de> for SignerBitmap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bytes = <Vec<u8> as Deserialize<'de>>::deserialize(deserializer)?;
        Self::from_bytes(&bytes).map_err(de::Error::custom)
    }
}

impl SignerBitmap {
    /// Creates a bitmap with no signers.
    pub fn new_empty() -> Self {
        Self {
            bits: BitVec::repeat(false, MAX_VALIDATORS),
        }
    }

    /// Parses raw bitmap bytes, which must be exactly [`BITMAP_LEN`] long.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, BitmapError> {
        let arr: [u8; BITMAP_LEN] = bytes.try_into().map_err(|_| BitmapError::InvalidLength {
            expected: BITMAP_LEN,
            actual: bytes.len(),
        })?;
        Ok(Self::from(arr))
    }

    pub fn to_bytes(&self) -> [u8; BITMAP_LEN] {
        let mut out = [0u8; BITMAP_LEN];
        out.copy_from_slice(self.bits.as_raw_slice());
        out
    }

    /// Returns whether the validator at `idx` has signed. Out of range indices
    /// are never set.
    pub fn is_set(&self, idx: usize) -> bool {
        self.bits.get(idx).map(|b| *b).unwrap_or(false)
    }

    /// Marks the validator at `idx` as a signer.
    ///
    /// Returns `true` if the bit was newly set and `false` if it was already
    /// set.
    pub fn try_set(&mut self, idx: usize) -> Result<bool, BitmapError> {
        if idx >= MAX_VALIDATORS {
            return Err(BitmapError::IndexOutOfRange {
                index: idx,
                max: MAX_VALIDATORS - 1,
            });
        }
        let was_set = self.bits.replace(idx, true);
        Ok(!was_set)
    }

    /// Returns an iterator over the indices of all signers, in ascending order.
    pub fn signer_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits.iter_ones()
    }

    /// Returns the number of signers.
    pub fn signer_count(&self) -> usize {
        self.bits.count_ones()
    }

    /// Returns `true` if no validator has signed.
    pub fn is_empty(&self) -> bool {
        self.bits.not_any()
    }

    pub fn as_bitslice(&self) -> &BitSlice<u8, Lsb0> {
        &self.bits
    }
}

impl Default for SignerBitmap {
    fn default() -> Self {
        Self::new_empty()
    }
}

impl From<[u8; BITMAP_LEN]> for SignerBitmap {
    fn from(bytes: [u8; BITMAP_LEN]) -> Self {
        Self {
            bits: BitVec::from_vec(bytes.to_vec()),
        }
    }
}

impl<'a> Arbitrary<'a> for SignerBitmap {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        let mut bytes = [0u8; BITMAP_LEN];
        u.fill_buffer(&mut bytes)?;
        Ok(Self::from(bytes))
    }
}
