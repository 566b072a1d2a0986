//! Wire format of checkpoints embedded in external-chain transactions.
//!
//! ```text
//! tag (4) | version (1) | epoch (8, BE) | app_hash (32) | bitmap (13) | multi_sig (48)
//! ```

use anchor_crypto::BlsSignature;
use anchor_primitives::AppHash;

use crate::{PayloadError, RawCheckpoint, SignerBitmap, BITMAP_LEN};

/// Magic bytes identifying a checkpoint payload.
pub const CHECKPOINT_TAG: [u8; 4] = *b"ANCR";

/// Current payload version.
pub const PAYLOAD_VERSION: u8 = 0;

const TAG_END: usize = CHECKPOINT_TAG.len();
const VERSION_END: usize = TAG_END + 1;
const EPOCH_END: usize = VERSION_END + 8;
const HASH_END: usize = EPOCH_END + AppHash::LEN;
const BITMAP_END: usize = HASH_END + BITMAP_LEN;

/// Total encoded length.
pub const PAYLOAD_LEN: usize = BITMAP_END + BlsSignature::LEN;

/// Encodes a checkpoint for embedding in the external chain.
pub fn encode_checkpoint(ckpt: &RawCheckpoint) -> Vec<u8> {
    let mut buf = Vec::with_capacity(PAYLOAD_LEN);
    buf.extend_from_slice(&CHECKPOINT_TAG);
    buf.push(PAYLOAD_VERSION);
    buf.extend_from_slice(&ckpt.epoch.to_be_bytes());
    buf.extend_from_slice(ckpt.app_hash.as_bytes());
    buf.extend_from_slice(&ckpt.bitmap.to_bytes());
    buf.extend_from_slice(&ckpt.multi_sig.to_bytes());
    buf
}

/// Decodes a payload recovered from the external chain.
///
/// The multi-signature must decode to a point in the G1 subgroup. No other
/// semantic checks are done here.
pub fn decode_checkpoint(bytes: &[u8]) -> Result<RawCheckpoint, PayloadError> {
    if bytes.len() != PAYLOAD_LEN {
        return Err(PayloadError::InvalidLength {
            expected: PAYLOAD_LEN,
            actual: bytes.len(),
        });
    }

    if bytes[..TAG_END] != CHECKPOINT_TAG {
        return Err(PayloadError::InvalidTag);
    }

    let version = bytes[TAG_END];
    if version != PAYLOAD_VERSION {
        return Err(PayloadError::UnsupportedVersion(version));
    }

    let mut epoch_buf = [0u8; 8];
    epoch_buf.copy_from_slice(&bytes[VERSION_END..EPOCH_END]);
    let epoch = u64::from_be_bytes(epoch_buf);

    let mut hash_buf = [0u8; AppHash::LEN];
    hash_buf.copy_from_slice(&bytes[EPOCH_END..HASH_END]);
    let app_hash = AppHash::from(hash_buf);

    let mut bitmap_buf = [0u8; BITMAP_LEN];
    bitmap_buf.copy_from_slice(&bytes[HASH_END..BITMAP_END]);
    let bitmap = SignerBitmap::from(bitmap_buf);

    let multi_sig = BlsSignature::from_bytes(&bytes[BITMAP_END..])
        .map_err(|e| PayloadError::InvalidSignature(e.to_string()))?;

    Ok(RawCheckpoint::new(epoch, app_hash, bitmap, multi_sig))
}
