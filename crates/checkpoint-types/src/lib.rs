//! Checkpoint types: the attested checkpoint, its stored record and lifecycle,
//! validator sets, the quorum rule and the external payload codec.

mod bitmap;
mod errors;
pub mod payload;
mod quorum;
mod record;
mod sig;
mod status;
mod validator;

pub use bitmap::{SignerBitmap, BITMAP_LEN, MAX_VALIDATORS};
pub use errors::{BitmapError, CheckpointTypesError, PayloadError};
pub use quorum::QuorumThreshold;
pub use record::{
    AccumulateOutcome, BlockContext, CheckpointRecord, LifecycleEntry, RawCheckpoint,
};
pub use sig::{sign_bytes, PartialBlsSig, SIGN_BYTES_LEN};
pub use status::CheckpointStatus;
pub use validator::{ValidatorEntry, ValidatorSet, ValidatorWithBlsKey};
