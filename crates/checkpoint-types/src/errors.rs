use thiserror::Error;

/// Errors from manipulating a [`SignerBitmap`](crate::SignerBitmap).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BitmapError {
    /// The validator index does not fit in the bitmap.
    #[error("validator index {index} out of range, max is {max}")]
    IndexOutOfRange { index: usize, max: usize },

    /// Raw bitmap bytes had the wrong length.
    #[error("invalid bitmap length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
}

/// Errors from decoding a checkpoint payload recovered from the external chain.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PayloadError {
    #[error("invalid payload length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("unexpected payload tag")]
    InvalidTag,

    #[error("unsupported payload version {0}")]
    UnsupportedVersion(u8),

    #[error("invalid multi-signature encoding: {0}")]
    InvalidSignature(String),
}

/// Errors from validating checkpoint types.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CheckpointTypesError {
    /// The bitmap selects a validator index beyond the validator set.
    #[error("bitmap selects index {index} but the validator set has {size} members")]
    BitmapOutOfRange { index: usize, size: usize },

    /// The same address appears twice in a validator set.
    #[error("duplicate validator in set")]
    DuplicateValidator,

    /// The validator set is larger than the bitmap can address.
    #[error("validator set of {0} exceeds bitmap capacity")]
    TooManyValidators(usize),

    /// The checkpoint failed a structural check.
    #[error("malformed checkpoint: {0}")]
    Malformed(&'static str),

    #[error("bitmap: {0}")]
    Bitmap(#[from] BitmapError),
}
