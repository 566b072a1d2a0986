use thiserror::Error;

/// Single error type for all multisig operations across all cryptographic schemes.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MultisigError {
    /// A selected signer index has no corresponding key.
    #[error("signer index {index} out of range for {total_keys} keys")]
    IndexOutOfRange {
        /// The selected index.
        index: usize,
        /// The number of keys available.
        total_keys: usize,
    },

    /// The selected keys could not be combined.
    #[error("key aggregation failed: {0}")]
    AggregationFailed(String),

    /// The keys list is empty.
    #[error("keys cannot be empty")]
    EmptyKeys,

    /// The aggregated signature is invalid.
    #[error("invalid signature")]
    InvalidSignature,
}
