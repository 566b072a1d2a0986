use thiserror::Error;

/// Errors raised while decoding or combining BLS keys and signatures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BlsError {
    /// The encoding has the wrong number of bytes.
    #[error("invalid encoding length: expected {expected}, got {actual}")]
    InvalidLength {
        /// Length required by the encoding.
        expected: usize,
        /// Length that was provided.
        actual: usize,
    },

    /// The bytes do not describe a point in the prime-order subgroup.
    #[error("invalid curve point: {0}")]
    InvalidPoint(String),

    /// Public key aggregation was asked to combine zero keys.
    #[error("cannot aggregate an empty set of public keys")]
    EmptyAggregate,
}
