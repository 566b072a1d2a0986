use super::errors::MultisigError;

/// A signature scheme whose keys can be aggregated so that one aggregate
/// signature is checked against one aggregate key.
pub trait CryptoScheme {
    type PubKey;
    type Signature;
    type AggregatedKey;

    /// Aggregates the given public keys.
    fn aggregate<'k>(
        keys: impl Iterator<Item = &'k Self::PubKey>,
    ) -> Result<Self::AggregatedKey, MultisigError>
    where
        Self::PubKey: 'k;

    /// Verifies `signature` over `message` with an aggregated key.
    fn verify(key: &Self::AggregatedKey, message: &[u8], signature: &Self::Signature) -> bool;
}
