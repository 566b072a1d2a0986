use crate::{
    bls::{BlsError, BlsPubKey, BlsSignature},
    multisig::{errors::MultisigError, traits::CryptoScheme},
};

/// BLS12-381 scheme with G2 public keys and G1 signatures.
///
/// Keys aggregate by point addition, so an aggregate signature from a set of
/// signers over one message verifies against the sum of their keys.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlsScheme;

impl CryptoScheme for BlsScheme {
    type PubKey = BlsPubKey;
    type Signature = BlsSignature;
    type AggregatedKey = BlsPubKey;

    fn aggregate<'k>(
        keys: impl Iterator<Item = &'k Self::PubKey>,
    ) -> Result<Self::AggregatedKey, MultisigError>
    where
        Self::PubKey: 'k,
    {
        BlsPubKey::aggregate(keys).map_err(|e| match e {
            BlsError::EmptyAggregate => MultisigError::EmptyKeys,
            other => MultisigError::AggregationFailed(other.to_string()),
        })
    }

    fn verify(key: &Self::AggregatedKey, message: &[u8], signature: &Self::Signature) -> bool {
        key.verify(message, signature)
    }
}
