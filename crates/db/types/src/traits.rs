//! Trait definitions for low level database interfaces.

use anchor_checkpoint_types::CheckpointRecord;
use anchor_crypto::BlsPubKey;
use anchor_primitives::{Epoch, ValAddress};

use crate::DbResult;

/// Database for checkpoint records, keyed by epoch.
pub trait CheckpointDatabase: Send + Sync + 'static {
    /// Inserts a new record for `record.epoch()`.
    ///
    /// Fails with [`DbError::EntryAlreadyExists`](crate::DbError::EntryAlreadyExists)
    /// if there's already a record for that epoch.
    fn insert_checkpoint(&self, record: CheckpointRecord) -> DbResult<()>;

    /// Writes a record, overwriting whatever is stored for its epoch.
    fn put_checkpoint(&self, record: CheckpointRecord) -> DbResult<()>;

    /// Gets the record for an epoch, if any.
    fn get_checkpoint(&self, epoch: Epoch) -> DbResult<Option<CheckpointRecord>>;

    /// Gets the highest epoch that has a record, if any.
    fn get_last_checkpoint_epoch(&self) -> DbResult<Option<Epoch>>;
}

/// Database for validators' registered BLS public keys.
pub trait BlsKeyDatabase: Send + Sync + 'static {
    /// Stores the key for a validator address.
    ///
    /// Fails with [`DbError::EntryAlreadyExists`](crate::DbError::EntryAlreadyExists)
    /// if the address already has a key. There is no update path.
    fn insert_bls_key(&self, addr: ValAddress, key: BlsPubKey) -> DbResult<()>;

    /// Gets the key registered for an address.
    fn get_bls_key(&self, addr: ValAddress) -> DbResult<Option<BlsPubKey>>;

    /// Reverse lookup from a key to the address that registered it.
    fn get_addr_by_bls_key(&self, key: &BlsPubKey) -> DbResult<Option<ValAddress>>;
}
