use std::sync::Arc;

use anchor_crypto::BlsPubKey;
use anchor_db_types::traits::BlsKeyDatabase;
use anchor_primitives::ValAddress;
use tracing::*;

use crate::{CheckpointingError, CheckpointingResult};

/// Validator address to BLS key mapping.
///
/// Keys are registered once per address and never replaced, and a key can
/// belong to a single address.
#[derive(Debug)]
pub struct ValidatorRegistry<K> {
    db: Arc<K>,
}

impl<K: BlsKeyDatabase> ValidatorRegistry<K> {
    pub fn new(db: Arc<K>) -> Self {
        Self { db }
    }

    pub fn register(&self, addr: ValAddress, key: BlsPubKey) -> CheckpointingResult<()> {
        if self.db.get_bls_key(addr)?.is_some() {
            return Err(CheckpointingError::AlreadyRegistered(addr));
        }
        if let Some(owner) = self.db.get_addr_by_bls_key(&key)? {
            return Err(CheckpointingError::BlsKeyAlreadyRegistered(owner));
        }

        self.db.insert_bls_key(addr, key)?;
        debug!(%addr, %key, "registered BLS key");
        Ok(())
    }

    /// Returns the key of `addr`, failing if none is registered.
    pub fn lookup(&self, addr: ValAddress) -> CheckpointingResult<BlsPubKey> {
        self.get(addr)?.ok_or(CheckpointingError::BlsKeyNotFound(addr))
    }

    pub fn get(&self, addr: ValAddress) -> CheckpointingResult<Option<BlsPubKey>> {
        Ok(self.db.get_bls_key(addr)?)
    }
}
