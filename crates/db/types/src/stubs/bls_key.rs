use std::collections::HashMap;

use anchor_crypto::BlsPubKey;
use anchor_primitives::ValAddress;
use parking_lot::Mutex;

use crate::{traits::BlsKeyDatabase, DbError, DbResult};

#[derive(Debug, Default)]
struct KeyTables {
    by_addr: HashMap<ValAddress, BlsPubKey>,
    by_key: HashMap<[u8; BlsPubKey::LEN], ValAddress>,
}

/// In-memory BLS key store.
#[derive(Debug, Default)]
pub struct StubBlsKeyDb {
    tables: Mutex<KeyTables>,
}

impl StubBlsKeyDb {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlsKeyDatabase for StubBlsKeyDb {
    fn insert_bls_key(&self, addr: ValAddress, key: BlsPubKey) -> DbResult<()> {
        let mut tables = self.tables.lock();
        if tables.by_addr.contains_key(&addr) {
            return Err(DbError::EntryAlreadyExists);
        }
        tables.by_addr.insert(addr, key);
        tables.by_key.insert(key.to_bytes(), addr);
        Ok(())
    }

    fn get_bls_key(&self, addr: ValAddress) -> DbResult<Option<BlsPubKey>> {
        Ok(self.tables.lock().by_addr.get(&addr).copied())
    }

    fn get_addr_by_bls_key(&self, key: &BlsPubKey) -> DbResult<Option<ValAddress>> {
        Ok(self.tables.lock().by_key.get(&key.to_bytes()).copied())
    }
}
