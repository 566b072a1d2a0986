use std::collections::BTreeMap;

use anchor_checkpoint_types::CheckpointRecord;
use anchor_primitives::Epoch;
use borsh::BorshDeserialize;
use parking_lot::Mutex;

use crate::{traits::CheckpointDatabase, DbError, DbResult};

/// Dummy implementation that isn't really compliant with a real backend, but
/// it stores records in their encoded form so codec problems still surface.
#[derive(Debug, Default)]
pub struct StubCheckpointDb {
    records: Mutex<BTreeMap<Epoch, Vec<u8>>>,
}

impl StubCheckpointDb {
    pub fn new() -> Self {
        Self::default()
    }
}

fn encode(record: &CheckpointRecord) -> DbResult<Vec<u8>> {
    borsh::to_vec(record).map_err(|e| DbError::CodecError(e.to_string()))
}

fn decode(bytes: &[u8]) -> DbResult<CheckpointRecord> {
    CheckpointRecord::try_from_slice(bytes).map_err(|e| DbError::CodecError(e.to_string()))
}

impl CheckpointDatabase for StubCheckpointDb {
    fn insert_checkpoint(&self, record: CheckpointRecord) -> DbResult<()> {
        let encoded = encode(&record)?;
        let mut tbl = self.records.lock();
        if tbl.contains_key(&record.epoch()) {
            return Err(DbError::EntryAlreadyExists);
        }
        tbl.insert(record.epoch(), encoded);
        Ok(())
    }

    fn put_checkpoint(&self, record: CheckpointRecord) -> DbResult<()> {
        let encoded = encode(&record)?;
        self.records.lock().insert(record.epoch(), encoded);
        Ok(())
    }

    fn get_checkpoint(&self, epoch: Epoch) -> DbResult<Option<CheckpointRecord>> {
        let tbl = self.records.lock();
        tbl.get(&epoch).map(|bytes| decode(bytes)).transpose()
    }

    fn get_last_checkpoint_epoch(&self) -> DbResult<Option<Epoch>> {
        Ok(self.records.lock().keys().next_back().copied())
    }
}
