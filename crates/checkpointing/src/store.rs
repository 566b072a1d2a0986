use std::sync::Arc;

use anchor_checkpoint_types::{BlockContext, CheckpointRecord, CheckpointStatus};
use anchor_db_types::{traits::CheckpointDatabase, DbError};
use anchor_primitives::{AppHash, Epoch};

use crate::{CheckpointingError, CheckpointingResult};

/// Owner of the per-epoch checkpoint records.
///
/// Callers read a record, mutate it and write it back within one state
/// transition. Writes are unconditional overwrites.
#[derive(Debug)]
pub struct CheckpointStore<C> {
    db: Arc<C>,
}

impl<C: CheckpointDatabase> CheckpointStore<C> {
    pub fn new(db: Arc<C>) -> Self {
        Self { db }
    }

    /// Creates the `Accumulating` record for `epoch`.
    pub fn create(
        &self,
        epoch: Epoch,
        app_hash: AppHash,
        ctx: &BlockContext,
    ) -> CheckpointingResult<CheckpointRecord> {
        if self.db.get_checkpoint(epoch)?.is_some() {
            return Err(CheckpointingError::AlreadyExists(epoch));
        }

        let record = CheckpointRecord::new_accumulating(epoch, app_hash, ctx);
        self.db
            .insert_checkpoint(record.clone())
            .map_err(|e| match e {
                DbError::EntryAlreadyExists => CheckpointingError::AlreadyExists(epoch),
                other => other.into(),
            })?;
        Ok(record)
    }

    pub fn get(&self, epoch: Epoch) -> CheckpointingResult<CheckpointRecord> {
        self.get_opt(epoch)?.ok_or(CheckpointingError::NotFound(epoch))
    }

    pub fn get_opt(&self, epoch: Epoch) -> CheckpointingResult<Option<CheckpointRecord>> {
        Ok(self.db.get_checkpoint(epoch)?)
    }

    /// Overwrites the stored record for `record.epoch()`.
    pub fn update(&self, record: CheckpointRecord) -> CheckpointingResult<()> {
        Ok(self.db.put_checkpoint(record)?)
    }

    pub fn status(&self, epoch: Epoch) -> CheckpointingResult<CheckpointStatus> {
        self.get(epoch).map(|r| r.status)
    }

    pub fn last_epoch(&self) -> CheckpointingResult<Option<Epoch>> {
        Ok(self.db.get_last_checkpoint_epoch()?)
    }
}
