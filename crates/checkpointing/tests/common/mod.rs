//! Common test utilities for integration tests.

#![allow(unreachable_pub, reason = "test utilities")]
#![allow(dead_code, reason = "utilities used by different test files")]

use std::sync::Arc;

use anchor_checkpoint_types::{BlockContext, CheckpointRecord, RawCheckpoint};
use anchor_checkpointing::{CheckpointKeeper, CheckpointingHooks, StaticEpochProvider};
use anchor_config::CheckpointingParams;
use anchor_db_types::stubs::{StubBlsKeyDb, StubCheckpointDb};
use anchor_primitives::{AppHash, Epoch};
use anchor_test_utils::{gen_validators, validator_set, TestValidator};
use parking_lot::Mutex;

pub type TestKeeper = CheckpointKeeper<StubCheckpointDb, StubBlsKeyDb, StaticEpochProvider>;

/// Number of epochs every [`Node`] has a validator set for, starting at 0.
pub const EPOCHS: Epoch = 16;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    Sealed(Epoch),
    Submitted(Epoch),
    Confirmed(Epoch),
    Finalized(Epoch),
    Forgotten(Epoch),
    Reverified(Epoch),
    Conflict { external: AppHash, local: AppHash },
}

#[derive(Debug, Default)]
pub struct EventLog(Mutex<Vec<Event>>);

impl EventLog {
    fn push(&self, ev: Event) {
        self.0.lock().push(ev);
    }
}

impl CheckpointingHooks for EventLog {
    fn on_sealed(&self, record: &CheckpointRecord) {
        self.push(Event::Sealed(record.epoch()));
    }

    fn on_submitted(&self, record: &CheckpointRecord) {
        self.push(Event::Submitted(record.epoch()));
    }

    fn on_confirmed(&self, record: &CheckpointRecord) {
        self.push(Event::Confirmed(record.epoch()));
    }

    fn on_finalized(&self, record: &CheckpointRecord) {
        self.push(Event::Finalized(record.epoch()));
    }

    fn on_forgotten(&self, record: &CheckpointRecord) {
        self.push(Event::Forgotten(record.epoch()));
    }

    fn on_externally_reverified(&self, ckpt: &RawCheckpoint) {
        self.push(Event::Reverified(ckpt.epoch));
    }

    fn on_conflict(&self, candidate: &RawCheckpoint, local: &CheckpointRecord) {
        self.push(Event::Conflict {
            external: candidate.app_hash,
            local: *local.app_hash(),
        });
    }
}

/// One node's checkpointing state over in-memory databases.
///
/// Every node built from the same powers has the same validators.
pub struct Node {
    pub keeper: TestKeeper,
    pub vals: Vec<TestValidator>,
    log: Arc<EventLog>,
}

impl Node {
    pub fn new(powers: &[u64], params: CheckpointingParams) -> Self {
        let vals = gen_validators(powers, 0x5eed);
        let set = validator_set(&vals);
        let mut epochs = StaticEpochProvider::new();
        for epoch in 0..EPOCHS {
            epochs.insert(epoch, set.clone());
        }

        let mut keeper = CheckpointKeeper::new(
            Arc::new(StubCheckpointDb::new()),
            Arc::new(StubBlsKeyDb::new()),
            epochs,
            params,
        )
        .expect("test: valid params");
        for v in &vals {
            keeper
                .register_bls_key(v.address, v.pubkey)
                .expect("test: register key");
        }
        let log = Arc::new(EventLog::default());
        keeper.set_hooks(log.clone()).expect("test: install hooks");

        Self { keeper, vals, log }
    }

    /// Adds validator `idx`'s signature over `(epoch, app_hash)`.
    pub fn sign(&self, epoch: Epoch, idx: usize, app_hash: AppHash) {
        let sig = self.vals[idx].partial_sig(epoch, app_hash);
        self.keeper
            .add_partial_sig(&sig, &ctx(epoch * 10 + idx as u64))
            .expect("test: add partial sig");
    }

    pub fn events(&self) -> Vec<Event> {
        self.log.0.lock().clone()
    }
}

pub fn ctx(height: u64) -> BlockContext {
    BlockContext::new(height, 1_650_000_000 + height * 5)
}

pub fn app_hash(b: u8) -> AppHash {
    AppHash::from([b; 32])
}
