use anchor_checkpoint_types::{BlockContext, CheckpointRecord, CheckpointStatus};
use anchor_db_types::{traits::CheckpointDatabase, DbError};
use anchor_primitives::{AppHash, Epoch};
use anchor_test_utils::ArbitraryGenerator;

fn record_at(ag: &mut ArbitraryGenerator, epoch: Epoch) -> CheckpointRecord {
    let app_hash: AppHash = ag.generate();
    CheckpointRecord::new_accumulating(epoch, app_hash, &BlockContext::new(epoch * 10, epoch))
}

pub fn test_insert_checkpoint_single(db: &impl CheckpointDatabase) {
    let mut ag = ArbitraryGenerator::new();
    let record = record_at(&mut ag, 1);
    db.insert_checkpoint(record.clone()).expect("test: insert");

    let stored = db
        .get_checkpoint(1)
        .expect("test: get")
        .expect("test: get missing");
    assert_eq!(stored, record);
}

pub fn test_insert_checkpoint_arbitrary(db: &impl CheckpointDatabase) {
    let record: CheckpointRecord = ArbitraryGenerator::new().generate();
    db.insert_checkpoint(record.clone()).expect("test: insert");

    let stored = db
        .get_checkpoint(record.epoch())
        .expect("test: get")
        .expect("test: get missing");
    assert_eq!(stored, record);
}

pub fn test_insert_checkpoint_duplicate(db: &impl CheckpointDatabase) {
    let mut ag = ArbitraryGenerator::new();
    let first = record_at(&mut ag, 4);
    let second = record_at(&mut ag, 4);
    db.insert_checkpoint(first.clone()).expect("test: insert");

    let err = db
        .insert_checkpoint(second)
        .expect_err("test: passed unexpectedly");
    assert_eq!(err, DbError::EntryAlreadyExists);

    let stored = db.get_checkpoint(4).unwrap().unwrap();
    assert_eq!(stored, first);
}

pub fn test_put_checkpoint_overwrites(db: &impl CheckpointDatabase) {
    let mut ag = ArbitraryGenerator::new();
    let mut record = record_at(&mut ag, 2);
    db.insert_checkpoint(record.clone()).unwrap();

    record.record_state_update(CheckpointStatus::Sealed, &BlockContext::new(30, 3));
    db.put_checkpoint(record.clone()).unwrap();

    let stored = db.get_checkpoint(2).unwrap().unwrap();
    assert_eq!(stored.status, CheckpointStatus::Sealed);
    assert_eq!(stored.lifecycle.len(), 2);
    assert_eq!(stored, record);
}

pub fn test_get_missing_checkpoint(db: &impl CheckpointDatabase) {
    assert_eq!(db.get_checkpoint(7).unwrap(), None);
    assert_eq!(db.get_last_checkpoint_epoch().unwrap(), None);
}

pub fn test_get_last_checkpoint_epoch(db: &impl CheckpointDatabase) {
    let mut ag = ArbitraryGenerator::new();
    for epoch in [100, 1, 3] {
        db.insert_checkpoint(record_at(&mut ag, epoch)).unwrap();
    }
    assert_eq!(db.get_last_checkpoint_epoch().unwrap(), Some(100));

    db.insert_checkpoint(record_at(&mut ag, 50)).unwrap();
    assert_eq!(db.get_last_checkpoint_epoch().unwrap(), Some(100));

    db.put_checkpoint(record_at(&mut ag, 101)).unwrap();
    assert_eq!(db.get_last_checkpoint_epoch().unwrap(), Some(101));
}

#[macro_export]
macro_rules! checkpoint_db_tests {
    ($setup_expr:expr) => {
        #[test]
        fn test_insert_checkpoint_single() {
            let db = $setup_expr;
            $crate::checkpoint_tests::test_insert_checkpoint_single(&db);
        }

        #[test]
        fn test_insert_checkpoint_arbitrary() {
            let db = $setup_expr;
            $crate::checkpoint_tests::test_insert_checkpoint_arbitrary(&db);
        }

        #[test]
        fn test_insert_checkpoint_duplicate() {
            let db = $setup_expr;
            $crate::checkpoint_tests::test_insert_checkpoint_duplicate(&db);
        }

        #[test]
        fn test_put_checkpoint_overwrites() {
            let db = $setup_expr;
            $crate::checkpoint_tests::test_put_checkpoint_overwrites(&db);
        }

        #[test]
        fn test_get_missing_checkpoint() {
            let db = $setup_expr;
            $crate::checkpoint_tests::test_get_missing_checkpoint(&db);
        }

        #[test]
        fn test_get_last_checkpoint_epoch() {
            let db = $setup_expr;
            $crate::checkpoint_tests::test_get_last_checkpoint_epoch(&db);
        }
    };
}
