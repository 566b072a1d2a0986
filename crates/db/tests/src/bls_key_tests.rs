use anchor_db_types::{traits::BlsKeyDatabase, DbError};
use anchor_primitives::ValAddress;
use anchor_test_utils::gen_validators;

pub fn test_insert_and_get_bls_key(db: &impl BlsKeyDatabase) {
    let vals = gen_validators(&[1, 1], 1);
    for v in &vals {
        db.insert_bls_key(v.address, v.pubkey).expect("test: insert");
    }

    for v in &vals {
        assert_eq!(db.get_bls_key(v.address).unwrap(), Some(v.pubkey));
        assert_eq!(db.get_addr_by_bls_key(&v.pubkey).unwrap(), Some(v.address));
    }
}

pub fn test_insert_bls_key_twice(db: &impl BlsKeyDatabase) {
    let vals = gen_validators(&[1, 1], 2);
    db.insert_bls_key(vals[0].address, vals[0].pubkey).unwrap();

    let err = db
        .insert_bls_key(vals[0].address, vals[1].pubkey)
        .expect_err("test: passed unexpectedly");
    assert_eq!(err, DbError::EntryAlreadyExists);

    // The original key is untouched and the rejected key is not indexed.
    assert_eq!(db.get_bls_key(vals[0].address).unwrap(), Some(vals[0].pubkey));
    assert_eq!(db.get_addr_by_bls_key(&vals[1].pubkey).unwrap(), None);
}

pub fn test_get_missing_bls_key(db: &impl BlsKeyDatabase) {
    let vals = gen_validators(&[1], 3);
    assert_eq!(db.get_bls_key(ValAddress::from([9; 20])).unwrap(), None);
    assert_eq!(db.get_addr_by_bls_key(&vals[0].pubkey).unwrap(), None);
}

#[macro_export]
macro_rules! bls_key_db_tests {
    ($setup_expr:expr) => {
        #[test]
        fn test_insert_and_get_bls_key() {
            let db = $setup_expr;
            $crate::bls_key_tests::test_insert_and_get_bls_key(&db);
        }

        #[test]
        fn test_insert_bls_key_twice() {
            let db = $setup_expr;
            $crate::bls_key_tests::test_insert_bls_key_twice(&db);
        }

        #[test]
        fn test_get_missing_bls_key() {
            let db = $setup_expr;
            $crate::bls_key_tests::test_get_missing_bls_key(&db);
        }
    };
}
