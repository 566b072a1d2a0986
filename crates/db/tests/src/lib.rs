//! Backend-agnostic conformance tests for the database traits.
//!
//! Each `*_tests` module exposes plain functions taking a database, plus a
//! macro that expands them into `#[test]` functions for a given backend setup
//! expression.

pub mod bls_key_tests;
pub mod checkpoint_tests;

#[cfg(test)]
mod stub_tests {
    mod checkpoint {
        use anchor_db_types::stubs::StubCheckpointDb;

        use crate::checkpoint_db_tests;

        checkpoint_db_tests!(StubCheckpointDb::new());
    }

    mod bls_key {
        use anchor_db_types::stubs::StubBlsKeyDb;

        use crate::bls_key_db_tests;

        bls_key_db_tests!(StubBlsKeyDb::new());
    }
}
