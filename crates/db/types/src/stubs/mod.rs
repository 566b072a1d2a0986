mod bls_key;
mod checkpoint;

pub use bls_key::StubBlsKeyDb;
pub use checkpoint::StubCheckpointDb;
