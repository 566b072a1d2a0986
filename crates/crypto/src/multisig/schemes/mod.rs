mod bls;

pub use bls::BlsScheme;
