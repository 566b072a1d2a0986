//! Test helpers: a generic `Arbitrary` generator and deterministic BLS
//! validator fixtures.

pub mod validators;

use arbitrary::{Arbitrary, Unstructured};
use rand_chacha::{rand_core::SeedableRng, ChaCha20Rng};
use rand_core::{CryptoRngCore, OsRng};
pub use validators::{gen_validators, sign_checkpoint, validator_set, TestValidator};

/// The default buffer size for the `ArbitraryGenerator`.
const ARB_GEN_LEN: usize = 65_536;

/// Source of randomness backing an [`ArbitraryGenerator`].
#[derive(Debug)]
enum Entropy {
    Os,
    Seeded(ChaCha20Rng),
}

/// Produces arbitrary values of any type implementing [`Arbitrary`].
#[derive(Debug)]
pub struct ArbitraryGenerator {
    buf: Vec<u8>, // Persistent buffer
    entropy: Entropy,
}

impl Default for ArbitraryGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ArbitraryGenerator {
    /// Creates a generator drawing from [`OsRng`] with the default buffer size.
    pub fn new() -> Self {
        Self::new_with_size(ARB_GEN_LEN)
    }

    /// Creates a generator drawing from [`OsRng`] with a buffer of `s` bytes.
    pub fn new_with_size(s: usize) -> Self {
        Self {
            buf: vec![0u8; s],
            entropy: Entropy::Os,
        }
    }

    /// Creates a generator whose output is fully determined by `seed`.
    pub fn new_seeded(seed: u64) -> Self {
        Self {
            buf: vec![0u8; ARB_GEN_LEN],
            entropy: Entropy::Seeded(ChaCha20Rng::seed_from_u64(seed)),
        }
    }

    /// Generates an arbitrary instance of type `T`.
    pub fn generate<T>(&mut self) -> T
    where
        T: for<'a> Arbitrary<'a> + Clone,
    {
        match &mut self.entropy {
            Entropy::Os => fill_and_generate(&mut self.buf, &mut OsRng),
            Entropy::Seeded(rng) => fill_and_generate(&mut self.buf, rng),
        }
    }

    /// Generates an arbitrary instance of type `T` from the provided RNG.
    pub fn generate_with_rng<T, R>(&mut self, rng: &mut R) -> T
    where
        T: for<'a> Arbitrary<'a> + Clone,
        R: CryptoRngCore,
    {
        fill_and_generate(&mut self.buf, rng)
    }
}

fn fill_and_generate<T, R>(buf: &mut [u8], rng: &mut R) -> T
where
    T: for<'a> Arbitrary<'a> + Clone,
    R: CryptoRngCore,
{
    const MAX_ATTEMPTS: usize = 16;
    let mut last_error = None;

    for _ in 0..MAX_ATTEMPTS {
        rng.fill_bytes(buf);
        let mut u = Unstructured::new(buf);
        match T::arbitrary(&mut u) {
            Ok(value) => return value,
            Err(err) => last_error = Some(err),
        }
    }

    let error_msg = last_error
        .map(|err| err.to_string())
        .unwrap_or_else(|| "unknown error".to_string());
    panic!("Failed to generate arbitrary instance: {error_msg}");
}
