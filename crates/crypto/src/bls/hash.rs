use ark_bls12_381::{g1, Fq, G1Affine};
use ark_ec::{short_weierstrass::SWCurveConfig, AffineRepr};
use ark_ff::Field;
use sha2::{Digest, Sha256};

/// Domain separation tag for checkpoint signatures.
pub const BLS_SIG_DST: &[u8] = b"ANCHOR_CKPT_BLS_SIG_V0";

/// Number of bytes fed into a base field element candidate.
const FQ_CANDIDATE_LEN: usize = 48;

/// Deterministically maps a message to a point in the G1 prime-order subgroup.
///
/// Try-and-increment: for each counter value a base field candidate is
/// expanded from SHA-256 over `DST || counter || block || msg`. The first
/// candidate that lies on the curve is cofactor-cleared and returned.
pub fn hash_to_g1(msg: &[u8]) -> G1Affine {
    let mut counter: u32 = 0;
    loop {
        if let Some(point) = try_hash_with_counter(msg, counter) {
            return point;
        }
        counter = counter.wrapping_add(1);
    }
}

fn try_hash_with_counter(msg: &[u8], counter: u32) -> Option<G1Affine> {
    let mut candidate = [0u8; FQ_CANDIDATE_LEN];
    let mut filled = 0;
    let mut block: u8 = 0;
    while filled < FQ_CANDIDATE_LEN {
        let digest = Sha256::new()
            .chain_update(BLS_SIG_DST)
            .chain_update(counter.to_be_bytes())
            .chain_update([block])
            .chain_update(msg)
            .finalize();
        let take = (FQ_CANDIDATE_LEN - filled).min(digest.len());
        candidate[filled..filled + take].copy_from_slice(&digest[..take]);
        filled += take;
        block += 1;
    }

    let x = Fq::from_random_bytes(&candidate)?;
    let y = (x.square() * x + g1::Config::COEFF_B).sqrt()?;
    let point = G1Affine::new_unchecked(x, y).clear_cofactor();
    if point.is_zero() {
        return None;
    }
    Some(point)
}
