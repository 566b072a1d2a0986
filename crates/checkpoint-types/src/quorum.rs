use serde::{Deserialize, Serialize};

/// Fraction of total voting power that signers must strictly exceed for a
/// checkpoint to be accepted.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuorumThreshold {
    pub numerator: u64,
    pub denominator: u64,
}

impl QuorumThreshold {
    /// Strictly more than one third of the total power.
    pub const ONE_THIRD: Self = Self::new(1, 3);

    pub const fn new(numerator: u64, denominator: u64) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// Returns whether `signed` power is strictly above the threshold share of
    /// `total` power.
    ///
    /// Computed as `signed * denominator > total * numerator` in 128-bit
    /// arithmetic, so it cannot overflow and does not round.
    pub fn is_met(&self, signed: u64, total: u64) -> bool {
        u128::from(signed) * u128::from(self.denominator)
            > u128::from(total) * u128::from(self.numerator)
    }
}

impl Default for QuorumThreshold {
    fn default() -> Self {
        Self::ONE_THIRD
    }
}
