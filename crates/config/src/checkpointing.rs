use anchor_checkpoint_types::QuorumThreshold;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Default external-chain depth at which a submitted checkpoint is confirmed.
const DEFAULT_CONFIRMATION_DEPTH: u64 = 6;

/// Default external-chain depth at which a confirmed checkpoint is finalized.
const DEFAULT_FINALIZATION_DEPTH: u64 = 100;

fn default_confirmation_depth() -> u64 {
    DEFAULT_CONFIRMATION_DEPTH
}

fn default_finalization_depth() -> u64 {
    DEFAULT_FINALIZATION_DEPTH
}

/// Parameters of checkpoint accumulation and external-chain tracking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckpointingParams {
    /// Share of total voting power that signers must strictly exceed.
    #[serde(default)]
    pub quorum: QuorumThreshold,

    /// External-chain depth at which a submitted checkpoint becomes confirmed.
    #[serde(default = "default_confirmation_depth")]
    pub confirmation_depth: u64,

    /// External-chain depth at which a confirmed checkpoint becomes finalized.
    #[serde(default = "default_finalization_depth")]
    pub finalization_depth: u64,
}

impl Default for CheckpointingParams {
    fn default() -> Self {
        Self {
            quorum: QuorumThreshold::default(),
            confirmation_depth: DEFAULT_CONFIRMATION_DEPTH,
            finalization_depth: DEFAULT_FINALIZATION_DEPTH,
        }
    }
}

impl CheckpointingParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.quorum.denominator == 0 {
            return Err(ConfigError::InvalidParams("quorum denominator is zero"));
        }
        if self.quorum.numerator >= self.quorum.denominator {
            return Err(ConfigError::InvalidParams("quorum threshold must be below 1"));
        }
        if self.confirmation_depth == 0 {
            return Err(ConfigError::InvalidParams("confirmation depth is zero"));
        }
        if self.finalization_depth < self.confirmation_depth {
            return Err(ConfigError::InvalidParams(
                "finalization depth is below confirmation depth",
            ));
        }
        Ok(())
    }
}
