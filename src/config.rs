//! Chain construction parameters

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_MAX_MINT, GENESIS_TIMESTAMP, MAX_TARGET};
use crate::error::{ConsensusError, Result};
use crate::types::{Amount, Hash256};

/// Parameters fixed when a chain is created
///
/// Targets serialize as `0x`-prefixed hex strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainParams {
    pub genesis_target: Hash256,
    pub max_mint_coins_per_tx: Amount,
    pub genesis_timestamp: u64,
}

impl Default for ChainParams {
    fn default() -> Self {
        Self {
            genesis_target: MAX_TARGET,
            max_mint_coins_per_tx: DEFAULT_MAX_MINT,
            genesis_timestamp: GENESIS_TIMESTAMP,
        }
    }
}

impl ChainParams {
    pub fn new(genesis_target: Hash256, max_mint_coins_per_tx: Amount) -> Self {
        Self {
            genesis_target,
            max_mint_coins_per_tx,
            ..Self::default()
        }
    }

    /// A zero genesis target can never be mined
    pub fn validate(&self) -> Result<()> {
        if self.genesis_target.is_zero() {
            return Err(ConsensusError::InvalidParams(
                "genesis target must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let params: Self = serde_json::from_str(json)
            .map_err(|e| ConsensusError::InvalidParams(e.to_string()))?;
        params.validate()?;
        Ok(params)
    }

    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| ConsensusError::InvalidParams(e.to_string()))
    }
}
