//! Chain-wide constants

use primitive_types::U256;

use crate::types::{Amount, Hash256};

/// Easiest possible target: every hash except 2^256 - 1 satisfies it
pub const MAX_TARGET: Hash256 = U256([u64::MAX; 4]);

/// Default per-transaction mint cap
pub const DEFAULT_MAX_MINT: Amount = 100;

/// Timestamp written into the synthesized genesis block
pub const GENESIS_TIMESTAMP: u64 = 0;

/// Parent hash sentinel carried by the genesis block
pub const GENESIS_PARENT_HASH: Hash256 = U256([0; 4]);
