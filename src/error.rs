//! Error types for ledger and chain validation

use thiserror::Error;

use crate::types::{Amount, Hash256, OutPoint};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConsensusError {
    #[error("Output not found in UTXO set: {0}")]
    MissingOutput(OutPoint),

    #[error("Output spent more than once: {0}")]
    DoubleSpend(OutPoint),

    #[error("Spend condition rejected satisfier for {0}")]
    PredicateRejected(OutPoint),

    #[error("Conservation violated: inputs {inputs} < outputs {outputs}")]
    Conservation { inputs: Amount, outputs: Amount },

    #[error("Mint of {minted} coins exceeds cap of {cap}")]
    MintCap { minted: Amount, cap: Amount },

    #[error("Structural violation: {0}")]
    Structural(String),

    #[error("Invalid proof of work: hash {hash:#x} is not below target {target:#x}")]
    ProofOfWork { hash: Hash256, target: Hash256 },

    #[error("Unknown parent block {0:#x}")]
    UnknownParent(Hash256),

    #[error("Block {0:#x} is already part of the chain")]
    DuplicateBlock(Hash256),

    #[error("Invalid chain parameters: {0}")]
    InvalidParams(String),

    #[error("Script execution failed: {0}")]
    Script(String),
}

pub type Result<T> = std::result::Result<T, ConsensusError>;
