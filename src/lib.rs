//! # Minichain
//!
//! A minimal proof-of-work blockchain engine: scripted outputs, Merkle-committed
//! blocks, nonce mining against per-block targets, and a block tree that keeps
//! every valid fork and follows the branch with the most cumulative work.
//!
//! ## Layers
//!
//! - [`transaction`]: outputs, inputs, transactions and the conservation rule
//! - [`script`]: spend conditions evaluated fail-closed
//! - [`merkle`]: zero-padded binary Merkle tree over content hashes
//! - [`block`]: header hashing and all-or-nothing validation against a ledger
//! - [`mining`]: nonce search, bounded and unbounded
//! - [`blockchain`]: block tree, per-block UTXO snapshots and tip selection
//!
//! Validation never partially applies: a rejected transaction or block leaves
//! every ledger snapshot untouched. The boolean / `Option` entry points
//! (`validate`, `extend`) have `check_*` / `connect_block` / `try_extend`
//! counterparts returning the [`ConsensusError`] behind a rejection.
//!
//! ## Usage
//!
//! ```rust
//! use minichain::*;
//!
//! let mut chain = Blockchain::new(MAX_TARGET, 100).unwrap();
//!
//! let coinbase = Transaction::coinbase(vec![Output::new(SumEquals(100), 100)], None);
//! let mut block = Block::new(chain.genesis_hash(), 1);
//! block.set_contents(vec![coinbase.clone()]);
//! block.mine(MAX_TARGET);
//! let block_hash = block.hash();
//!
//! assert!(chain.extend(block));
//! assert_eq!(chain.get_tip().hash(), block_hash);
//!
//! let utxo_set = chain.get_utxo_set(&block_hash).unwrap();
//! assert_eq!(utxo_set[&OutPoint::new(coinbase.hash(), 0)].amount(), 100);
//! ```

pub mod types;
pub mod constants;
pub mod encoding;
pub mod script;
pub mod transaction;
pub mod merkle;
pub mod pow;
pub mod block;
pub mod mining;
pub mod blockchain;
pub mod config;
pub mod error;

// Re-export commonly used types
pub use types::*;
pub use constants::*;
pub use error::{ConsensusError, Result};
pub use script::{AlwaysSpendable, FnCondition, HashLock, SignatureCheck, SpendCondition, SumEquals};
pub use transaction::{Input, Output, Transaction};
pub use merkle::{Hashable, MerkleProof, MerkleTree};
pub use block::Block;
pub use mining::MiningResult;
pub use blockchain::Blockchain;
pub use config::ChainParams;
