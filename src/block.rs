//! Blocks: header hashing and full validation against a parent ledger

use crate::constants::MAX_TARGET;
use crate::encoding::{sha256, write_hash};
use crate::error::{ConsensusError, Result};
use crate::merkle::MerkleTree;
use crate::mining::{mine_block, mine_block_bounded, MiningResult};
use crate::pow::check_proof_of_work;
use crate::transaction::{apply_transaction, Transaction};
use crate::types::*;

/// Header fields plus a Merkle-committed transaction list
#[derive(Debug, Clone)]
pub struct Block {
    parent_hash: Hash256,
    target: Hash256,
    nonce: u64,
    timestamp: u64,
    contents: MerkleTree<Transaction>,
}

impl Block {
    /// Empty block on top of `parent_hash`, target at the easiest value
    pub fn new(parent_hash: Hash256, timestamp: u64) -> Self {
        Self {
            parent_hash,
            target: MAX_TARGET,
            nonce: 0,
            timestamp,
            contents: MerkleTree::default(),
        }
    }

    /// Replace the transaction list and recommit the Merkle root
    pub fn set_contents(&mut self, transactions: Vec<Transaction>) {
        self.contents = MerkleTree::new(transactions);
    }

    pub fn contents(&self) -> &MerkleTree<Transaction> {
        &self.contents
    }

    pub fn transactions(&self) -> &[Transaction] {
        self.contents.items()
    }

    pub fn merkle_root(&self) -> Hash256 {
        self.contents.root()
    }

    pub fn parent_hash(&self) -> Hash256 {
        self.parent_hash
    }

    pub fn set_parent_hash(&mut self, parent_hash: Hash256) {
        self.parent_hash = parent_hash;
    }

    pub fn target(&self) -> Hash256 {
        self.target
    }

    pub fn set_target(&mut self, target: Hash256) {
        self.target = target;
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    pub fn set_nonce(&mut self, nonce: u64) {
        self.nonce = nonce;
    }

    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    pub fn set_timestamp(&mut self, timestamp: u64) {
        self.timestamp = timestamp;
    }

    /// parent ‖ merkle root ‖ timestamp ‖ nonce ‖ target
    ///
    /// Hashes are 32 bytes big-endian, timestamp and nonce 8 bytes
    /// little-endian.
    pub fn header_bytes(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(32 + 32 + 8 + 8 + 32);
        write_hash(&mut data, &self.parent_hash);
        write_hash(&mut data, &self.merkle_root());
        data.extend_from_slice(&self.timestamp.to_le_bytes());
        data.extend_from_slice(&self.nonce.to_le_bytes());
        write_hash(&mut data, &self.target);
        data
    }

    pub fn hash(&self) -> Hash256 {
        sha256(&self.header_bytes())
    }

    /// Set `target` and search nonces from 0 until hash < target
    ///
    /// Never returns for a target of 0.
    pub fn mine(&mut self, target: Hash256) {
        mine_block(self, target);
    }

    /// Like [`Block::mine`] but gives up after `max_attempts` nonces
    pub fn mine_bounded(&mut self, target: Hash256, max_attempts: u64) -> MiningResult {
        mine_block_bounded(self, target, max_attempts)
    }

    /// Validate against the parent's ledger; `None` marks an invalid block
    pub fn validate(&self, parent_utxo_set: &UtxoSet, max_mint_per_tx: Amount) -> Option<UtxoSet> {
        match connect_block(self, parent_utxo_set, max_mint_per_tx) {
            Ok(utxo_set) => Some(utxo_set),
            Err(e) => {
                log::debug!("block {:#x} rejected: {}", self.hash(), e);
                None
            }
        }
    }
}

/// ConnectBlock: ℬ × 𝒰𝒮 × ℕ → 𝒰𝒮
///
/// For block b with parent ledger us and mint cap m:
/// 1. hash(b) < target(b)
/// 2. No transactions: return us unchanged
/// 3. txs[0] is a mint with Σ outputs ≤ m
/// 4. txs[1..] spend, each valid against the running ledger
/// 5. Apply every transaction in order and return the result
///
/// All-or-nothing: the parent ledger is never modified.
pub fn connect_block(
    block: &Block,
    parent_utxo_set: &UtxoSet,
    max_mint_per_tx: Amount,
) -> Result<UtxoSet> {
    // 1. Proof of work
    let hash = block.hash();
    if !check_proof_of_work(&hash, &block.target) {
        return Err(ConsensusError::ProofOfWork {
            hash,
            target: block.target,
        });
    }

    let transactions = block.transactions();

    // 2. Empty blocks carry no ledger changes
    let coinbase = match transactions.first() {
        None => return Ok(parent_utxo_set.clone()),
        Some(tx) => tx,
    };

    // 3. Coinbase
    if !coinbase.is_coinbase() {
        return Err(ConsensusError::Structural(
            "first transaction must be coinbase".to_string(),
        ));
    }
    coinbase.check_mint(max_mint_per_tx)?;
    let mut utxo_set = apply_transaction(coinbase, parent_utxo_set.clone());

    // 4. Spends, checked against the running view
    for (i, tx) in transactions.iter().enumerate().skip(1) {
        if tx.is_coinbase() {
            return Err(ConsensusError::Structural(format!(
                "coinbase transaction at index {}",
                i
            )));
        }
        tx.check_inputs(&utxo_set)?;

        // 5. Apply
        utxo_set = apply_transaction(tx, utxo_set);
    }

    Ok(utxo_set)
}
