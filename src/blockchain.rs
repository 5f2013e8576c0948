//! Block tree with per-block ledger snapshots and most-work tip selection
//!
//! Every valid block is kept, forks included. Each record carries the
//! block's height, the cumulative work of the branch ending at it, and
//! the UTXO set after applying it. Snapshots are persistent maps, so a
//! child shares all untouched entries with its parent.
//!
//! `extend` is the only mutator. Callers sharing a chain across threads
//! must serialize it (e.g. behind a `RwLock`); stored snapshots are never
//! mutated and may be read concurrently.

use std::collections::{BTreeMap, HashMap};

use crate::block::Block;
use crate::config::ChainParams;
use crate::constants::GENESIS_PARENT_HASH;
use crate::error::{ConsensusError, Result};
use crate::pow::work;
use crate::types::*;

/// Derived state recorded for an accepted block
#[derive(Debug, Clone)]
pub struct BlockRecord {
    pub block: Block,
    pub height: u64,
    pub cumulative_work: f64,
    pub utxo_set: UtxoSet,
}

#[derive(Debug, Clone)]
pub struct Blockchain {
    params: ChainParams,
    genesis_hash: Hash256,
    records: HashMap<Hash256, BlockRecord>,
    heights: BTreeMap<u64, Vec<Hash256>>,
    tip: Hash256,
}

impl Blockchain {
    /// Mine a genesis block against `genesis_target` and start the tree
    pub fn new(genesis_target: Hash256, max_mint_coins_per_tx: Amount) -> Result<Self> {
        Self::with_params(ChainParams::new(genesis_target, max_mint_coins_per_tx))
    }

    pub fn with_params(params: ChainParams) -> Result<Self> {
        params.validate()?;

        let mut genesis = Block::new(GENESIS_PARENT_HASH, params.genesis_timestamp);
        genesis.mine(params.genesis_target);
        let utxo_set = crate::block::connect_block(
            &genesis,
            &UtxoSet::new(),
            params.max_mint_coins_per_tx,
        )?;

        let genesis_hash = genesis.hash();
        let record = BlockRecord {
            block: genesis,
            height: 0,
            cumulative_work: work(&params.genesis_target, &params.genesis_target),
            utxo_set,
        };
        log::info!("created chain with genesis {:#x}", genesis_hash);

        let mut records = HashMap::new();
        records.insert(genesis_hash, record);
        let mut heights = BTreeMap::new();
        heights.insert(0, vec![genesis_hash]);

        Ok(Self {
            params,
            genesis_hash,
            records,
            heights,
            tip: genesis_hash,
        })
    }

    pub fn params(&self) -> &ChainParams {
        &self.params
    }

    pub fn genesis_hash(&self) -> Hash256 {
        self.genesis_hash
    }

    /// Work of `target` relative to the genesis target
    pub fn get_work(&self, target: &Hash256) -> f64 {
        work(&self.params.genesis_target, target)
    }

    /// Block with the most cumulative work; the first one stored wins ties
    pub fn get_tip(&self) -> &Block {
        &self.records[&self.tip].block
    }

    pub fn tip_hash(&self) -> Hash256 {
        self.tip
    }

    /// Add `block` if its parent is known and it validates against the
    /// parent's snapshot. A rejected block leaves the chain untouched.
    pub fn extend(&mut self, block: Block) -> bool {
        match self.try_extend(block) {
            Ok(_) => true,
            Err(e) => {
                log::debug!("extend rejected: {}", e);
                false
            }
        }
    }

    /// [`Blockchain::extend`] reporting why a block was rejected
    pub fn try_extend(&mut self, block: Block) -> Result<Hash256> {
        let parent_hash = block.parent_hash();
        let parent = self
            .records
            .get(&parent_hash)
            .ok_or(ConsensusError::UnknownParent(parent_hash))?;

        let block_hash = block.hash();
        if self.records.contains_key(&block_hash) {
            return Err(ConsensusError::DuplicateBlock(block_hash));
        }

        let utxo_set =
            crate::block::connect_block(&block, &parent.utxo_set, self.params.max_mint_coins_per_tx)?;

        let height = parent.height + 1;
        let cumulative_work = parent.cumulative_work + self.get_work(&block.target());

        self.records.insert(
            block_hash,
            BlockRecord {
                block,
                height,
                cumulative_work,
                utxo_set,
            },
        );
        self.heights.entry(height).or_default().push(block_hash);
        log::info!(
            "accepted block {:#x} at height {} (cumulative work {})",
            block_hash,
            height,
            cumulative_work
        );

        if cumulative_work > self.records[&self.tip].cumulative_work {
            log::info!("new tip {:#x} at height {}", block_hash, height);
            self.tip = block_hash;
        }

        Ok(block_hash)
    }

    /// Blocks at `height` across every branch, in insertion order
    pub fn get_blocks_at_height(&self, height: u64) -> Vec<&Block> {
        self.heights
            .get(&height)
            .map(|hashes| hashes.iter().map(|h| &self.records[h].block).collect())
            .unwrap_or_default()
    }

    pub fn get_cumulative_work(&self, block_hash: &Hash256) -> Option<f64> {
        self.records.get(block_hash).map(|r| r.cumulative_work)
    }

    pub fn get_block(&self, block_hash: &Hash256) -> Option<&Block> {
        self.records.get(block_hash).map(|r| &r.block)
    }

    pub fn get_height(&self, block_hash: &Hash256) -> Option<u64> {
        self.records.get(block_hash).map(|r| r.height)
    }

    /// Ledger after applying `block_hash` and all its ancestors
    pub fn get_utxo_set(&self, block_hash: &Hash256) -> Option<&UtxoSet> {
        self.records.get(block_hash).map(|r| &r.utxo_set)
    }

    pub fn get_record(&self, block_hash: &Hash256) -> Option<&BlockRecord> {
        self.records.get(block_hash)
    }

    pub fn contains(&self, block_hash: &Hash256) -> bool {
        self.records.contains_key(block_hash)
    }

    /// Number of stored blocks, genesis included
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Path from `block_hash` back to genesis, newest first
    pub fn ancestors(&self, block_hash: &Hash256) -> Vec<&Block> {
        let mut path = Vec::new();
        let mut cursor = self.records.get(block_hash);
        while let Some(record) = cursor {
            path.push(&record.block);
            if record.height == 0 {
                break;
            }
            cursor = self.records.get(&record.block.parent_hash());
        }
        path
    }

    /// Genesis → tip
    pub fn best_chain(&self) -> Vec<&Block> {
        let mut chain = self.ancestors(&self.tip);
        chain.reverse();
        chain
    }
}
