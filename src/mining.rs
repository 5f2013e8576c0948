//! Nonce search and block assembly

use std::time::{SystemTime, UNIX_EPOCH};

use crate::block::Block;
use crate::transaction::{Output, Transaction};
use crate::types::Hash256;

/// Result of a bounded mining attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MiningResult {
    Found { nonce: u64, hash: Hash256 },
    Exhausted { attempts: u64 },
}

/// MineBlock: set the target, then try nonces 0, 1, 2, ... until hash < target
///
/// Unbounded: only returns once a solution exists. A target of 0 never
/// terminates; use [`mine_block_bounded`] when that cannot be ruled out.
pub fn mine_block(block: &mut Block, target: Hash256) {
    block.set_target(target);
    block.set_nonce(0);
    loop {
        if block.hash() < target {
            return;
        }
        block.set_nonce(block.nonce().wrapping_add(1));
    }
}

/// MineBlock with a budget of `max_attempts` nonces starting at 0
///
/// On exhaustion the block keeps the last nonce tried.
pub fn mine_block_bounded(block: &mut Block, target: Hash256, max_attempts: u64) -> MiningResult {
    block.set_target(target);
    for nonce in 0..max_attempts {
        block.set_nonce(nonce);
        let hash = block.hash();
        if hash < target {
            log::trace!("solved block after {} attempts", nonce + 1);
            return MiningResult::Found { nonce, hash };
        }
    }
    log::trace!("no nonce below target within {} attempts", max_attempts);
    MiningResult::Exhausted {
        attempts: max_attempts,
    }
}

/// Mint transaction paying `outputs`
pub fn create_coinbase(outputs: Vec<Output>, payload: Option<Vec<u8>>) -> Transaction {
    Transaction::coinbase(outputs, payload)
}

/// CreateNewBlock: coinbase first, then `transactions` in order
///
/// The block is returned unmined.
pub fn create_new_block(
    parent_hash: Hash256,
    timestamp: u64,
    coinbase: Transaction,
    transactions: Vec<Transaction>,
) -> Block {
    let mut contents = Vec::with_capacity(transactions.len() + 1);
    contents.push(coinbase);
    contents.extend(transactions);

    let mut block = Block::new(parent_hash, timestamp);
    block.set_contents(contents);
    block
}

/// Seconds since the Unix epoch, 0 if the clock is before it
pub fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::MAX_TARGET;

    #[test]
    fn test_mine_block_resets_nonce() {
        let mut block = Block::new(Hash256::zero(), 0);
        block.set_nonce(12345);
        mine_block(&mut block, MAX_TARGET);
        assert!(block.nonce() < 12345);
        assert!(block.hash() < MAX_TARGET);
    }

    #[test]
    fn test_mine_block_bounded_success() {
        let mut block = Block::new(Hash256::zero(), 0);
        let target = MAX_TARGET >> 4;
        match mine_block_bounded(&mut block, target, 10_000) {
            MiningResult::Found { nonce, hash } => {
                assert_eq!(block.nonce(), nonce);
                assert_eq!(block.hash(), hash);
                assert!(hash < target);
            }
            MiningResult::Exhausted { .. } => panic!("1-in-16 target should be found"),
        }
    }

    #[test]
    fn test_mine_block_bounded_exhausted() {
        let mut block = Block::new(Hash256::zero(), 0);
        let result = mine_block_bounded(&mut block, Hash256::zero(), 50);
        assert_eq!(result, MiningResult::Exhausted { attempts: 50 });
        assert_eq!(block.nonce(), 49);
    }

    #[test]
    fn test_mine_block_bounded_zero_attempts() {
        let mut block = Block::new(Hash256::zero(), 0);
        let result = mine_block_bounded(&mut block, MAX_TARGET, 0);
        assert_eq!(result, MiningResult::Exhausted { attempts: 0 });
    }

    #[test]
    fn test_create_new_block_puts_coinbase_first() {
        let coinbase = create_coinbase(vec![Output::unlocked(50)], Some(b"height 1".to_vec()));
        let other = Transaction::coinbase(vec![Output::unlocked(1)], None);
        let block = create_new_block(Hash256::one(), 7, coinbase.clone(), vec![other]);

        assert_eq!(block.parent_hash(), Hash256::one());
        assert_eq!(block.timestamp(), 7);
        assert_eq!(block.transactions().len(), 2);
        assert_eq!(block.transactions()[0].hash(), coinbase.hash());
    }

    #[test]
    fn test_current_timestamp() {
        assert!(current_timestamp() > 1_600_000_000);
    }
}
