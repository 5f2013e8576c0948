//! Core ledger types shared by every validation layer

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::transaction::Output;

/// 256-bit hash or target, compared as a big-endian unsigned integer
pub type Hash256 = primitive_types::U256;

/// Coin amount
pub type Amount = u64;

/// Reference to a transaction output: (txHash, outputIndex)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OutPoint {
    pub tx_hash: Hash256,
    pub index: u64,
}

impl OutPoint {
    pub fn new(tx_hash: Hash256, index: u64) -> Self {
        Self { tx_hash, index }
    }
}

impl fmt::Display for OutPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}:{}", self.tx_hash, self.index)
    }
}

/// One value handed to a spend condition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Arg {
    Int(i64),
    Bytes(Vec<u8>),
    Text(String),
}

impl From<i64> for Arg {
    fn from(value: i64) -> Self {
        Arg::Int(value)
    }
}

impl From<Vec<u8>> for Arg {
    fn from(value: Vec<u8>) -> Self {
        Arg::Bytes(value)
    }
}

impl From<&[u8]> for Arg {
    fn from(value: &[u8]) -> Self {
        Arg::Bytes(value.to_vec())
    }
}

impl From<&str> for Arg {
    fn from(value: &str) -> Self {
        Arg::Text(value.to_string())
    }
}

/// UTXO Set: OutPoint → Output
///
/// Persistent map: cloning is O(1) and a child snapshot shares every
/// untouched entry with its parent.
pub type UtxoSet = im::HashMap<OutPoint, Output>;

/// Interpret a 32-byte digest as a big-endian integer
pub fn hash_from_digest(bytes: &[u8; 32]) -> Hash256 {
    Hash256::from_big_endian(bytes)
}

/// Big-endian 32-byte representation of a hash
pub fn hash_to_bytes(hash: &Hash256) -> [u8; 32] {
    hash.to_big_endian()
}
