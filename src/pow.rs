//! Proof of work and chain work

use crate::types::Hash256;

/// CheckProofOfWork: hash < target
pub fn check_proof_of_work(hash: &Hash256, target: &Hash256) -> bool {
    hash < target
}

/// Work: relative difficulty of `target` measured against the genesis target
///
/// work(t) = genesis_target / t, +∞ when t = 0. Only meaningful when
/// comparing branches of the same chain.
pub fn work(genesis_target: &Hash256, target: &Hash256) -> f64 {
    if target.is_zero() {
        return f64::INFINITY;
    }
    u256_to_f64(genesis_target) / u256_to_f64(target)
}

/// Nearest f64 to a 256-bit integer
pub fn u256_to_f64(value: &Hash256) -> f64 {
    const WORD: f64 = 18_446_744_073_709_551_616.0; // 2^64
    value
        .0
        .iter()
        .rev()
        .fold(0.0, |acc, word| acc * WORD + *word as f64)
}
