//! Binary Merkle tree over content hashes
//!
//! Pairs are combined as `sha256(left ‖ right)` over 32-byte big-endian
//! values. An odd level is padded with a literal zero hash, never by
//! duplicating the last node. An empty tree has root 0 and a single leaf
//! is its own root.

use crate::encoding::sha256_pair;
use crate::types::Hash256;

/// Anything committed into a Merkle tree
pub trait Hashable {
    fn content_hash(&self) -> Hash256;
}

impl Hashable for Hash256 {
    fn content_hash(&self) -> Hash256 {
        *self
    }
}

#[derive(Debug, Clone)]
pub struct MerkleTree<T> {
    items: Vec<T>,
    leaves: Vec<Hash256>,
    root: Hash256,
}

impl<T: Hashable> MerkleTree<T> {
    pub fn new(items: Vec<T>) -> Self {
        let leaves: Vec<Hash256> = items.iter().map(Hashable::content_hash).collect();
        let root = calculate_merkle_root(&leaves);
        Self {
            items,
            leaves,
            root,
        }
    }

    pub fn root(&self) -> Hash256 {
        self.root
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn leaf_hashes(&self) -> &[Hash256] {
        &self.leaves
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Inclusion proof for the leaf at `index`
    pub fn proof(&self, index: usize) -> Option<MerkleProof> {
        if index >= self.leaves.len() {
            return None;
        }

        let mut siblings = Vec::new();
        let mut level = self.leaves.clone();
        let mut position = index;
        while level.len() > 1 {
            let sibling_index = position ^ 1;
            let sibling = level.get(sibling_index).copied().unwrap_or_else(Hash256::zero);
            siblings.push(sibling);
            level = next_level(&level);
            position /= 2;
        }

        Some(MerkleProof { index, siblings })
    }
}

impl<T: Hashable> Default for MerkleTree<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

/// Sibling hashes from a leaf up to (excluding) the root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerkleProof {
    pub index: usize,
    pub siblings: Vec<Hash256>,
}

impl MerkleProof {
    pub fn verify(&self, leaf: Hash256, root: Hash256) -> bool {
        let mut acc = leaf;
        let mut position = self.index;
        for sibling in &self.siblings {
            acc = if position % 2 == 0 {
                sha256_pair(&acc, sibling)
            } else {
                sha256_pair(sibling, &acc)
            };
            position /= 2;
        }
        position == 0 && acc == root
    }
}

/// Root of the tree whose leaves are `leaves`, in order
pub fn calculate_merkle_root(leaves: &[Hash256]) -> Hash256 {
    if leaves.is_empty() {
        return Hash256::zero();
    }

    let mut level = leaves.to_vec();
    while level.len() > 1 {
        level = next_level(&level);
    }
    level[0]
}

fn next_level(level: &[Hash256]) -> Vec<Hash256> {
    level
        .chunks(2)
        .map(|pair| match pair {
            [left, right] => sha256_pair(left, right),
            [left] => sha256_pair(left, &Hash256::zero()),
            _ => unreachable!("chunks(2) yields one or two hashes"),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Hash256 {
        Hash256::from_dec_str(s).unwrap()
    }

    fn hex(s: &str) -> Hash256 {
        Hash256::from_str_radix(s, 16).unwrap()
    }

    #[test]
    fn test_empty_root_is_zero() {
        let tree: MerkleTree<Hash256> = MerkleTree::new(vec![]);
        assert_eq!(tree.root(), Hash256::zero());
        assert!(tree.proof(0).is_none());
    }

    #[test]
    fn test_single_leaf_is_root() {
        let leaf = dec("106874969902263813231722716312951672277654786095989753245644957127312510061509");
        let tree = MerkleTree::new(vec![leaf]);
        assert_eq!(
            tree.root(),
            hex("ec4916dd28fc4c10d78e287ca5d9cc51ee1ae73cbfde08c6b37324cbfaac8bc5")
        );
    }

    #[test]
    fn test_three_leaves_pad_with_zero() {
        let tree = MerkleTree::new(vec![
            dec("106874969902263813231722716312951672277654786095989753245644957127312510061509"),
            dec("66221123338548294768926909213040317907064779196821799240800307624498097778386"),
            dec("98188062817386391176748233602659695679763360599522475501622752979264247167302"),
        ]);
        assert_eq!(
            tree.root(),
            hex("ea670d796aa1f950025c4d9e7caf6b92a5c56ebeb37b95b072ca92bc99011c20")
        );
    }

    #[test]
    fn test_padding_is_zero_not_duplicate() {
        let a = Hash256::from(1u64);
        let b = Hash256::from(2u64);
        let c = Hash256::from(3u64);

        let expected = sha256_pair(&sha256_pair(&a, &b), &sha256_pair(&c, &Hash256::zero()));
        let duplicated = sha256_pair(&sha256_pair(&a, &b), &sha256_pair(&c, &c));

        let root = calculate_merkle_root(&[a, b, c]);
        assert_eq!(root, expected);
        assert_ne!(root, duplicated);
    }

    #[test]
    fn test_order_changes_root() {
        let a = Hash256::from(10u64);
        let b = Hash256::from(20u64);
        assert_ne!(calculate_merkle_root(&[a, b]), calculate_merkle_root(&[b, a]));
        assert_eq!(calculate_merkle_root(&[a, b]), calculate_merkle_root(&[a, b]));
    }

    #[test]
    fn test_proofs_verify_for_every_leaf() {
        let leaves: Vec<Hash256> = (1u64..=5).map(Hash256::from).collect();
        let tree = MerkleTree::new(leaves.clone());
        for (i, leaf) in leaves.iter().enumerate() {
            let proof = tree.proof(i).unwrap();
            assert_eq!(proof.siblings.len(), 3);
            assert!(proof.verify(*leaf, tree.root()));
            assert!(!proof.verify(Hash256::from(99u64), tree.root()));
        }
        assert!(tree.proof(5).is_none());
    }

    #[test]
    fn test_single_leaf_proof_is_empty() {
        let leaf = Hash256::from(42u64);
        let tree = MerkleTree::new(vec![leaf]);
        let proof = tree.proof(0).unwrap();
        assert!(proof.siblings.is_empty());
        assert!(proof.verify(leaf, tree.root()));
    }
}
