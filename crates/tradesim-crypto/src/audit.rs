//! Audit digests for hash tree nodes.
//!
//! A node's digest commits to its own key and to the digests of both of its
//! subtrees, so the digest at the root commits to every key in the tree and
//! to the tree's shape. Absent subtrees contribute the zero hash.

use tradesim_types::TxnHash;

use crate::hasher::ContentHasher;

/// Digest of a node given its key and its children's digests.
pub fn node_digest(left: Option<&TxnHash>, id: &TxnHash, right: Option<&TxnHash>) -> TxnHash {
    let zero = TxnHash::zero();
    let left = left.unwrap_or(&zero);
    let right = right.unwrap_or(&zero);
    ContentHasher::NODE.hash_parts(&[
        left.as_bytes().as_slice(),
        id.as_bytes().as_slice(),
        right.as_bytes().as_slice(),
    ])
}
