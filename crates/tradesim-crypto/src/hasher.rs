use sha2::{Digest, Sha256};
use tradesim_types::TxnHash;

/// Domain-separated SHA-256 hasher.
///
/// The domain tag (e.g., `"tradesim-node-v1"`) is prepended to every hash
/// computation. An audit digest can therefore never collide with a
/// transaction content hash, which is the bare [`TxnHash::digest`] of the
/// canonical content.
pub struct ContentHasher {
    domain: &'static str,
}

impl ContentHasher {
    /// Hasher for hash tree audit digests.
    pub const NODE: Self = Self {
        domain: "tradesim-node-v1",
    };

    /// Hash a sequence of byte slices as if concatenated, with domain separation.
    pub fn hash_parts(&self, parts: &[&[u8]]) -> TxnHash {
        let mut hasher = Sha256::new();
        hasher.update(self.domain.as_bytes());
        hasher.update(b":");
        for part in parts {
            hasher.update(part);
        }
        TxnHash::from_hash(hasher.finalize().into())
    }
}
