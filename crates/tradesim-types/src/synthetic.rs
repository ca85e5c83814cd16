use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::hash::TxnHash;
use crate::transaction::{Transaction, TxnKind};

/// A transaction with no market content, identified only by its hash.
///
/// Used for fixtures, load tests, and benchmarks where the shape of the
/// hash tree matters but the trade details do not.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntheticTransaction {
    hash: TxnHash,
}

impl SyntheticTransaction {
    /// A transaction hashed from a fresh random UUID.
    pub fn random() -> Self {
        Self {
            hash: TxnHash::digest(Uuid::new_v4().to_string().as_bytes()),
        }
    }

    /// A deterministic transaction derived from a seed.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            hash: TxnHash::digest(&seed.to_be_bytes()),
        }
    }

    /// A transaction with an exact hash, e.g. to force a key collision.
    pub fn with_hash(hash: TxnHash) -> Self {
        Self { hash }
    }
}

impl Transaction for SyntheticTransaction {
    fn content_hash(&self) -> TxnHash {
        self.hash
    }

    fn kind(&self) -> TxnKind {
        TxnKind::Synthetic
    }
}
