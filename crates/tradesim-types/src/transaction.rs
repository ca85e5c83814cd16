use std::fmt;

use serde::{Deserialize, Serialize};

use crate::hash::TxnHash;

/// Discriminator for the kind of transaction recorded.
///
/// Carried alongside each entry for downstream classification. The hash
/// tree never consults it when ordering or balancing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TxnKind {
    /// A credit/debit exchange between two traders.
    Trade,
    /// Generated content with no market counterpart (fixtures, load tests).
    Synthetic,
}

impl fmt::Display for TxnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Trade => write!(f, "Trade"),
            Self::Synthetic => write!(f, "Synthetic"),
        }
    }
}

/// Anything that can be recorded in the hash tree.
///
/// Implementors must return the same hash for the same content every time.
pub trait Transaction {
    /// Deterministic content hash of this transaction.
    fn content_hash(&self) -> TxnHash;

    /// The kind of this transaction.
    fn kind(&self) -> TxnKind;
}

impl<T: Transaction + ?Sized> Transaction for &T {
    fn content_hash(&self) -> TxnHash {
        (**self).content_hash()
    }

    fn kind(&self) -> TxnKind {
        (**self).kind()
    }
}
