use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tradesim_types::{Transaction, TxnHash};

use crate::error::{DbResult, TreeError};
use crate::node::TxnRef;
use crate::tree::HashTree;
use crate::verify::ValidationReport;

/// Thread-safe handle to a [`HashTree`].
///
/// Insertions take the write lock, so there is exactly one writer at a time
/// and no reader ever observes a tree mid-rotation. Queries take the read
/// lock and may run concurrently with each other. Cloning the handle shares
/// the same tree.
#[derive(Clone, Debug, Default)]
pub struct SharedHashTree {
    inner: Arc<RwLock<HashTree>>,
}

impl SharedHashTree {
    /// Wrap an existing tree.
    pub fn new(tree: HashTree) -> Self {
        Self {
            inner: Arc::new(RwLock::new(tree)),
        }
    }

    fn read_lock(&self) -> DbResult<RwLockReadGuard<'_, HashTree>> {
        self.inner.read().map_err(|_| TreeError::LockPoisoned)
    }

    fn write_lock(&self) -> DbResult<RwLockWriteGuard<'_, HashTree>> {
        self.inner.write().map_err(|_| TreeError::LockPoisoned)
    }

    /// Record a transaction under the write lock.
    pub fn insert<T: Transaction + ?Sized>(&self, txn: &T) -> DbResult<()> {
        self.write_lock()?.insert(txn)
    }

    /// Run a read-only closure against the tree.
    pub fn read<R>(&self, f: impl FnOnce(&HashTree) -> R) -> DbResult<R> {
        let guard = self.read_lock()?;
        Ok(f(&*guard))
    }

    /// Number of transactions inserted.
    pub fn size(&self) -> DbResult<u64> {
        self.read(HashTree::size)
    }

    /// Look up the transaction recorded under `key`.
    pub fn get(&self, key: &TxnHash) -> DbResult<Option<TxnRef>> {
        self.read(|tree| tree.get(key).map(|node| node.txn()))
    }

    /// Returns `true` if a transaction with this key is recorded.
    pub fn contains(&self, key: &TxnHash) -> DbResult<bool> {
        self.read(|tree| tree.contains(key))
    }

    /// Audit digest of the whole tree.
    pub fn audit_digest(&self) -> DbResult<Option<TxnHash>> {
        self.read(HashTree::audit_digest)
    }

    /// Check every structural invariant.
    pub fn validate(&self) -> DbResult<ValidationReport> {
        self.read(HashTree::validate)
    }
}

impl From<HashTree> for SharedHashTree {
    fn from(tree: HashTree) -> Self {
        Self::new(tree)
    }
}
