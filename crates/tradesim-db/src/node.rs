//! Node model for the hash tree.
//!
//! Nodes live in the tree's arena and refer to their children by
//! [`NodeId`]. A node owns its subtree exclusively: every id appears as a
//! child link at most once and there are no parent links. Outside the crate
//! nodes are read through [`NodeRef`], a borrowed view that can walk to its
//! children but never mutate colour or links.

use std::fmt;

use serde::{Deserialize, Serialize};

use tradesim_types::{Transaction, TxnHash, TxnKind};

use crate::tree::HashTree;

/// Stable handle to a node in a [`HashTree`] arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    pub(crate) fn index(self) -> usize {
        self.0
    }
}

/// Colour of the link from a node to its parent.
///
/// A red link glues a node to its parent; it has not yet been absorbed into
/// the black height of the tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    Red,
    Black,
}

impl Color {
    /// Returns `true` for [`Color::Red`].
    pub fn is_red(self) -> bool {
        self == Self::Red
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Red => write!(f, "RED"),
            Self::Black => write!(f, "BLACK"),
        }
    }
}

/// The transaction a node records: its content hash and kind tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TxnRef {
    pub hash: TxnHash,
    pub kind: TxnKind,
}

impl TxnRef {
    /// Capture the hash and kind of a transaction.
    pub fn of<T: Transaction + ?Sized>(txn: &T) -> Self {
        Self {
            hash: txn.content_hash(),
            kind: txn.kind(),
        }
    }
}

/// Arena entry. The sort key is the recorded transaction's hash.
#[derive(Clone, Debug)]
pub(crate) struct Node {
    pub(crate) txn: TxnRef,
    pub(crate) color: Color,
    pub(crate) left: Option<NodeId>,
    pub(crate) right: Option<NodeId>,
}

impl Node {
    /// New nodes always enter the tree red.
    pub(crate) fn leaf(txn: TxnRef) -> Self {
        Self {
            txn,
            color: Color::Red,
            left: None,
            right: None,
        }
    }

    pub(crate) fn key(&self) -> &TxnHash {
        &self.txn.hash
    }
}

/// Read-only view of a node inside a [`HashTree`].
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    tree: &'a HashTree,
    handle: NodeId,
}

impl<'a> NodeRef<'a> {
    pub(crate) fn new(tree: &'a HashTree, handle: NodeId) -> Self {
        Self { tree, handle }
    }

    fn node(&self) -> &'a Node {
        self.tree.node(self.handle)
    }

    /// Arena handle of this node.
    pub fn handle(&self) -> NodeId {
        self.handle
    }

    /// Sort key: the content hash of the recorded transaction.
    pub fn id(&self) -> &'a TxnHash {
        self.node().key()
    }

    /// The recorded transaction reference.
    pub fn txn(&self) -> TxnRef {
        self.node().txn
    }

    /// Colour of the link to this node's parent.
    pub fn color(&self) -> Color {
        self.node().color
    }

    /// Returns `true` if the link to this node's parent is red.
    pub fn is_red(&self) -> bool {
        self.color().is_red()
    }

    /// Left child, if any.
    pub fn left(&self) -> Option<NodeRef<'a>> {
        self.node().left.map(|id| NodeRef::new(self.tree, id))
    }

    /// Right child, if any.
    pub fn right(&self) -> Option<NodeRef<'a>> {
        self.node().right.map(|id| NodeRef::new(self.tree, id))
    }

    /// Returns `true` if this node has no children.
    pub fn is_leaf(&self) -> bool {
        let node = self.node();
        node.left.is_none() && node.right.is_none()
    }
}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", self.id())
            .field("color", &self.color())
            .field("kind", &self.txn().kind)
            .finish()
    }
}
