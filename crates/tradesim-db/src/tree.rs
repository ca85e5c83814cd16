//! The hash tree and its insertion engine.
//!
//! [`HashTree`] stores nodes in an arena (`Vec<Node>`) and links them by
//! [`NodeId`], so rotations only reassign handles. Insertion descends from
//! the root by key, places a red leaf, then repairs the path bottom-up with
//! the left-leaning red-black rules. Nodes are never removed; the arena
//! only grows.

use std::cmp::Ordering;

use tracing::{debug, error, warn};

use tradesim_crypto::node_digest;
use tradesim_types::{Transaction, TxnHash};

use crate::config::{CollisionPolicy, TreeConfig};
use crate::error::{DbResult, TreeError};
use crate::node::{Color, Node, NodeId, NodeRef, TxnRef};
use crate::verify::{TreeValidator, ValidationReport};

/// Self-balancing binary search tree of transactions keyed by content hash.
///
/// Not synchronized: a single writer must own it. Wrap it in
/// [`SharedHashTree`](crate::SharedHashTree) to share it between threads.
#[derive(Clone, Debug, Default)]
pub struct HashTree {
    nodes: Vec<Node>,
    root: Option<NodeId>,
    size: u64,
    config: TreeConfig,
}

impl HashTree {
    /// Create an empty tree with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty tree with the given configuration.
    pub fn with_config(config: TreeConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// The configuration this tree was created with.
    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// Number of transactions inserted.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Returns `true` if nothing has been inserted.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// The root node, absent when the tree is empty.
    pub fn root(&self) -> Option<NodeRef<'_>> {
        self.root.map(|id| NodeRef::new(self, id))
    }

    /// Resolve a handle obtained from this tree.
    pub fn node_ref(&self, handle: NodeId) -> Option<NodeRef<'_>> {
        (handle.index() < self.nodes.len()).then(|| NodeRef::new(self, handle))
    }

    pub(crate) fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    // ---------------------------------------------------------------
    // Insertion
    // ---------------------------------------------------------------

    /// Record a transaction.
    ///
    /// The transaction's content hash becomes the node key. Under
    /// [`CollisionPolicy::TieBreakRight`] this never fails; under
    /// [`CollisionPolicy::Reject`] a key that is already present returns
    /// [`TreeError::DuplicateKey`] and the tree is left untouched.
    pub fn insert<T: Transaction + ?Sized>(&mut self, txn: &T) -> DbResult<()> {
        let txn = TxnRef::of(txn);

        if self.contains(&txn.hash) {
            match self.config.collision_policy {
                CollisionPolicy::Reject => {
                    warn!(key = %txn.hash.short_hex(), "rejected duplicate transaction key");
                    return Err(TreeError::DuplicateKey(txn.hash));
                }
                CollisionPolicy::TieBreakRight => {
                    warn!(key = %txn.hash.short_hex(), "key collision, ordering duplicate to the right");
                }
            }
        }

        let root = self.insert_at(self.root, txn);
        self.node_mut(root).color = Color::Black;
        self.root = Some(root);
        self.size += 1;

        debug!(
            key = %txn.hash.short_hex(),
            kind = %txn.kind,
            size = self.size,
            "inserted transaction"
        );

        if self.config.verify_on_insert {
            let report = self.validate();
            for violation in &report.violations {
                error!(
                    kind = ?violation.kind,
                    key = ?violation.key,
                    "hash tree invariant violated: {}",
                    violation.description
                );
            }
        }

        Ok(())
    }

    fn alloc(&mut self, txn: TxnRef) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(Node::leaf(txn));
        id
    }

    /// Insert into the subtree at `link` and return its new root.
    fn insert_at(&mut self, link: Option<NodeId>, txn: TxnRef) -> NodeId {
        let Some(h) = link else {
            return self.alloc(txn);
        };

        // Ties go right.
        if txn.hash < *self.node(h).key() {
            let left = self.node(h).left;
            let left = self.insert_at(left, txn);
            self.node_mut(h).left = Some(left);
        } else {
            let right = self.node(h).right;
            let right = self.insert_at(right, txn);
            self.node_mut(h).right = Some(right);
        }

        self.balance(h)
    }

    /// Local repair on the way back up. The order of the three steps matters.
    fn balance(&mut self, mut h: NodeId) -> NodeId {
        if self.is_red(self.node(h).right) && !self.is_red(self.node(h).left) {
            h = self.rotate_left(h);
        }

        let left = self.node(h).left;
        if self.is_red(left) && self.is_red(left.and_then(|l| self.node(l).left)) {
            h = self.rotate_right(h);
        }

        if self.is_red(self.node(h).left) && self.is_red(self.node(h).right) {
            self.flip_colors(h);
        }

        h
    }

    fn is_red(&self, link: Option<NodeId>) -> bool {
        link.is_some_and(|id| self.node(id).color.is_red())
    }

    /// Promote the right child of `h`; `h` becomes its left child.
    fn rotate_left(&mut self, h: NodeId) -> NodeId {
        let Some(x) = self.node(h).right else {
            return h;
        };
        let inner = self.node(x).left;
        let color = self.node(h).color;

        self.node_mut(h).right = inner;
        self.node_mut(x).left = Some(h);
        self.node_mut(x).color = color;
        self.node_mut(h).color = Color::Red;
        x
    }

    /// Promote the left child of `h`; `h` becomes its right child.
    fn rotate_right(&mut self, h: NodeId) -> NodeId {
        let Some(x) = self.node(h).left else {
            return h;
        };
        let inner = self.node(x).right;
        let color = self.node(h).color;

        self.node_mut(h).left = inner;
        self.node_mut(x).right = Some(h);
        self.node_mut(x).color = color;
        self.node_mut(h).color = Color::Red;
        x
    }

    /// Push one unit of black height up: children turn black, `h` turns red.
    fn flip_colors(&mut self, h: NodeId) {
        let (left, right) = (self.node(h).left, self.node(h).right);
        for child in [left, right].into_iter().flatten() {
            self.node_mut(child).color = Color::Black;
        }
        self.node_mut(h).color = Color::Red;
    }

    // ---------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------

    /// Find the node recorded under `key`.
    ///
    /// When duplicates exist the one closest to the root is returned.
    pub fn get(&self, key: &TxnHash) -> Option<NodeRef<'_>> {
        let mut link = self.root;
        while let Some(id) = link {
            let node = self.node(id);
            link = match key.cmp(node.key()) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return Some(NodeRef::new(self, id)),
            };
        }
        None
    }

    /// Returns `true` if a transaction with this key is recorded.
    pub fn contains(&self, key: &TxnHash) -> bool {
        self.get(key).is_some()
    }

    /// Number of nodes on the longest root-to-leaf path (0 when empty).
    pub fn height(&self) -> usize {
        self.height_from(self.root)
    }

    fn height_from(&self, link: Option<NodeId>) -> usize {
        match link {
            None => 0,
            Some(id) => {
                let node = self.node(id);
                1 + self.height_from(node.left).max(self.height_from(node.right))
            }
        }
    }

    /// Number of black nodes on the path from the root to its leftmost
    /// empty link. Equal for every root-to-empty path in a balanced tree.
    pub fn black_height(&self) -> usize {
        let mut count = 0;
        let mut link = self.root;
        while let Some(id) = link {
            let node = self.node(id);
            if !node.color.is_red() {
                count += 1;
            }
            link = node.left;
        }
        count
    }

    /// Depth-first, in-order walk (left, node, right).
    ///
    /// `visit` is also called with `None` at every empty link, so an empty
    /// tree visits exactly one `None`. Stops and returns `false` as soon as
    /// `visit` does.
    pub fn traverse<F>(&self, mut visit: F) -> bool
    where
        F: FnMut(Option<NodeRef<'_>>) -> bool,
    {
        self.traverse_from(self.root, &mut visit)
    }

    fn traverse_from<F>(&self, link: Option<NodeId>, visit: &mut F) -> bool
    where
        F: FnMut(Option<NodeRef<'_>>) -> bool,
    {
        match link {
            None => visit(None),
            Some(id) => {
                let node = self.node(id);
                self.traverse_from(node.left, visit)
                    && visit(Some(NodeRef::new(self, id)))
                    && self.traverse_from(node.right, visit)
            }
        }
    }

    /// In-order iterator over all nodes, in ascending key order.
    pub fn iter(&self) -> Iter<'_> {
        let mut iter = Iter {
            tree: self,
            stack: Vec::new(),
        };
        iter.push_left_spine(self.root);
        iter
    }

    // ---------------------------------------------------------------
    // Integrity
    // ---------------------------------------------------------------

    /// Audit digest of the whole tree, absent when the tree is empty.
    ///
    /// Commits to every key and to the tree's shape.
    pub fn audit_digest(&self) -> Option<TxnHash> {
        self.digest_from(self.root)
    }

    fn digest_from(&self, link: Option<NodeId>) -> Option<TxnHash> {
        let node = self.node(link?);
        let left = self.digest_from(node.left);
        let right = self.digest_from(node.right);
        Some(node_digest(left.as_ref(), node.key(), right.as_ref()))
    }

    /// Check every structural invariant. See [`TreeValidator`].
    pub fn validate(&self) -> ValidationReport {
        TreeValidator::validate(self)
    }
}

impl<'a> IntoIterator for &'a HashTree {
    type Item = NodeRef<'a>;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// In-order iterator over a [`HashTree`].
pub struct Iter<'a> {
    tree: &'a HashTree,
    stack: Vec<NodeId>,
}

impl Iter<'_> {
    fn push_left_spine(&mut self, mut link: Option<NodeId>) {
        while let Some(id) = link {
            self.stack.push(id);
            link = self.tree.node(id).left;
        }
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = NodeRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        self.push_left_spine(self.tree.node(id).right);
        Some(NodeRef::new(self.tree, id))
    }
}
