//! Content-addressed hash tree for the tradesim transaction log.
//!
//! Transactions are keyed by the hex form of their SHA-256 content hash and
//! kept in a left-leaning red-black (LLRB) tree, giving logarithmic insertion
//! and lookup. Every node also yields an audit digest over its subtree, so
//! the root digest changes whenever any recorded key does.
//!
//! # Invariants
//!
//! After every insertion:
//! - Left subtree keys are strictly less than a node's key; right subtree keys
//!   are greater than or equal to it.
//! - No right child is red.
//! - No left child and its own left child are both red.
//! - Every path from the root to an empty link crosses the same number of
//!   black nodes.
//! - The root is black and `size` equals the number of reachable nodes.
//!
//! [`TreeValidator`] checks all of these and reports each violation.

pub mod config;
pub mod error;
pub mod node;
pub mod shared;
pub mod tree;
pub mod verify;

pub use config::{CollisionPolicy, TreeConfig};
pub use error::{DbResult, TreeError};
pub use node::{Color, NodeId, NodeRef, TxnRef};
pub use shared::SharedHashTree;
pub use tree::{HashTree, Iter};
pub use verify::{TreeValidator, ValidationReport, Violation, ViolationKind};
