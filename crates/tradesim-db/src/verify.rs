use std::fmt;

use tradesim_types::TxnHash;

use crate::node::{Color, NodeRef};
use crate::tree::HashTree;

/// Result of a full structural check of a [`HashTree`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationReport {
    /// Insertion counter of the tree.
    pub size: u64,
    /// Nodes actually reachable from the root.
    pub reachable: u64,
    /// Longest root-to-leaf path, in nodes.
    pub height: usize,
    /// Black nodes per root-to-empty path, if every path agrees.
    pub black_height: Option<usize>,
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    /// Returns `true` if all checks passed.
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// Returns `true` if any violation of `kind` was found.
    pub fn has(&self, kind: ViolationKind) -> bool {
        self.violations.iter().any(|v| v.kind == kind)
    }
}

/// A specific invariant violation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Violation {
    /// Key of the node where the violation was detected, if node-local.
    pub key: Option<TxnHash>,
    pub kind: ViolationKind,
    pub description: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ViolationKind {
    /// A left-subtree key is not strictly less than an ancestor's key, or a
    /// right-subtree key is less than an ancestor's key.
    Ordering,
    /// A right child is red.
    RightLeaningRed,
    /// A left child and its left child are both red.
    ConsecutiveRed,
    /// Two root-to-empty paths cross different numbers of black nodes.
    BlackImbalance,
    /// The root is red.
    RedRoot,
    /// The insertion counter disagrees with the reachable node count.
    SizeMismatch,
    /// Height exceeds 2·log2(N+1).
    HeightBound,
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ordering => write!(f, "Ordering"),
            Self::RightLeaningRed => write!(f, "RightLeaningRed"),
            Self::ConsecutiveRed => write!(f, "ConsecutiveRed"),
            Self::BlackImbalance => write!(f, "BlackImbalance"),
            Self::RedRoot => write!(f, "RedRoot"),
            Self::SizeMismatch => write!(f, "SizeMismatch"),
            Self::HeightBound => write!(f, "HeightBound"),
        }
    }
}

/// Structural validator for hash trees.
pub struct TreeValidator;

/// State accumulated over one walk of the tree.
#[derive(Default)]
struct Walk {
    reachable: u64,
    height: usize,
    black_height: Option<usize>,
    balanced: bool,
    violations: Vec<Violation>,
}

impl TreeValidator {
    /// Check every invariant of `tree`.
    ///
    /// Ordering is checked against all ancestors, not only the parent: each
    /// node must lie inside the key range its position implies.
    pub fn validate(tree: &HashTree) -> ValidationReport {
        let mut walk = Walk {
            balanced: true,
            ..Walk::default()
        };

        match tree.root() {
            None => walk.black_height = Some(0),
            Some(root) => {
                if root.is_red() {
                    walk.violations.push(Violation {
                        key: Some(*root.id()),
                        kind: ViolationKind::RedRoot,
                        description: "root is red".into(),
                    });
                }
                Self::check(Some(root), None, None, 0, 0, &mut walk);
            }
        }

        if walk.reachable != tree.size() {
            walk.violations.push(Violation {
                key: None,
                kind: ViolationKind::SizeMismatch,
                description: format!(
                    "size is {}, but {} nodes are reachable",
                    tree.size(),
                    walk.reachable
                ),
            });
        }

        let bound = 2.0 * ((walk.reachable + 1) as f64).log2();
        if walk.height as f64 > bound {
            walk.violations.push(Violation {
                key: None,
                kind: ViolationKind::HeightBound,
                description: format!(
                    "height {} exceeds 2*log2(n+1) = {bound:.2} for n = {}",
                    walk.height, walk.reachable
                ),
            });
        }

        ValidationReport {
            size: tree.size(),
            reachable: walk.reachable,
            height: walk.height,
            black_height: if walk.balanced { walk.black_height } else { None },
            violations: walk.violations,
        }
    }

    /// `lower` is an inclusive bound inherited from a right turn, `upper` an
    /// exclusive bound inherited from a left turn.
    fn check(
        link: Option<NodeRef<'_>>,
        lower: Option<&TxnHash>,
        upper: Option<&TxnHash>,
        blacks: usize,
        depth: usize,
        walk: &mut Walk,
    ) {
        let Some(node) = link else {
            walk.height = walk.height.max(depth);
            match walk.black_height {
                None => walk.black_height = Some(blacks),
                Some(expected) if expected != blacks => {
                    walk.balanced = false;
                    walk.violations.push(Violation {
                        key: None,
                        kind: ViolationKind::BlackImbalance,
                        description: format!(
                            "path with {blacks} black nodes, expected {expected}"
                        ),
                    });
                }
                Some(_) => {}
            }
            return;
        };

        walk.reachable += 1;
        let key = node.id();

        if lower.is_some_and(|lo| key < lo) || upper.is_some_and(|hi| key >= hi) {
            walk.violations.push(Violation {
                key: Some(*key),
                kind: ViolationKind::Ordering,
                description: format!("key {} is outside its subtree range", key.short_hex()),
            });
        }

        let left = node.left();
        let right = node.right();

        if right.is_some_and(|r| r.is_red()) {
            walk.violations.push(Violation {
                key: Some(*key),
                kind: ViolationKind::RightLeaningRed,
                description: format!("node {} has a red right child", key.short_hex()),
            });
        }

        if let Some(l) = left {
            if l.is_red() && l.left().is_some_and(|ll| ll.is_red()) {
                walk.violations.push(Violation {
                    key: Some(*key),
                    kind: ViolationKind::ConsecutiveRed,
                    description: format!(
                        "node {} has two consecutive red left links below it",
                        key.short_hex()
                    ),
                });
            }
        }

        let blacks = blacks + usize::from(node.color() == Color::Black);
        Self::check(left, lower, Some(key), blacks, depth + 1, walk);
        Self::check(right, Some(key), upper, blacks, depth + 1, walk);
    }
}
