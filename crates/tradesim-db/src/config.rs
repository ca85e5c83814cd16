use serde::{Deserialize, Serialize};

use crate::error::{DbResult, TreeError};

/// What to do when an inserted transaction's key is already recorded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    /// Accept the duplicate and order it as greater than or equal to the
    /// existing entry, so it lands in that entry's right subtree.
    #[default]
    TieBreakRight,
    /// Refuse the duplicate with [`TreeError::DuplicateKey`], leaving the
    /// tree unchanged.
    Reject,
}

/// Configuration for a [`HashTree`](crate::HashTree).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    /// Handling of duplicate keys.
    pub collision_policy: CollisionPolicy,
    /// Run the full invariant check after every insertion and log any
    /// violation. Linear in tree size, so meant for debugging and tests.
    pub verify_on_insert: bool,
}

impl TreeConfig {
    /// Rejects duplicate keys and verifies every insertion.
    ///
    /// Suited to audit logs that must guarantee one entry per content hash.
    pub fn strict() -> Self {
        Self {
            collision_policy: CollisionPolicy::Reject,
            verify_on_insert: true,
        }
    }

    /// Parse a configuration from TOML. Missing keys take their defaults.
    pub fn from_toml_str(s: &str) -> DbResult<Self> {
        toml::from_str(s).map_err(|e| TreeError::InvalidConfig(e.to_string()))
    }
}
