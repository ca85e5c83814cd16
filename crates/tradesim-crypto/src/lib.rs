//! Hashing primitives for the tradesim transaction log.
//!
//! Provides domain-separated SHA-256 hashing and the per-node audit digest
//! that makes the hash tree tamper-evident.
//!
//! SHA-256 comes from `sha2`; nothing here implements a primitive itself.

pub mod audit;
pub mod hasher;

pub use audit::node_digest;
pub use hasher::ContentHasher;
