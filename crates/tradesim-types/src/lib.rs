//! Foundation types for the tradesim transaction log.
//!
//! The hash tree in `tradesim-db` only needs two things from a transaction:
//! its content hash and its kind. This crate defines both, the
//! [`Transaction`] capability that exposes them, and the concrete trade
//! records produced by the market simulation.
//!
//! # Key Types
//!
//! - [`TxnHash`] — SHA-256 content hash; its hex form is the tree sort key
//! - [`TxnKind`] — Transaction discriminator for downstream classification
//! - [`Transaction`] — Capability consumed by the hash tree
//! - [`TradeTransaction`] — Credit/debit pair recorded by the simulation
//! - [`SyntheticTransaction`] — Hash-only transaction for fixtures and load tests

pub mod error;
pub mod hash;
pub mod synthetic;
pub mod trade;
pub mod transaction;

pub use error::TypeError;
pub use hash::TxnHash;
pub use synthetic::SyntheticTransaction;
pub use trade::{Item, TradeTransaction, TransactionRecord};
pub use transaction::{Transaction, TxnKind};
