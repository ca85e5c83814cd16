//! Trade records produced by the market simulation.
//!
//! A [`TradeTransaction`] pairs a credit leg and a debit leg. Its content
//! hash covers every field of both legs, so any change to an amount, price,
//! trader, or item yields a different tree key.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::hash::TxnHash;
use crate::transaction::{Transaction, TxnKind};

/// A tradable thing, identified independently of its name.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: Uuid,
    pub name: String,
}

impl Item {
    /// Create an item with a fresh random id.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
        }
    }
}

/// One leg of a trade: who moved how much of what, at what price.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub trader_id: Uuid,
    pub item: Item,
    pub price: f64,
    pub quantity: f64,
}

impl TransactionRecord {
    fn write_canonical(&self, out: &mut String) {
        out.push_str(&self.trader_id.to_string());
        out.push_str(&self.item.id.to_string());
        out.push_str(&self.item.name);
        out.push_str(&self.price.to_string());
        out.push_str(&self.quantity.to_string());
    }

    fn write_display(&self, side: &str, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            " {side} trader id={} {side} item id={} {side} item name={} {side} price={:.6} {side} quantity={:.6}",
            self.trader_id, self.item.id, self.item.name, self.price, self.quantity,
        )
    }
}

/// A completed exchange between two traders.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TradeTransaction {
    pub id: Uuid,
    pub credit: TransactionRecord,
    pub debit: TransactionRecord,
}

impl TradeTransaction {
    /// Create a trade with a fresh random id.
    pub fn new(credit: TransactionRecord, debit: TransactionRecord) -> Self {
        Self {
            id: Uuid::new_v4(),
            credit,
            debit,
        }
    }

    /// The exact string whose SHA-256 digest is the content hash.
    ///
    /// Fields are concatenated without separators: the trade id, then the
    /// credit leg, then the debit leg, each leg as trader id, item id, item
    /// name, price, quantity. Numbers use their shortest round-trip decimal
    /// form with no exponent.
    pub fn canonical_content(&self) -> String {
        let mut out = String::with_capacity(256);
        out.push_str(&self.id.to_string());
        self.credit.write_canonical(&mut out);
        self.debit.write_canonical(&mut out);
        out
    }
}

impl Transaction for TradeTransaction {
    fn content_hash(&self) -> TxnHash {
        TxnHash::digest(self.canonical_content().as_bytes())
    }

    fn kind(&self) -> TxnKind {
        TxnKind::Trade
    }
}

impl fmt::Display for TradeTransaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "transaction id={}", self.id)?;
        self.credit.write_display("credit", f)?;
        self.debit.write_display("debit", f)
    }
}
