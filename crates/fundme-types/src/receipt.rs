//! Records produced by ledger operations.
//!
//! A successful contribution yields a [`Contribution`]; a successful
//! withdrawal yields a [`WithdrawalReceipt`]. Receipts of the two
//! withdrawal strategies differ only in `strategy` and `cost`.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Address, Wei};

/// Unique identifier for a withdrawal receipt. Uses UUIDv7 for time-ordered sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct ReceiptId(pub Uuid);

impl ReceiptId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for ReceiptId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ReceiptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "wd:{}", self.0)
    }
}

/// An accepted contribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contribution {
    pub funder: Address,
    pub amount: Wei,
    /// USD equivalent at the oracle price used, 18-decimal fixed point.
    pub usd_value: Wei,
}

/// How a withdrawal walked the funder list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WithdrawStrategy {
    /// Re-reads the persistent funder list on every iteration.
    Straightforward,
    /// Copies the funder list once and iterates the copy.
    Optimized,
}

impl fmt::Display for WithdrawStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Straightforward => write!(f, "STRAIGHTFORWARD"),
            Self::Optimized => write!(f, "OPTIMIZED"),
        }
    }
}

/// Persistent-storage accesses performed while clearing the books.
///
/// This is the only thing allowed to differ between the two strategies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageCost {
    pub reads: u64,
    pub writes: u64,
}

impl StorageCost {
    #[must_use]
    pub fn total(&self) -> u64 {
        self.reads + self.writes
    }
}

/// Proof of a completed withdrawal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithdrawalReceipt {
    pub id: ReceiptId,
    pub strategy: WithdrawStrategy,
    /// Always the owner.
    pub recipient: Address,
    /// Entire custodied balance at the time of withdrawal.
    pub amount: Wei,
    /// Number of funder-list entries cleared (duplicates included).
    pub funders_cleared: usize,
    pub cost: StorageCost,
    pub completed_at: DateTime<Utc>,
}

impl WithdrawalReceipt {
    /// Whether two receipts describe the same state transition, ignoring
    /// identity, timing, strategy and cost.
    #[must_use]
    pub fn same_outcome(&self, other: &Self) -> bool {
        self.recipient == other.recipient
            && self.amount == other.amount
            && self.funders_cleared == other.funders_cleared
    }
}
