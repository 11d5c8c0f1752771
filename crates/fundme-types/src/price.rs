//! Price oracle answers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One round of an ETH/USD price feed.
///
/// `answer` is signed because aggregators report signed values; the
/// converter rejects anything non-positive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceData {
    /// Aggregator round that produced this answer.
    pub round_id: u64,
    /// USD per ether, scaled by `10^decimals`.
    pub answer: i128,
    /// Fixed decimal precision of `answer`.
    pub decimals: u8,
    /// When the round was last updated.
    pub updated_at: DateTime<Utc>,
}

impl PriceData {
    #[must_use]
    pub fn new(round_id: u64, answer: i128, decimals: u8, updated_at: DateTime<Utc>) -> Self {
        Self {
            round_id,
            answer,
            decimals,
            updated_at,
        }
    }

    /// Seconds elapsed between `updated_at` and `now` (zero if in the future).
    #[must_use]
    pub fn age_secs(&self, now: DateTime<Utc>) -> u64 {
        u64::try_from((now - self.updated_at).num_seconds()).unwrap_or(0)
    }
}
