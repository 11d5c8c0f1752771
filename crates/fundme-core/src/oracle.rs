//! Price source capability and the development-chain mock aggregator.
//!
//! The ledger never names a concrete oracle. It holds any [`PriceSource`],
//! which lets a deployment bind a live feed while tests and local chains
//! bind a [`MockV3Aggregator`].

use std::sync::Arc;

use chrono::{DateTime, Utc};
use fundme_types::{constants, Address, FundMeError, PriceData, Result};
use parking_lot::RwLock;

/// A read-only ETH/USD price feed.
pub trait PriceSource {
    /// Address the feed is deployed at.
    fn address(&self) -> Address;

    /// Latest round. Any error is surfaced to contributors as
    /// [`FundMeError::OracleUnavailable`].
    fn latest_price(&self) -> Result<PriceData>;

    /// Aggregator interface version.
    fn version(&self) -> u64;
}

impl<P: PriceSource + ?Sized> PriceSource for Arc<P> {
    fn address(&self) -> Address {
        (**self).address()
    }

    fn latest_price(&self) -> Result<PriceData> {
        (**self).latest_price()
    }

    fn version(&self) -> u64 {
        (**self).version()
    }
}

impl<P: PriceSource + ?Sized> PriceSource for &P {
    fn address(&self) -> Address {
        (**self).address()
    }

    fn latest_price(&self) -> Result<PriceData> {
        (**self).latest_price()
    }

    fn version(&self) -> u64 {
        (**self).version()
    }
}

#[derive(Debug, Clone)]
struct MockRound {
    round_id: u64,
    answer: i128,
    updated_at: DateTime<Utc>,
    available: bool,
}

/// In-memory aggregator with a settable answer.
///
/// Interior mutability lets a test hold an `Arc` to the same mock the
/// ledger reads from and move the price underneath it.
#[derive(Debug)]
pub struct MockV3Aggregator {
    address: Address,
    decimals: u8,
    round: RwLock<MockRound>,
}

impl MockV3Aggregator {
    /// Create a mock at round 1 with the given answer.
    #[must_use]
    pub fn new(address: Address, decimals: u8, initial_answer: i128) -> Self {
        Self {
            address,
            decimals,
            round: RwLock::new(MockRound {
                round_id: 1,
                answer: initial_answer,
                updated_at: Utc::now(),
                available: true,
            }),
        }
    }

    /// Mock with the development-chain defaults (8 decimals, 2000 USD).
    #[must_use]
    pub fn with_defaults(address: Address) -> Self {
        Self::new(
            address,
            constants::MOCK_DECIMALS,
            constants::MOCK_INITIAL_ANSWER,
        )
    }

    #[must_use]
    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    /// Start a new round with `answer`, timestamped now.
    pub fn update_answer(&self, answer: i128) {
        let mut round = self.round.write();
        round.round_id += 1;
        round.answer = answer;
        round.updated_at = Utc::now();
    }

    /// Backdate (or postdate) the current round.
    pub fn set_updated_at(&self, updated_at: DateTime<Utc>) {
        self.round.write().updated_at = updated_at;
    }

    /// Simulate the feed going offline.
    pub fn set_available(&self, available: bool) {
        self.round.write().available = available;
    }
}

impl PriceSource for MockV3Aggregator {
    fn address(&self) -> Address {
        self.address
    }

    fn latest_price(&self) -> Result<PriceData> {
        let round = self.round.read();
        if !round.available {
            return Err(FundMeError::OracleUnavailable {
                reason: format!("feed {} is not responding", self.address),
            });
        }
        Ok(PriceData::new(
            round.round_id,
            round.answer,
            self.decimals,
            round.updated_at,
        ))
    }

    fn version(&self) -> u64 {
        constants::MOCK_FEED_VERSION
    }
}
