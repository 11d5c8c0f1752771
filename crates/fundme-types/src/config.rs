//! Configuration types for ledgers and target networks.

use std::{collections::BTreeMap, path::Path};

use serde::{Deserialize, Serialize};

use crate::{constants, Address, FundMeError, Result, Wei};

/// Parameters fixed into a ledger at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Minimum contribution, USD in 18-decimal fixed point.
    pub minimum_usd: Wei,
    /// Oracle answers older than this are rejected. `None` disables the check.
    pub max_price_age_secs: Option<u64>,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            minimum_usd: Wei(constants::MINIMUM_USD),
            max_price_age_secs: Some(constants::DEFAULT_MAX_PRICE_AGE_SECS),
        }
    }
}

/// One deployment target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Network name (e.g., "sepolia").
    pub name: String,
    pub chain_id: u64,
    /// ETH/USD feed to bind the ledger to. Absent on development chains,
    /// where a mock is deployed instead.
    pub eth_usd_price_feed: Option<Address>,
    /// Confirmations to wait for after deploying.
    #[serde(default = "default_confirmations")]
    pub block_confirmations: u64,
}

fn default_confirmations() -> u64 {
    constants::DEFAULT_BLOCK_CONFIRMATIONS
}

/// All known networks plus the names treated as local development chains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworksConfig {
    pub development_chains: Vec<String>,
    /// Keyed by network name.
    pub networks: BTreeMap<String, NetworkConfig>,
}

impl NetworksConfig {
    /// Load from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Every non-development network must name a non-zero price feed.
    pub fn validate(&self) -> Result<()> {
        for (name, network) in &self.networks {
            if name != &network.name {
                return Err(FundMeError::Configuration(format!(
                    "network key {name} does not match its name {}",
                    network.name
                )));
            }
            if !self.is_development(name) && network.eth_usd_price_feed.is_none() {
                return Err(FundMeError::Configuration(format!(
                    "network {name} has no eth_usd_price_feed"
                )));
            }
            if network.eth_usd_price_feed.is_some_and(|feed| feed.is_zero()) {
                return Err(FundMeError::Configuration(format!(
                    "network {name} has a zero eth_usd_price_feed"
                )));
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn is_development(&self, name: &str) -> bool {
        self.development_chains.iter().any(|c| c == name)
    }

    pub fn network(&self, name: &str) -> Result<&NetworkConfig> {
        self.networks
            .get(name)
            .ok_or_else(|| FundMeError::UnknownNetwork(name.to_string()))
    }

    /// Configured feed for a chain id.
    pub fn price_feed_for(&self, chain_id: u64) -> Result<Address> {
        self.networks
            .values()
            .find(|n| n.chain_id == chain_id)
            .and_then(|n| n.eth_usd_price_feed)
            .ok_or_else(|| FundMeError::UnknownNetwork(format!("chain id {chain_id}")))
    }
}

impl Default for NetworksConfig {
    fn default() -> Self {
        let mut networks = BTreeMap::new();
        networks.insert(
            "hardhat".to_string(),
            NetworkConfig {
                name: "hardhat".to_string(),
                chain_id: 31337,
                eth_usd_price_feed: None,
                block_confirmations: 1,
            },
        );
        networks.insert(
            "localhost".to_string(),
            NetworkConfig {
                name: "localhost".to_string(),
                chain_id: 31337,
                eth_usd_price_feed: None,
                block_confirmations: 1,
            },
        );
        networks.insert(
            "sepolia".to_string(),
            NetworkConfig {
                name: "sepolia".to_string(),
                chain_id: 11_155_111,
                eth_usd_price_feed: Some(Address([
                    0x69, 0x4a, 0xa1, 0x76, 0x93, 0x57, 0x21, 0x5d, 0xe4, 0xfa, 0xc0, 0x81, 0xbf,
                    0x1f, 0x30, 0x9a, 0xdc, 0x32, 0x53, 0x06,
                ])),
                block_confirmations: 6,
            },
        );
        Self {
            development_chains: vec!["hardhat".to_string(), "localhost".to_string()],
            networks,
        }
    }
}
