//! Contract deployment bookkeeping.
//!
//! A [`Deployer`] is one account deploying in nonce order. Each deployment
//! gets a derived address and a [`Deployment`] record that later steps
//! (feed resolution, verification, scripts) look up by name.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use fundme_core::{Ledger, MockV3Aggregator, PriceSource};
use fundme_types::{constants, Address, FundMeError, LedgerConfig, Result};
use serde::{Deserialize, Serialize};

use crate::network::NetworkContext;

/// Record of one deployed contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deployment {
    pub name: String,
    pub address: Address,
    /// Constructor arguments as passed, for verification.
    pub args: Vec<String>,
    pub confirmations: u64,
    pub deployed_at: DateTime<Utc>,
}

/// Deploys contracts from a single account.
#[derive(Debug)]
pub struct Deployer {
    account: Address,
    nonce: u64,
    deployments: BTreeMap<String, Deployment>,
}

impl Deployer {
    #[must_use]
    pub fn new(account: Address) -> Self {
        Self {
            account,
            nonce: 0,
            deployments: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn account(&self) -> Address {
        self.account
    }

    #[must_use]
    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    /// Latest deployment recorded under `name`.
    #[must_use]
    pub fn deployment(&self, name: &str) -> Option<&Deployment> {
        self.deployments.get(name)
    }

    pub fn deployments(&self) -> impl Iterator<Item = &Deployment> {
        self.deployments.values()
    }

    fn record(&mut self, name: &str, args: Vec<String>, confirmations: u64) -> Deployment {
        let deployment = Deployment {
            name: name.to_string(),
            address: Address::contract(self.account, self.nonce),
            args,
            confirmations,
            deployed_at: Utc::now(),
        };
        self.nonce += 1;
        tracing::info!(
            contract = %deployment.name,
            address = %deployment.address,
            deployer = %self.account,
            confirmations,
            "Contract deployed"
        );
        self.deployments.insert(name.to_string(), deployment.clone());
        deployment
    }

    /// Deploy the mock aggregator, but only on a development chain.
    ///
    /// Returns `None` elsewhere; live networks bind their configured feed.
    pub fn deploy_mocks(&mut self, network: &NetworkContext) -> Option<Arc<MockV3Aggregator>> {
        if !network.development {
            return None;
        }
        tracing::info!(network = %network.name(), "Development chain detected, deploying mocks");
        let deployment = self.record(
            constants::MOCK_CONTRACT_NAME,
            vec![
                constants::MOCK_DECIMALS.to_string(),
                constants::MOCK_INITIAL_ANSWER.to_string(),
            ],
            network.block_confirmations(),
        );
        Some(Arc::new(MockV3Aggregator::with_defaults(deployment.address)))
    }

    /// Feed address a ledger on `network` must be bound to.
    ///
    /// # Errors
    /// - [`FundMeError::Configuration`] on a development chain with no mock
    ///   deployed yet, or a live network with no configured feed
    pub fn price_feed_address(&self, network: &NetworkContext) -> Result<Address> {
        if network.development {
            self.deployment(constants::MOCK_CONTRACT_NAME)
                .map(|d| d.address)
                .ok_or_else(|| {
                    FundMeError::Configuration(format!(
                        "{} must be deployed before the ledger on {}",
                        constants::MOCK_CONTRACT_NAME,
                        network.name()
                    ))
                })
        } else {
            network.configured_price_feed()
        }
    }

    /// Deploy a ledger owned by this account and bound to `price_feed`.
    ///
    /// # Errors
    /// [`FundMeError::Configuration`] if `price_feed` is not the feed this
    /// network resolves to.
    pub fn deploy_ledger<P: PriceSource>(
        &mut self,
        network: &NetworkContext,
        price_feed: P,
        config: LedgerConfig,
    ) -> Result<(Ledger<P>, Deployment)> {
        let expected = self.price_feed_address(network)?;
        if price_feed.address() != expected {
            return Err(FundMeError::Configuration(format!(
                "price feed {} does not match {expected} for network {}",
                price_feed.address(),
                network.name()
            )));
        }
        let ledger = Ledger::new(self.account, price_feed, config);
        let deployment = self.record(
            constants::LEDGER_CONTRACT_NAME,
            vec![expected.to_string()],
            network.block_confirmations(),
        );
        Ok((ledger, deployment))
    }
}

#[cfg(test)]
mod tests {
    use fundme_types::NetworksConfig;

    use super::*;

    fn network(name: &str) -> NetworkContext {
        NetworkContext::select(&NetworksConfig::default(), name).unwrap()
    }

    #[test]
    fn mocks_only_on_development_chains() {
        let mut deployer = Deployer::new(Address::from_seed(0));
        assert!(deployer.deploy_mocks(&network("sepolia")).is_none());
        assert_eq!(deployer.nonce(), 0);

        let mock = deployer.deploy_mocks(&network("hardhat")).unwrap();
        assert_eq!(deployer.nonce(), 1);
        let record = deployer.deployment("MockV3Aggregator").unwrap();
        assert_eq!(record.address, mock.address());
        assert_eq!(record.args, vec!["8".to_string(), "200000000000".to_string()]);
    }

    #[test]
    fn ledger_binds_to_deployed_mock() {
        let net = network("hardhat");
        let mut deployer = Deployer::new(Address::from_seed(0));
        let mock = deployer.deploy_mocks(&net).unwrap();

        let (ledger, record) = deployer
            .deploy_ledger(&net, Arc::clone(&mock), LedgerConfig::default())
            .unwrap();
        assert_eq!(ledger.owner(), deployer.account());
        assert_eq!(ledger.price_oracle_address(), mock.address());
        assert_eq!(record.args, vec![mock.address().to_string()]);
        assert_eq!(record.address, Address::contract(deployer.account(), 1));
        assert_ne!(record.address, mock.address());
        assert_eq!(deployer.deployments().count(), 2);
    }

    #[test]
    fn ledger_requires_mock_first_on_development_chain() {
        let net = network("hardhat");
        let mut deployer = Deployer::new(Address::from_seed(0));
        let stray = MockV3Aggregator::with_defaults(Address::from_seed(9));
        let err = deployer
            .deploy_ledger(&net, stray, LedgerConfig::default())
            .unwrap_err();
        assert!(matches!(err, FundMeError::Configuration(_)));
        assert_eq!(deployer.nonce(), 0);
    }

    #[test]
    fn live_network_requires_configured_feed() {
        let net = network("sepolia");
        let mut deployer = Deployer::new(Address::from_seed(0));
        let feed = net.configured_price_feed().unwrap();

        let wrong = MockV3Aggregator::with_defaults(Address::from_seed(9));
        assert!(
            deployer
                .deploy_ledger(&net, wrong, LedgerConfig::default())
                .is_err()
        );

        let right = MockV3Aggregator::with_defaults(feed);
        let (ledger, record) = deployer
            .deploy_ledger(&net, right, LedgerConfig::default())
            .unwrap();
        assert_eq!(ledger.price_oracle_address(), feed);
        assert_eq!(record.confirmations, 6);
    }
}
