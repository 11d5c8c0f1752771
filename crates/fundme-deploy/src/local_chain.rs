//! In-process development chain.
//!
//! Deploys the mock feed and a ledger from account 0, holds every named
//! account's wallet, and gives calls revert semantics: a failed
//! contribution leaves the caller's wallet untouched.

use std::sync::Arc;

use fundme_core::{AccountBook, Ledger, MockV3Aggregator};
use fundme_types::{
    Address, Contribution, FundMeError, LedgerConfig, Result, WithdrawalReceipt, Wei,
};

use crate::deployer::{Deployer, Deployment};
use crate::network::NetworkContext;

/// Named accounts on a fresh chain.
pub const DEFAULT_ACCOUNTS: u64 = 20;
/// Starting wallet balance of every named account, in ether.
pub const DEFAULT_ACCOUNT_ETHER: u64 = 10_000;

/// A development chain with a deployed ledger.
#[derive(Debug)]
pub struct LocalChain {
    network: NetworkContext,
    deployer: Deployer,
    accounts: Vec<Address>,
    wallets: AccountBook,
    feed: Arc<MockV3Aggregator>,
    ledger: Ledger<Arc<MockV3Aggregator>>,
}

impl LocalChain {
    /// Start a chain with the default accounts and ledger config.
    pub fn start(network: NetworkContext) -> Result<Self> {
        Self::start_with(
            network,
            DEFAULT_ACCOUNTS,
            Wei::from_ether(DEFAULT_ACCOUNT_ETHER),
            LedgerConfig::default(),
        )
    }

    /// Start a chain with `accounts` named accounts of `balance` each.
    ///
    /// # Errors
    /// [`FundMeError::Configuration`] if `network` is not a development
    /// chain or has no accounts.
    pub fn start_with(
        network: NetworkContext,
        accounts: u64,
        balance: Wei,
        config: LedgerConfig,
    ) -> Result<Self> {
        if accounts == 0 {
            return Err(FundMeError::Configuration(
                "a local chain needs at least one account".into(),
            ));
        }
        let accounts: Vec<Address> = (0..accounts).map(Address::from_seed).collect();
        let mut deployer = Deployer::new(accounts[0]);
        let feed = deployer.deploy_mocks(&network).ok_or_else(|| {
            FundMeError::Configuration(format!(
                "{} is not a development chain",
                network.name()
            ))
        })?;
        let (ledger, _) = deployer.deploy_ledger(&network, Arc::clone(&feed), config)?;

        tracing::info!(
            network = %network.name(),
            accounts = accounts.len(),
            deployer = %deployer.account(),
            "Local chain started"
        );

        Ok(Self {
            network,
            deployer,
            wallets: AccountBook::prefunded(&accounts, balance),
            accounts,
            feed,
            ledger,
        })
    }

    #[must_use]
    pub fn network(&self) -> &NetworkContext {
        &self.network
    }

    /// Named account `index`; account 0 deployed and owns the ledger.
    #[must_use]
    pub fn account(&self, index: usize) -> Option<Address> {
        self.accounts.get(index).copied()
    }

    #[must_use]
    pub fn accounts(&self) -> &[Address] {
        &self.accounts
    }

    #[must_use]
    pub fn deployer(&self) -> Address {
        self.deployer.account()
    }

    #[must_use]
    pub fn deployment(&self, name: &str) -> Option<&Deployment> {
        self.deployer.deployment(name)
    }

    #[must_use]
    pub fn balance_of(&self, account: Address) -> Wei {
        self.wallets.balance_of(account)
    }

    #[must_use]
    pub fn feed(&self) -> &Arc<MockV3Aggregator> {
        &self.feed
    }

    #[must_use]
    pub fn ledger(&self) -> &Ledger<Arc<MockV3Aggregator>> {
        &self.ledger
    }

    /// Mutable access to wallets, e.g. to make an account reject payments.
    pub fn wallets_mut(&mut self) -> &mut AccountBook {
        &mut self.wallets
    }

    /// Send `value` from `caller` into the ledger.
    ///
    /// # Errors
    /// Any ledger error, or [`FundMeError::TransferFailed`] if the wallet
    /// cannot cover `value`. The wallet is refunded on failure.
    pub fn fund(&mut self, caller: Address, value: Wei) -> Result<Contribution> {
        self.wallets.debit(caller, value)?;
        match self.ledger.contribute(caller, value) {
            Ok(contribution) => Ok(contribution),
            Err(err) => {
                self.wallets.credit(caller, value)?;
                Err(err)
            }
        }
    }

    pub fn withdraw(&mut self, caller: Address) -> Result<WithdrawalReceipt> {
        self.ledger.withdraw(caller, &mut self.wallets)
    }

    pub fn withdraw_optimized(&mut self, caller: Address) -> Result<WithdrawalReceipt> {
        self.ledger.withdraw_optimized(caller, &mut self.wallets)
    }

    /// Wallets plus custody. Constant across every call on this chain.
    #[must_use]
    pub fn total_value(&self) -> Option<Wei> {
        self.wallets.total()?.checked_add(self.ledger.custodied_balance())
    }
}

#[cfg(test)]
mod tests {
    use fundme_types::NetworksConfig;

    use super::*;

    fn hardhat() -> NetworkContext {
        NetworkContext::select(&NetworksConfig::default(), "hardhat").unwrap()
    }

    #[test]
    fn refuses_live_networks() {
        let sepolia = NetworkContext::select(&NetworksConfig::default(), "sepolia").unwrap();
        assert!(matches!(
            LocalChain::start(sepolia),
            Err(FundMeError::Configuration(_))
        ));
    }

    #[test]
    fn refuses_zero_accounts() {
        let err = LocalChain::start_with(hardhat(), 0, Wei::ZERO, LedgerConfig::default())
            .unwrap_err();
        assert!(matches!(err, FundMeError::Configuration(_)));
    }

    #[test]
    fn deploys_mock_then_ledger() {
        let chain = LocalChain::start(hardhat()).unwrap();
        let mock = chain.deployment("MockV3Aggregator").unwrap();
        let ledger = chain.deployment("FundMe").unwrap();
        assert_eq!(chain.ledger().price_oracle_address(), mock.address);
        assert_eq!(ledger.args, vec![mock.address.to_string()]);
        assert_eq!(chain.ledger().owner(), chain.deployer());
        assert_eq!(chain.accounts().len(), 20);
    }

    #[test]
    fn failed_fund_is_refunded() {
        let mut chain = LocalChain::start(hardhat()).unwrap();
        let caller = chain.account(1).unwrap();
        let before = chain.balance_of(caller);
        assert!(chain.fund(caller, Wei(1)).is_err());
        assert_eq!(chain.balance_of(caller), before);
    }

    #[test]
    fn fund_beyond_wallet_fails() {
        let mut chain =
            LocalChain::start_with(hardhat(), 2, Wei::from_ether(1), LedgerConfig::default())
                .unwrap();
        let caller = chain.account(1).unwrap();
        let err = chain.fund(caller, Wei::from_ether(2)).unwrap_err();
        assert!(matches!(err, FundMeError::TransferFailed { .. }));
        assert_eq!(chain.ledger().funder_count(), 0);
    }
}
