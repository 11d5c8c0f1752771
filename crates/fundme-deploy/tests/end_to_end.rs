//! End-to-end runs on an in-process development chain, plus the live
//! network deployment path with a stand-in registry.

use std::sync::Arc;

use fundme_core::{MockV3Aggregator, PriceSource};
use fundme_deploy::local_chain::DEFAULT_ACCOUNT_ETHER;
use fundme_deploy::*;
use fundme_types::*;

fn hardhat() -> NetworkContext {
    NetworkContext::select(&NetworksConfig::default(), "hardhat").unwrap()
}

// =============================================================================
// Development chain
// =============================================================================

#[test]
fn e2e_fund_then_withdraw_empties_custody() {
    let mut chain = LocalChain::start(hardhat()).unwrap();
    let owner = chain.deployer();
    let start = chain.total_value().unwrap();

    chain.fund(owner, Wei::from_ether(1)).unwrap();
    chain.withdraw(owner).unwrap();

    assert_eq!(chain.ledger().custodied_balance(), Wei::ZERO);
    assert_eq!(chain.balance_of(owner), Wei::from_ether(DEFAULT_ACCOUNT_ETHER));
    assert_eq!(chain.total_value().unwrap(), start);
}

#[test]
fn e2e_many_funders_swept_to_owner() {
    let mut chain = LocalChain::start(hardhat()).unwrap();
    let owner = chain.deployer();
    let funders: Vec<Address> = chain.accounts()[1..6].to_vec();

    for (ether, funder) in (1..).zip(&funders) {
        chain.fund(*funder, Wei::from_ether(ether)).unwrap();
    }
    assert_eq!(chain.ledger().custodied_balance(), Wei::from_ether(15));

    let receipt = chain.withdraw_optimized(owner).unwrap();
    assert_eq!(receipt.amount, Wei::from_ether(15));
    assert_eq!(receipt.funders_cleared, 5);
    assert_eq!(
        chain.balance_of(owner),
        Wei::from_ether(DEFAULT_ACCOUNT_ETHER + 15)
    );
    for funder in &funders {
        assert_eq!(chain.ledger().funded_amount(*funder), Wei::ZERO);
    }
    chain.ledger().verify_custody().unwrap();
}

#[test]
fn e2e_attacker_cannot_sweep() {
    let mut chain = LocalChain::start(hardhat()).unwrap();
    let attacker = chain.account(1).unwrap();
    chain.fund(chain.deployer(), Wei::from_ether(1)).unwrap();
    let attacker_before = chain.balance_of(attacker);

    assert!(matches!(
        chain.withdraw(attacker),
        Err(FundMeError::NotOwner { .. })
    ));
    assert!(matches!(
        chain.withdraw_optimized(attacker),
        Err(FundMeError::NotOwner { .. })
    ));
    assert_eq!(chain.balance_of(attacker), attacker_before);
    assert_eq!(chain.ledger().custodied_balance(), Wei::from_ether(1));
}

#[test]
fn e2e_rejected_payout_keeps_books() {
    let mut chain = LocalChain::start(hardhat()).unwrap();
    let owner = chain.deployer();
    let funder = chain.account(2).unwrap();
    chain.fund(funder, Wei::from_ether(2)).unwrap();

    chain.wallets_mut().reject_payments_to(owner);
    let err = chain.withdraw(owner).unwrap_err();
    assert!(matches!(err, FundMeError::TransferFailed { .. }));
    assert_eq!(chain.ledger().funded_amount(funder), Wei::from_ether(2));
    assert_eq!(chain.ledger().funder_at(0).unwrap(), funder);

    chain.wallets_mut().accept_payments_to(owner);
    chain.withdraw(owner).unwrap();
    assert_eq!(chain.ledger().funder_count(), 0);
}

#[test]
fn e2e_price_move_changes_minimum() {
    let mut chain = LocalChain::start(hardhat()).unwrap();
    let funder = chain.account(3).unwrap();
    let amount = Wei::parse_ether("0.025").unwrap();

    chain.fund(funder, amount).unwrap();
    chain.feed().update_answer(1_999 * 100_000_000);
    assert!(matches!(
        chain.fund(funder, amount),
        Err(FundMeError::InsufficientContribution { .. })
    ));
    chain.feed().set_available(false);
    assert!(matches!(
        chain.fund(funder, Wei::from_ether(1)),
        Err(FundMeError::OracleUnavailable { .. })
    ));
    assert_eq!(chain.ledger().funded_amount(funder), amount);
}

// =============================================================================
// Live network path
// =============================================================================

struct Registry {
    submitted: Vec<Address>,
}

impl Verifier for Registry {
    fn verify(&mut self, address: Address, _args: &[String]) -> Result<()> {
        if self.submitted.contains(&address) {
            return Err(FundMeError::VerificationFailed(
                "Contract source code already verified".into(),
            ));
        }
        self.submitted.push(address);
        Ok(())
    }
}

#[test]
fn e2e_live_deploy_and_verify() {
    let network = NetworkContext::select(&NetworksConfig::default(), "sepolia")
        .unwrap()
        .with_verify_api_key(Some("key".into()));
    let mut deployer = Deployer::new(Address::from_seed(0));
    assert!(deployer.deploy_mocks(&network).is_none());

    // Stand-in for the live feed at the configured address.
    let feed = Arc::new(MockV3Aggregator::with_defaults(
        network.configured_price_feed().unwrap(),
    ));
    let (ledger, deployment) = deployer
        .deploy_ledger(&network, Arc::clone(&feed), LedgerConfig::default())
        .unwrap();
    assert_eq!(ledger.price_oracle_address(), feed.address());
    assert_eq!(deployment.confirmations, 6);

    let mut registry = Registry {
        submitted: Vec::new(),
    };
    assert_eq!(
        verify_deployment(&mut registry, &network, &deployment),
        VerificationOutcome::Verified
    );
    assert_eq!(
        verify_deployment(&mut registry, &network, &deployment),
        VerificationOutcome::AlreadyVerified
    );
}

#[test]
fn e2e_deployment_record_serializes() {
    let chain = LocalChain::start(hardhat()).unwrap();
    let record = chain.deployment("FundMe").unwrap();
    let json = serde_json::to_string(record).unwrap();
    let back: Deployment = serde_json::from_str(&json).unwrap();
    assert_eq!(&back, record);
}
