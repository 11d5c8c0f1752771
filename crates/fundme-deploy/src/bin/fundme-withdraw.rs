//! Withdraw script.
//!
//! Starts a local development chain for `FUNDME_NETWORK`, funds the ledger
//! from the deployer and sweeps it back to the owner.

use anyhow::{bail, Context, Result};
use fundme_deploy::{LocalChain, NetworkContext};
use fundme_types::Wei;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let network = NetworkContext::from_env().context("selecting network")?;
    if !network.development {
        bail!(
            "network {} is not a development chain; only local chains can be driven in-process",
            network.name()
        );
    }

    let mut chain = LocalChain::start(network).context("starting local chain")?;
    let owner = chain.deployer();

    chain
        .fund(owner, Wei::from_ether(1))
        .context("funding the ledger")?;

    info!("Withdrawing...");
    let receipt = chain.withdraw(owner).context("withdrawal")?;
    info!(
        receipt = %receipt.id,
        amount = %receipt.amount,
        owner_balance = %chain.balance_of(owner),
        "Withdrawal complete"
    );
    println!("{}", serde_json::to_string_pretty(&receipt)?);
    Ok(())
}
