//! # fundme-deploy
//!
//! Deployment glue around the FundMe ledger:
//!
//! 1. Select the target network ([`NetworkContext`])
//! 2. On development chains, deploy the mock feed first
//! 3. Deploy the ledger bound to the resolved feed ([`Deployer`])
//! 4. Submit live deployments for verification ([`verify_deployment`])
//!
//! [`LocalChain`] runs all of this in-process with funded named accounts.

pub mod deployer;
pub mod local_chain;
pub mod network;
pub mod verify;

pub use deployer::{Deployer, Deployment};
pub use local_chain::LocalChain;
pub use network::NetworkContext;
pub use verify::{verify_deployment, VerificationOutcome, Verifier};
