//! Source verification with a contract registry.
//!
//! Verification never fails a deployment. A registry that reports the
//! contract as already verified counts as success; any other error is
//! logged and reported as [`VerificationOutcome::Failed`].

use fundme_types::{Address, Result};
use serde::{Deserialize, Serialize};

use crate::deployer::Deployment;
use crate::network::NetworkContext;

/// Submits a deployed contract and its constructor arguments for
/// verification.
pub trait Verifier {
    fn verify(&mut self, address: Address, args: &[String]) -> Result<()>;
}

impl<V: Verifier + ?Sized> Verifier for &mut V {
    fn verify(&mut self, address: Address, args: &[String]) -> Result<()> {
        (**self).verify(address, args)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerificationOutcome {
    Verified,
    AlreadyVerified,
    /// Development chain, or no API key configured.
    Skipped,
    Failed { reason: String },
}

impl VerificationOutcome {
    /// Whether the contract is known to be verified.
    #[must_use]
    pub fn is_verified(&self) -> bool {
        matches!(self, Self::Verified | Self::AlreadyVerified)
    }
}

/// Verify `deployment` on `network` if it is eligible.
pub fn verify_deployment<V: Verifier>(
    verifier: &mut V,
    network: &NetworkContext,
    deployment: &Deployment,
) -> VerificationOutcome {
    if !network.should_verify() {
        tracing::debug!(
            contract = %deployment.name,
            network = %network.name(),
            "Verification skipped"
        );
        return VerificationOutcome::Skipped;
    }

    tracing::info!(contract = %deployment.name, address = %deployment.address, "Verifying contract");
    match verifier.verify(deployment.address, &deployment.args) {
        Ok(()) => VerificationOutcome::Verified,
        Err(err) if is_already_verified(&err.to_string()) => {
            tracing::info!(contract = %deployment.name, "Already verified");
            VerificationOutcome::AlreadyVerified
        }
        Err(err) => {
            tracing::warn!(
                contract = %deployment.name,
                address = %deployment.address,
                error = %err,
                "Verification failed"
            );
            VerificationOutcome::Failed {
                reason: err.to_string(),
            }
        }
    }
}

fn is_already_verified(message: &str) -> bool {
    message.to_lowercase().contains("already verified")
}
