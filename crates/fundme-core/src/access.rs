//! Owner-only capability check.
//!
//! Every privileged ledger operation calls [`OwnerGuard::ensure`] before
//! touching state. The owner is fixed at construction and there is no way
//! to transfer it.

use fundme_types::{Address, FundMeError, Result};

/// Holds the owner identity and gates privileged calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnerGuard {
    owner: Address,
}

impl OwnerGuard {
    #[must_use]
    pub fn new(owner: Address) -> Self {
        Self { owner }
    }

    #[must_use]
    pub fn owner(&self) -> Address {
        self.owner
    }

    #[must_use]
    pub fn is_owner(&self, caller: Address) -> bool {
        caller == self.owner
    }

    /// Returns `Ok(())` for the owner, or [`FundMeError::NotOwner`].
    pub fn ensure(&self, caller: Address) -> Result<()> {
        if self.is_owner(caller) {
            Ok(())
        } else {
            tracing::warn!(
                caller = %caller,
                owner = %self.owner,
                "Privileged call rejected: caller is not the owner"
            );
            Err(FundMeError::NotOwner { caller })
        }
    }
}
