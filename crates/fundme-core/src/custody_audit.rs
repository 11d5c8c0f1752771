//! Custody conservation invariant checker.
//!
//! Invariant checked on the staged state of every ledger mutation, before
//! it is committed:
//! ```text
//! Σ balances == custodied == Σ contributions - Σ withdrawals
//! ```
//!
//! Value only enters through a contribution and only leaves through an
//! owner withdrawal. If either side of the equation drifts, the ledger has
//! a bookkeeping bug and the operation is refused.

use fundme_types::{FundMeError, Result, Wei};

use crate::books::Books;

/// Lifetime totals of value in and out of a ledger.
///
/// `Copy` so the ledger can compute the next audit state before committing
/// anything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CustodyAudit {
    contributed: Wei,
    withdrawn: Wei,
}

impl CustodyAudit {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Audit state after accepting `amount`.
    ///
    /// # Errors
    /// [`FundMeError::ArithmeticOverflow`] if lifetime contributions overflow.
    pub fn with_contribution(self, amount: Wei) -> Result<Self> {
        Ok(Self {
            contributed: self
                .contributed
                .checked_add(amount)
                .ok_or(FundMeError::ArithmeticOverflow)?,
            ..self
        })
    }

    /// Audit state after paying out `amount`.
    ///
    /// # Errors
    /// [`FundMeError::CustodyInvariantViolation`] if more would leave than
    /// ever entered.
    pub fn with_withdrawal(self, amount: Wei) -> Result<Self> {
        let withdrawn = self
            .withdrawn
            .checked_add(amount)
            .filter(|w| *w <= self.contributed)
            .ok_or_else(|| FundMeError::CustodyInvariantViolation {
                reason: format!(
                    "withdrawal of {amount} exceeds lifetime contributions {} (withdrawn {})",
                    self.contributed, self.withdrawn
                ),
            })?;
        Ok(Self { withdrawn, ..self })
    }

    /// Value that should currently be in custody.
    #[must_use]
    pub fn expected_custody(&self) -> Wei {
        self.contributed
            .checked_sub(self.withdrawn)
            .unwrap_or_default()
    }

    #[must_use]
    pub fn total_contributed(&self) -> Wei {
        self.contributed
    }

    #[must_use]
    pub fn total_withdrawn(&self) -> Wei {
        self.withdrawn
    }

    /// Verify that the books and the custodied balance agree with the
    /// lifetime totals.
    ///
    /// # Errors
    /// Returns [`FundMeError::CustodyInvariantViolation`] on any mismatch.
    pub fn verify(&self, books: &Books, custodied: Wei) -> Result<()> {
        let expected = self.expected_custody();
        let booked = books
            .total()
            .ok_or_else(|| FundMeError::CustodyInvariantViolation {
                reason: "sum of balances overflows".into(),
            })?;
        if booked != custodied || custodied != expected {
            return Err(FundMeError::CustodyInvariantViolation {
                reason: format!(
                    "booked {booked} != custodied {custodied} or != expected {expected} \
                     (contributed={}, withdrawn={})",
                    self.contributed, self.withdrawn
                ),
            });
        }
        Ok(())
    }
}
