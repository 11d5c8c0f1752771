//! Outgoing value transfers.
//!
//! A withdrawal pays the owner through a [`ValueSink`]. The sink is handed
//! the staged books (already cleared) while it runs, so anything it
//! observes during the payout sees no payable balance. If the sink rejects
//! the transfer the ledger discards the staged books.

use std::collections::{HashMap, HashSet};

use fundme_types::{Address, FundMeError, Result, Wei};

use crate::books::Books;

/// A single outgoing payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transfer {
    pub to: Address,
    pub amount: Wei,
}

/// Receives withdrawal payouts.
///
/// A sink must not call back into the ledger paying it. Through
/// [`crate::SharedLedger`] such a call fails with
/// [`FundMeError::ReentrantCall`].
pub trait ValueSink {
    /// Deliver `transfer`. Any error is treated as a rejection and
    /// surfaces as [`FundMeError::TransferFailed`].
    fn send(&mut self, transfer: &Transfer, staged: &Books) -> Result<()>;
}

impl<S: ValueSink + ?Sized> ValueSink for &mut S {
    fn send(&mut self, transfer: &Transfer, staged: &Books) -> Result<()> {
        (**self).send(transfer, staged)
    }
}

/// External account balances on a chain.
///
/// Acts as the sink for withdrawals and as the source of contributed
/// value. Accounts can be marked as rejecting incoming payments.
#[derive(Debug, Clone, Default)]
pub struct AccountBook {
    balances: HashMap<Address, Wei>,
    rejecting: HashSet<Address>,
}

impl AccountBook {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Book with each account pre-funded with `amount`.
    #[must_use]
    pub fn prefunded(accounts: &[Address], amount: Wei) -> Self {
        Self {
            balances: accounts.iter().map(|a| (*a, amount)).collect(),
            rejecting: HashSet::new(),
        }
    }

    #[must_use]
    pub fn balance_of(&self, account: Address) -> Wei {
        self.balances.get(&account).copied().unwrap_or_default()
    }

    /// Sum of all account balances, `None` on overflow.
    #[must_use]
    pub fn total(&self) -> Option<Wei> {
        Wei::checked_sum(self.balances.values().copied())
    }

    /// # Errors
    /// [`FundMeError::ArithmeticOverflow`] if the balance would overflow.
    pub fn credit(&mut self, account: Address, amount: Wei) -> Result<()> {
        let updated = self
            .balance_of(account)
            .checked_add(amount)
            .ok_or(FundMeError::ArithmeticOverflow)?;
        self.balances.insert(account, updated);
        Ok(())
    }

    /// # Errors
    /// [`FundMeError::TransferFailed`] if the account cannot cover `amount`.
    pub fn debit(&mut self, account: Address, amount: Wei) -> Result<()> {
        let available = self.balance_of(account);
        let updated =
            available
                .checked_sub(amount)
                .ok_or_else(|| FundMeError::TransferFailed {
                    reason: format!("{account} has {available}, needs {amount}"),
                })?;
        self.balances.insert(account, updated);
        Ok(())
    }

    /// Make `account` refuse incoming payments.
    pub fn reject_payments_to(&mut self, account: Address) {
        self.rejecting.insert(account);
    }

    pub fn accept_payments_to(&mut self, account: Address) {
        self.rejecting.remove(&account);
    }
}

impl ValueSink for AccountBook {
    fn send(&mut self, transfer: &Transfer, _staged: &Books) -> Result<()> {
        if self.rejecting.contains(&transfer.to) {
            return Err(FundMeError::TransferFailed {
                reason: format!("{} rejected the payment", transfer.to),
            });
        }
        self.credit(transfer.to, transfer.amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefunded_accounts() {
        let a = Address::from_seed(1);
        let b = Address::from_seed(2);
        let book = AccountBook::prefunded(&[a, b], Wei::from_ether(10));
        assert_eq!(book.balance_of(a), Wei::from_ether(10));
        assert_eq!(book.total(), Some(Wei::from_ether(20)));
        assert_eq!(book.balance_of(Address::from_seed(3)), Wei::ZERO);
    }

    #[test]
    fn debit_insufficient_fails_without_change() {
        let a = Address::from_seed(1);
        let mut book = AccountBook::prefunded(&[a], Wei(5));
        let err = book.debit(a, Wei(6)).unwrap_err();
        assert!(matches!(err, FundMeError::TransferFailed { .. }));
        assert_eq!(book.balance_of(a), Wei(5));
    }

    #[test]
    fn send_credits_recipient() {
        let a = Address::from_seed(1);
        let mut book = AccountBook::new();
        book.send(
            &Transfer {
                to: a,
                amount: Wei(42),
            },
            &Books::new(),
        )
        .unwrap();
        assert_eq!(book.balance_of(a), Wei(42));
    }

    #[test]
    fn rejecting_account_refuses_payment() {
        let a = Address::from_seed(1);
        let mut book = AccountBook::new();
        book.reject_payments_to(a);
        let transfer = Transfer {
            to: a,
            amount: Wei(42),
        };
        assert!(book.send(&transfer, &Books::new()).is_err());
        assert_eq!(book.balance_of(a), Wei::ZERO);

        book.accept_payments_to(a);
        assert!(book.send(&transfer, &Books::new()).is_ok());
        assert_eq!(book.balance_of(a), Wei(42));
    }
}
