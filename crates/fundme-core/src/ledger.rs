//! The custody ledger.
//!
//! ## Contribution
//!
//! 1. Read the latest price from the bound [`PriceSource`]
//! 2. Reject unusable answers (stale, non-positive, bad precision)
//! 3. Convert the amount to USD and enforce the minimum
//! 4. Stage the new books, custody and audit totals (checked)
//! 5. Audit the staged state, then commit it
//!
//! ## Withdrawal (owner only)
//!
//! ```text
//!   guard ──▶ audit ──▶ stage cleared books ──▶ audit staged ──▶ transfer ──┬─ ok ──▶ commit
//!                                                                          └─ err ─▶ discard staged
//! ```
//!
//! Bookkeeping is cleared before any value moves, and the clear only
//! becomes visible once the transfer has succeeded. A failed step leaves
//! the ledger exactly as it was.

use chrono::Utc;
use fundme_types::{
    Address, Contribution, FundMeError, LedgerConfig, ReceiptId, Result, WithdrawStrategy,
    WithdrawalReceipt, Wei,
};

use crate::access::OwnerGuard;
use crate::books::Books;
use crate::custody_audit::CustodyAudit;
use crate::oracle::PriceSource;
use crate::price_converter;
use crate::transfer::{Transfer, ValueSink};

/// Funds-custody ledger bound to one price source.
///
/// One instance per deployment. Mutating operations take `&mut self`;
/// see [`crate::SharedLedger`] for use across threads.
#[derive(Debug)]
pub struct Ledger<P> {
    guard: OwnerGuard,
    price_feed: P,
    config: LedgerConfig,
    books: Books,
    /// Native value currently held.
    custodied: Wei,
    audit: CustodyAudit,
}

impl<P: PriceSource> Ledger<P> {
    /// Create a ledger owned by `owner` and bound to `price_feed`.
    pub fn new(owner: Address, price_feed: P, config: LedgerConfig) -> Self {
        tracing::info!(
            owner = %owner,
            price_feed = %price_feed.address(),
            minimum_usd = %price_converter::usd_to_decimal(config.minimum_usd),
            "Ledger created"
        );
        Self {
            guard: OwnerGuard::new(owner),
            price_feed,
            config,
            books: Books::new(),
            custodied: Wei::ZERO,
            audit: CustodyAudit::new(),
        }
    }

    /// Ledger with the default 50 USD minimum and one-hour staleness limit.
    pub fn with_defaults(owner: Address, price_feed: P) -> Self {
        Self::new(owner, price_feed, LedgerConfig::default())
    }

    // =================================================================
    // Contribution
    // =================================================================

    /// Accept `amount` from `caller` into custody.
    ///
    /// # Errors
    /// - [`FundMeError::OracleUnavailable`] if the price cannot be used
    /// - [`FundMeError::InsufficientContribution`] below the USD minimum
    /// - [`FundMeError::ArithmeticOverflow`] if a balance would overflow
    /// - [`FundMeError::CustodyInvariantViolation`] if the staged state
    ///   fails the custody audit
    ///
    /// No state changes on error.
    pub fn contribute(&mut self, caller: Address, amount: Wei) -> Result<Contribution> {
        let price = self.price_feed.latest_price().map_err(|err| match err {
            FundMeError::OracleUnavailable { .. } => err,
            other => FundMeError::OracleUnavailable {
                reason: other.to_string(),
            },
        })?;
        price_converter::validate_price(&price, Utc::now(), self.config.max_price_age_secs)?;

        let usd_value = price_converter::usd_value(amount, &price)?;
        if usd_value < self.config.minimum_usd {
            tracing::debug!(
                funder = %caller,
                amount = %amount,
                usd = %price_converter::usd_to_decimal(usd_value),
                "Contribution below minimum"
            );
            return Err(FundMeError::InsufficientContribution {
                required_usd: price_converter::usd_to_decimal(self.config.minimum_usd),
                offered_usd: price_converter::usd_to_decimal(usd_value),
            });
        }

        let custodied = self
            .custodied
            .checked_add(amount)
            .ok_or(FundMeError::ArithmeticOverflow)?;
        let audit = self.audit.with_contribution(amount)?;
        let mut staged = self.books.clone();
        let balance = staged.credit(caller, amount)?;
        audit.verify(&staged, custodied)?;

        self.books = staged;
        self.custodied = custodied;
        self.audit = audit;

        tracing::debug!(
            funder = %caller,
            amount = %amount,
            balance = %balance,
            usd = %price_converter::usd_to_decimal(usd_value),
            round = price.round_id,
            "Contribution accepted"
        );

        Ok(Contribution {
            funder: caller,
            amount,
            usd_value,
        })
    }

    // =================================================================
    // Withdrawal
    // =================================================================

    /// Sweep the whole custodied balance to the owner, clearing the funder
    /// list by indexing into it on every iteration.
    ///
    /// # Errors
    /// - [`FundMeError::NotOwner`] if `caller` is not the owner
    /// - [`FundMeError::TransferFailed`] if the sink rejects the payout
    /// - [`FundMeError::CustodyInvariantViolation`] if the books, custody
    ///   and lifetime totals disagree before or after clearing
    ///
    /// No state changes on error.
    pub fn withdraw<S: ValueSink>(
        &mut self,
        caller: Address,
        sink: &mut S,
    ) -> Result<WithdrawalReceipt> {
        self.withdraw_with(caller, sink, WithdrawStrategy::Straightforward)
    }

    /// Same contract and end state as [`Ledger::withdraw`], iterating a
    /// one-time copy of the funder list instead.
    pub fn withdraw_optimized<S: ValueSink>(
        &mut self,
        caller: Address,
        sink: &mut S,
    ) -> Result<WithdrawalReceipt> {
        self.withdraw_with(caller, sink, WithdrawStrategy::Optimized)
    }

    fn withdraw_with<S: ValueSink>(
        &mut self,
        caller: Address,
        sink: &mut S,
        strategy: WithdrawStrategy,
    ) -> Result<WithdrawalReceipt> {
        self.guard.ensure(caller)?;
        self.audit.verify(&self.books, self.custodied)?;

        let amount = self.custodied;
        let funders_cleared = self.books.funder_count();

        // Stage: clear a copy of the books. Nothing is visible until commit.
        let mut staged = self.books.clone();
        let cost = match strategy {
            WithdrawStrategy::Straightforward => staged.clear_straightforward(),
            WithdrawStrategy::Optimized => staged.clear_optimized(),
        };
        if !staged.is_empty() {
            return Err(FundMeError::CustodyInvariantViolation {
                reason: format!(
                    "{} balances survived clearing",
                    staged.contributor_count()
                ),
            });
        }
        let audit = self.audit.with_withdrawal(amount)?;
        audit.verify(&staged, Wei::ZERO)?;

        let transfer = Transfer {
            to: self.guard.owner(),
            amount,
        };
        if let Err(err) = sink.send(&transfer, &staged) {
            let reason = match err {
                FundMeError::TransferFailed { reason } => reason,
                other => other.to_string(),
            };
            tracing::warn!(
                owner = %transfer.to,
                amount = %amount,
                strategy = %strategy,
                reason = %reason,
                "Withdrawal transfer rejected; staged clear discarded"
            );
            return Err(FundMeError::TransferFailed { reason });
        }

        // Commit.
        self.books = staged;
        self.custodied = Wei::ZERO;
        self.audit = audit;

        let receipt = WithdrawalReceipt {
            id: ReceiptId::new(),
            strategy,
            recipient: transfer.to,
            amount,
            funders_cleared,
            cost,
            completed_at: Utc::now(),
        };

        tracing::info!(
            receipt = %receipt.id,
            owner = %receipt.recipient,
            amount = %amount,
            funders = funders_cleared,
            strategy = %strategy,
            reads = cost.reads,
            writes = cost.writes,
            "Withdrawal complete"
        );

        Ok(receipt)
    }

    // =================================================================
    // Queries
    // =================================================================

    /// Amount `funder` has contributed since the last withdrawal.
    #[must_use]
    pub fn funded_amount(&self, funder: Address) -> Wei {
        self.books.funded_amount(funder)
    }

    /// Funder at `index` in contribution order.
    ///
    /// # Errors
    /// [`FundMeError::IndexOutOfRange`] if `index >= funder_count()`.
    pub fn funder_at(&self, index: usize) -> Result<Address> {
        self.books.funder_at(index)
    }

    #[must_use]
    pub fn funder_count(&self) -> usize {
        self.books.funder_count()
    }

    #[must_use]
    pub fn owner(&self) -> Address {
        self.guard.owner()
    }

    #[must_use]
    pub fn price_oracle_address(&self) -> Address {
        self.price_feed.address()
    }

    /// Version of the bound price feed.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.price_feed.version()
    }

    /// Total native value held.
    #[must_use]
    pub fn custodied_balance(&self) -> Wei {
        self.custodied
    }

    /// Minimum contribution, USD in 18-decimal fixed point.
    #[must_use]
    pub fn minimum_usd(&self) -> Wei {
        self.config.minimum_usd
    }

    #[must_use]
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    #[must_use]
    pub fn books(&self) -> &Books {
        &self.books
    }

    #[must_use]
    pub fn audit(&self) -> &CustodyAudit {
        &self.audit
    }

    /// Check the custody conservation invariant.
    pub fn verify_custody(&self) -> Result<()> {
        self.audit.verify(&self.books, self.custodied)
    }
}
